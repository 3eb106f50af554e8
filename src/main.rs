use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use tileblur_rs::codec::{DynamicReader, ImageReader, ImageWriter, JpegWriter, PngWriter};
use tileblur_rs::filter_engine::{
    CancelToken, FilterParams, PixelBuffer, RegionOutcome, RunConfig, RunCoordinator, RunStatus,
    TransportKind, hook_sigint,
};
use tileblur_rs::logger;

#[derive(Parser)]
#[command(name = "tileblur", about = "Tiled parallel gaussian smoothing")]
struct Cli {
    /// Input image (png or jpeg)
    input: PathBuf,

    /// Output path; the encoder is chosen by extension
    output: PathBuf,

    /// Number of horizontal tiles (defaults to the logical CPU count)
    #[arg(short = 'n', long)]
    tiles: Option<usize>,

    /// Gaussian sigma
    #[arg(long, default_value_t = 2.0)]
    sigma: f32,

    #[arg(long, value_enum, default_value_t = TransportArg::Channel)]
    transport: TransportArg,

    /// Also run the sequential baseline and print a timing comparison
    #[arg(long)]
    compare: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TransportArg {
    Channel,
    Arena,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Channel => TransportKind::Channel,
            TransportArg::Arena => TransportKind::SharedArena,
        }
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    let data = fs::read(&cli.input)
        .with_context(|| format!("reading input {}", cli.input.display()))?;
    let input = DynamicReader.read_image(&data)?;
    info!(
        width = input.width(),
        height = input.height(),
        channels = input.channels(),
        "decoded input image"
    );

    let cancel = CancelToken::new();
    hook_sigint(&cancel)?;

    let mut builder = RunConfig::builder()
        .params(FilterParams { sigma: cli.sigma })
        .transport(cli.transport.into());
    if let Some(tiles) = cli.tiles {
        builder = builder.tile_count(tiles);
    }
    let coordinator = RunCoordinator::new(builder.build());

    let report = if cli.compare {
        let comparison = coordinator.compare(&input, &cancel)?;
        comparison.print_summary();
        comparison.parallel
    } else {
        coordinator.run_parallel(&input, &cancel)?
    };

    match report.status {
        RunStatus::Cancelled => {
            warn!(
                completed = report.completed_regions(),
                total = report.regions.len(),
                "run cancelled, no output written"
            );
            Ok(())
        }
        RunStatus::Failed => {
            for failed in report.failed_regions() {
                if let RegionOutcome::Failed(err) = &failed.outcome {
                    warn!(
                        row_start = failed.region.row_start,
                        row_end = failed.region.row_end,
                        error = %err,
                        "region failed"
                    );
                }
            }
            bail!(
                "{} of {} regions failed",
                report.regions.len() - report.completed_regions(),
                report.regions.len()
            );
        }
        RunStatus::Complete => {
            let image = report
                .output
                .as_ref()
                .context("completed run produced no output buffer")?;
            write_output(&cli.output, image)?;
            info!(
                path = %cli.output.display(),
                elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                "output written"
            );
            Ok(())
        }
    }
}

fn write_output(path: &Path, image: &PixelBuffer) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating output {}", path.display()))?;
    let mut output = BufWriter::new(file);

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => JpegWriter::default().write_image(image, &mut output)?,
        _ => PngWriter.write_image(image, &mut output)?,
    }

    output.flush()?;
    Ok(())
}
