//! Pipeline-level tests driving the coordinator with mock filters.

use crate::filter_engine::buffer::{PixelBuffer, TileView};
use crate::filter_engine::cancel::CancelToken;
use crate::filter_engine::common::{EngineError, Result};
use crate::filter_engine::filter::{FilterParams, GaussianSmoother, TileFilter};
use crate::filter_engine::run::{RegionOutcome, RunConfig, RunCoordinator, RunStatus};
use crate::filter_engine::transport::TransportKind;

/// First byte of a tile that the failing mocks react to.
const MARKER: u8 = 0xFF;

struct IdentityFilter;

impl TileFilter for IdentityFilter {
    fn apply(&self, tile: &TileView<'_>, _params: &FilterParams) -> Result<Vec<u8>> {
        Ok(tile.pixels.to_vec())
    }
}

/// Fails on the tile whose first byte is `MARKER`, succeeds elsewhere.
struct MarkedTileFails;

impl TileFilter for MarkedTileFails {
    fn apply(&self, tile: &TileView<'_>, _params: &FilterParams) -> Result<Vec<u8>> {
        if tile.pixels.first() == Some(&MARKER) {
            return Err(EngineError::filter_failure("marked tile rejected"));
        }
        Ok(tile.pixels.to_vec())
    }
}

/// Panics on the tile whose first byte is `MARKER`.
struct MarkedTilePanics;

impl TileFilter for MarkedTilePanics {
    fn apply(&self, tile: &TileView<'_>, _params: &FilterParams) -> Result<Vec<u8>> {
        assert_ne!(tile.pixels.first(), Some(&MARKER), "worker went down");
        Ok(tile.pixels.to_vec())
    }
}

/// Returns one byte fewer than it was given.
struct ShapeBreaker;

impl TileFilter for ShapeBreaker {
    fn apply(&self, tile: &TileView<'_>, _params: &FilterParams) -> Result<Vec<u8>> {
        Ok(tile.pixels[1..].to_vec())
    }
}

/// Cancels its token while processing, then behaves as identity.
struct CancelsWhileFiltering {
    token: CancelToken,
}

impl TileFilter for CancelsWhileFiltering {
    fn apply(&self, tile: &TileView<'_>, _params: &FilterParams) -> Result<Vec<u8>> {
        self.token.cancel();
        Ok(tile.pixels.to_vec())
    }
}

fn gradient(width: usize, height: usize, channels: usize) -> PixelBuffer {
    let data = (0..width * height * channels)
        .map(|i| (i % 199) as u8)
        .collect();
    PixelBuffer::from_vec(width, height, channels, data).unwrap()
}

/// A 4x30 single-channel buffer whose middle band (rows 10..20) starts
/// with `MARKER` so exactly one of three regions trips the failing mocks.
fn marked_buffer() -> PixelBuffer {
    let mut buffer = gradient(4, 30, 1);
    buffer.bytes_mut()[10 * 4] = MARKER;
    buffer
}

fn config(tile_count: usize, transport: TransportKind) -> RunConfig {
    RunConfig::builder()
        .tile_count(tile_count)
        .transport(transport)
        .build()
}

#[test]
fn identity_over_channels_reproduces_the_input() {
    let input = gradient(40, 100, 3);
    let coordinator =
        RunCoordinator::with_filter(IdentityFilter, config(4, TransportKind::Channel));

    let report = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap();

    assert_eq!(report.status, RunStatus::Complete);
    assert_eq!(report.completed_regions(), 4);
    assert_eq!(report.output.unwrap(), input);
}

#[test]
fn identity_over_arena_reproduces_the_input() {
    let input = gradient(40, 100, 3);
    let coordinator =
        RunCoordinator::with_filter(IdentityFilter, config(4, TransportKind::SharedArena));

    let report = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap();

    assert_eq!(report.status, RunStatus::Complete);
    assert_eq!(report.output.unwrap(), input);
}

#[test]
fn round_trip_holds_for_uneven_partitions() {
    let input = gradient(7, 53, 4);
    for transport in [TransportKind::Channel, TransportKind::SharedArena] {
        let coordinator = RunCoordinator::with_filter(IdentityFilter, config(5, transport));
        let report = coordinator
            .run_parallel(&input, &CancelToken::new())
            .unwrap();
        assert_eq!(report.output.unwrap(), input);
    }
}

#[test]
fn sequential_and_parallel_outputs_are_identical() {
    let input = gradient(31, 50, 3);
    let coordinator = RunCoordinator::new(config(4, TransportKind::Channel));
    let cancel = CancelToken::new();

    let sequential = coordinator.run_sequential(&input, &cancel).unwrap();
    let parallel = coordinator.run_parallel(&input, &cancel).unwrap();

    assert_eq!(sequential.status, RunStatus::Complete);
    assert_eq!(parallel.status, RunStatus::Complete);
    assert_eq!(sequential.output.unwrap(), parallel.output.unwrap());
}

#[test]
fn both_transports_produce_identical_output() {
    let input = gradient(24, 37, 3);
    let cancel = CancelToken::new();

    let channel = RunCoordinator::new(config(3, TransportKind::Channel))
        .run_parallel(&input, &cancel)
        .unwrap();
    let arena = RunCoordinator::new(config(3, TransportKind::SharedArena))
        .run_parallel(&input, &cancel)
        .unwrap();

    assert_eq!(channel.output.unwrap(), arena.output.unwrap());
}

#[test]
fn smoothing_changes_a_non_uniform_image() {
    let input = gradient(16, 16, 3);
    let coordinator = RunCoordinator::new(config(2, TransportKind::Channel));

    let report = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap();

    assert_ne!(report.output.unwrap(), input);
}

#[test]
fn one_failing_region_does_not_stop_siblings() {
    let input = marked_buffer();
    for transport in [TransportKind::Channel, TransportKind::SharedArena] {
        let coordinator = RunCoordinator::with_filter(MarkedTileFails, config(3, transport));
        let report = coordinator
            .run_parallel(&input, &CancelToken::new())
            .unwrap();

        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.completed_regions(), 2);
        assert!(report.output.is_none());

        let failed: Vec<_> = report.failed_regions().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].region.row_start, 10);
        assert!(matches!(
            failed[0].outcome,
            RegionOutcome::Failed(EngineError::FilterFailure {
                row_start: 10,
                row_end: 20,
                ..
            })
        ));
    }
}

#[test]
fn panicking_worker_is_reported_lost() {
    let input = marked_buffer();
    let coordinator =
        RunCoordinator::with_filter(MarkedTilePanics, config(3, TransportKind::Channel));

    let report = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap();

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.completed_regions(), 2);

    let failed: Vec<_> = report.failed_regions().collect();
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].outcome,
        RegionOutcome::Failed(EngineError::WorkerLost {
            row_start: 10,
            row_end: 20,
        })
    ));
}

#[test]
fn shape_breaking_filter_fails_every_region() {
    let input = gradient(8, 20, 1);
    let coordinator =
        RunCoordinator::with_filter(ShapeBreaker, config(2, TransportKind::Channel));

    let report = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap();

    assert_eq!(report.status, RunStatus::Failed);
    assert_eq!(report.completed_regions(), 0);
    assert!(report
        .failed_regions()
        .all(|r| matches!(r.outcome, RegionOutcome::Failed(EngineError::FilterFailure { .. }))));
}

#[test]
fn precancelled_parallel_run_completes_nothing() {
    let input = gradient(12, 24, 3);
    for transport in [TransportKind::Channel, TransportKind::SharedArena] {
        let coordinator = RunCoordinator::with_filter(IdentityFilter, config(4, transport));
        let cancel = CancelToken::new();
        cancel.cancel();

        let report = coordinator.run_parallel(&input, &cancel).unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.completed_regions(), 0);
        assert!(report.output.is_none());
        assert!(report
            .regions
            .iter()
            .all(|r| matches!(r.outcome, RegionOutcome::Skipped)));
    }
}

#[test]
fn precancelled_sequential_run_completes_nothing() {
    let input = gradient(12, 24, 3);
    let coordinator = RunCoordinator::with_filter(IdentityFilter, config(4, TransportKind::Channel));
    let cancel = CancelToken::new();
    cancel.cancel();

    let report = coordinator.run_sequential(&input, &cancel).unwrap();

    assert_eq!(report.status, RunStatus::Cancelled);
    assert_eq!(report.completed_regions(), 0);
    assert!(report.output.is_none());
}

#[test]
fn sequential_cancellation_keeps_already_completed_regions() {
    let input = gradient(12, 24, 3);
    let cancel = CancelToken::new();
    let coordinator = RunCoordinator::with_filter(
        CancelsWhileFiltering {
            token: cancel.clone(),
        },
        config(4, TransportKind::Channel),
    );

    let report = coordinator.run_sequential(&input, &cancel).unwrap();

    // The first region runs to completion; the checkpoint before each
    // following region observes the flag.
    assert_eq!(report.status, RunStatus::Cancelled);
    assert_eq!(report.completed_regions(), 1);
    assert!(report.output.is_none());
}

#[test]
fn cancellation_after_completion_has_no_effect() {
    let input = gradient(12, 24, 3);
    let cancel = CancelToken::new();
    let coordinator = RunCoordinator::with_filter(IdentityFilter, config(4, TransportKind::Channel));

    let report = coordinator.run_parallel(&input, &cancel).unwrap();
    cancel.cancel();

    assert_eq!(report.status, RunStatus::Complete);
    assert_eq!(report.completed_regions(), 4);
}

#[test]
fn invalid_tile_count_aborts_before_dispatch() {
    let input = gradient(4, 2, 3);
    let coordinator = RunCoordinator::new(config(3, TransportKind::Channel));

    let err = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::InvalidPartitionCount {
            count: 3,
            height: 2
        }
    ));
}

#[test]
fn compare_runs_both_paths_over_the_same_input() {
    let input = gradient(20, 40, 3);
    let coordinator = RunCoordinator::new(config(4, TransportKind::SharedArena));

    let comparison = coordinator.compare(&input, &CancelToken::new()).unwrap();

    assert_eq!(comparison.sequential.status, RunStatus::Complete);
    assert_eq!(comparison.parallel.status, RunStatus::Complete);
    assert!(comparison.speedup() > 0.0);
    assert_eq!(
        comparison.sequential.output.unwrap(),
        comparison.parallel.output.unwrap()
    );
}

#[test]
fn gaussian_coordinator_defaults_to_real_smoothing() {
    let input = gradient(10, 10, 1);
    let coordinator = RunCoordinator::with_filter(
        GaussianSmoother,
        RunConfig::builder()
            .tile_count(2)
            .params(FilterParams { sigma: 0.0 })
            .build(),
    );

    // Degenerate sigma leaves the image untouched, which doubles as an
    // end-to-end identity check through the real filter.
    let report = coordinator
        .run_parallel(&input, &CancelToken::new())
        .unwrap();
    assert_eq!(report.output.unwrap(), input);
}
