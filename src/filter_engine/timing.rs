use std::time::{Duration, Instant};

/// One named, timed step of a run.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Named step durations recorded over one run.
#[derive(Debug, Clone, Default)]
pub struct RunTimings {
    steps: Vec<StepTiming>,
}

impl RunTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, duration: Duration) {
        self.steps.push(StepTiming { name, duration });
    }

    pub fn step(&self, name: &str) -> Option<Duration> {
        self.steps
            .iter()
            .find(|step| step.name == name)
            .map(|step| step.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn total(&self) -> Duration {
        self.steps.iter().map(|step| step.duration).sum()
    }
}

pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
