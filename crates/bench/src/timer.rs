//! Console step timer for benchmark runs.
//!
//! Prints a banner, one line per step and a total. Every step is also
//! emitted as a [`TraceEvent::BenchStep`].

use std::time::{Duration, Instant};

use mb_domain::trace::TraceEvent;

const RULE_WIDTH: usize = 60;

/// One finished step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: String,
    pub duration: Duration,
    pub details: String,
    pub ok: bool,
}

#[derive(Debug)]
pub struct StepTimer {
    title: String,
    started: Instant,
    steps: Vec<StepRecord>,
}

impl StepTimer {
    /// Start timing and print the banner.
    pub fn start(title: impl Into<String>) -> Self {
        let title = title.into();
        println!("\n{}", banner(&title));
        Self {
            title,
            started: Instant::now(),
            steps: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Record a step that began at `since`.
    pub fn log_step(&mut self, step: &str, since: Instant, ok: bool, details: impl Into<String>) {
        let record = StepRecord {
            step: step.to_owned(),
            duration: since.elapsed(),
            details: details.into(),
            ok,
        };

        println!("{}", step_line(&record));
        TraceEvent::BenchStep {
            step: record.step.clone(),
            duration_ms: record.duration.as_millis() as u64,
            ok,
        }
        .emit();

        self.steps.push(record);
    }

    /// Print the total and return it.
    pub fn finish(self) -> Duration {
        let total = self.started.elapsed();
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{rule}");
        println!("Total Time: {:.4}s", total.as_secs_f64());
        println!("{rule}\n");
        total
    }
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\nBENCHMARK: {title}\n{rule}")
}

fn step_line(record: &StepRecord) -> String {
    let mut line = format!(
        "  → {}: {:.4}s",
        record.step,
        record.duration.as_secs_f64()
    );
    if !record.details.is_empty() {
        line.push_str(&format!(" ({})", record.details));
    }
    if !record.ok {
        line.push_str(" [FAILED]");
    }
    line
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
