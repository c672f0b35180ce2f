//! Phase timing for the packaging pipeline.

use std::time::{Duration, Instant};

/// Measures one pipeline phase and prints its duration when finished.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Print the elapsed time, e.g. `  [3.2s] Build`.
    pub fn finish(self) {
        println!("  {} {}", format_duration(self.elapsed()), self.name);
    }
}

/// `[12.3s]` under a minute, `[1.5m]` above.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 60.0 {
        format!("[{:.1}m]", secs / 60.0)
    } else {
        format!("[{:.1}s]", secs)
    }
}
