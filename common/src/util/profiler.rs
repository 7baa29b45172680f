use std::time::Instant;

/// Logs how long the enclosing scope ran when dropped.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &'static str) -> Self {
        log::debug!("{} started", name);
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::info!(
            "{} took {:.3} ms",
            self.name,
            self.start.elapsed().as_secs_f64() * 1e3
        );
    }
}
