use std::sync::Mutex;

/// Run progress counters, shared behind interior mutability so a driver can
/// hold a reference while the scheduler records.
pub struct RunMetrics {
    inner: Mutex<Counters>,
}

#[derive(Default)]
struct Counters {
    ticks: u64,
    samples: u64,
    clamped: u64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub samples: u64,
    pub clamped: u64,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    /// Records one fully resolved tick.
    pub fn record_tick(&self, samples: u64, clamped: u64) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.ticks += 1;
            counters.samples += samples;
            counters.clamped += clamped;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(counters) = self.inner.lock() {
            MetricsSnapshot {
                ticks: counters.ticks,
                samples: counters.samples,
                clamped: counters.clamped,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_tick_counters() {
        let metrics = RunMetrics::new();
        metrics.record_tick(3, 1);
        metrics.record_tick(3, 0);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.samples, 6);
        assert_eq!(snapshot.clamped, 1);
    }
}
