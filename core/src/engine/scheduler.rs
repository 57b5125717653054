use crate::engine::guard::{BoundaryGuard, BoundaryOutcome, SeparationRule};
use crate::mobility::PatternSampler;
use crate::prelude::{ConfigError, ConfigErrors, EngineResult};
use crate::scenario::bounds::{BoundaryPolicy, Position, ScenarioBounds, TimeAxis};
use crate::scenario::uav::UavSpec;
use crate::telemetry::metrics::RunMetrics;
use crate::trace::sample::TrajectorySample;
use crate::trace::writer::TraceWriter;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// All positions resolved for one tick, in UAV declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct TickFrame {
    pub tick: u64,
    pub timestamp: f64,
    pub samples: Vec<TrajectorySample>,
    /// How many of this tick's positions the clamp policy had to pull back.
    pub clamped: u64,
}

/// Figures reported after a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub samples: u64,
    pub clamped: u64,
    pub trace_path: PathBuf,
}

/// Drives the shared clock across every UAV in declaration order and streams
/// the resulting samples. Construction validates all mobility parameters up
/// front, collecting every failure before reporting.
#[derive(Debug)]
pub struct Scheduler<'a> {
    bounds: &'a ScenarioBounds,
    uavs: &'a [UavSpec],
    axis: TimeAxis,
    policy: BoundaryPolicy,
    separation: Option<SeparationRule>,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        bounds: &'a ScenarioBounds,
        uavs: &'a [UavSpec],
        axis: TimeAxis,
        policy: BoundaryPolicy,
        separation: Option<SeparationRule>,
    ) -> EngineResult<Self> {
        let mut errors = ConfigErrors::default();
        let mut seen = HashSet::new();
        for uav in uavs {
            if !seen.insert(uav.id.as_str()) {
                errors.push(ConfigError::new(uav.id.as_str(), "duplicate uav id"));
            }
            if let Err(error) = uav.pattern.validate(&uav.id) {
                errors.push(error);
            }
        }
        errors.into_result()?;
        info!(
            "scheduler ready: {} uav(s), {} tick(s) at step {:.2}",
            uavs.len(),
            axis.tick_count() + 1,
            axis.step
        );
        Ok(Self {
            bounds,
            uavs,
            axis,
            policy,
            separation,
        })
    }

    /// The lazy per-tick frame stream: finite, single pass, computed as it
    /// is consumed. This is also the side channel renderers may drain.
    pub fn frames(&self) -> FrameStream<'_> {
        FrameStream {
            guard: BoundaryGuard::new(self.bounds, self.policy, self.separation),
            axis: self.axis,
            uavs: self.uavs,
            samplers: self
                .uavs
                .iter()
                .map(|uav| uav.pattern.sampler(uav.start))
                .collect(),
            previous: vec![None; self.uavs.len()],
            next_tick: 0,
            finished: false,
        }
    }

    /// Runs every tick into `writer`, finalizing on success. Any failure
    /// propagates unchanged and the staged trace is discarded on the way out
    /// (the writer's drop guard handles every early-exit path).
    pub fn run(&self, mut writer: TraceWriter) -> EngineResult<RunSummary> {
        let metrics = RunMetrics::new();
        for frame in self.frames() {
            let frame = frame?;
            for sample in &frame.samples {
                writer.write(sample)?;
            }
            metrics.record_tick(frame.samples.len() as u64, frame.clamped);
        }
        let trace_path = writer.finalize()?;
        let snapshot = metrics.snapshot();
        Ok(RunSummary {
            ticks: snapshot.ticks,
            samples: snapshot.samples,
            clamped: snapshot.clamped,
            trace_path,
        })
    }
}

/// Iterator over tick frames. Stops permanently after yielding an error, so
/// a rejected run cannot resume mid-trace.
pub struct FrameStream<'a> {
    guard: BoundaryGuard<'a>,
    axis: TimeAxis,
    uavs: &'a [UavSpec],
    samplers: Vec<PatternSampler>,
    previous: Vec<Option<Position>>,
    next_tick: u64,
    finished: bool,
}

impl Iterator for FrameStream<'_> {
    type Item = EngineResult<TickFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.next_tick > self.axis.tick_count() {
            return None;
        }
        let tick = self.next_tick;
        let timestamp = self.axis.timestamp(tick);
        let uavs = self.uavs;
        let mut samples = Vec::with_capacity(uavs.len());
        let mut clamped = 0u64;

        for (index, uav) in uavs.iter().enumerate() {
            let raw = self.samplers[index].position_at(timestamp);
            let outcome = match self.guard.check(&uav.id, tick, raw) {
                Ok(outcome) => outcome,
                Err(violation) => {
                    self.finished = true;
                    return Some(Err(violation.into()));
                }
            };
            if let BoundaryOutcome::Clamped(_) = outcome {
                clamped += 1;
                debug!("uav {} clamped at tick {}", uav.id, tick);
            }
            let position = outcome.position();
            let speed = match self.previous[index] {
                Some(previous) => previous.distance_to(&position) / self.axis.step,
                None => 0.0,
            };
            self.previous[index] = Some(position);
            samples.push(TrajectorySample::new(
                uav.id.as_str(),
                tick,
                timestamp,
                position.x,
                position.y,
                position.altitude,
                speed,
            ));
        }

        if let Err(violation) = self.guard.check_separation(&samples) {
            self.finished = true;
            return Some(Err(violation.into()));
        }

        self.next_tick += 1;
        Some(Ok(TickFrame {
            tick,
            timestamp,
            samples,
            clamped,
        }))
    }
}
