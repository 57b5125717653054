use crate::workflow::config::RunPlan;
use anyhow::Context;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uavcore::engine::Scheduler;
use uavcore::telemetry::RunMetrics;
use uavcore::trace::TraceWriter;

/// Figures surfaced to the operator after a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub ticks: u64,
    pub samples: u64,
    pub clamped: u64,
    pub trace_path: PathBuf,
}

pub struct Runner {
    plan: RunPlan,
}

impl Runner {
    pub fn new(plan: RunPlan) -> Self {
        Self { plan }
    }

    /// Validates the plan, executes every tick, and writes the trace. When
    /// `frames_json` is given, the per-tick frame stream is additionally
    /// mirrored as JSON lines for side consumers.
    pub fn execute(&self, frames_json: Option<&Path>) -> anyhow::Result<RunReport> {
        let plan = &self.plan;
        let scheduler = Scheduler::new(
            &plan.bounds,
            &plan.uavs,
            plan.axis,
            plan.policy,
            plan.separation,
        )
        .context("validating scenario")?;

        if let Some(parent) = plan.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating trace directory {}", parent.display()))?;
            }
        }
        let writer = TraceWriter::create(&plan.output)
            .with_context(|| format!("creating trace {}", plan.output.display()))?;

        let summary = match frames_json {
            None => scheduler.run(writer).context("executing run")?,
            Some(json_path) => {
                self.run_with_side_channel(&scheduler, writer, json_path)
                    .context("executing run")?
            }
        };

        info!(
            "run finished: {} tick(s), {} sample(s), {} clamped",
            summary.ticks, summary.samples, summary.clamped
        );

        Ok(RunReport {
            ticks: summary.ticks,
            samples: summary.samples,
            clamped: summary.clamped,
            trace_path: summary.trace_path,
        })
    }

    /// Single pass over the frame stream feeding both the trace writer and
    /// the JSON side channel, preserving the trace's ordering guarantees.
    /// Frames are staged in a `.part` sibling and only renamed into place
    /// once the run completes, mirroring the trace writer's semantics.
    fn run_with_side_channel(
        &self,
        scheduler: &Scheduler<'_>,
        writer: TraceWriter,
        json_path: &Path,
    ) -> anyhow::Result<uavcore::engine::RunSummary> {
        let staged = staged_path(json_path);
        match self.mirror_frames(scheduler, writer, &staged) {
            Ok(summary) => {
                fs::rename(&staged, json_path).with_context(|| {
                    format!("publishing frame stream {}", json_path.display())
                })?;
                Ok(summary)
            }
            Err(error) => {
                let _ = fs::remove_file(&staged);
                Err(error)
            }
        }
    }

    fn mirror_frames(
        &self,
        scheduler: &Scheduler<'_>,
        mut writer: TraceWriter,
        staged: &Path,
    ) -> anyhow::Result<uavcore::engine::RunSummary> {
        let json_file = File::create(staged)
            .with_context(|| format!("creating frame stream {}", staged.display()))?;
        let mut json_out = BufWriter::new(json_file);
        let metrics = RunMetrics::new();

        for frame in scheduler.frames() {
            let frame = frame?;
            for sample in &frame.samples {
                writer.write(sample)?;
            }
            serde_json::to_writer(&mut json_out, &frame)?;
            writeln!(json_out)?;
            metrics.record_tick(frame.samples.len() as u64, frame.clamped);
        }
        json_out.flush()?;

        let trace_path = writer.finalize()?;
        let snapshot = metrics.snapshot();
        Ok(uavcore::engine::RunSummary {
            ticks: snapshot.ticks,
            samples: snapshot.samples,
            clamped: snapshot.clamped,
            trace_path,
        })
    }
}

fn staged_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_os_string();
    staged.push(".part");
    PathBuf::from(staged)
}
