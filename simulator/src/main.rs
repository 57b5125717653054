use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use workflow::config::ScenarioConfig;
use workflow::runner::Runner;

mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the UAV mobility-trace engine")]
struct Args {
    /// Scenario description in YAML
    #[arg(long)]
    scenario: PathBuf,
    /// Override the trace output path from the scenario file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also mirror the per-tick frame stream as JSON lines to this path
    #[arg(long)]
    frames_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = ScenarioConfig::load(&args.scenario)?;
    if let Some(output) = args.output {
        config.simulation.output = output;
    }
    let plan = config.into_run().context("building run plan")?;

    let runner = Runner::new(plan);
    let report = runner.execute(args.frames_json.as_deref())?;

    println!(
        "Run complete -> ticks {}, samples {}, clamped {}, trace {}",
        report.ticks,
        report.samples,
        report.clamped,
        report.trace_path.display()
    );

    Ok(())
}
