use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uavcore::engine::SeparationRule;
use uavcore::mobility::MobilityPattern;
use uavcore::scenario::{BoundaryPolicy, Position, ScenarioBounds, TimeAxis, UavSpec};

/// On-disk scenario description. UAV declaration order in the file is the
/// engine's iteration order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub simulation: SimulationSection,
    pub bounds: ScenarioBounds,
    #[serde(default)]
    pub uavs: Vec<UavEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Horizon in seconds.
    pub duration: f64,
    /// Clock step in seconds.
    pub step: f64,
    /// Trace output path.
    pub output: PathBuf,
    /// Mandatory; a scenario that leaves the policy implicit is rejected.
    pub boundary_policy: BoundaryPolicy,
    #[serde(default)]
    pub altitude_separation: Option<SeparationRule>,
}

/// One UAV entry. The pattern fields sit inline next to `id`/`start` via the
/// `kind` tag. `start` may be omitted for patterns with a natural origin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UavEntry {
    pub id: String,
    pub start: Option<Position>,
    #[serde(flatten)]
    pub pattern: MobilityPattern,
}

impl UavEntry {
    fn resolved_start(&self) -> anyhow::Result<Position> {
        if let Some(start) = self.start {
            return Ok(start);
        }
        match &self.pattern {
            MobilityPattern::WaypointLoop(params) => params
                .waypoints
                .first()
                .copied()
                .with_context(|| format!("uav {}: waypoint list is empty", self.id)),
            MobilityPattern::LinearSweep(params) => Ok(params.from),
            MobilityPattern::Static | MobilityPattern::RandomWaypoint(_) => {
                bail!(
                    "uav {}: pattern {} requires an explicit start position",
                    self.id,
                    self.pattern.kind_name()
                )
            }
        }
    }
}

/// Everything the engine needs, converted to core types.
#[derive(Clone, Debug)]
pub struct RunPlan {
    pub bounds: ScenarioBounds,
    pub axis: TimeAxis,
    pub policy: BoundaryPolicy,
    pub separation: Option<SeparationRule>,
    pub uavs: Vec<UavSpec>,
    pub output: PathBuf,
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Range-checks the clock and bounds, resolves start positions, and
    /// hands back a plan in core types. Pattern-specific semantic checks are
    /// the scheduler's job.
    pub fn into_run(self) -> anyhow::Result<RunPlan> {
        if self.simulation.step <= 0.0 {
            bail!("time step must be positive, got {}", self.simulation.step);
        }
        if self.simulation.duration < 0.0 {
            bail!(
                "duration must be non-negative, got {}",
                self.simulation.duration
            );
        }
        if self.bounds.min_x >= self.bounds.max_x || self.bounds.min_y >= self.bounds.max_y {
            bail!("scenario bounds have no horizontal extent");
        }
        if self.bounds.min_altitude > self.bounds.max_altitude {
            bail!("scenario altitude range is inverted");
        }

        let mut uavs = Vec::with_capacity(self.uavs.len());
        for entry in &self.uavs {
            let start = entry.resolved_start()?;
            uavs.push(UavSpec::new(entry.id.as_str(), start, entry.pattern.clone()));
        }

        Ok(RunPlan {
            bounds: self.bounds,
            axis: TimeAxis::new(self.simulation.duration, self.simulation.step),
            policy: self.simulation.boundary_policy,
            separation: self.simulation.altitude_separation,
            uavs,
            output: self.simulation.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO_YAML: &str = "\
simulation:
  duration: 10.0
  step: 1.0
  output: trace.xml
  boundary_policy: clamp
bounds:
  min_x: 0.0
  max_x: 500.0
  min_y: 0.0
  max_y: 500.0
  min_altitude: 10.0
  max_altitude: 120.0
uavs:
  - id: hover
    kind: static
    start: {x: 100.0, y: 100.0, altitude: 50.0}
  - id: patrol
    kind: waypoint_loop
    speed: 4.0
    waypoints:
      - {x: 0.0, y: 0.0, altitude: 60.0}
      - {x: 50.0, y: 0.0, altitude: 60.0}
      - {x: 50.0, y: 50.0, altitude: 60.0}
  - id: scan
    kind: linear_sweep
    speed: 6.0
    from: {x: 10.0, y: 10.0, altitude: 40.0}
    to: {x: 400.0, y: 10.0, altitude: 40.0}
";

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(contents.as_bytes()).unwrap();
        temp
    }

    #[test]
    fn config_load_reads_yaml() {
        let temp = write_temp(SCENARIO_YAML);
        let config = ScenarioConfig::load(temp.path()).unwrap();
        assert_eq!(config.uavs.len(), 3);
        assert_eq!(config.simulation.boundary_policy, BoundaryPolicy::Clamp);
        assert!(matches!(config.uavs[0].pattern, MobilityPattern::Static));
    }

    #[test]
    fn missing_boundary_policy_is_rejected_at_parse_time() {
        let yaml = SCENARIO_YAML.replace("  boundary_policy: clamp\n", "");
        let temp = write_temp(&yaml);
        assert!(ScenarioConfig::load(temp.path()).is_err());
    }

    #[test]
    fn into_run_preserves_declaration_order() {
        let temp = write_temp(SCENARIO_YAML);
        let plan = ScenarioConfig::load(temp.path()).unwrap().into_run().unwrap();
        let ids: Vec<&str> = plan.uavs.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["hover", "patrol", "scan"]);
    }

    #[test]
    fn omitted_start_defaults_to_the_route_origin() {
        let temp = write_temp(SCENARIO_YAML);
        let plan = ScenarioConfig::load(temp.path()).unwrap().into_run().unwrap();
        // patrol declared no start: launches at its first waypoint.
        assert_eq!(plan.uavs[1].start, Position::new(0.0, 0.0, 60.0));
        // scan launches at its near sweep endpoint.
        assert_eq!(plan.uavs[2].start, Position::new(10.0, 10.0, 40.0));
    }

    #[test]
    fn static_uav_without_start_is_an_error() {
        let yaml = SCENARIO_YAML.replace("    start: {x: 100.0, y: 100.0, altitude: 50.0}\n", "");
        let temp = write_temp(&yaml);
        let err = ScenarioConfig::load(temp.path())
            .unwrap()
            .into_run()
            .unwrap_err();
        assert!(err.to_string().contains("hover"));
    }

    #[test]
    fn zero_step_is_rejected() {
        let yaml = SCENARIO_YAML.replace("  step: 1.0\n", "  step: 0.0\n");
        let temp = write_temp(&yaml);
        assert!(ScenarioConfig::load(temp.path()).unwrap().into_run().is_err());
    }
}
