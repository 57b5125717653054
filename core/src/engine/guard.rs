use crate::prelude::BoundaryViolation;
use crate::scenario::bounds::{BoundaryPolicy, Position, ScenarioBounds};
use crate::trace::sample::TrajectorySample;
use serde::{Deserialize, Serialize};

/// Verdict for a position that passed the guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryOutcome {
    Accepted(Position),
    Clamped(Position),
}

impl BoundaryOutcome {
    pub fn position(&self) -> Position {
        match self {
            BoundaryOutcome::Accepted(p) | BoundaryOutcome::Clamped(p) => *p,
        }
    }
}

/// Minimum vertical spacing for UAVs sharing a horizontal cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeparationRule {
    /// Horizontal cell edge length used to bucket positions.
    pub cell_size: f64,
    /// Smallest permitted altitude difference inside one cell.
    pub min_vertical: f64,
}

/// Applies the envelope policy and optional altitude-separation rule to raw
/// pattern output. Holds the run's shared bounds by reference; nothing here
/// mutates scenario state.
pub struct BoundaryGuard<'a> {
    bounds: &'a ScenarioBounds,
    policy: BoundaryPolicy,
    separation: Option<SeparationRule>,
}

impl<'a> BoundaryGuard<'a> {
    pub fn new(
        bounds: &'a ScenarioBounds,
        policy: BoundaryPolicy,
        separation: Option<SeparationRule>,
    ) -> Self {
        Self {
            bounds,
            policy,
            separation,
        }
    }

    /// Checks one raw position. No-fly zones reject under either policy;
    /// there is no meaningful nearest point to clamp to.
    pub fn check(
        &self,
        uav_id: &str,
        tick: u64,
        position: Position,
    ) -> Result<BoundaryOutcome, BoundaryViolation> {
        for zone in &self.bounds.no_fly_zones {
            if zone.contains(position.x, position.y) {
                return Err(self.violation(
                    uav_id,
                    tick,
                    position,
                    format!("inside no-fly zone {}", zone.name),
                ));
            }
        }
        if self.bounds.contains(&position) {
            return Ok(BoundaryOutcome::Accepted(position));
        }
        match self.policy {
            BoundaryPolicy::Clamp => Ok(BoundaryOutcome::Clamped(self.bounds.clamp(&position))),
            BoundaryPolicy::Reject => Err(self.violation(
                uav_id,
                tick,
                position,
                "outside scenario envelope".to_string(),
            )),
        }
    }

    /// Pairwise altitude-separation check over one tick's resolved samples.
    /// O(U^2), fine for the tens of UAVs a scenario carries.
    pub fn check_separation(&self, samples: &[TrajectorySample]) -> Result<(), BoundaryViolation> {
        let Some(rule) = self.separation else {
            return Ok(());
        };
        for i in 0..samples.len() {
            for j in (i + 1)..samples.len() {
                let a = &samples[i];
                let b = &samples[j];
                if cell(rule.cell_size, a.x, a.y) == cell(rule.cell_size, b.x, b.y)
                    && (a.altitude - b.altitude).abs() < rule.min_vertical
                {
                    return Err(BoundaryViolation {
                        uav_id: b.uav_id.clone(),
                        tick: b.tick,
                        x: b.x,
                        y: b.y,
                        altitude: b.altitude,
                        reason: format!(
                            "within {:.2} vertical units of {} in the same horizontal cell",
                            rule.min_vertical, a.uav_id
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    fn violation(
        &self,
        uav_id: &str,
        tick: u64,
        position: Position,
        reason: String,
    ) -> BoundaryViolation {
        BoundaryViolation {
            uav_id: uav_id.to_string(),
            tick,
            x: position.x,
            y: position.y,
            altitude: position.altitude,
            reason,
        }
    }
}

fn cell(cell_size: f64, x: f64, y: f64) -> (i64, i64) {
    ((x / cell_size).floor() as i64, (y / cell_size).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::bounds::NoFlyZone;

    fn bounds() -> ScenarioBounds {
        ScenarioBounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 100.0,
            min_altitude: 20.0,
            max_altitude: 120.0,
            no_fly_zones: Vec::new(),
        }
    }

    #[test]
    fn accepts_in_bounds_positions_unchanged() {
        let b = bounds();
        let guard = BoundaryGuard::new(&b, BoundaryPolicy::Clamp, None);
        let p = Position::new(10.0, 10.0, 50.0);
        assert_eq!(
            guard.check("uav1", 0, p).unwrap(),
            BoundaryOutcome::Accepted(p)
        );
    }

    #[test]
    fn clamp_policy_pulls_to_envelope_and_is_idempotent() {
        let b = bounds();
        let guard = BoundaryGuard::new(&b, BoundaryPolicy::Clamp, None);
        let outcome = guard
            .check("uav1", 3, Position::new(130.0, -4.0, 50.0))
            .unwrap();
        let clamped = outcome.position();
        assert_eq!(outcome, BoundaryOutcome::Clamped(Position::new(100.0, 0.0, 50.0)));
        // A second pass over the clamped position accepts it as-is.
        assert_eq!(
            guard.check("uav1", 3, clamped).unwrap(),
            BoundaryOutcome::Accepted(clamped)
        );
    }

    #[test]
    fn reject_policy_identifies_uav_and_tick() {
        let b = bounds();
        let guard = BoundaryGuard::new(&b, BoundaryPolicy::Reject, None);
        let err = guard
            .check("uav9", 17, Position::new(130.0, 5.0, 50.0))
            .unwrap_err();
        assert_eq!(err.uav_id, "uav9");
        assert_eq!(err.tick, 17);
        assert!(err.reason.contains("envelope"));
    }

    #[test]
    fn no_fly_zone_rejects_even_under_clamp() {
        let mut b = bounds();
        b.no_fly_zones.push(NoFlyZone {
            name: "hospital".into(),
            vertices: vec![(40.0, 40.0), (60.0, 40.0), (60.0, 60.0), (40.0, 60.0)],
        });
        let guard = BoundaryGuard::new(&b, BoundaryPolicy::Clamp, None);
        let err = guard
            .check("uav2", 5, Position::new(50.0, 50.0, 60.0))
            .unwrap_err();
        assert!(err.reason.contains("hospital"));
    }

    #[test]
    fn separation_rule_flags_vertical_conflicts_in_one_cell() {
        let b = bounds();
        let rule = SeparationRule {
            cell_size: 10.0,
            min_vertical: 15.0,
        };
        let guard = BoundaryGuard::new(&b, BoundaryPolicy::Clamp, Some(rule));

        let conflicting = vec![
            TrajectorySample::new("uav1", 2, 2.0, 12.0, 12.0, 50.0, 0.0),
            TrajectorySample::new("uav2", 2, 2.0, 14.0, 18.0, 60.0, 0.0),
        ];
        let err = guard.check_separation(&conflicting).unwrap_err();
        assert_eq!(err.uav_id, "uav2");
        assert!(err.reason.contains("uav1"));

        let separated = vec![
            TrajectorySample::new("uav1", 2, 2.0, 12.0, 12.0, 50.0, 0.0),
            TrajectorySample::new("uav2", 2, 2.0, 14.0, 18.0, 70.0, 0.0),
        ];
        assert!(guard.check_separation(&separated).is_ok());

        let distant = vec![
            TrajectorySample::new("uav1", 2, 2.0, 12.0, 12.0, 50.0, 0.0),
            TrajectorySample::new("uav2", 2, 2.0, 80.0, 80.0, 50.0, 0.0),
        ];
        assert!(guard.check_separation(&distant).is_ok());
    }

    #[test]
    fn separation_rule_absent_checks_nothing() {
        let b = bounds();
        let guard = BoundaryGuard::new(&b, BoundaryPolicy::Clamp, None);
        let stacked = vec![
            TrajectorySample::new("uav1", 0, 0.0, 10.0, 10.0, 50.0, 0.0),
            TrajectorySample::new("uav2", 0, 0.0, 10.0, 10.0, 50.0, 0.0),
        ];
        assert!(guard.check_separation(&stacked).is_ok());
    }
}
