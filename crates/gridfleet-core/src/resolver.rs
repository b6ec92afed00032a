//! Automatic conflict resolution.
//!
//! Applies the resolution strategy attached to each conflict by mutating
//! drone state in place, under coordinator control. Resolutions are
//! applied independently in input order; when a drone appears in several
//! simultaneous conflicts, later resolutions overwrite earlier ones within
//! the same tick.

use crate::airspace::{PRIMARY_TRANSIT_LAYER, SECONDARY_TRANSIT_LAYER};
use crate::models::{Conflict, Drone, DroneStatus, ResolutionAction};
use crate::planner;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Applies resolution policies to the drone set.
///
/// Owns the jitter rng so reroutes are reproducible: seed it through
/// [`ConflictResolver::with_seed`] to assert exact reroute output in
/// tests. Given the same rng state and conflict list, applying the list
/// twice produces the same end state.
#[derive(Debug)]
pub struct ConflictResolver {
    rng: StdRng,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic resolver for reproducible reroute jitter.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Apply every conflict's resolution to the drone set.
    ///
    /// The pair's first-listed drone is "A" below; the drone with the
    /// larger id is treated as lower priority for one-sided actions.
    pub fn resolve(&mut self, drones: &mut [Drone], conflicts: &[Conflict]) {
        for conflict in conflicts {
            let Some(action) = conflict.resolution else {
                continue;
            };
            let [id_a, id_b] = conflict.drone_ids;
            let Some(idx_a) = drones.iter().position(|d| d.id == id_a) else {
                continue;
            };
            let Some(idx_b) = drones.iter().position(|d| d.id == id_b) else {
                continue;
            };

            match action {
                // Fixed reassignment, not the parity rule; the layers are
                // not re-derived afterward
                ResolutionAction::AltitudeChange => {
                    drones[idx_a].assigned_layer = Some(SECONDARY_TRANSIT_LAYER);
                    drones[idx_b].assigned_layer = Some(PRIMARY_TRANSIT_LAYER);
                }
                ResolutionAction::PathReroute => {
                    let lower_priority = if id_a > id_b { idx_a } else { idx_b };
                    self.reroute(&mut drones[lower_priority]);
                }
                // Hold on the ground without clearing path or target
                ResolutionAction::TimeDelay => {
                    let lower_priority = if id_a > id_b { idx_a } else { idx_b };
                    drones[lower_priority].status = DroneStatus::Preparing;
                }
                ResolutionAction::EmergencyStop => {
                    drones[idx_a].status = DroneStatus::Emergency;
                    drones[idx_b].status = DroneStatus::Emergency;
                }
            }
        }
    }

    /// Re-plan the drone's path with jittered interior waypoints.
    ///
    /// Endpoints are left untouched; each interior waypoint shifts by
    /// exactly half a grid unit per axis, direction drawn from the rng.
    fn reroute(&mut self, drone: &mut Drone) {
        let Some(target) = drone.target_position.clone() else {
            return;
        };
        let mut path = planner::plan_path(drone.position, &target);
        let last = path.len() - 1;
        for point in &mut path[1..last] {
            point.x += if self.rng.random_bool(0.5) { 0.5 } else { -0.5 };
            point.y += if self.rng.random_bool(0.5) { 0.5 } else { -0.5 };
        }
        drone.flight_path = Some(path);
    }
}
