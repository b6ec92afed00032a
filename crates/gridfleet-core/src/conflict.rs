//! Conflict detection between planned flight paths.
//!
//! Scans active drones pairwise and flags waypoint proximities as
//! conflicts, with a resolution strategy pre-selected from the conflict's
//! timing. Deliberately exhaustive rather than spatially indexed: the
//! fleet is bounded at 16 drones and every path has 5 waypoints.

use crate::models::{Conflict, Drone};
use crate::rules::CoordinationRules;

/// Pairwise waypoint-proximity conflict detector.
///
/// Only drones sharing an assigned layer are tested against each other;
/// same-position drones on different layers are assumed vertically
/// separated. Conflicts are rebuilt from scratch on every call.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    rules: CoordinationRules,
}

impl ConflictDetector {
    pub fn new(rules: CoordinationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CoordinationRules {
        &self.rules
    }

    /// Produce the full conflict set for the current tick.
    ///
    /// Considers drones in an airborne status with a defined flight path.
    /// For each unordered same-layer pair, every waypoint of the first
    /// drone's path is compared against every waypoint of the second's;
    /// the first proximity under the threshold becomes the pair's single
    /// conflict and ends that pair's scan.
    pub fn detect(&self, drones: &[Drone]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        let active: Vec<&Drone> = drones
            .iter()
            .filter(|d| d.status.is_airborne() && d.flight_path.is_some())
            .collect();
        if active.len() < 2 {
            return conflicts;
        }

        for i in 0..active.len() {
            let drone_a = active[i];
            let path_a = drone_a.flight_path.as_deref().unwrap_or_default();

            for drone_b in &active[i + 1..] {
                // Different transit layers are vertically separated
                if drone_a.assigned_layer != drone_b.assigned_layer {
                    continue;
                }
                let path_b = drone_b.flight_path.as_deref().unwrap_or_default();

                'pair: for (a, point_a) in path_a.iter().enumerate() {
                    for (b, point_b) in path_b.iter().enumerate() {
                        let distance = point_a.distance_to(point_b);
                        if distance < self.rules.proximity_threshold {
                            let time_to_conflict =
                                a.min(b) as f64 * self.rules.seconds_per_waypoint;
                            conflicts.push(Conflict {
                                id: uuid::Uuid::new_v4().to_string(),
                                drone_ids: [drone_a.id, drone_b.id],
                                position: *point_a,
                                severity: self.rules.severity_for(distance),
                                time_to_conflict,
                                resolution: Some(self.rules.resolution_for(time_to_conflict)),
                            });
                            break 'pair;
                        }
                    }
                }
            }
        }

        conflicts
    }
}
