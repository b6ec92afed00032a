//! Flight path planning over the dock grid.
//!
//! Paths are purely geometric: a fixed-length waypoint sequence with no
//! time or altitude component. Altitude is tracked separately through the
//! drone's assigned transit layer and cruise altitude.

use crate::airspace::cruise;
use crate::models::{
    Conflict, ConflictSeverity, Drone, GridPosition, PathPoint, TargetPosition,
};
use crate::rules::CoordinationRules;

/// Number of waypoints in every planned path, endpoints included.
pub const PATH_LEN: usize = 5;

/// Plan a direct path from a dock cell to a target.
///
/// The path always has exactly [`PATH_LEN`] points: the start, three
/// interpolated midpoints, and the target. Midpoint `i` is
/// `start + round((target - start) * i/4)` on each axis, rounding half away
/// from zero (`f64::round`). Pure and deterministic; a degenerate request
/// with `start == target` yields five equal points.
pub fn plan_path(start: GridPosition, target: &TargetPosition) -> Vec<PathPoint> {
    let mut path = Vec::with_capacity(PATH_LEN);
    path.push(PathPoint::from(start));

    let dx = (target.x - start.x) as f64;
    let dy = (target.y - start.y) as f64;
    for i in 1..=3 {
        let t = i as f64 / 4.0;
        path.push(PathPoint::new(
            start.x as f64 + (dx * t).round(),
            start.y as f64 + (dy * t).round(),
        ));
    }

    path.push(PathPoint::new(target.x as f64, target.y as f64));
    path
}

/// Scan raw paths for overlap with the strict threshold.
///
/// Companion to the main detector: every drone with a path is compared,
/// regardless of layer, against the tight `overlap_threshold`. Intended
/// for anticipatory display; no resolution is attached. At most one
/// conflict is recorded per drone pair.
pub fn path_overlap_conflicts(drones: &[Drone], rules: &CoordinationRules) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let with_paths: Vec<&Drone> = drones.iter().filter(|d| d.flight_path.is_some()).collect();
    if with_paths.len() < 2 {
        return conflicts;
    }

    for i in 0..with_paths.len() {
        let drone_a = with_paths[i];
        let path_a = drone_a.flight_path.as_deref().unwrap_or_default();

        for drone_b in &with_paths[i + 1..] {
            let path_b = drone_b.flight_path.as_deref().unwrap_or_default();

            'pair: for (a, point_a) in path_a.iter().enumerate() {
                for (b, point_b) in path_b.iter().enumerate() {
                    let distance = point_a.distance_to(point_b);
                    if distance < rules.overlap_threshold {
                        let time_to_conflict =
                            a.min(b) as f64 * rules.seconds_per_waypoint;
                        conflicts.push(Conflict {
                            id: uuid::Uuid::new_v4().to_string(),
                            drone_ids: [drone_a.id, drone_b.id],
                            position: *point_a,
                            severity: rules.overlap_severity_for(distance),
                            time_to_conflict,
                            resolution: None,
                        });
                        break 'pair;
                    }
                }
            }
        }
    }

    conflicts
}

/// Plan a path and pick a cruise altitude from the drone's worst current
/// conflict.
///
/// Without conflicts the drone cruises at the medium band. Under conflict
/// the band splits by id parity so the two sides of a conflict diverge.
/// Returns `None` when the drone has no target to fly to.
pub fn safe_flight_path(drone: &Drone, conflicts: &[Conflict]) -> Option<(Vec<PathPoint>, f64)> {
    let target = drone.target_position.as_ref()?;
    let path = plan_path(drone.position, target);

    let worst = conflicts
        .iter()
        .filter(|c| c.drone_ids.contains(&drone.id))
        .map(|c| c.severity)
        .max();

    let even = drone.id % 2 == 0;
    let altitude_m = match worst {
        Some(ConflictSeverity::High) => {
            if even {
                cruise::VERY_HIGH_M
            } else {
                cruise::LOW_M
            }
        }
        Some(ConflictSeverity::Medium) => {
            if even {
                cruise::HIGH_M
            } else {
                cruise::LOW_M
            }
        }
        Some(ConflictSeverity::Low) | None => cruise::MEDIUM_M,
    };

    Some((path, altitude_m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DroneStatus;

    fn drone_with_path(id: u32, path: Vec<PathPoint>) -> Drone {
        let mut drone = Drone::docked(id, GridPosition::new(0, 0), 3, 1);
        drone.status = DroneStatus::Flying;
        drone.flight_path = Some(path);
        drone
    }

    #[test]
    fn test_path_has_five_points_with_exact_endpoints() {
        let start = GridPosition::new(0, 0);
        let target = TargetPosition::new(5, 5);
        let path = plan_path(start, &target);

        assert_eq!(path.len(), PATH_LEN);
        assert_eq!(path[0], PathPoint::new(0.0, 0.0));
        assert_eq!(path[4], PathPoint::new(5.0, 5.0));
    }

    #[test]
    fn test_path_is_deterministic() {
        let start = GridPosition::new(1, 3);
        let target = TargetPosition::new(-2, 5);
        assert_eq!(plan_path(start, &target), plan_path(start, &target));
    }

    #[test]
    fn test_midpoints_round_half_away_from_zero() {
        // (0,0) -> (2,6): quarter steps of 0.5/1.5 on x round up to 1/1/2
        let path = plan_path(GridPosition::new(0, 0), &TargetPosition::new(2, 6));
        assert_eq!(path[1], PathPoint::new(1.0, 2.0));
        assert_eq!(path[2], PathPoint::new(1.0, 3.0));
        assert_eq!(path[3], PathPoint::new(2.0, 5.0));

        // Negative direction: -0.5 rounds away from zero to -1
        let path = plan_path(GridPosition::new(0, 0), &TargetPosition::new(-2, 0));
        assert_eq!(path[1], PathPoint::new(-1.0, 0.0));
    }

    #[test]
    fn test_degenerate_path_start_equals_target() {
        let path = plan_path(GridPosition::new(2, 2), &TargetPosition::new(2, 2));
        assert_eq!(path.len(), PATH_LEN);
        assert!(path.iter().all(|p| *p == PathPoint::new(2.0, 2.0)));
    }

    #[test]
    fn test_overlap_requires_near_identical_points() {
        let rules = CoordinationRules::default();
        // 1.0 apart: conflict for the main detector but not the overlap scan
        let a = drone_with_path(1, vec![PathPoint::new(0.0, 0.0), PathPoint::new(1.0, 1.0)]);
        let b = drone_with_path(3, vec![PathPoint::new(0.0, 1.0), PathPoint::new(2.0, 2.0)]);
        assert!(path_overlap_conflicts(&[a, b], &rules).is_empty());

        let a = drone_with_path(1, vec![PathPoint::new(0.0, 0.0), PathPoint::new(1.0, 1.0)]);
        let b = drone_with_path(3, vec![PathPoint::new(1.0, 1.0), PathPoint::new(2.0, 2.0)]);
        let conflicts = path_overlap_conflicts(&[a, b], &rules);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].severity, ConflictSeverity::High);
        assert!(conflicts[0].resolution.is_none());
    }

    #[test]
    fn test_safe_path_altitude_tracks_severity_and_parity() {
        let mut even = Drone::docked(2, GridPosition::new(1, 0), 3, 1);
        even.target_position = Some(TargetPosition::new(6, 2));
        let mut odd = Drone::docked(3, GridPosition::new(2, 0), 4, 2);
        odd.target_position = Some(TargetPosition::new(6, 2));

        let high = Conflict {
            id: "c".into(),
            drone_ids: [2, 3],
            position: PathPoint::new(1.0, 1.0),
            severity: ConflictSeverity::High,
            time_to_conflict: 2.0,
            resolution: None,
        };

        let (_, alt) = safe_flight_path(&even, &[]).unwrap();
        assert_eq!(alt, cruise::MEDIUM_M);
        let (_, alt) = safe_flight_path(&even, std::slice::from_ref(&high)).unwrap();
        assert_eq!(alt, cruise::VERY_HIGH_M);
        let (_, alt) = safe_flight_path(&odd, std::slice::from_ref(&high)).unwrap();
        assert_eq!(alt, cruise::LOW_M);

        let untargeted = Drone::docked(5, GridPosition::new(0, 1), 4, 1);
        assert!(safe_flight_path(&untargeted, &[]).is_none());
    }
}
