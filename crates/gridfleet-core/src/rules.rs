//! Coordination thresholds and scoring rules.

use crate::models::{ConflictSeverity, ResolutionAction};
use serde::{Deserialize, Serialize};

/// Configuration for conflict detection and scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationRules {
    /// Waypoint proximity below which a conflict is recorded (grid units)
    pub proximity_threshold: f64,
    /// Stricter threshold for the raw path-overlap check
    pub overlap_threshold: f64,
    /// Distance below which a conflict is high severity
    pub high_severity_distance: f64,
    /// Distance below which a conflict is medium severity
    pub medium_severity_distance: f64,
    /// Overlap-check severity bands (anticipatory display only)
    pub overlap_high_distance: f64,
    pub overlap_medium_distance: f64,
    /// Coarse travel-time proxy used for time-to-conflict
    pub seconds_per_waypoint: f64,
    /// Resolution timing bands (seconds to conflict)
    pub emergency_stop_horizon_s: f64,
    pub altitude_change_horizon_s: f64,
    pub reroute_horizon_s: f64,
    /// Floor for safety and efficiency scores
    pub score_floor: f64,
    /// Efficiency penalty applied per flight start
    pub start_flight_penalty: f64,
    /// Safety penalty per concurrent conflict
    pub conflict_safety_penalty: f64,
    /// Upper bound on detect/resolve passes within one tick
    pub max_resolution_passes: u32,
}

impl Default for CoordinationRules {
    fn default() -> Self {
        Self {
            proximity_threshold: 1.5,
            overlap_threshold: 0.5,
            high_severity_distance: 0.5,
            medium_severity_distance: 1.0,
            overlap_high_distance: 0.2,
            overlap_medium_distance: 0.35,
            seconds_per_waypoint: 2.0,
            emergency_stop_horizon_s: 2.0,
            altitude_change_horizon_s: 5.0,
            reroute_horizon_s: 10.0,
            score_floor: 50.0,
            start_flight_penalty: 2.0,
            conflict_safety_penalty: 10.0,
            max_resolution_passes: 3,
        }
    }
}

impl CoordinationRules {
    /// Band a detected proximity into a severity.
    pub fn severity_for(&self, distance: f64) -> ConflictSeverity {
        if distance < self.high_severity_distance {
            ConflictSeverity::High
        } else if distance < self.medium_severity_distance {
            ConflictSeverity::Medium
        } else {
            ConflictSeverity::Low
        }
    }

    /// Severity banding for the stricter raw path-overlap check.
    pub fn overlap_severity_for(&self, distance: f64) -> ConflictSeverity {
        if distance < self.overlap_high_distance {
            ConflictSeverity::High
        } else if distance < self.overlap_medium_distance {
            ConflictSeverity::Medium
        } else {
            ConflictSeverity::Low
        }
    }

    /// Pre-select the resolution strategy from the conflict's timing.
    pub fn resolution_for(&self, time_to_conflict_s: f64) -> ResolutionAction {
        if time_to_conflict_s < self.emergency_stop_horizon_s {
            ResolutionAction::EmergencyStop
        } else if time_to_conflict_s < self.altitude_change_horizon_s {
            ResolutionAction::AltitudeChange
        } else if time_to_conflict_s < self.reroute_horizon_s {
            ResolutionAction::PathReroute
        } else {
            ResolutionAction::TimeDelay
        }
    }
}
