//! Core data models for the coordination engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integer cell on the dock grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One coordinate of a planned flight path.
///
/// Planner output is whole-valued; fractional coordinates appear only
/// after a reroute applies jitter to interior waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another waypoint on the two spatial axes.
    pub fn distance_to(&self, other: &PathPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<GridPosition> for PathPoint {
    fn from(pos: GridPosition) -> Self {
        Self {
            x: pos.x as f64,
            y: pos.y as f64,
        }
    }
}

/// Flight destination. May lie outside the dock grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPosition {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TargetPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            description: None,
        }
    }

    pub fn named(x: i32, y: i32, description: impl Into<String>) -> Self {
        Self {
            x,
            y,
            description: Some(description.into()),
        }
    }
}

impl std::fmt::Display for TargetPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{description}"),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DroneStatus {
    /// Docked and available
    #[default]
    Idle,
    /// Held on the ground (pre-takeoff or delayed by a resolution)
    Preparing,
    /// Vertical ascent from the dock
    TakingOff,
    /// Climbing into the assigned transit layer
    TransitionUp,
    /// Horizontal transit at cruise
    Flying,
    /// Descending out of the transit layer
    TransitionDown,
    /// Inbound to the dock
    Returning,
    /// Final vertical descent
    Landing,
    /// Halted by an emergency stop; requires operator recovery
    Emergency,
    /// Out of service
    Maintenance,
}

impl DroneStatus {
    /// Statuses between takeoff and touchdown, inclusive.
    pub fn is_in_motion(&self) -> bool {
        matches!(
            self,
            DroneStatus::TakingOff
                | DroneStatus::TransitionUp
                | DroneStatus::Flying
                | DroneStatus::TransitionDown
                | DroneStatus::Returning
                | DroneStatus::Landing
        )
    }

    /// Statuses the conflict detector evaluates: in motion with a live
    /// flight path. `Landing` is excluded because the path has already
    /// been cleared at that point.
    pub fn is_airborne(&self) -> bool {
        matches!(
            self,
            DroneStatus::TakingOff
                | DroneStatus::TransitionUp
                | DroneStatus::Flying
                | DroneStatus::TransitionDown
                | DroneStatus::Returning
        )
    }
}

impl std::fmt::Display for DroneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DroneStatus::Idle => "idle",
            DroneStatus::Preparing => "preparing",
            DroneStatus::TakingOff => "taking-off",
            DroneStatus::TransitionUp => "transition-up",
            DroneStatus::Flying => "flying",
            DroneStatus::TransitionDown => "transition-down",
            DroneStatus::Returning => "returning",
            DroneStatus::Landing => "landing",
            DroneStatus::Emergency => "emergency",
            DroneStatus::Maintenance => "maintenance",
        };
        write!(f, "{name}")
    }
}

/// A drone operating from a fixed dock.
///
/// Drones are created once from the dock table and never destroyed; all
/// state changes flow through the coordinator (status/path/target) and the
/// conflict resolver (status/path/layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: u32,
    pub name: String,
    pub status: DroneStatus,
    /// Current grid cell (stays at the dock; motion is not integrated)
    pub position: GridPosition,
    /// Home dock cell, restored on landing and reset
    pub dock: GridPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<TargetPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_path: Option<Vec<PathPoint>>,
    /// Cruise altitude in meters, picked from the severity bands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
    /// 0-100
    pub battery_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_mission: Option<Mission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_mission: Option<Mission>,
    /// Altitude layer 1-5; horizontal transit uses 3 and 4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_layer: Option<u8>,
    /// Grid quadrant 1-4, derived from the dock position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<u8>,
}

impl Drone {
    /// Create a docked, idle drone.
    pub fn docked(id: u32, dock: GridPosition, layer: u8, quadrant: u8) -> Self {
        Self {
            id,
            name: format!("D{id}"),
            status: DroneStatus::Idle,
            position: dock,
            dock,
            target_position: None,
            flight_path: None,
            altitude_m: None,
            battery_level: 100,
            queued_mission: None,
            active_mission: None,
            assigned_layer: Some(layer),
            quadrant: Some(quadrant),
        }
    }

    /// Restore the initial dock configuration: idle at the dock, full
    /// battery, parity transit layer, no flight state.
    pub fn reset_to_dock(&mut self, layer: u8) {
        self.status = DroneStatus::Idle;
        self.position = self.dock;
        self.target_position = None;
        self.flight_path = None;
        self.altitude_m = None;
        self.battery_level = 100;
        self.queued_mission = None;
        self.active_mission = None;
        self.assigned_layer = Some(layer);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissionStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

/// A flight assignment owned by exactly one drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub target: TargetPosition,
    pub priority: MissionPriority,
    pub status: MissionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Mission {
    /// Create a queued mission awaiting an explicit start.
    pub fn queued(target: TargetPosition, priority: MissionPriority) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            target,
            priority,
            status: MissionStatus::Queued,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    /// Create a mission that starts immediately.
    pub fn in_progress(target: TargetPosition, priority: MissionPriority) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            target,
            priority,
            status: MissionStatus::InProgress,
            created_at: now,
            started_at: Some(now),
            ended_at: None,
        }
    }
}

/// Severity of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConflictSeverity::Low => "low",
            ConflictSeverity::Medium => "medium",
            ConflictSeverity::High => "high",
        };
        write!(f, "{name}")
    }
}

/// Resolution strategy attached to a conflict by the detector and applied
/// by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionAction {
    AltitudeChange,
    PathReroute,
    TimeDelay,
    EmergencyStop,
}

impl std::fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolutionAction::AltitudeChange => "altitude-change",
            ResolutionAction::PathReroute => "path-reroute",
            ResolutionAction::TimeDelay => "time-delay",
            ResolutionAction::EmergencyStop => "emergency-stop",
        };
        write!(f, "{name}")
    }
}

/// Unsafe proximity between two drones' planned paths.
///
/// Conflicts are ephemeral: rebuilt from scratch on every evaluation tick,
/// never persisted or merged across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: String,
    /// Exactly two distinct drone ids, in pair-scan order
    pub drone_ids: [u32; 2],
    /// The offending waypoint from the first drone's path
    pub position: PathPoint,
    pub severity: ConflictSeverity,
    /// Seconds until the conflict, assuming two seconds per waypoint
    pub time_to_conflict: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionAction>,
}

/// Aggregate counters and scores, recomputed by the coordinator each tick.
/// Derived state only; never an independent source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub active_flights: u32,
    pub queued_flights: u32,
    pub completed_flights: u32,
    pub average_flight_time_s: f64,
    pub conflicts_detected: u32,
    pub conflicts_resolved: u32,
    /// max(50, 100 - 10 x current conflict count)
    pub safety_score: f64,
    /// Starts at 90, -2 per flight start, floor 50
    pub efficiency_score: f64,
    /// Flights started per elapsed hour
    pub throughput_rate: f64,
    /// Mean age in seconds of currently queued missions
    pub average_wait_time_s: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            active_flights: 0,
            queued_flights: 0,
            completed_flights: 0,
            average_flight_time_s: 0.0,
            conflicts_detected: 0,
            conflicts_resolved: 0,
            safety_score: 100.0,
            efficiency_score: 90.0,
            throughput_rate: 0.0,
            average_wait_time_s: 0.0,
        }
    }
}
