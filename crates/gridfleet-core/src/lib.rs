pub mod airspace;
pub mod conflict;
pub mod coordinator;
pub mod events;
pub mod models;
pub mod planner;
pub mod resolver;
pub mod rules;

pub use conflict::ConflictDetector;
pub use coordinator::{CoordinationError, Coordinator, SimulationSpeed};
pub use events::{CommandOutcome, CoordinationEvent, CoordinationObserver, EventKind};
pub use models::{
    Conflict, ConflictSeverity, Drone, DroneStatus, GridPosition, Metrics, Mission,
    MissionPriority, MissionStatus, PathPoint, ResolutionAction, TargetPosition,
};
pub use planner::{path_overlap_conflicts, plan_path, safe_flight_path};
pub use resolver::ConflictResolver;
pub use rules::CoordinationRules;
