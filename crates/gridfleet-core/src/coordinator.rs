//! Mission and metrics coordination.
//!
//! The coordinator owns the canonical drone/mission/metrics store and is
//! the only writer; the resolver mutates drones under its control during a
//! tick. Readers get immutable snapshots. Single-threaded by design — if
//! embedded in a concurrent host, wrap the coordinator in a mutex so each
//! tick stays a critical section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::airspace::{self, cruise};
use crate::conflict::ConflictDetector;
use crate::events::{CommandOutcome, CoordinationEvent, CoordinationObserver, EventKind};
use crate::models::{
    Conflict, Drone, DroneStatus, Metrics, Mission, MissionPriority, MissionStatus,
    TargetPosition,
};
use crate::planner;
use crate::resolver::ConflictResolver;
use crate::rules::CoordinationRules;

/// Library error for caller bugs and invalid configuration. Domain-level
/// command rejections never surface here; they come back as
/// [`CommandOutcome::Rejected`] with the drone set untouched.
#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    #[error("unknown drone id {0}")]
    UnknownDrone(u32),
    #[error("simulation speed {0} outside the supported 1-8 range")]
    InvalidSpeed(u8),
}

/// Validated simulation speed multiplier (1x-8x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SimulationSpeed(u8);

impl SimulationSpeed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(multiplier: u8) -> Result<Self, CoordinationError> {
        if (Self::MIN..=Self::MAX).contains(&multiplier) {
            Ok(Self(multiplier))
        } else {
            Err(CoordinationError::InvalidSpeed(multiplier))
        }
    }

    pub fn multiplier(&self) -> u8 {
        self.0
    }

    /// Scale a base tick interval down by this multiplier.
    pub fn scale(&self, base: std::time::Duration) -> std::time::Duration {
        base / u32::from(self.0)
    }
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for SimulationSpeed {
    type Error = CoordinationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SimulationSpeed> for u8 {
    fn from(speed: SimulationSpeed) -> Self {
        speed.0
    }
}

/// Owns drone and mission lifecycle and drives per-tick re-evaluation.
pub struct Coordinator {
    drones: Vec<Drone>,
    conflicts: Vec<Conflict>,
    metrics: Metrics,
    rules: CoordinationRules,
    detector: ConflictDetector,
    resolver: ConflictResolver,
    observers: Vec<Box<dyn CoordinationObserver>>,
    flights_started: u32,
    started_at: DateTime<Utc>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    /// Coordinator over the standard 16-dock fleet.
    pub fn new() -> Self {
        Self::with_parts(CoordinationRules::default(), ConflictResolver::new())
    }

    /// Coordinator with deterministic reroute jitter.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(CoordinationRules::default(), ConflictResolver::with_seed(seed))
    }

    pub fn with_parts(rules: CoordinationRules, resolver: ConflictResolver) -> Self {
        Self {
            drones: airspace::default_fleet(),
            conflicts: Vec::new(),
            metrics: Metrics::default(),
            detector: ConflictDetector::new(rules.clone()),
            rules,
            resolver,
            observers: Vec::new(),
            flights_started: 0,
            started_at: Utc::now(),
        }
    }

    /// Register a notification observer.
    pub fn add_observer(&mut self, observer: Box<dyn CoordinationObserver>) {
        self.observers.push(observer);
    }

    // ===== Queries (immutable snapshots) =====

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn drone(&self, drone_id: u32) -> Option<&Drone> {
        self.drones.iter().find(|d| d.id == drone_id)
    }

    pub fn airborne_drones(&self) -> Vec<&Drone> {
        self.drones.iter().filter(|d| d.status.is_airborne()).collect()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn rules(&self) -> &CoordinationRules {
        &self.rules
    }

    // ===== Commands =====

    /// Launch a flight. Rejects (without modifying the drone) when the
    /// drone is unknown or not idle.
    pub fn start_flight(
        &mut self,
        drone_id: u32,
        target: TargetPosition,
        priority: MissionPriority,
    ) -> CommandOutcome {
        let Some(idx) = self.index_of(drone_id) else {
            return self.reject(drone_id, format!("unknown drone id {drone_id}"));
        };
        if self.drones[idx].status != DroneStatus::Idle {
            let reason = format!(
                "drone {} is currently {}",
                self.drones[idx].name, self.drones[idx].status
            );
            return self.reject(drone_id, reason);
        }

        let path = planner::plan_path(self.drones[idx].position, &target);
        let mission = Mission::in_progress(target.clone(), priority);
        let label = target.to_string();

        let drone = &mut self.drones[idx];
        drone.status = DroneStatus::TakingOff;
        drone.assigned_layer = Some(airspace::transit_layer(drone_id));
        drone.target_position = Some(target);
        drone.flight_path = Some(path);
        drone.altitude_m = Some(cruise::MEDIUM_M);
        // A direct start supersedes anything previously queued
        drone.queued_mission = None;
        drone.active_mission = Some(mission);
        let name = drone.name.clone();

        self.flights_started += 1;
        self.metrics.efficiency_score = (self.metrics.efficiency_score
            - self.rules.start_flight_penalty)
            .max(self.rules.score_floor);
        self.recompute_metrics();
        self.emit(
            EventKind::FlightStarted,
            Some(drone_id),
            format!("drone {name} is taking off toward {label}"),
        );
        CommandOutcome::Accepted
    }

    /// Store a mission for later execution without touching flight state.
    /// Queued missions are never promoted automatically.
    pub fn queue_flight(
        &mut self,
        drone_id: u32,
        target: TargetPosition,
        priority: MissionPriority,
    ) -> CommandOutcome {
        let Some(idx) = self.index_of(drone_id) else {
            return self.reject(drone_id, format!("unknown drone id {drone_id}"));
        };

        self.drones[idx].queued_mission = Some(Mission::queued(target, priority));
        let name = self.drones[idx].name.clone();
        self.recompute_metrics();
        self.emit(
            EventKind::FlightQueued,
            Some(drone_id),
            format!("mission for drone {name} has been queued"),
        );
        CommandOutcome::Accepted
    }

    /// Complete a flight: the drone begins landing and its mission is
    /// recorded. No-op unless the drone is airborne.
    pub fn end_flight(&mut self, drone_id: u32) -> CommandOutcome {
        let Some(idx) = self.index_of(drone_id) else {
            return self.reject(drone_id, format!("unknown drone id {drone_id}"));
        };
        if !self.drones[idx].status.is_airborne() {
            let reason = format!(
                "drone {} is not in flight ({})",
                self.drones[idx].name, self.drones[idx].status
            );
            return self.reject(drone_id, reason);
        }

        let now = Utc::now();
        let drone = &mut self.drones[idx];
        drone.status = DroneStatus::Landing;
        drone.target_position = None;
        drone.flight_path = None;
        let name = drone.name.clone();

        let duration_s = match drone.active_mission.as_mut() {
            Some(mission) if mission.status == MissionStatus::InProgress => {
                mission.status = MissionStatus::Completed;
                mission.ended_at = Some(now);
                mission
                    .started_at
                    .map(|s| (now - s).num_milliseconds() as f64 / 1000.0)
                    .unwrap_or(0.0)
            }
            _ => 0.0,
        };

        self.record_completion(duration_s);
        self.recompute_metrics();
        self.emit(
            EventKind::FlightCompleted,
            Some(drone_id),
            format!("drone {name} has landed safely"),
        );
        CommandOutcome::Accepted
    }

    /// Send an airborne drone back to its dock. The flight stays active
    /// and completes when the drone reaches idle.
    pub fn return_to_dock(&mut self, drone_id: u32) -> CommandOutcome {
        let Some(idx) = self.index_of(drone_id) else {
            return self.reject(drone_id, format!("unknown drone id {drone_id}"));
        };
        if !self.drones[idx].status.is_airborne() {
            let reason = format!(
                "drone {} is not in flight ({})",
                self.drones[idx].name, self.drones[idx].status
            );
            return self.reject(drone_id, reason);
        }

        let drone = &mut self.drones[idx];
        let home = TargetPosition::named(drone.dock.x, drone.dock.y, format!("Dock {}", drone.name));
        drone.flight_path = Some(planner::plan_path(drone.position, &home));
        drone.target_position = Some(home);
        drone.status = DroneStatus::TransitionDown;
        let name = drone.name.clone();

        self.recompute_metrics();
        self.emit(
            EventKind::FlightRecalled,
            Some(drone_id),
            format!("drone {name} is returning to its dock"),
        );
        CommandOutcome::Accepted
    }

    /// Restore the initial dock configuration and zero all metrics and
    /// conflict state.
    pub fn reset(&mut self) {
        for drone in &mut self.drones {
            drone.reset_to_dock(airspace::transit_layer(drone.id));
        }
        self.conflicts.clear();
        self.metrics = Metrics::default();
        self.flights_started = 0;
        self.started_at = Utc::now();
        self.emit(
            EventKind::SystemReset,
            None,
            "all drones and metrics have been reset to default values".to_string(),
        );
    }

    // ===== Per-tick evaluation =====

    /// One evaluation cycle: detect conflicts, resolve, re-detect until
    /// stable or the pass bound is reached, then recompute metrics.
    ///
    /// The published conflict list is the first pass's detection — the
    /// state observers should react to — while later passes only verify
    /// that the applied resolutions converged.
    pub fn tick(&mut self) {
        let mut published: Vec<Conflict> = Vec::new();
        for pass in 0..self.rules.max_resolution_passes {
            let found = self.detector.detect(&self.drones);
            if pass == 0 {
                published = found.clone();
            }
            if found.is_empty() {
                break;
            }
            self.resolver.resolve(&mut self.drones, &found);
        }

        self.metrics.conflicts_detected += published.len() as u32;
        self.metrics.conflicts_resolved += published.len() as u32;
        self.conflicts = published;
        self.recompute_metrics();

        for conflict in &self.conflicts {
            let [a, b] = conflict.drone_ids;
            self.emit(
                EventKind::ConflictDetected,
                Some(a),
                format!(
                    "conflict between drones {a} and {b}: {} severity, {:.0}s out",
                    conflict.severity, conflict.time_to_conflict
                ),
            );
            if let Some(action) = conflict.resolution {
                self.emit(
                    EventKind::ConflictResolved,
                    Some(a),
                    format!("applied {action} to drones {a} and {b}"),
                );
            }
        }
    }

    /// Step every in-motion drone one lifecycle stage.
    ///
    /// Cruise holds at `Flying` until an explicit end or recall; `Landing`
    /// finishes the flight, restoring the dock cell and idle invariants.
    /// Driven by the simulation loop, separately from [`Coordinator::tick`].
    pub fn advance_flights(&mut self) {
        let now = Utc::now();
        let mut finished: Vec<(u32, String, f64)> = Vec::new();

        for drone in &mut self.drones {
            match drone.status {
                DroneStatus::TakingOff => {
                    drone.status = DroneStatus::TransitionUp;
                    drone.battery_level = drone.battery_level.saturating_sub(1);
                }
                DroneStatus::TransitionUp => {
                    drone.status = DroneStatus::Flying;
                    drone.battery_level = drone.battery_level.saturating_sub(1);
                }
                DroneStatus::Flying => {
                    drone.battery_level = drone.battery_level.saturating_sub(1);
                }
                DroneStatus::TransitionDown => {
                    drone.status = DroneStatus::Returning;
                    drone.battery_level = drone.battery_level.saturating_sub(1);
                }
                DroneStatus::Returning => {
                    drone.status = DroneStatus::Landing;
                    drone.target_position = None;
                    drone.flight_path = None;
                    drone.battery_level = drone.battery_level.saturating_sub(1);
                }
                DroneStatus::Landing => {
                    drone.position = drone.dock;
                    drone.target_position = None;
                    drone.flight_path = None;
                    drone.altitude_m = None;
                    if let Some(mission) = drone.active_mission.as_mut() {
                        if mission.status == MissionStatus::InProgress {
                            mission.status = MissionStatus::Completed;
                            mission.ended_at = Some(now);
                            let duration_s = mission
                                .started_at
                                .map(|s| (now - s).num_milliseconds() as f64 / 1000.0)
                                .unwrap_or(0.0);
                            finished.push((drone.id, drone.name.clone(), duration_s));
                        }
                    }
                    drone.active_mission = None;
                    drone.status = DroneStatus::Idle;
                }
                _ => {}
            }
        }

        for (drone_id, name, duration_s) in finished {
            self.record_completion(duration_s);
            self.emit(
                EventKind::FlightCompleted,
                Some(drone_id),
                format!("drone {name} has landed safely"),
            );
        }
        self.recompute_metrics();
    }

    // ===== Internals =====

    fn index_of(&self, drone_id: u32) -> Option<usize> {
        self.drones.iter().position(|d| d.id == drone_id)
    }

    fn reject(&self, drone_id: u32, reason: String) -> CommandOutcome {
        self.emit(EventKind::CommandRejected, Some(drone_id), reason.clone());
        CommandOutcome::Rejected { reason }
    }

    fn record_completion(&mut self, duration_s: f64) {
        let n = self.metrics.completed_flights as f64;
        self.metrics.average_flight_time_s = if self.metrics.completed_flights == 0 {
            duration_s
        } else {
            (self.metrics.average_flight_time_s * n + duration_s) / (n + 1.0)
        };
        self.metrics.completed_flights += 1;
    }

    fn recompute_metrics(&mut self) {
        let now = Utc::now();
        self.metrics.active_flights = self
            .drones
            .iter()
            .filter(|d| d.status.is_airborne())
            .count() as u32;
        self.metrics.queued_flights = self
            .drones
            .iter()
            .filter(|d| d.queued_mission.is_some())
            .count() as u32;
        self.metrics.safety_score = (100.0
            - self.rules.conflict_safety_penalty * self.conflicts.len() as f64)
            .max(self.rules.score_floor);

        let elapsed_hours = (now - self.started_at).num_milliseconds() as f64 / 3_600_000.0;
        self.metrics.throughput_rate = if elapsed_hours > 0.0 {
            self.flights_started as f64 / elapsed_hours
        } else {
            0.0
        };

        let waits: Vec<f64> = self
            .drones
            .iter()
            .filter_map(|d| d.queued_mission.as_ref())
            .map(|m| (now - m.created_at).num_milliseconds() as f64 / 1000.0)
            .collect();
        self.metrics.average_wait_time_s = if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<f64>() / waits.len() as f64
        };
    }

    fn emit(&self, kind: EventKind, drone_id: Option<u32>, message: String) {
        let event = CoordinationEvent::new(kind, drone_id, message);
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<CoordinationEvent>>>);

    impl CoordinationObserver for Recorder {
        fn on_event(&self, event: &CoordinationEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn recorded(coordinator: &mut Coordinator) -> Rc<RefCell<Vec<CoordinationEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        coordinator.add_observer(Box::new(Recorder(events.clone())));
        events
    }

    #[test]
    fn test_start_flight_arms_the_drone() {
        let mut coordinator = Coordinator::with_seed(1);
        let outcome =
            coordinator.start_flight(2, TargetPosition::named(6, 2, "East Zone"), MissionPriority::Medium);

        assert!(outcome.is_accepted());
        let drone = coordinator.drone(2).unwrap();
        assert_eq!(drone.status, DroneStatus::TakingOff);
        assert_eq!(drone.assigned_layer, Some(3));
        assert_eq!(drone.flight_path.as_ref().unwrap().len(), 5);
        assert_eq!(
            drone.active_mission.as_ref().unwrap().status,
            MissionStatus::InProgress
        );
        assert_eq!(coordinator.metrics().active_flights, 1);
        assert_eq!(coordinator.metrics().efficiency_score, 88.0);
    }

    #[test]
    fn test_start_flight_rejects_busy_drone_without_mutation() {
        let mut coordinator = Coordinator::with_seed(1);
        coordinator.start_flight(2, TargetPosition::new(6, 2), MissionPriority::Medium);
        let events = recorded(&mut coordinator);
        let before = coordinator.drone(2).unwrap().clone();

        let outcome = coordinator.start_flight(2, TargetPosition::new(5, 5), MissionPriority::High);

        assert!(!outcome.is_accepted());
        assert_eq!(coordinator.drone(2).unwrap(), &before);
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::CommandRejected);
        assert!(events[0].message.contains("taking-off"));
    }

    #[test]
    fn test_start_flight_rejects_unknown_drone() {
        let mut coordinator = Coordinator::with_seed(1);
        let outcome = coordinator.start_flight(99, TargetPosition::new(6, 2), MissionPriority::Low);
        assert!(!outcome.is_accepted());
    }

    #[test]
    fn test_queue_flight_never_touches_flight_state() {
        let mut coordinator = Coordinator::with_seed(1);
        coordinator.start_flight(4, TargetPosition::new(6, 2), MissionPriority::Medium);

        let outcome = coordinator.queue_flight(4, TargetPosition::new(5, 5), MissionPriority::Low);

        assert!(outcome.is_accepted());
        let drone = coordinator.drone(4).unwrap();
        assert_eq!(drone.status, DroneStatus::TakingOff);
        assert_eq!(
            drone.queued_mission.as_ref().unwrap().status,
            MissionStatus::Queued
        );
        assert_eq!(coordinator.metrics().queued_flights, 1);
        assert!(coordinator.metrics().average_wait_time_s >= 0.0);
    }

    #[test]
    fn test_end_flight_is_noop_on_idle_drone() {
        let mut coordinator = Coordinator::with_seed(1);
        let before = coordinator.drone(3).unwrap().clone();

        let outcome = coordinator.end_flight(3);

        assert!(!outcome.is_accepted());
        assert_eq!(coordinator.drone(3).unwrap(), &before);
        assert_eq!(coordinator.metrics().completed_flights, 0);
    }

    #[test]
    fn test_end_flight_lands_and_records_the_mission() {
        let mut coordinator = Coordinator::with_seed(1);
        coordinator.start_flight(2, TargetPosition::new(6, 2), MissionPriority::Medium);

        let outcome = coordinator.end_flight(2);

        assert!(outcome.is_accepted());
        let drone = coordinator.drone(2).unwrap();
        assert_eq!(drone.status, DroneStatus::Landing);
        assert!(drone.flight_path.is_none());
        assert!(drone.target_position.is_none());
        assert_eq!(coordinator.metrics().completed_flights, 1);
        assert_eq!(coordinator.metrics().active_flights, 0);
    }

    #[test]
    fn test_reset_restores_the_initial_configuration() {
        let mut coordinator = Coordinator::with_seed(1);
        coordinator.start_flight(1, TargetPosition::new(2, 6), MissionPriority::High);
        coordinator.start_flight(5, TargetPosition::new(5, 5), MissionPriority::High);
        coordinator.queue_flight(7, TargetPosition::new(6, 2), MissionPriority::Low);
        coordinator.tick();

        coordinator.reset();

        assert_eq!(coordinator.drones().len(), 16);
        assert!(coordinator
            .drones()
            .iter()
            .all(|d| d.status == DroneStatus::Idle
                && d.flight_path.is_none()
                && d.queued_mission.is_none()
                && d.battery_level == 100));
        assert!(coordinator.conflicts().is_empty());
        assert_eq!(coordinator.metrics(), &Metrics::default());
    }

    #[test]
    fn test_tick_emergency_stops_adjacent_same_layer_launches() {
        let mut coordinator = Coordinator::with_seed(1);
        // Docks 1 and 5 sit one cell apart in the same column, so both
        // odd drones share a layer and their paths start within the
        // proximity threshold: an immediate conflict, zero seconds out
        coordinator.start_flight(1, TargetPosition::new(2, 6), MissionPriority::Medium);
        coordinator.start_flight(5, TargetPosition::new(5, 5), MissionPriority::Medium);

        coordinator.tick();

        assert!(!coordinator.conflicts().is_empty());
        let conflict = &coordinator.conflicts()[0];
        assert_eq!(conflict.drone_ids, [1, 5]);
        assert_eq!(conflict.resolution, Some(crate::models::ResolutionAction::EmergencyStop));
        assert_eq!(coordinator.drone(1).unwrap().status, DroneStatus::Emergency);
        assert_eq!(coordinator.drone(5).unwrap().status, DroneStatus::Emergency);
        assert!(coordinator.metrics().conflicts_detected >= 1);
        assert!(coordinator.metrics().safety_score < 100.0);
        assert!(coordinator.metrics().safety_score >= 50.0);

        // Emergency drones leave the active set; the next tick is clean
        coordinator.tick();
        assert!(coordinator.conflicts().is_empty());
        assert_eq!(coordinator.metrics().safety_score, 100.0);
    }

    #[test]
    fn test_tick_altitude_change_separates_converging_paths() {
        let mut coordinator = Coordinator::with_seed(1);
        // Odd drones 1 and 3 launch from docks two cells apart toward the
        // same zone; their paths first close within the threshold at
        // waypoint index 1 on both sides, two seconds out
        coordinator.start_flight(1, TargetPosition::new(2, 6), MissionPriority::Medium);
        coordinator.start_flight(3, TargetPosition::new(2, 6), MissionPriority::Medium);

        coordinator.tick();

        assert_eq!(coordinator.conflicts().len(), 1);
        let conflict = &coordinator.conflicts()[0];
        assert_eq!(conflict.drone_ids, [1, 3]);
        assert_eq!(conflict.time_to_conflict, 2.0);
        assert_eq!(conflict.resolution, Some(crate::models::ResolutionAction::AltitudeChange));
        // The pair was split across the transit layers and stays airborne
        assert_eq!(coordinator.drone(1).unwrap().assigned_layer, Some(4));
        assert_eq!(coordinator.drone(3).unwrap().assigned_layer, Some(3));
        assert_eq!(coordinator.drone(1).unwrap().status, DroneStatus::TakingOff);

        coordinator.tick();
        assert!(coordinator.conflicts().is_empty());
    }

    #[test]
    fn test_tick_ignores_cross_layer_overlap() {
        let mut coordinator = Coordinator::with_seed(1);
        // Even and odd ids transit different layers; same target is safe
        coordinator.start_flight(2, TargetPosition::new(6, 2), MissionPriority::Medium);
        coordinator.start_flight(3, TargetPosition::new(6, 2), MissionPriority::Medium);

        coordinator.tick();

        assert!(coordinator.conflicts().is_empty());
        assert_eq!(coordinator.metrics().safety_score, 100.0);
    }

    #[test]
    fn test_advance_flights_walks_the_lifecycle() {
        let mut coordinator = Coordinator::with_seed(1);
        coordinator.start_flight(2, TargetPosition::new(6, 2), MissionPriority::Medium);

        coordinator.advance_flights();
        assert_eq!(coordinator.drone(2).unwrap().status, DroneStatus::TransitionUp);
        coordinator.advance_flights();
        assert_eq!(coordinator.drone(2).unwrap().status, DroneStatus::Flying);
        coordinator.advance_flights();
        assert_eq!(coordinator.drone(2).unwrap().status, DroneStatus::Flying);

        coordinator.end_flight(2);
        assert_eq!(coordinator.drone(2).unwrap().status, DroneStatus::Landing);
        coordinator.advance_flights();

        let drone = coordinator.drone(2).unwrap();
        assert_eq!(drone.status, DroneStatus::Idle);
        assert_eq!(drone.position, drone.dock);
        assert!(drone.active_mission.is_none());
        assert!(drone.battery_level < 100);
        // end_flight already recorded the mission; landing must not
        assert_eq!(coordinator.metrics().completed_flights, 1);
    }

    #[test]
    fn test_return_to_dock_flies_home_and_completes() {
        let mut coordinator = Coordinator::with_seed(1);
        coordinator.start_flight(2, TargetPosition::new(6, 2), MissionPriority::Medium);
        coordinator.advance_flights();
        coordinator.advance_flights();

        let outcome = coordinator.return_to_dock(2);
        assert!(outcome.is_accepted());
        let drone = coordinator.drone(2).unwrap();
        assert_eq!(drone.status, DroneStatus::TransitionDown);
        assert_eq!(drone.target_position.as_ref().unwrap().x, drone.dock.x);

        coordinator.advance_flights(); // returning
        coordinator.advance_flights(); // landing
        coordinator.advance_flights(); // idle, mission completed

        let drone = coordinator.drone(2).unwrap();
        assert_eq!(drone.status, DroneStatus::Idle);
        assert_eq!(coordinator.metrics().completed_flights, 1);
    }

    #[test]
    fn test_simulation_speed_validation() {
        assert!(SimulationSpeed::new(0).is_err());
        assert!(SimulationSpeed::new(9).is_err());
        let speed = SimulationSpeed::new(4).unwrap();
        assert_eq!(speed.multiplier(), 4);
        assert_eq!(
            speed.scale(std::time::Duration::from_secs(1)),
            std::time::Duration::from_millis(250)
        );
    }

    #[test]
    fn test_efficiency_floor_holds_under_many_starts() {
        let mut coordinator = Coordinator::with_seed(1);
        for id in 1..=16 {
            coordinator.start_flight(id, TargetPosition::new(6, 2), MissionPriority::Low);
            coordinator.end_flight(id);
            coordinator.advance_flights();
        }
        for id in 1..=16 {
            coordinator.start_flight(id, TargetPosition::new(5, 5), MissionPriority::Low);
            coordinator.end_flight(id);
            coordinator.advance_flights();
        }
        assert_eq!(coordinator.metrics().efficiency_score, 50.0);
        assert_eq!(coordinator.metrics().completed_flights, 32);
    }
}
