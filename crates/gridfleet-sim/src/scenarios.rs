//! Pre-defined flight scenarios for the simulation driver.

use gridfleet_core::{Coordinator, MissionPriority, TargetPosition};

/// One scripted command, fired at a fixed tick.
#[derive(Debug, Clone)]
pub enum ScenarioAction {
    Start {
        drone_id: u32,
        target: TargetPosition,
        priority: MissionPriority,
    },
    Queue {
        drone_id: u32,
        target: TargetPosition,
        priority: MissionPriority,
    },
    End {
        drone_id: u32,
    },
    Recall {
        drone_id: u32,
    },
}

#[derive(Debug, Clone)]
pub struct ScenarioStep {
    pub tick: u64,
    pub action: ScenarioAction,
}

/// A named scenario: a scripted sequence of engine commands.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Look up a scenario by its CLI name.
    pub fn by_name(name: &str) -> Option<Scenario> {
        match name {
            "crossing" => Some(create_crossing_scenario()),
            "parity" => Some(create_parity_scenario()),
            "converging" => Some(create_converging_scenario()),
            "quiet" => Some(create_quiet_scenario()),
            _ => None,
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["crossing", "parity", "converging", "quiet"]
    }

    /// Execute every step due at this tick. Outcomes surface through the
    /// coordinator's observers.
    pub fn apply(&self, tick: u64, coordinator: &mut Coordinator) {
        for step in self.steps.iter().filter(|s| s.tick == tick) {
            match &step.action {
                ScenarioAction::Start {
                    drone_id,
                    target,
                    priority,
                } => {
                    coordinator.start_flight(*drone_id, target.clone(), *priority);
                }
                ScenarioAction::Queue {
                    drone_id,
                    target,
                    priority,
                } => {
                    coordinator.queue_flight(*drone_id, target.clone(), *priority);
                }
                ScenarioAction::End { drone_id } => {
                    coordinator.end_flight(*drone_id);
                }
                ScenarioAction::Recall { drone_id } => {
                    coordinator.return_to_dock(*drone_id);
                }
            }
        }
    }

    /// Last scripted tick; the driver keeps running past it so in-flight
    /// drones can land.
    pub fn last_tick(&self) -> u64 {
        self.steps.iter().map(|s| s.tick).max().unwrap_or(0)
    }
}

fn start(tick: u64, drone_id: u32, target: TargetPosition) -> ScenarioStep {
    ScenarioStep {
        tick,
        action: ScenarioAction::Start {
            drone_id,
            target,
            priority: MissionPriority::Medium,
        },
    }
}

fn end(tick: u64, drone_id: u32) -> ScenarioStep {
    ScenarioStep {
        tick,
        action: ScenarioAction::End { drone_id },
    }
}

/// Two odd drones launch toward the same zone; their paths converge two
/// seconds out and the engine splits them across the transit layers.
pub fn create_crossing_scenario() -> Scenario {
    let south = TargetPosition::named(2, 6, "South Zone");
    Scenario {
        name: "crossing".to_string(),
        steps: vec![
            start(0, 1, south.clone()),
            start(0, 3, south),
            end(8, 1),
            end(10, 3),
        ],
    }
}

/// Even and odd drones fly identical routes to the same zone. Their id
/// parity puts them on different transit layers, so the run stays
/// conflict-free end to end.
pub fn create_parity_scenario() -> Scenario {
    let east = TargetPosition::named(6, 2, "East Zone");
    let west = TargetPosition::named(-3, 2, "West Zone");
    Scenario {
        name: "parity".to_string(),
        steps: vec![
            start(0, 2, east.clone()),
            start(0, 3, east),
            ScenarioStep {
                tick: 3,
                action: ScenarioAction::Queue {
                    drone_id: 6,
                    target: west,
                    priority: MissionPriority::Low,
                },
            },
            end(8, 2),
            end(8, 3),
        ],
    }
}

/// Four even drones launch at once toward zones on the far side of the
/// grid. Their docks and early waypoints sit inside the proximity
/// threshold, so the wave trips immediate emergency stops — the
/// fail-safe answer to a simultaneous same-layer launch.
pub fn create_converging_scenario() -> Scenario {
    Scenario {
        name: "converging".to_string(),
        steps: vec![
            start(0, 2, TargetPosition::named(-2, 5, "South West Zone")),
            start(0, 4, TargetPosition::named(-3, 2, "West Zone")),
            start(0, 6, TargetPosition::named(6, 2, "East Zone")),
            start(0, 8, TargetPosition::named(5, 5, "South East Zone")),
            end(10, 2),
            end(10, 4),
            end(10, 6),
            end(10, 8),
        ],
    }
}

/// A single flight out and a recall home: exercises the full lifecycle
/// with no traffic to conflict with.
pub fn create_quiet_scenario() -> Scenario {
    Scenario {
        name: "quiet".to_string(),
        steps: vec![
            start(0, 4, TargetPosition::named(6, 2, "East Zone")),
            ScenarioStep {
                tick: 4,
                action: ScenarioAction::Recall { drone_id: 4 },
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfleet_core::DroneStatus;

    #[test]
    fn test_every_name_resolves() {
        for name in Scenario::names() {
            assert!(Scenario::by_name(name).is_some(), "missing scenario {name}");
        }
        assert!(Scenario::by_name("unknown").is_none());
    }

    #[test]
    fn test_crossing_scenario_splits_the_layers() {
        let scenario = create_crossing_scenario();
        let mut coordinator = Coordinator::with_seed(1);

        scenario.apply(0, &mut coordinator);
        coordinator.tick();

        assert_eq!(coordinator.conflicts().len(), 1);
        assert_ne!(
            coordinator.drone(1).unwrap().assigned_layer,
            coordinator.drone(3).unwrap().assigned_layer
        );
    }

    #[test]
    fn test_parity_scenario_stays_conflict_free() {
        let scenario = create_parity_scenario();
        let mut coordinator = Coordinator::with_seed(1);

        for tick in 0..=scenario.last_tick() {
            scenario.apply(tick, &mut coordinator);
            coordinator.advance_flights();
            coordinator.tick();
            assert!(coordinator.conflicts().is_empty());
        }
        assert_eq!(coordinator.metrics().completed_flights, 2);
        assert_eq!(coordinator.metrics().queued_flights, 1);
    }

    #[test]
    fn test_quiet_scenario_returns_the_drone_home() {
        let scenario = create_quiet_scenario();
        let mut coordinator = Coordinator::with_seed(1);

        for tick in 0..10 {
            scenario.apply(tick, &mut coordinator);
            coordinator.advance_flights();
            coordinator.tick();
        }

        let drone = coordinator.drone(4).unwrap();
        assert_eq!(drone.status, DroneStatus::Idle);
        assert_eq!(drone.position, drone.dock);
        assert_eq!(coordinator.metrics().completed_flights, 1);
    }
}
