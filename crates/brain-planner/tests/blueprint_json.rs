#![cfg(feature = "serde")]

use brain_core::{AgentBody, AgentId, TickContext};
use brain_planner::{ActionKind, Blueprint, Condition, Planner};

const MINER: &str = r#"{
    "actions": [
        { "name": "move_randomly", "kind": "move_randomly" },
        { "name": "go_to_deposit", "kind": "go_to_beacon", "beacon": "deposit" },
        {
            "name": "mine_deposit",
            "kind": "interact",
            "beacon": "deposit",
            "duration_seconds": 3.0,
            "drain": { "resource": "stamina", "per_second": 2.0 },
            "on_finish": [{ "resource": "ore", "amount": 1.0 }],
            "consume_target": true,
            "interruptible": false
        }
    ],
    "goals": [
        {
            "name": "search",
            "priority": 1,
            "actions": [
                { "action": "move_randomly", "order": 1 },
                { "action": "go_to_deposit", "order": 2 },
                { "action": "mine_deposit", "order": 3 }
            ]
        },
        {
            "name": "hang_around",
            "priority": 2,
            "when": { "at_max": "ore" },
            "actions": [{ "action": "move_randomly", "order": 1 }]
        }
    ]
}"#;

#[test]
fn blueprint_loads_with_defaults() {
    let blueprint: Blueprint = serde_json::from_str(MINER).unwrap();

    assert_eq!(
        blueprint.actions[0].kind,
        ActionKind::MoveRandomly {
            retarget_seconds: brain_planner::action::DEFAULT_RETARGET_SECONDS
        }
    );
    assert!(blueprint.actions[0].interruptible);
    assert!(!blueprint.actions[2].interruptible);
    assert_eq!(blueprint.goals[0].when, Condition::Always);
    assert_eq!(blueprint.goals[1].when, Condition::AtMax("ore".into()));
}

#[test]
fn planner_builds_from_blueprint() {
    let blueprint: Blueprint = serde_json::from_str(MINER).unwrap();
    let mut body = AgentBody::new();
    body.status.define("ore", 0.0, 3.0, 3.0);

    let mut planner = Planner::from_blueprint(AgentId(1), blueprint).unwrap();
    planner.start(&TickContext::new(0, 0.5), &mut body);
    assert_eq!(planner.goal().name(), "hang_around");
}

#[test]
fn blueprint_survives_a_json_round_trip() {
    let blueprint: Blueprint = serde_json::from_str(MINER).unwrap();
    let json = serde_json::to_string(&blueprint).unwrap();
    let back: Blueprint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, blueprint);
}

#[test]
fn snapshot_serializes_for_tooling() {
    let blueprint: Blueprint = serde_json::from_str(MINER).unwrap();
    let mut body = AgentBody::new();
    let mut planner = Planner::from_blueprint(AgentId(1), blueprint).unwrap();
    planner.start(&TickContext::new(0, 0.5), &mut body);

    let value = serde_json::to_value(planner.snapshot()).unwrap();
    assert_eq!(value["goal"], "search");
    assert_eq!(value["action_state"], "running");
    assert_eq!(value["agent"], 1);
}
