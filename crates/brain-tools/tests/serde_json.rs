#![cfg(feature = "serde")]

use brain_core::AgentId;
use brain_tools::{TraceEvent, TraceKind, TraceLog};

#[test]
fn trace_log_serializes_with_snake_case_kinds() {
    let log = TraceLog {
        events: vec![TraceEvent::new(5, AgentId(2), TraceKind::GoalSelected).with_goal("die")],
    };

    let json = serde_json::to_value(&log).expect("serialize");
    assert_eq!(json["events"][0]["kind"], "goal_selected");
    assert_eq!(json["events"][0]["agent"], 2);

    let back: TraceLog = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, log);
}
