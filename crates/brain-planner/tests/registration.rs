use brain_core::AgentId;
use brain_planner::{
    ActionKind, ActionSpec, ConfigError, Drain, Goal, Planner, PlannerConfig, Registry,
    ResourceDelta,
};

fn wander() -> ActionSpec {
    ActionSpec::move_randomly("wander")
}

fn register(actions: Vec<ActionSpec>, goals: Vec<Goal>) -> Result<Registry, ConfigError> {
    Registry::new(actions, goals)
}

#[test]
fn empty_registrations_are_rejected() {
    assert_eq!(
        register(vec![], vec![Goal::new("idle", 0).action("wander", 1)]).unwrap_err(),
        ConfigError::NoActions
    );
    assert_eq!(register(vec![wander()], vec![]).unwrap_err(), ConfigError::NoGoals);
}

#[test]
fn duplicate_names_are_rejected() {
    assert_eq!(
        register(
            vec![wander(), wander()],
            vec![Goal::new("idle", 0).action("wander", 1)]
        )
        .unwrap_err(),
        ConfigError::DuplicateAction("wander".into())
    );
    assert_eq!(
        register(
            vec![wander()],
            vec![
                Goal::new("idle", 0).action("wander", 1),
                Goal::new("idle", 3).action("wander", 1),
            ]
        )
        .unwrap_err(),
        ConfigError::DuplicateGoal("idle".into())
    );
}

#[test]
fn goal_references_must_resolve() {
    assert_eq!(
        register(vec![wander()], vec![Goal::new("idle", 0).action("fly", 1)]).unwrap_err(),
        ConfigError::UnknownAction {
            goal: "idle".into(),
            action: "fly".into()
        }
    );
    assert_eq!(
        register(vec![wander()], vec![Goal::new("idle", 0)]).unwrap_err(),
        ConfigError::EmptyGoal("idle".into())
    );
}

#[test]
fn orders_must_be_positive_and_unique() {
    assert_eq!(
        register(vec![wander()], vec![Goal::new("idle", 0).action("wander", 0)]).unwrap_err(),
        ConfigError::InvalidOrder {
            goal: "idle".into(),
            action: "wander".into()
        }
    );
    assert_eq!(
        register(
            vec![wander()],
            vec![Goal::new("idle", 0).action("wander", 1).action("wander", 2)]
        )
        .unwrap_err(),
        ConfigError::DuplicateGoalAction {
            goal: "idle".into(),
            action: "wander".into()
        }
    );
    assert_eq!(
        register(
            vec![wander(), ActionSpec::move_randomly("pace")],
            vec![Goal::new("idle", 0).action("wander", 2).action("pace", 2)]
        )
        .unwrap_err(),
        ConfigError::DuplicateOrder {
            goal: "idle".into(),
            order: 2
        }
    );
}

#[test]
fn action_parameters_are_validated() {
    let cases = [
        ActionSpec::new(
            "wander",
            ActionKind::MoveRandomly {
                retarget_seconds: 0.0,
            },
        ),
        ActionSpec::interact("wander", "rock", -1.0),
        ActionSpec::interact("wander", "rock", f32::NAN),
        ActionSpec::interact("wander", "rock", 1.0).draining(Drain::new("stamina", -2.0)),
        ActionSpec::interact("wander", "rock", 1.0)
            .on_finish(ResourceDelta::new("ore", f32::INFINITY)),
    ];

    for spec in cases {
        let err = register(vec![spec], vec![Goal::new("idle", 0).action("wander", 1)])
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidActionParameter { ref action, .. } if action == "wander"),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn steps_are_sorted_highest_order_first() {
    let registry = register(
        vec![
            wander(),
            ActionSpec::go_to_beacon("go_to_rock", "rock"),
            ActionSpec::interact("break_rock", "rock", 2.0),
        ],
        vec![Goal::new("quarry", 0)
            .action("go_to_rock", 5)
            .action("wander", 1)
            .action("break_rock", 9)],
    )
    .unwrap();

    let goal = registry.goal(registry.goal_id("quarry").unwrap());
    let names: Vec<&str> = goal
        .steps()
        .iter()
        .map(|step| registry.action(step.action).name())
        .collect();
    assert_eq!(names, ["break_rock", "go_to_rock", "wander"]);
    assert_eq!(
        goal.order_of(registry.action_id("go_to_rock").unwrap())
            .map(|o| o.get()),
        Some(5)
    );
}

#[test]
fn ranking_is_priority_descending_and_stable() {
    let registry = register(
        vec![wander()],
        vec![
            Goal::new("a", 1).action("wander", 1),
            Goal::new("b", 7).action("wander", 1),
            Goal::new("c", 1).action("wander", 1),
            Goal::new("d", 7).action("wander", 1),
            Goal::new("e", -3).action("wander", 1),
        ],
    )
    .unwrap();

    let ranked: Vec<&str> = registry
        .ranked_goals()
        .iter()
        .map(|&id| registry.goal(id).name())
        .collect();
    assert_eq!(ranked, ["b", "d", "a", "c", "e"]);
}

#[test]
fn builder_surfaces_registration_errors() {
    let err = Planner::builder(AgentId(1))
        .action(wander())
        .goal(Goal::new("idle", 0).action("run", 1))
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "goal `idle` references unregistered action `run`"
    );
}

#[test]
fn bootstrap_is_first_goal_and_first_action() {
    let planner = Planner::builder(AgentId(1))
        .action(ActionSpec::move_randomly("first"))
        .action(ActionSpec::move_randomly("second"))
        .goal(Goal::new("low", 0).action("second", 1))
        .goal(Goal::new("high", 9).action("first", 1))
        .build()
        .unwrap();

    assert!(!planner.is_started());
    assert_eq!(planner.goal().name(), "low");
    assert_eq!(planner.action().name(), "first");
}

#[test]
fn zero_cascade_budget_is_rejected() {
    let err = Planner::builder(AgentId(1))
        .config(PlannerConfig { max_cascade: 0 })
        .action(wander())
        .goal(Goal::new("idle", 0).action("wander", 1))
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::ZeroCascadeLimit);

    let planner = Planner::builder(AgentId(1))
        .config(PlannerConfig { max_cascade: 1 })
        .action(wander())
        .goal(Goal::new("idle", 0).action("wander", 1))
        .build();
    assert!(planner.is_ok());
}
