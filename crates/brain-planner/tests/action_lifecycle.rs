use brain_core::{AgentBody, AgentId, BeaconType, ResourceKey, Steering, TickContext};
use brain_planner::{Action, ActionSpec, ActionState, PlannerError, ResourceDelta};

const AGENT: AgentId = AgentId(9);
const FOOD: BeaconType = BeaconType::from_static("food");
const HUNGER: ResourceKey = ResourceKey::from_static("hunger");

fn body() -> AgentBody {
    let mut body = AgentBody::new();
    body.status.define(HUNGER, 0.0, 10.0, 5.0);
    body
}

#[test]
fn execute_while_running_is_rejected() {
    let ctx = TickContext::new(0, 0.1);
    let mut body = body();
    let mut action = Action::new(ActionSpec::move_randomly("wander"));

    action.execute(&ctx, AGENT, &mut body).unwrap();
    let err = action.execute(&ctx, AGENT, &mut body).unwrap_err();

    assert_eq!(
        err,
        PlannerError::ReentrantExecute {
            action: "wander".into()
        }
    );
    assert_eq!(action.activations(), 1);
}

#[test]
fn terminal_calls_require_a_running_activation() {
    let ctx = TickContext::new(0, 0.1);
    let mut body = body();
    let mut action = Action::new(ActionSpec::go_to_beacon("go_to_food", FOOD));

    let not_running = PlannerError::NotRunning {
        action: "go_to_food".into(),
    };
    assert_eq!(
        action.execute_break(&ctx, AGENT, &mut body),
        Err(not_running.clone())
    );

    action.execute(&ctx, AGENT, &mut body).unwrap();
    action.execute_break(&ctx, AGENT, &mut body).unwrap();
    assert_eq!(action.state(), ActionState::Broken);
    assert_eq!(
        action.execute_consequences(&ctx, AGENT, &mut body),
        Err(not_running.clone())
    );
    assert_eq!(
        action.execute_break(&ctx, AGENT, &mut body),
        Err(not_running)
    );
}

#[test]
fn go_to_beacon_needs_a_sensible_beacon_and_stops_on_arrival() {
    let ctx = TickContext::new(0, 0.1);
    let mut body = body();
    let mut action = Action::new(ActionSpec::go_to_beacon("go_to_food", FOOD));
    assert!(!action.can_start(AGENT, &body));

    body.sensors.sense(FOOD);
    assert!(action.can_start(AGENT, &body));
    action.execute(&ctx, AGENT, &mut body).unwrap();
    assert_eq!(body.steering, Steering::MoveTo(FOOD));
    assert!(!action.is_finished(AGENT, &body));

    body.sensors.reach(FOOD);
    assert!(action.is_finished(AGENT, &body));
    action.execute_consequences(&ctx, AGENT, &mut body).unwrap();
    assert_eq!(action.state(), ActionState::Finished);
    assert_eq!(body.steering, Steering::Stop);
}

#[test]
fn interact_applies_effects_and_consumes_its_target() {
    let ctx = TickContext::new(0, 1.0);
    let mut body = body();
    let mut action = Action::new(
        ActionSpec::interact("eat", FOOD, 1.0)
            .on_finish(ResourceDelta::new(HUNGER, -4.0))
            .consuming_target(),
    );
    assert!(!action.can_start(AGENT, &body));
    body.sensors.reach(FOOD);
    assert!(action.can_start(AGENT, &body));

    action.execute(&ctx, AGENT, &mut body).unwrap();
    action.update(&ctx, AGENT, &mut body);
    assert!(action.is_finished(AGENT, &body));
    action.execute_consequences(&ctx, AGENT, &mut body).unwrap();

    assert_eq!(body.status.value(&HUNGER), Some(1.0));
    assert!(!body.sensors.is_sensible(&FOOD));
}

#[test]
fn consuming_a_vanished_target_still_finishes() {
    let ctx = TickContext::new(0, 1.0);
    let mut body = body();
    let mut action = Action::new(
        ActionSpec::interact("eat", FOOD, 0.5)
            .on_finish(ResourceDelta::new(HUNGER, -1.0))
            .consuming_target(),
    );
    body.sensors.reach(FOOD);
    action.execute(&ctx, AGENT, &mut body).unwrap();
    action.update(&ctx, AGENT, &mut body);
    body.sensors.consume(&FOOD);

    action.execute_consequences(&ctx, AGENT, &mut body).unwrap();
    assert_eq!(action.state(), ActionState::Finished);
    assert_eq!(body.status.value(&HUNGER), Some(4.0));
}

#[test]
fn update_outside_an_activation_is_a_no_op() {
    let ctx = TickContext::new(0, 1.0);
    let mut body = body();
    let mut action = Action::new(ActionSpec::interact("eat", FOOD, 2.0));

    action.update(&ctx, AGENT, &mut body);
    assert_eq!(action.elapsed(), 0.0);
    assert_eq!(action.state(), ActionState::NotStarted);
}

#[test]
fn wandering_heading_is_reproducible_from_the_tick_seed() {
    let ctx = TickContext::new(12, 0.1).with_seed(99);
    let spec = ActionSpec::move_randomly("wander");

    let mut a = body();
    let mut b = body();
    Action::new(spec.clone())
        .execute(&ctx, AGENT, &mut a)
        .unwrap();
    Action::new(spec).execute(&ctx, AGENT, &mut b).unwrap();

    assert!(matches!(a.steering, Steering::Wander { .. }));
    assert_eq!(a.steering, b.steering);
}

#[test]
fn wandering_never_finishes_and_keeps_retargeting() {
    let mut ctx = TickContext::new(0, 0.5).with_seed(3);
    let mut body = body();
    let mut action = Action::new(ActionSpec::move_randomly("wander"));
    action.execute(&ctx, AGENT, &mut body).unwrap();

    for _ in 0..20 {
        ctx = ctx.next();
        action.update(&ctx, AGENT, &mut body);
        assert!(!action.is_finished(AGENT, &body));
        assert!(matches!(body.steering, Steering::Wander { .. }));
    }
    assert_eq!(action.elapsed(), 10.0);
}
