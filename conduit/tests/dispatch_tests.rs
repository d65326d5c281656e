mod common;

use common::Session;
use conduit::error::{BindingFailureReason, ConduitError, ResolutionIssue};
use conduit::parameters::SESSION_KEY;
use conduit::{
    DispatchError, Dispatcher, DuplicateActionPolicy, Extractor, Manifest, ParameterBag,
    ResolvedIndex, SpecialParameters, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn manifest(fixture: &common::Fixture) -> Manifest {
    Extractor::new(&common::provider())
        .extract(&fixture.registry, &common::identity())
        .manifest
}

fn dispatcher(fixture: &common::Fixture) -> Dispatcher {
    Dispatcher::from_manifest(
        &manifest(fixture),
        &fixture.registry,
        common::provider(),
        DuplicateActionPolicy::FirstWins,
    )
    .expect("resolve")
}

fn no_special() -> SpecialParameters {
    SpecialParameters::new()
}

#[test]
fn every_resolvable_action_is_indexed() {
    let fixture = common::fixture();
    let manifest = manifest(&fixture);
    let dispatcher = dispatcher(&fixture);

    for action in &manifest.actions {
        assert!(dispatcher.contains_action(&action.name), "{}", action.name);
    }
    assert_eq!(dispatcher.index().len(), manifest.actions.len());
    assert!(dispatcher.index().report().issues.is_empty());
    assert!(dispatcher.contains_action("SET_COLOR"));
    assert!(!dispatcher.contains_action("paint"));
}

#[test]
fn binds_string_actuals_to_declared_types() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);
    let action = dispatcher.index().get("move").expect("move action");
    let actuals = ParameterBag::new().with("x", "5").with("y", "hi");

    let args = dispatcher
        .provider()
        .bind(action, &actuals, &no_special())
        .expect("bind");
    assert_eq!(args, vec![Value::Integer(5), Value::from("hi")]);

    let out = dispatcher
        .dispatch("move", &actuals, &no_special())
        .expect("dispatch");
    assert_eq!(out, Value::from("5,hi"));
    assert_eq!(fixture.call_count(), 1);
}

#[test]
fn specialized_parameters_only_come_from_the_dispatch_context() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);
    let actuals = ParameterBag::new().with("session", "sam").with("name", "Ann");

    match dispatcher.dispatch("greet", &actuals, &no_special()) {
        Err(DispatchError::ParameterBinding(err)) => {
            assert_eq!(err.action, "greet");
            assert_eq!(err.failed_parameters(), vec!["session"]);
            assert_eq!(
                err.failures[0].reason,
                BindingFailureReason::MissingSpecialized {
                    key: SESSION_KEY.to_string()
                }
            );
        }
        other => panic!("expected binding failure, got {:?}", other),
    }
    assert_eq!(fixture.call_count(), 0);

    let special = SpecialParameters::new().with(
        SESSION_KEY,
        Session {
            user: "sam".to_string(),
        },
    );
    let out = dispatcher
        .dispatch("greet", &actuals, &special)
        .expect("dispatch");
    assert_eq!(out, Value::from("hello Ann from sam"));
}

#[test]
fn direct_name_wins_over_alias() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);

    let by_alias = dispatcher
        .dispatch("blink", &ParameterBag::new().with("total", "3"), &no_special())
        .expect("alias");
    assert_eq!(by_alias, Value::Integer(3));

    let both = ParameterBag::new().with("total", "3").with("Count", 7);
    let direct = dispatcher
        .dispatch("blink", &both, &no_special())
        .expect("direct");
    assert_eq!(direct, Value::Integer(7));
}

#[test]
fn qualified_name_is_the_last_resort() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);
    let actuals = ParameterBag::new()
        .with("home_lights_move_to_x", 12)
        .with("y", "up");

    let out = dispatcher
        .dispatch("move", &actuals, &no_special())
        .expect("dispatch");
    assert_eq!(out, Value::from("12,up"));
}

#[test]
fn enum_parameters_accept_aliases_and_defaults_fill_gaps() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);

    let out = dispatcher
        .dispatch("set_color", &ParameterBag::new().with("hue", "Crimson"), &no_special())
        .expect("dispatch");
    assert_eq!(out, Value::from("Red@100"));

    let out = dispatcher
        .dispatch(
            "set_color",
            &ParameterBag::new().with("color", "navy").with("level", "30"),
            &no_special(),
        )
        .expect("dispatch");
    assert_eq!(out, Value::from("Blue@30"));
}

#[test]
fn binding_reports_every_failed_parameter() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);

    match dispatcher.dispatch("move", &ParameterBag::new().with("x", "left"), &no_special()) {
        Err(DispatchError::ParameterBinding(err)) => {
            assert_eq!(err.failed_parameters(), vec!["x", "y"]);
            assert_eq!(
                err.failures[0].reason,
                BindingFailureReason::Coercion {
                    expected: "i32".to_string(),
                    found: "\"left\"".to_string(),
                }
            );
            assert_eq!(
                err.failures[1].reason,
                BindingFailureReason::NotFound {
                    tried: vec!["y".to_string(), "home_lights_move_to_y".to_string()],
                }
            );
        }
        other => panic!("expected binding failure, got {:?}", other),
    }

    match dispatcher.dispatch(
        "set_color",
        &ParameterBag::new().with("color", "green").with("level", 300),
        &no_special(),
    ) {
        Err(DispatchError::ParameterBinding(err)) => {
            assert_eq!(err.failed_parameters(), vec!["_brightness"])
        }
        other => panic!("expected binding failure, got {:?}", other),
    }
    assert_eq!(fixture.call_count(), 0);
}

#[test]
fn unknown_intent_has_no_side_effects() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);

    let result = dispatcher.dispatch("dance", &ParameterBag::new().with("x", 1), &no_special());
    assert!(matches!(result, Err(DispatchError::UnknownIntent(name)) if name == "dance"));
    assert_eq!(fixture.call_count(), 0);
}

#[test]
fn handler_errors_are_invocation_failures() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);

    match dispatcher.dispatch(
        "set_temperature",
        &ParameterBag::new().with("degrees", 50),
        &no_special(),
    ) {
        Err(DispatchError::InvocationFailed { action, source }) => {
            assert_eq!(action, "set_temperature");
            assert_eq!(source.to_string(), "50 degrees is too hot");
        }
        other => panic!("expected invocation failure, got {:?}", other),
    }
    assert_eq!(fixture.call_count(), 1);

    let out = dispatcher
        .dispatch("set_temperature", &ParameterBag::new().with("degrees", 21), &no_special())
        .expect("dispatch");
    assert_eq!(out, Value::Float(21.0));
}

#[test]
fn first_action_wins_a_name_collision_by_default() {
    let fixture = common::fixture();
    let mut manifest = manifest(&fixture);
    manifest.actions[6].name = "Set_Temperature".to_string();

    let index = ResolvedIndex::resolve(
        &manifest,
        &fixture.registry,
        &common::provider(),
        DuplicateActionPolicy::FirstWins,
    )
    .expect("resolve");

    let callable = index.get_callable("set_temperature").expect("callable");
    assert_eq!(callable.descriptor.declaring_type, "home::Thermostat");
    assert_eq!(index.len(), manifest.actions.len() - 1);
    assert_eq!(
        index.report().issues,
        vec![ResolutionIssue::DuplicateAction {
            name: "Set_Temperature".to_string(),
            kept: "home::Thermostat::set".to_string(),
            dropped: "home::Heater::set".to_string(),
        }]
    );
}

#[test]
fn reject_policy_refuses_colliding_names() {
    let fixture = common::fixture();
    let mut manifest = manifest(&fixture);
    manifest.actions[6].name = "set_temperature".to_string();

    match ResolvedIndex::resolve(
        &manifest,
        &fixture.registry,
        &common::provider(),
        DuplicateActionPolicy::Reject,
    ) {
        Err(ConduitError::DuplicateAction { name, first, second }) => {
            assert_eq!(name, "set_temperature");
            assert_eq!(first, "home::Thermostat::set");
            assert_eq!(second, "home::Heater::set");
        }
        other => panic!("expected duplicate action error, got {:?}", other),
    }
}

#[test]
fn stale_actions_are_skipped_and_reported() {
    let fixture = common::fixture();
    let mut manifest = manifest(&fixture);
    // `move` lost a parameter, `toggle` points to a method that no longer exists.
    manifest.actions[2].parameters.pop();
    manifest.actions[1].id = "home::Lights::switch".to_string();
    let mut orphan = manifest.actions[4].clone();
    orphan.id = "blink".to_string();
    orphan.name = "orphan".to_string();
    manifest.actions.push(orphan);

    let index = ResolvedIndex::resolve(
        &manifest,
        &fixture.registry,
        &common::provider(),
        DuplicateActionPolicy::FirstWins,
    )
    .expect("resolve");

    assert!(!index.contains_action("toggle"));
    assert!(!index.contains_action("move"));
    assert!(!index.contains_action("orphan"));
    assert!(index.contains_action("blink"));

    let failed: Vec<&str> = index
        .report()
        .issues
        .iter()
        .map(|issue| match issue {
            ResolutionIssue::ActionResolutionFailure { action, .. } => action.as_str(),
            ResolutionIssue::DuplicateAction { name, .. } => name.as_str(),
        })
        .collect();
    assert_eq!(failed, vec!["toggle", "move", "orphan"]);
    assert!(matches!(
        index.get_callable("toggle"),
        Err(ConduitError::NotFound(name)) if name == "toggle"
    ));
}

#[test]
fn dispatches_parsed_events() {
    let fixture = common::fixture();
    let dispatcher = dispatcher(&fixture);
    let event = conduit::IntentEvent::from_response(&json!({
        "text": "paint it scarlet",
        "intents": [{"name": "set_color", "confidence": 0.93}],
        "entities": {"color:hue": [{"role": "hue", "value": "scarlet", "confidence": 0.8}]}
    }))
    .expect("event");

    let out = dispatcher
        .dispatch_event(&event, no_special())
        .expect("dispatch");
    assert_eq!(out, Value::from("Red@100"));
}

#[test]
fn one_dispatcher_serves_many_threads() {
    let fixture = common::fixture();
    let dispatcher = Arc::new(dispatcher(&fixture));

    std::thread::scope(|scope| {
        for i in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            scope.spawn(move || {
                let out = dispatcher
                    .dispatch("blink", &ParameterBag::new().with("count", i), &no_special())
                    .expect("dispatch");
                assert_eq!(out, Value::Integer(i as i64));
            });
        }
    });
    assert_eq!(fixture.call_count(), 8);
}
