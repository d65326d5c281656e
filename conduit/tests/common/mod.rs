//! Fixture registry shared by the integration tests: a small home
//! automation app with lights, a thermostat and a heater.

#![allow(dead_code)]

use conduit::parameters::SESSION_KEY;
use conduit::registry::{
    CallableDescriptor, EnumDescriptor, EnumMember, ParameterDescriptor, ParameterType,
    StaticRegistry,
};
use conduit::{AppIdentity, ParameterProvider, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SESSION_TYPE: &str = "home::Session";

/// Ambient object handed to handlers through `@session`.
#[derive(Debug)]
pub struct Session {
    pub user: String,
}

pub struct Fixture {
    pub registry: StaticRegistry,
    /// Number of handler invocations so far.
    pub calls: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn identity() -> AppIdentity {
    AppIdentity {
        id: "home".to_string(),
        version: "1.2.0".to_string(),
        domain: "Home".to_string(),
    }
}

pub fn provider() -> ParameterProvider {
    ParameterProvider::default().with_specialized(SESSION_TYPE, SESSION_KEY)
}

pub fn color() -> EnumDescriptor {
    EnumDescriptor::new("Color", "home")
        .in_module("home")
        .with_member(EnumMember::new("Red").with_aliases(["crimson", "scarlet"]))
        .with_member(EnumMember::new("Green"))
        .with_member(EnumMember::new("Blue").with_aliases(["navy"]))
}

pub fn fixture() -> Fixture {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = |calls: &Arc<AtomicUsize>| {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    };

    let tick = counted(&calls);
    let set_color = move |args: &[Value]| -> anyhow::Result<Value> {
        tick();
        let color = args[0].as_variant().unwrap_or("?");
        let brightness = args[1].as_i64().unwrap_or(-1);
        Ok(Value::String(format!("{}@{}", color, brightness)))
    };

    let tick = counted(&calls);
    let toggle = move |_: &[Value]| -> anyhow::Result<Value> {
        tick();
        Ok(Value::Boolean(true))
    };

    let tick = counted(&calls);
    let move_to = move |args: &[Value]| -> anyhow::Result<Value> {
        tick();
        Ok(Value::String(format!(
            "{},{}",
            args[0].as_i64().unwrap_or_default(),
            args[1].as_str().unwrap_or_default()
        )))
    };

    let tick = counted(&calls);
    let greet = move |args: &[Value]| -> anyhow::Result<Value> {
        tick();
        let session = args[0]
            .downcast_ref::<Session>()
            .ok_or_else(|| anyhow::anyhow!("not a session"))?;
        Ok(Value::String(format!(
            "hello {} from {}",
            args[1].as_str().unwrap_or_default(),
            session.user
        )))
    };

    let tick = counted(&calls);
    let blink = move |args: &[Value]| -> anyhow::Result<Value> {
        tick();
        Ok(args[0].clone())
    };

    let tick = counted(&calls);
    let set_temperature = move |args: &[Value]| -> anyhow::Result<Value> {
        tick();
        let degrees = args[0].as_f64().unwrap_or_default();
        if degrees > 40.0 {
            anyhow::bail!("{} degrees is too hot", degrees);
        }
        Ok(Value::Float(degrees))
    };

    let tick = counted(&calls);
    let set_heat = move |args: &[Value]| -> anyhow::Result<Value> {
        tick();
        Ok(args[0].clone())
    };

    let registry = StaticRegistry::builder()
        .enumeration(color())
        .broken_enumeration("home::Mood", "members are generated at runtime")
        .callable(
            CallableDescriptor::new("home::Lights", "set_color")
                .action(Some("set_color"))
                .in_module("home")
                .returns("String")
                .with_parameter(
                    ParameterDescriptor::new("color", ParameterType::Enum(color()))
                        .with_alias("hue"),
                )
                .with_parameter(
                    ParameterDescriptor::new("_brightness", ParameterType::UInt8)
                        .with_alias("level")
                        .with_default(100),
                ),
            set_color,
        )
        .callable(
            CallableDescriptor::new("home::Lights", "toggle")
                .action(None)
                .in_module("home")
                .returns("bool"),
            toggle,
        )
        .callable(
            CallableDescriptor::new("home::Lights", "move_to")
                .action(Some("move"))
                .in_module("home")
                .with_parameter(ParameterDescriptor::new("x", ParameterType::Int32))
                .with_parameter(ParameterDescriptor::new("y", ParameterType::String)),
            move_to,
        )
        .callable(
            CallableDescriptor::new("home::Lights", "greet")
                .action(Some("greet"))
                .in_module("home")
                .with_parameter(ParameterDescriptor::new(
                    "session",
                    ParameterType::object(SESSION_TYPE),
                ))
                .with_parameter(ParameterDescriptor::new("name", ParameterType::String)),
            greet,
        )
        .callable(
            CallableDescriptor::new("home::Lights", "blink")
                .action(Some("blink"))
                .in_module("home")
                .with_parameter(
                    ParameterDescriptor::new("count", ParameterType::Int32).with_alias("total"),
                ),
            blink,
        )
        .callable(
            CallableDescriptor::new("home::Lights", "paint")
                .action(Some("paint"))
                .in_module("home")
                .with_parameter(ParameterDescriptor::new("color", ParameterType::Enum(color())))
                .with_parameter(ParameterDescriptor::new(
                    "texture",
                    ParameterType::object("home::Texture"),
                )),
            |_| Ok(Value::Nil),
        )
        .callable(
            CallableDescriptor::new("home::Lights", "calibrate").in_module("home"),
            |_| Ok(Value::Nil),
        )
        .callable(
            CallableDescriptor::new("home::Thermostat", "set")
                .action(Some("set_temperature"))
                .in_module("home")
                .with_parameter(ParameterDescriptor::new("degrees", ParameterType::Float64)),
            set_temperature,
        )
        .callable(
            CallableDescriptor::new("home::Heater", "set")
                .action(Some("set_heat"))
                .in_module("home")
                .with_parameter(ParameterDescriptor::new("degrees", ParameterType::Float64)),
            set_heat,
        )
        .build();

    Fixture { registry, calls }
}
