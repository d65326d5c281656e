use crate::error::{ConduitError, ConduitResult};
use crate::parameters::ParameterBag;
use serde_json::Value as JsonValue;

/// A recognized utterance, parsed from an NLU response payload.
///
/// Payload shape:
///
/// ```json
/// {
///   "text": "make it red",
///   "intents": [{ "name": "set_color", "confidence": 0.97 }],
///   "entities": {
///     "color:color": [{ "role": "color", "value": "red", "confidence": 0.9 }]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IntentEvent {
    pub text: String,
    /// Highest-confidence intent, if any was recognized.
    pub intent: Option<String>,
    pub confidence: Option<f64>,
    /// One value per entity role. See [`entity_parameters`] for ties.
    pub parameters: ParameterBag,
    /// The payload as received.
    pub response: JsonValue,
}

impl IntentEvent {
    pub fn from_response(response: &JsonValue) -> ConduitResult<Self> {
        let object = response
            .as_object()
            .ok_or_else(|| malformed("response is not an object"))?;

        let text = match object.get("text") {
            None | Some(JsonValue::Null) => String::new(),
            Some(JsonValue::String(s)) => s.clone(),
            Some(_) => return Err(malformed("'text' is not a string")),
        };

        let (intent, confidence) = match object.get("intents") {
            None | Some(JsonValue::Null) => (None, None),
            Some(JsonValue::Array(intents)) => top_intent(intents)?,
            Some(_) => return Err(malformed("'intents' is not an array")),
        };

        let parameters = match object.get("entities") {
            None | Some(JsonValue::Null) => ParameterBag::new(),
            Some(JsonValue::Object(entities)) => entity_parameters(entities)?,
            Some(_) => return Err(malformed("'entities' is not an object")),
        };

        Ok(Self {
            text,
            intent,
            confidence,
            parameters,
            response: response.clone(),
        })
    }
}

fn malformed(reason: &str) -> ConduitError {
    ConduitError::MalformedEvent(reason.to_string())
}

fn top_intent(intents: &[JsonValue]) -> ConduitResult<(Option<String>, Option<f64>)> {
    let mut best: Option<(&str, f64)> = None;
    for intent in intents {
        let name = intent
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| malformed("intent without a name"))?;
        let confidence = intent
            .get("confidence")
            .and_then(JsonValue::as_f64)
            .unwrap_or(0.0);
        // Ties keep the earlier intent.
        if best.map_or(true, |(_, c)| confidence > c) {
            best = Some((name, confidence));
        }
    }
    Ok(match best {
        Some((name, confidence)) => (Some(name.to_string()), Some(confidence)),
        None => (None, None),
    })
}

/// First valued entry of each entity, keyed by role. Entity keys are
/// visited in sorted order (`serde_json::Map` is a `BTreeMap` here), so
/// when two entities carry the same role the key that sorts first wins.
fn entity_parameters(entities: &serde_json::Map<String, JsonValue>) -> ConduitResult<ParameterBag> {
    let mut bag = ParameterBag::new();
    for (key, found) in entities {
        let found = found.as_array().ok_or_else(|| {
            ConduitError::MalformedEvent(format!("entity '{}' is not an array", key))
        })?;
        let Some(first) = found.iter().find(|f| f.get("value").is_some()) else {
            continue;
        };
        let role = first
            .get("role")
            .and_then(JsonValue::as_str)
            .unwrap_or_else(|| key.rsplit(':').next().unwrap_or(key.as_str()));
        if bag.get(role).is_none() {
            bag.insert(role, first["value"].clone());
        }
    }
    Ok(bag)
}
