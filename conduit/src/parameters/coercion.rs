//! Conversion of raw incoming values to declared parameter types.

use crate::registry::ParameterType;
use crate::values::Value;
use serde_json::Value as JsonValue;

/// Why a raw value does not fit a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    pub expected: String,
    pub found: String,
}

impl CoercionError {
    fn new(target: &ParameterType, raw: &JsonValue) -> Self {
        Self {
            expected: target.qualified_name(),
            found: describe(raw),
        }
    }
}

/// Convert `raw` to `target`. Integers are range checked, floats accept
/// integers, strings accept any scalar and enums match member names or
/// aliases without regard to case.
pub fn coerce(raw: &JsonValue, target: &ParameterType) -> Result<Value, CoercionError> {
    let fail = || CoercionError::new(target, raw);
    match target {
        ParameterType::Boolean => match raw {
            JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
            JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(fail()),
            },
            _ => Err(fail()),
        },
        t if t.is_integer() => {
            let n = integer_of(raw).ok_or_else(fail)?;
            let (min, max) = integer_bounds(t);
            if (n as i128) < min || (n as i128) > max {
                return Err(fail());
            }
            Ok(Value::Integer(n))
        }
        t if t.is_float() => {
            let f = float_of(raw).ok_or_else(fail)?;
            if !f.is_finite() {
                return Err(fail());
            }
            if matches!(t, ParameterType::Float32) && f.abs() > f32::MAX as f64 {
                return Err(fail());
            }
            Ok(Value::Float(f))
        }
        ParameterType::Char => {
            let s = raw.as_str().ok_or_else(fail)?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(fail()),
            }
        }
        ParameterType::String => match raw {
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Number(n) => Ok(Value::String(n.to_string())),
            JsonValue::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(fail()),
        },
        ParameterType::Enum(descriptor) => {
            let text = raw.as_str().ok_or_else(fail)?;
            let member = descriptor.find_member(text).ok_or_else(fail)?;
            Ok(Value::Enum {
                type_name: descriptor.qualified_name(),
                variant: member.name.clone(),
            })
        }
        _ => Err(fail()),
    }
}

fn integer_of(raw: &JsonValue) -> Option<i64> {
    match raw {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        JsonValue::String(s) => integer_from_str(s.trim()),
        _ => None,
    }
}

/// Digit strings, with an optional all-zero fraction, parse exactly and
/// fail on overflow. Other numeric forms such as `1e3` go through f64.
fn integer_from_str(s: &str) -> Option<i64> {
    let whole = match s.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        _ => s,
    };
    let digits = whole.strip_prefix(['-', '+']).unwrap_or(whole);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return whole.parse::<i64>().ok();
    }
    s.parse::<f64>().ok().and_then(integral)
}

/// 2^53: past this, f64 no longer represents every integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Floats without a fractional part convert to integers; nothing else does.
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER {
        Some(f as i64)
    } else {
        None
    }
}

fn float_of(raw: &JsonValue) -> Option<f64> {
    match raw {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn integer_bounds(target: &ParameterType) -> (i128, i128) {
    match target {
        ParameterType::Int8 => (i8::MIN as i128, i8::MAX as i128),
        ParameterType::Int16 => (i16::MIN as i128, i16::MAX as i128),
        ParameterType::Int32 => (i32::MIN as i128, i32::MAX as i128),
        ParameterType::UInt8 => (0, u8::MAX as i128),
        ParameterType::UInt16 => (0, u16::MAX as i128),
        ParameterType::UInt32 => (0, u32::MAX as i128),
        ParameterType::UInt64 => (0, i64::MAX as i128),
        _ => (i64::MIN as i128, i64::MAX as i128),
    }
}

fn describe(raw: &JsonValue) -> String {
    match raw {
        JsonValue::Null => "null".to_string(),
        JsonValue::Array(_) => "array".to_string(),
        JsonValue::Object(_) => "object".to_string(),
        scalar => scalar.to_string(),
    }
}
