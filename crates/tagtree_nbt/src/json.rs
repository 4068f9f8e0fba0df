//! Conversion between values and JSON.
//!
//! JSON has no notion of tag types, so the two directions are not symmetric.
//! [`to_json`] drops type information: every numeric variant becomes a plain
//! number and lists and arrays both become JSON arrays. [`from_json`]
//! recovers types by inference:
//!
//! - `null` becomes [`Value::End`] and booleans become bytes `1`/`0`.
//! - Integral numbers become the narrowest of byte, short, int or long.
//!   Fractional numbers become a float if converting to `f32` and back gives
//!   the same `f64` bit for bit, otherwise a double.
//! - Arrays of integral numbers become a byte, int or long array depending
//!   on the range of their elements. Any other array becomes a [`List`]
//!   whose element type is the common element type, or `End` if the
//!   elements disagree (a mixed list) or there are none.
//! - Objects become compounds.
//!
//! A value that went through JSON can therefore come back with a narrower
//! numeric type than it started with, e.g. `Short(5)` comes back as
//! `Byte(5)`.
//!
//! ```
//! use tagtree_nbt::{compound, from_json_str, Value};
//!
//! let value = from_json_str(r#"{"level": 7, "pos": [1, 2, 300], "speed": 0.5}"#).unwrap();
//!
//! assert_eq!(
//!     value,
//!     Value::from(compound! {
//!         "level" => 7_i8,
//!         "pos" => vec![1, 2, 300],
//!         "speed" => 0.5_f32,
//!     })
//! );
//! ```

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::Result;
use crate::{Compound, List, Value};

/// Converts a value to JSON.
///
/// Float and double values that JSON cannot represent (NaN and the
/// infinities) become `null`.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::End => JsonValue::Null,
        Value::Byte(v) => (*v).into(),
        Value::Short(v) => (*v).into(),
        Value::Int(v) => (*v).into(),
        Value::Long(v) => (*v).into(),
        Value::Float(v) => float_to_json(f64::from(*v)),
        Value::Double(v) => float_to_json(*v),
        Value::ByteArray(v) => v.iter().map(|&b| JsonValue::from(b)).collect(),
        Value::String(v) => JsonValue::String(v.clone()),
        Value::List(v) => v.iter().map(to_json).collect(),
        Value::Compound(v) => JsonValue::Object(compound_to_json(v)),
        Value::IntArray(v) => v.iter().map(|&i| JsonValue::from(i)).collect(),
        Value::LongArray(v) => v.iter().map(|&l| JsonValue::from(l)).collect(),
    }
}

fn float_to_json(f: f64) -> JsonValue {
    Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

fn compound_to_json(c: &Compound) -> Map<String, JsonValue> {
    c.iter().map(|(k, v)| (k.clone(), to_json(v))).collect()
}

/// Converts JSON to a value, inferring tag types as described in the
/// [module documentation](self).
pub fn from_json(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::End,
        JsonValue::Bool(b) => Value::from(*b),
        JsonValue::Number(n) => narrow_number(n),
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(elems) => array_from_json(elems),
        JsonValue::Object(members) => {
            let mut c = Compound::with_capacity(members.len());

            for (k, v) in members {
                c.insert(k.clone(), from_json(v));
            }

            Value::Compound(c)
        }
    }
}

/// Parses JSON text and converts it with [`from_json`].
///
/// Malformed text is reported as [`Error::Json`](crate::Error::Json), which
/// carries the line and column of the problem.
pub fn from_json_str(text: &str) -> Result<Value> {
    let json: JsonValue = serde_json::from_str(text)?;
    Ok(from_json(&json))
}

/// Converts a value with [`to_json`] and renders it as JSON text.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String> {
    let json = to_json(value);

    Ok(if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    })
}

/// Returns the number as an `i64` if it is mathematically an integer that
/// fits. Integral floats such as `1e2` count.
fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }

    if n.is_u64() {
        // Above i64::MAX.
        return None;
    }

    let f = n.as_f64()?;

    // i64::MAX is not representable as f64; the bound rounds up to 2^63.
    #[allow(clippy::cast_precision_loss)]
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;

    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn narrow_integer(i: i64) -> Value {
    if let Ok(b) = i8::try_from(i) {
        Value::Byte(b)
    } else if let Ok(s) = i16::try_from(i) {
        Value::Short(s)
    } else if let Ok(i) = i32::try_from(i) {
        Value::Int(i)
    } else {
        Value::Long(i)
    }
}

fn narrow_number(n: &Number) -> Value {
    if let Some(i) = integral(n) {
        return narrow_integer(i);
    }

    // Without serde_json's arbitrary precision feature every number has an
    // f64 representation.
    let d = n.as_f64().unwrap_or(f64::NAN);

    #[allow(clippy::cast_possible_truncation)]
    let f = d as f32;

    if f64::from(f).to_bits() == d.to_bits() {
        Value::Float(f)
    } else {
        Value::Double(d)
    }
}

fn array_from_json(elems: &[JsonValue]) -> Value {
    let ints: Option<Vec<i64>> = elems
        .iter()
        .map(|e| e.as_number().and_then(integral))
        .collect();

    match ints {
        Some(ints) if !ints.is_empty() => integer_array(ints),
        _ => Value::List(List::from_values(elems.iter().map(from_json).collect())),
    }
}

fn integer_array(ints: Vec<i64>) -> Value {
    let min = ints.iter().copied().min().unwrap_or_default();
    let max = ints.iter().copied().max().unwrap_or_default();

    let fits = |lo: i64, hi: i64| min >= lo && max <= hi;

    if fits(i8::MIN.into(), i8::MAX.into()) {
        Value::ByteArray(ints.into_iter().map(|i| i as i8).collect())
    } else if fits(i32::MIN.into(), i32::MAX.into()) {
        Value::IntArray(ints.into_iter().map(|i| i as i32).collect())
    } else {
        Value::LongArray(ints)
    }
}

#[cfg(test)]
mod tests;
