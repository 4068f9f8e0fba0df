use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::{compound, Error, Tag};

#[test]
fn integer_narrowing_boundaries() {
    let cases = [
        (json!(127), Value::Byte(127)),
        (json!(-128), Value::Byte(-128)),
        (json!(128), Value::Short(128)),
        (json!(-129), Value::Short(-129)),
        (json!(32767), Value::Short(32767)),
        (json!(32768), Value::Int(32768)),
        (json!(2147483647), Value::Int(i32::MAX)),
        (json!(-2147483648_i64), Value::Int(i32::MIN)),
        (json!(2147483648_i64), Value::Long(2147483648)),
        (json!(i64::MIN), Value::Long(i64::MIN)),
    ];

    for (json, expected) in cases {
        assert_eq!(from_json(&json), expected, "narrowing {json}");
    }
}

#[test]
fn integral_floats_narrow_like_integers() {
    assert_eq!(from_json_str("1e2").unwrap(), Value::Byte(100));
    assert_eq!(from_json_str("40000.0").unwrap(), Value::Int(40000));
    assert_eq!(from_json_str("-0.0").unwrap(), Value::Byte(0));
}

#[test]
fn fractional_numbers_pick_float_or_double() {
    assert_eq!(from_json(&json!(1.5)), Value::Float(1.5));
    assert_eq!(from_json(&json!(-0.25)), Value::Float(-0.25));
    assert_eq!(from_json(&json!(0.1)), Value::Double(0.1));
    assert_eq!(from_json(&json!(1e300)), Value::Double(1e300));
}

#[test]
fn integers_beyond_long_become_double() {
    let big = 12_345_678_901_234_567_890_u64;

    assert_eq!(from_json(&json!(big)), Value::Double(big as f64));
}

#[test]
fn scalars() {
    assert_eq!(from_json(&json!(null)), Value::End);
    assert_eq!(from_json(&json!(true)), Value::Byte(1));
    assert_eq!(from_json(&json!(false)), Value::Byte(0));
    assert_eq!(from_json(&json!("hi")), Value::from("hi"));
}

#[test]
fn integer_arrays_pick_narrowest_array() {
    assert_eq!(from_json(&json!([1, 2, 3])), Value::ByteArray(vec![1, 2, 3]));
    assert_eq!(
        from_json(&json!([-128, 127])),
        Value::ByteArray(vec![-128, 127])
    );
    assert_eq!(
        from_json(&json!([1, 2, 300])),
        Value::IntArray(vec![1, 2, 300])
    );
    assert_eq!(
        from_json(&json!([0, 2147483648_i64])),
        Value::LongArray(vec![0, 2147483648])
    );
}

#[test]
fn non_integer_arrays_become_lists() {
    let Value::List(l) = from_json(&json!([1, "a"])) else {
        panic!("expected list");
    };
    assert_eq!(l.element_type(), Tag::End);
    assert_eq!(l.as_slice(), [Value::Byte(1), Value::from("a")]);

    let Value::List(l) = from_json(&json!([1, 2.5])) else {
        panic!("expected list");
    };
    assert_eq!(l.element_type(), Tag::End);
    assert_eq!(l.as_slice(), [Value::Byte(1), Value::Float(2.5)]);

    let Value::List(l) = from_json(&json!([0.5, 1.5])) else {
        panic!("expected list");
    };
    assert_eq!(l.element_type(), Tag::Float);

    let Value::List(l) = from_json(&json!(["x", "y"])) else {
        panic!("expected list");
    };
    assert_eq!(l.element_type(), Tag::String);
    assert!(l.is_homogeneous());
}

#[test]
fn empty_array_is_empty_end_list() {
    assert_eq!(from_json(&json!([])), Value::List(List::default()));
}

#[test]
fn nested_arrays_become_list_of_arrays() {
    let Value::List(l) = from_json(&json!([[1, 2], [3, 400]])) else {
        panic!("expected list");
    };

    // The element types disagree, so the list is mixed.
    assert_eq!(l.element_type(), Tag::End);
    assert_eq!(
        l.as_slice(),
        [Value::ByteArray(vec![1, 2]), Value::IntArray(vec![3, 400])]
    );
}

#[test]
fn objects_become_compounds() {
    let value = from_json(&json!({
        "name": "steve",
        "health": 20,
        "pos": { "x": 1.5, "y": 64, "z": -3 },
        "flags": [true, false],
        "missing": null,
    }));

    assert_eq!(
        value,
        Value::from(compound! {
            "name" => "steve",
            "health" => 20_i8,
            "pos" => compound! { "x" => 1.5_f32, "y" => 64_i8, "z" => -3_i8 },
            "flags" => List::new(Tag::Byte, vec![1_i8.into(), 0_i8.into()]).unwrap(),
            "missing" => Value::End,
        })
    );
}

#[cfg(feature = "binary")]
#[test]
fn array_of_nulls_cannot_be_encoded() {
    let value = from_json(&json!({ "nulls": [null, null] }));

    let mut buf = vec![];
    let err = crate::to_binary(&value, &mut buf, "").unwrap_err();

    let Error::Format(e) = err else {
        panic!("expected format error");
    };
    assert_eq!(e.path(), "nulls");
}

#[test]
fn duplicate_keys_last_wins() {
    let value = from_json_str(r#"{"a": 1, "a": "two"}"#).unwrap();

    assert_eq!(value, Value::from(compound! { "a" => "two" }));
}

#[test]
fn to_json_drops_types() {
    let value = Value::from(compound! {
        "end" => Value::End,
        "short" => 300_i16,
        "long" => i64::MAX,
        "float" => 0.5_f32,
        "nan" => f64::NAN,
        "bytes" => vec![1_i8, -1],
        "longs" => vec![1_i64, 2],
        "list" => List::new(Tag::String, vec!["a".into()]).unwrap(),
    });

    assert_eq!(
        to_json(&value),
        json!({
            "end": null,
            "short": 300,
            "long": i64::MAX,
            "float": 0.5,
            "nan": null,
            "bytes": [1, -1],
            "longs": [1, 2],
            "list": ["a"],
        })
    );
}

#[test]
fn round_trip_value_preserving_subset() {
    let value = Value::from(compound! {
        "name" => "chest",
        "slots" => vec![1_i8, 2, 3],
        "ids" => vec![70000, -5, 12],
        "tags" => List::new(Tag::String, vec!["a".into(), "b".into()]).unwrap(),
        "nested" => compound! {
            "deeper" => compound! { "s" => "x" },
            "empty" => List::default(),
        },
    });

    let text = to_json_string(&value, false).unwrap();

    assert_eq!(from_json_str(&text).unwrap(), value);
}

#[test]
fn numbers_round_trip_by_value() {
    let value = Value::from(compound! {
        "short" => 5_i16,
        "int" => 40000_i32,
        "float" => 1.1_f32,
        "double" => 0.1_f64,
    });

    let back = from_json(&to_json(&value));

    let c = back.as_compound().unwrap();
    assert_eq!(c["short"], Value::Byte(5));
    assert_eq!(c["int"], Value::Int(40000));
    assert_eq!(c["float"], Value::Float(1.1));
    assert_eq!(c["double"], Value::Double(0.1));
}

#[test]
fn malformed_json_is_reported() {
    let err = from_json_str("{\"a\": [1, 2,}").unwrap_err();

    let Error::Json(e) = err else {
        panic!("expected JSON error");
    };
    assert_eq!(e.line(), 1);
    assert!(e.column() > 0);
}

#[test]
fn pretty_output_parses_back() {
    let value = Value::from(compound! { "a" => compound! { "b" => 1_i8 } });

    let text = to_json_string(&value, true).unwrap();

    assert!(text.contains('\n'));
    assert_eq!(from_json_str(&text).unwrap(), value);
}
