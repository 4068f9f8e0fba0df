use std::borrow::Cow;

use crate::tag::Tag;
use crate::{Compound, List};

/// Represents an arbitrary tag value.
///
/// Values own all of their data. Cloning a value is a deep copy: arrays,
/// lists and compounds are copied recursively and never share buffers with
/// the original.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum Value {
    /// Terminator of compounds on the wire. Carries no data.
    #[default]
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// Returns the type of this value.
    pub fn tag(&self) -> Tag {
        match self {
            Self::End => Tag::End,
            Self::Byte(_) => Tag::Byte,
            Self::Short(_) => Tag::Short,
            Self::Int(_) => Tag::Int,
            Self::Long(_) => Tag::Long,
            Self::Float(_) => Tag::Float,
            Self::Double(_) => Tag::Double,
            Self::ByteArray(_) => Tag::ByteArray,
            Self::String(_) => Tag::String,
            Self::List(_) => Tag::List,
            Self::Compound(_) => Tag::Compound,
            Self::IntArray(_) => Tag::IntArray,
            Self::LongArray(_) => Tag::LongArray,
        }
    }

    /// Returns the value of any integral scalar, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(v.into()),
            Self::Short(v) => Some(v.into()),
            Self::Int(v) => Some(v.into()),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value of any numeric scalar as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Byte(v) => Some(v.into()),
            Self::Short(v) => Some(v.into()),
            Self::Int(v) => Some(v.into()),
            Self::Long(v) => Some(v as f64),
            Self::Float(v) => Some(v.into()),
            Self::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Self::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    }
}

impl_from! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<i8> => ByteArray,
    String => String,
    List => List,
    Compound => Compound,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
}

/// Bools are usually represented as `0` or `1` bytes.
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Byte(b.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Self::String(v.into_owned())
    }
}

// Slices are copied so the new value owns a private buffer.

impl From<&[i8]> for Value {
    fn from(v: &[i8]) -> Self {
        Self::ByteArray(v.to_vec())
    }
}

impl From<&[i32]> for Value {
    fn from(v: &[i32]) -> Self {
        Self::IntArray(v.to_vec())
    }
}

impl From<&[i64]> for Value {
    fn from(v: &[i64]) -> Self {
        Self::LongArray(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::compound;

    #[test]
    fn tag_follows_variant() {
        assert_eq!(Value::End.tag(), Tag::End);
        assert_eq!(Value::from(true).tag(), Tag::Byte);
        assert_eq!(Value::from(1_i16).tag(), Tag::Short);
        assert_eq!(Value::from("x").tag(), Tag::String);
        assert_eq!(Value::from(vec![1_i64]).tag(), Tag::LongArray);
        assert_eq!(Value::from(List::default()).tag(), Tag::List);
        assert_eq!(Value::from(compound!()).tag(), Tag::Compound);
    }

    #[test]
    fn slices_are_copied() {
        let mut buf = vec![1, 2, 3];
        let v = Value::from(buf.as_slice());

        buf[0] = 100;

        assert_eq!(v, Value::IntArray(vec![1, 2, 3]));
    }

    #[test]
    fn clone_is_deep() {
        let original = Value::from(compound! {
            "arr" => vec![1_i8, 2],
            "inner" => compound! { "s" => "hi" },
        });

        let mut copy = original.clone();

        let Value::Compound(c) = &mut copy else {
            unreachable!()
        };
        c.insert("arr", vec![9_i8]);

        assert_eq!(
            original.as_compound().unwrap().get("arr"),
            Some(&Value::ByteArray(vec![1, 2]))
        );
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(Value::Short(-5).as_i64(), Some(-5));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::String("7".into()).as_i64(), None);
    }
}
