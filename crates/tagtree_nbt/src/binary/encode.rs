use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use super::MAX_DEPTH;
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::{Compound, List, Value};

/// Encodes `value` as a root tag named `root_name` to the provided writer.
///
/// Typically the empty string `""` is used as the root name. A root
/// [`Value::End`] is written as a single zero byte with no name.
///
/// Fails without a complete document being written if the value cannot be
/// represented: mixed lists, [`Value::End`] stored inside a compound or list,
/// strings longer than 65535 bytes, arrays longer than `i32::MAX`, or nesting
/// deeper than 512 levels.
pub fn to_binary<W: Write>(value: &Value, writer: W, root_name: &str) -> Result<()> {
    let mut state = EncodeState { writer, depth: 0 };

    state.write_tag(value.tag())?;

    if value.is_end() {
        return Ok(());
    }

    state.write_string(root_name)?;
    state.write_value(value)
}

/// Returns the number of bytes that will be written when [`to_binary`] is
/// called with this value and root name.
///
/// If `to_binary` results in `Ok`, the exact number of bytes reported by this
/// function will have been written. If the result is `Err`, then the reported
/// count will be greater than or equal to the number of bytes that have
/// actually been written.
pub fn written_size(value: &Value, root_name: &str) -> usize {
    fn value_size(val: &Value) -> usize {
        match val {
            Value::End => 0,
            Value::Byte(_) => 1,
            Value::Short(_) => 2,
            Value::Int(_) => 4,
            Value::Long(_) => 8,
            Value::Float(_) => 4,
            Value::Double(_) => 8,
            Value::ByteArray(v) => 4 + v.len(),
            Value::String(v) => string_size(v),
            Value::List(v) => 1 + 4 + v.iter().map(value_size).sum::<usize>(),
            Value::Compound(v) => compound_size(v),
            Value::IntArray(v) => 4 + v.len() * 4,
            Value::LongArray(v) => 4 + v.len() * 8,
        }
    }

    fn string_size(s: &str) -> usize {
        2 + s.len()
    }

    fn compound_size(c: &Compound) -> usize {
        c.iter()
            .map(|(k, v)| 1 + string_size(k) + value_size(v))
            .sum::<usize>()
            + 1
    }

    if value.is_end() {
        1
    } else {
        1 + string_size(root_name) + value_size(value)
    }
}

struct EncodeState<W> {
    writer: W,
    depth: usize,
}

impl<W: Write> EncodeState<W> {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        Ok(self.writer.write_u8(tag.id())?)
    }

    fn write_value(&mut self, v: &Value) -> Result<()> {
        match v {
            Value::End => Ok(()),
            Value::Byte(v) => Ok(self.writer.write_i8(*v)?),
            Value::Short(v) => Ok(self.writer.write_i16::<BigEndian>(*v)?),
            Value::Int(v) => self.write_int(*v),
            Value::Long(v) => Ok(self.writer.write_i64::<BigEndian>(*v)?),
            Value::Float(v) => Ok(self.writer.write_f32::<BigEndian>(*v)?),
            Value::Double(v) => Ok(self.writer.write_f64::<BigEndian>(*v)?),
            Value::ByteArray(v) => self.write_byte_array(v),
            Value::String(v) => self.write_string(v),
            Value::List(v) => self.check_depth(|st| st.write_list(v)),
            Value::Compound(v) => self.check_depth(|st| st.write_compound(v)),
            Value::IntArray(v) => self.write_int_array(v),
            Value::LongArray(v) => self.write_long_array(v),
        }
    }

    fn write_int(&mut self, int: i32) -> Result<()> {
        Ok(self.writer.write_i32::<BigEndian>(int)?)
    }

    fn write_len(&mut self, len: usize, what: &str) -> Result<()> {
        match i32::try_from(len) {
            Ok(len) => self.write_int(len),
            Err(_) => Err(Error::format(format!(
                "{what} of length {len} exceeds maximum of i32::MAX"
            ))),
        }
    }

    fn write_byte_array(&mut self, bytes: &[i8]) -> Result<()> {
        self.write_len(bytes.len(), "byte array")?;

        let raw: Vec<u8> = bytes.iter().map(|&b| b as u8).collect();
        Ok(self.writer.write_all(&raw)?)
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let Ok(len) = u16::try_from(s.len()) else {
            return Err(Error::format(format!(
                "string of length {} exceeds maximum of u16::MAX",
                s.len()
            )));
        };

        self.writer.write_u16::<BigEndian>(len)?;
        Ok(self.writer.write_all(s.as_bytes())?)
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        if !list.is_homogeneous() {
            return Err(Error::format(
                "non-empty list with end element type cannot be encoded",
            ));
        }

        let elem_type = list.element_type();

        self.write_tag(elem_type)?;
        self.write_len(list.len(), "list")?;

        for (i, elem) in list.iter().enumerate() {
            debug_assert_eq!(elem.tag(), elem_type);

            self.write_value(elem).map_err(|e| e.in_index(i))?;
        }

        Ok(())
    }

    fn write_compound(&mut self, c: &Compound) -> Result<()> {
        for (k, v) in c {
            if v.is_end() {
                return Err(Error::format("compound entry cannot hold an end tag").in_key(k));
            }

            self.write_tag(v.tag())?;
            self.write_string(k).map_err(|e| e.in_key(k))?;
            self.write_value(v).map_err(|e| e.in_key(k))?;
        }

        self.write_tag(Tag::End)
    }

    fn write_int_array(&mut self, ia: &[i32]) -> Result<()> {
        self.write_len(ia.len(), "int array")?;

        for i in ia {
            self.write_int(*i)?;
        }

        Ok(())
    }

    fn write_long_array(&mut self, la: &[i64]) -> Result<()> {
        self.write_len(la.len(), "long array")?;

        for l in la {
            self.writer.write_i64::<BigEndian>(*l)?;
        }

        Ok(())
    }

    fn check_depth<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(Error::format(format!(
                "value nesting exceeds maximum depth of {MAX_DEPTH}"
            )));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }
}
