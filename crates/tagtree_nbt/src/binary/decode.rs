use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};

use super::MAX_DEPTH;
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::{Compound, List, Value};

/// Upper bound on capacity reserved from a length prefix before the elements
/// have actually been read.
const PREALLOC_LIMIT: usize = 4096;

/// Decodes one root tag from the provided reader, returning the value and the
/// root name.
///
/// Exactly the bytes of the document are consumed; anything after the root
/// tag is left in the reader. A root [`Value::End`] has no name and decodes to
/// `(Value::End, "")`.
///
/// Unknown type ids, negative lengths and invalid UTF-8 produce
/// [`Error::Format`]. Running out of input produces [`Error::Io`] with
/// [`io::ErrorKind::UnexpectedEof`]. No partial value is returned on failure.
pub fn from_binary<R: Read>(reader: R) -> Result<(Value, String)> {
    let mut state = DecodeState {
        reader: CountingReader {
            inner: reader,
            count: 0,
        },
        depth: 0,
    };

    let tag = state.read_tag()?;

    if tag == Tag::End {
        return Ok((Value::End, String::new()));
    }

    let root_name = state.read_string()?;
    let value = state.read_value(tag)?;

    Ok((value, root_name))
}

struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

struct DecodeState<R> {
    reader: CountingReader<R>,
    depth: usize,
}

impl<R: Read> DecodeState<R> {
    fn error(&self, message: String) -> Error {
        Error::format(message).at_offset(self.reader.count)
    }

    fn read_tag(&mut self) -> Result<Tag> {
        let at = self.reader.count;
        let id = self.reader.read_u8()?;

        Tag::from_u8(id).map_err(|e| e.at_offset(at))
    }

    fn read_value(&mut self, tag: Tag) -> Result<Value> {
        Ok(match tag {
            Tag::End => Value::End,
            Tag::Byte => Value::Byte(self.reader.read_i8()?),
            Tag::Short => Value::Short(self.reader.read_i16::<BigEndian>()?),
            Tag::Int => Value::Int(self.reader.read_i32::<BigEndian>()?),
            Tag::Long => Value::Long(self.reader.read_i64::<BigEndian>()?),
            Tag::Float => Value::Float(self.reader.read_f32::<BigEndian>()?),
            Tag::Double => Value::Double(self.reader.read_f64::<BigEndian>()?),
            Tag::ByteArray => {
                let len = self.read_len(tag)?;
                let bytes = self.read_bytes(len)?;

                Value::ByteArray(bytes.into_iter().map(|b| b as i8).collect())
            }
            Tag::String => Value::String(self.read_string()?),
            Tag::List => Value::List(self.check_depth(Self::read_list)?),
            Tag::Compound => Value::Compound(self.check_depth(Self::read_compound)?),
            Tag::IntArray => {
                let len = self.read_len(tag)?;
                let mut ints = Vec::with_capacity(len.min(PREALLOC_LIMIT));

                for _ in 0..len {
                    ints.push(self.reader.read_i32::<BigEndian>()?);
                }

                Value::IntArray(ints)
            }
            Tag::LongArray => {
                let len = self.read_len(tag)?;
                let mut longs = Vec::with_capacity(len.min(PREALLOC_LIMIT));

                for _ in 0..len {
                    longs.push(self.reader.read_i64::<BigEndian>()?);
                }

                Value::LongArray(longs)
            }
        })
    }

    /// Reads an `i32` length prefix for a value of type `tag`.
    fn read_len(&mut self, tag: Tag) -> Result<usize> {
        let len = self.reader.read_i32::<BigEndian>()?;

        usize::try_from(len).map_err(|_| self.error(format!("{tag} with negative length {len}")))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));

        (&mut self.reader).take(len as u64).read_to_end(&mut buf)?;

        if buf.len() < len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        Ok(buf)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.reader.read_u16::<BigEndian>()?;
        let bytes = self.read_bytes(len.into())?;

        String::from_utf8(bytes).map_err(|e| self.error(format!("invalid UTF-8 in string: {e}")))
    }

    fn read_list(&mut self) -> Result<List> {
        let elem_type = self.read_tag()?;
        let len = self.read_len(Tag::List)?;

        if elem_type == Tag::End && len != 0 {
            return Err(self.error(format!(
                "list with end element type must have length zero, got {len}"
            )));
        }

        let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));

        for i in 0..len {
            items.push(self.read_value(elem_type).map_err(|e| e.in_index(i))?);
        }

        Ok(List::from_parts(elem_type, items))
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();

        loop {
            let tag = self.read_tag()?;

            if tag == Tag::End {
                return Ok(compound);
            }

            let name = self.read_string()?;
            let value = self.read_value(tag).map_err(|e| e.in_key(&name))?;

            compound.insert(name, value);
        }
    }

    fn check_depth<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!(
                "value nesting exceeds maximum depth of {MAX_DEPTH}"
            )));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }
}
