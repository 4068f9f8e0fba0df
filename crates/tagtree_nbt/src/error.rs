use std::{fmt, io};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, encoding or decoding tags.
#[derive(Debug, Error)]
pub enum Error {
    /// The binary data (or the tag being encoded) does not fit the wire
    /// format.
    #[error("invalid tag data: {0}")]
    Format(FormatError),
    /// The underlying byte stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The JSON text could not be parsed.
    #[cfg(feature = "json")]
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A tag constructor was given arguments it cannot accept.
    #[error("invalid tag construction: {0}")]
    Construction(Box<str>),
}

impl Error {
    pub(crate) fn format<M: Into<Box<str>>>(message: M) -> Self {
        Self::Format(FormatError {
            message: message.into(),
            offset: None,
            path: vec![],
        })
    }

    pub(crate) fn construction<M: Into<Box<str>>>(message: M) -> Self {
        Self::Construction(message.into())
    }

    /// Records that this error happened inside the compound entry `key`.
    #[cfg_attr(not(feature = "binary"), allow(dead_code))]
    pub(crate) fn in_key(self, key: &str) -> Self {
        self.with_segment(|| PathSegment::Key(key.into()))
    }

    /// Records that this error happened inside list element `index`.
    #[cfg_attr(not(feature = "binary"), allow(dead_code))]
    pub(crate) fn in_index(self, index: usize) -> Self {
        self.with_segment(|| PathSegment::Index(index))
    }

    #[cfg_attr(not(feature = "binary"), allow(dead_code))]
    pub(crate) fn at_offset(mut self, offset: u64) -> Self {
        if let Self::Format(e) = &mut self {
            e.offset.get_or_insert(offset);
        }
        self
    }

    fn with_segment<F: FnOnce() -> PathSegment>(mut self, segment: F) -> Self {
        if let Self::Format(e) = &mut self {
            e.path.push(segment());
        }
        self
    }
}

/// Details of an [`Error::Format`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FormatError {
    message: Box<str>,
    offset: Option<u64>,
    // Innermost segment first.
    path: Vec<PathSegment>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum PathSegment {
    Key(Box<str>),
    Index(usize),
}

impl FormatError {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset into the input where decoding failed. `None` for errors
    /// raised while encoding.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// The path of compound keys and list indices leading to the failure,
    /// such as `level.items[3].id`. Empty when the failure is at the root.
    pub fn path(&self) -> String {
        let mut out = String::new();

        for seg in self.path.iter().rev() {
            match seg {
                PathSegment::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }

        out
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        if !self.path.is_empty() {
            write!(f, " at `{}`", self.path())?;
        }

        if let Some(offset) = self.offset {
            write!(f, " (byte {offset})")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_outermost_first() {
        let err = Error::format("bad")
            .in_key("id")
            .in_index(3)
            .in_key("items")
            .in_key("level")
            .at_offset(42);

        let Error::Format(e) = err else {
            panic!("expected format error");
        };

        assert_eq!(e.path(), "level.items[3].id");
        assert_eq!(e.offset(), Some(42));
        assert_eq!(e.to_string(), "bad at `level.items[3].id` (byte 42)");
    }

    #[test]
    fn context_does_not_wrap_io_errors() {
        let err = Error::from(io::Error::from(io::ErrorKind::UnexpectedEof)).in_key("foo");

        assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }
}
