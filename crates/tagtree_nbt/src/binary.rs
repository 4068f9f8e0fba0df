//! Support for encoding and decoding values in the binary tag format.
//!
//! A document is a single named entry: the root's type id, its name (unless
//! the root is [`Value::End`]), and its payload. Compound entries use the same
//! framing, so there is only one codec for both.
//!
//! # Examples
//!
//! ```
//! use tagtree_nbt::{compound, to_binary, List, Tag, Value};
//!
//! let c = compound! {
//!     "byte" => 5_i8,
//!     "string" => "hello",
//!     "list_of_float" => List::new(Tag::Float, vec![
//!         std::f32::consts::PI.into(),
//!         std::f32::consts::E.into(),
//!     ]).unwrap(),
//! };
//!
//! let mut buf = vec![];
//!
//! to_binary(&Value::from(c), &mut buf, "").unwrap();
//! ```
//!
//! Decode a value from its binary form.
//!
//! ```
//! use tagtree_nbt::{compound, from_binary, Value};
//!
//! let some_bytes = [10, 0, 0, 3, 0, 3, 105, 110, 116, 0, 0, 222, 173, 0];
//!
//! let expected_value = compound! {
//!     "int" => 0xdead
//! };
//!
//! let (nbt, root_name) = from_binary(&mut some_bytes.as_slice()).unwrap();
//!
//! assert_eq!(nbt, Value::from(expected_value));
//! assert_eq!(root_name, "");
//! ```

mod decode;
mod encode;

pub use decode::*;
pub use encode::*;

/// Maximum nesting of lists and compounds, to prevent overflowing the call
/// stack.
const MAX_DEPTH: usize = 512;
