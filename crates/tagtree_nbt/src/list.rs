use std::ops::Index;
use std::slice;

use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::Value;

/// An ordered sequence of values sharing one declared element type.
///
/// An empty list may declare [`Tag::End`] as a placeholder element type. A
/// list that declares `End` while holding elements is *mixed*: its elements
/// may have differing types. Mixed lists only arise from
/// [`List::mixed`]/[`List::from_values`] (the JSON bridge produces them for
/// heterogeneous arrays) and cannot be written in the binary format.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct List {
    element: Tag,
    items: Vec<Value>,
}

impl List {
    /// Creates a list with the given element type.
    ///
    /// Fails if any item's type differs from `element`, or if `element` is
    /// `End` and `items` is not empty.
    pub fn new(element: Tag, items: Vec<Value>) -> Result<Self> {
        if element == Tag::End && !items.is_empty() {
            return Err(Error::construction(
                "list with end element type must be empty",
            ));
        }

        if let Some((i, v)) = items.iter().enumerate().find(|(_, v)| v.tag() != element) {
            return Err(Error::construction(format!(
                "{element} list cannot hold {} element at index {i}",
                v.tag()
            )));
        }

        Ok(Self { element, items })
    }

    /// Creates an empty list whose element type is fixed up front.
    pub fn empty(element: Tag) -> Self {
        Self {
            element,
            items: vec![],
        }
    }

    /// Creates a mixed list. The declared element type is `End` regardless of
    /// the items.
    pub fn mixed(items: Vec<Value>) -> Self {
        Self {
            element: Tag::End,
            items,
        }
    }

    /// Creates a list whose element type is inferred from `items`: the common
    /// type if every item agrees, `End` (mixed) otherwise.
    pub fn from_values(items: Vec<Value>) -> Self {
        let element = match items.split_first() {
            Some((first, rest)) if rest.iter().all(|v| v.tag() == first.tag()) => first.tag(),
            _ => Tag::End,
        };

        Self { element, items }
    }

    /// Bypasses validation. Used by the decoder, which only ever produces items
    /// of the declared type.
    #[cfg_attr(not(feature = "binary"), allow(dead_code))]
    pub(crate) fn from_parts(element: Tag, items: Vec<Value>) -> Self {
        Self { element, items }
    }

    /// The declared element type.
    pub fn element_type(&self) -> Tag {
        self.element
    }

    /// Returns `true` unless this is a non-empty mixed list.
    pub fn is_homogeneous(&self) -> bool {
        self.element != Tag::End || self.items.is_empty()
    }

    /// Appends a value.
    ///
    /// An empty list declaring `End` adopts the type of the first pushed
    /// value. Otherwise the value must match the declared element type, unless
    /// the list is mixed.
    pub fn push<V: Into<Value>>(&mut self, value: V) -> Result<()> {
        let value = value.into();

        if self.items.is_empty() && self.element == Tag::End {
            self.element = value.tag();
        } else if self.element != Tag::End && value.tag() != self.element {
            return Err(Error::construction(format!(
                "cannot push {} element onto {} list",
                value.tag(),
                self.element
            )));
        }

        self.items.push(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl Index<usize> for List {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Collects into a list with an inferred element type, like
/// [`List::from_values`].
impl FromIterator<Value> for List {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_rejects_mismatched_elements() {
        let err = List::new(Tag::Int, vec![Value::Int(1), Value::Byte(2)]).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));

        let err = List::new(Tag::End, vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn empty_end_list_is_homogeneous() {
        let l = List::default();

        assert_eq!(l.element_type(), Tag::End);
        assert!(l.is_homogeneous());
        assert!(l.is_empty());
    }

    #[test]
    fn push_adopts_first_type() {
        let mut l = List::default();
        l.push("a").unwrap();
        l.push("b").unwrap();

        assert_eq!(l.element_type(), Tag::String);
        assert!(l.push(5_i32).is_err());
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn from_values_infers_element_type() {
        let l = List::from_values(vec![Value::Short(1), Value::Short(2)]);
        assert_eq!(l.element_type(), Tag::Short);

        let l = List::from_values(vec![Value::Short(1), Value::from("a")]);
        assert_eq!(l.element_type(), Tag::End);
        assert!(!l.is_homogeneous());
        assert_eq!(l[1], Value::from("a"));
    }
}
