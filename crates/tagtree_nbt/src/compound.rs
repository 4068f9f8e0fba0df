use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::ops::Index;

use crate::Value;

/// A map type with [`String`] keys and [`Value`] values.
///
/// Shared references to a compound cannot change it. Callers that want to
/// edit a copy of the entries use [`Compound::to_map`], which returns an owned
/// snapshot, or [`Compound::with`], which returns a new compound.
#[derive(Clone, PartialEq, Default)]
pub struct Compound {
    map: Map,
}

/// The map backing a [`Compound`].
#[cfg(not(feature = "preserve_order"))]
pub type Map = std::collections::BTreeMap<String, Value>;

/// The map backing a [`Compound`].
#[cfg(feature = "preserve_order")]
pub type Map = indexmap::IndexMap<String, Value>;

impl fmt::Debug for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.map.fmt(f)
    }
}

impl Compound {
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            #[cfg(not(feature = "preserve_order"))]
            map: {
                // BTreeMap does not have with_capacity.
                let _ = cap;
                Map::new()
            },
            #[cfg(feature = "preserve_order")]
            map: Map::with_capacity(cap),
        }
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&Value>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Ord + Hash,
    {
        self.map.get(k)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Ord + Hash,
    {
        self.map.contains_key(k)
    }

    /// Inserts an entry, returning the value previously stored under `k`.
    pub fn insert<K, V>(&mut self, k: K, v: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.map.insert(k.into(), v.into())
    }

    /// Returns this compound with `k` set to `v`.
    #[must_use]
    pub fn with<K, V>(mut self, k: K, v: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(k, v);
        self
    }

    #[cfg(not(feature = "preserve_order"))]
    pub fn remove<Q>(&mut self, k: &Q) -> Option<Value>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Ord + Hash,
    {
        self.map.remove(k)
    }

    #[cfg(feature = "preserve_order")]
    pub fn remove<Q>(&mut self, k: &Q) -> Option<Value>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Ord + Hash,
    {
        self.map.shift_remove(k)
    }

    /// Returns an owned copy of the entries. Changes made to the copy are not
    /// reflected in `self`.
    pub fn to_map(&self) -> Map {
        self.map.clone()
    }

    pub fn into_map(self) -> Map {
        self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            iter: self.map.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys {
            iter: self.map.keys(),
        }
    }

    pub fn values(&self) -> Values<'_> {
        Values {
            iter: self.map.values(),
        }
    }
}

impl From<Map> for Compound {
    fn from(map: Map) -> Self {
        Self { map }
    }
}

impl Extend<(String, Value)> for Compound {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (String, Value)>,
    {
        self.map.extend(iter)
    }
}

impl FromIterator<(String, Value)> for Compound {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Value)>,
    {
        Self {
            map: Map::from_iter(iter),
        }
    }
}

impl<Q> Index<&'_ Q> for Compound
where
    String: Borrow<Q>,
    Q: ?Sized + Eq + Ord + Hash,
{
    type Output = Value;

    fn index(&self, index: &Q) -> &Self::Output {
        self.map.index(index)
    }
}

macro_rules! impl_iterator_traits {
    (($name:ident $($generics:tt)*) => $item:ty) => {
        impl $($generics)* Iterator for $name $($generics)* {
            type Item = $item;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.iter.next()
            }
            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.iter.size_hint()
            }
        }

        impl $($generics)* DoubleEndedIterator for $name $($generics)* {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.iter.next_back()
            }
        }

        impl $($generics)* ExactSizeIterator for $name $($generics)* {
            #[inline]
            fn len(&self) -> usize {
                self.iter.len()
            }
        }

        impl $($generics)* FusedIterator for $name $($generics)* {}
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone)]
pub struct Iter<'a> {
    #[cfg(not(feature = "preserve_order"))]
    iter: std::collections::btree_map::Iter<'a, String, Value>,
    #[cfg(feature = "preserve_order")]
    iter: indexmap::map::Iter<'a, String, Value>,
}

impl_iterator_traits!((Iter<'a>) => (&'a String, &'a Value));

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.map.into_iter(),
        }
    }
}

pub struct IntoIter {
    #[cfg(not(feature = "preserve_order"))]
    iter: std::collections::btree_map::IntoIter<String, Value>,
    #[cfg(feature = "preserve_order")]
    iter: indexmap::map::IntoIter<String, Value>,
}

impl_iterator_traits!((IntoIter) => (String, Value));

#[derive(Clone)]
pub struct Keys<'a> {
    #[cfg(not(feature = "preserve_order"))]
    iter: std::collections::btree_map::Keys<'a, String, Value>,
    #[cfg(feature = "preserve_order")]
    iter: indexmap::map::Keys<'a, String, Value>,
}

impl_iterator_traits!((Keys<'a>) => &'a String);

#[derive(Clone)]
pub struct Values<'a> {
    #[cfg(not(feature = "preserve_order"))]
    iter: std::collections::btree_map::Values<'a, String, Value>,
    #[cfg(feature = "preserve_order")]
    iter: indexmap::map::Values<'a, String, Value>,
}

impl_iterator_traits!((Values<'a>) => &'a Value);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::compound;

    #[test]
    fn snapshot_is_isolated() {
        let c = compound! {
            "a" => 1,
            "b" => vec![1_i8, 2, 3],
        };

        let mut snapshot = c.to_map();
        snapshot.insert("c".to_owned(), Value::End);
        if let Some(Value::ByteArray(bytes)) = snapshot.get_mut("b") {
            bytes.push(4);
        }

        assert_eq!(c.len(), 2);
        assert_eq!(c["b"], Value::ByteArray(vec![1, 2, 3]));
        assert!(!c.contains_key("c"));
    }

    #[test]
    fn with_returns_updated_copy() {
        let original = compound! { "a" => 1 };
        let updated = original.clone().with("a", 2).with("b", "x");

        assert_eq!(original["a"], Value::Int(1));
        assert_eq!(updated["a"], Value::Int(2));
        assert_eq!(updated.get("b"), Some(&Value::from("x")));
    }

    #[test]
    fn last_insert_wins() {
        let mut c = Compound::new();
        assert_eq!(c.insert("k", 1_i8), None);
        assert_eq!(c.insert("k", 2_i8), Some(Value::Byte(1)));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn with_capacity_starts_empty() {
        let mut c = Compound::with_capacity(8);
        assert!(c.is_empty());

        c.insert("a", 1_i8);
        assert_eq!(c.len(), 1);
    }

    #[cfg(feature = "preserve_order")]
    #[test]
    fn preserves_order() {
        let letters = ["g", "b", "d", "e", "h", "z", "m", "a", "q"];

        let mut c = Compound::new();
        for l in letters {
            c.insert(l, 0_i8);
        }

        for (k, l) in c.keys().zip(letters) {
            assert_eq!(k, l);
        }
    }
}
