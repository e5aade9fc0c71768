//! Request parameter maps.
//!
//! Every be2bill request, whether rendered as an HTML form or sent through
//! DirectLink, is represented as a [`Params`] map from vendor field names
//! (see [`crate::constants::param`]) to [`Value`]s. Keys are always visited in
//! ascending byte order, which is the canonical order used for hashing and
//! for wire encoding.
//!
//! # Examples
//!
//! ```
//! use be2bill::params::{Params, Value};
//!
//! let params = Params::new()
//!     .with("a", "echo")
//!     .with("p", Params::new().with("z", "subopt1").with("y", 2));
//!
//! let flat = params.flatten();
//! assert_eq!(flat["a"], "echo");
//! assert_eq!(flat["p[z]"], "subopt1");
//! assert_eq!(flat["p[y]"], "2");
//! ```

mod encode;

use std::{
    borrow::Cow,
    collections::{BTreeMap, btree_map},
};

use serde::{Deserialize, Serialize};

pub use encode::{FORM_CONTENT_TYPE, to_form_body};

/// A single parameter value.
///
/// JSON strings, integers and objects deserialize into [`Value::Text`],
/// [`Value::Integer`] and [`Value::Nested`] respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Text value, sent verbatim.
    Text(String),
    /// Integer value, rendered in base 10 without grouping.
    Integer(i64),
    /// Nested map, used for fragmented amounts and grouped attributes.
    Nested(Params),
}

impl Value {
    /// Renders a scalar value as it appears on the wire and in the hash.
    ///
    /// Returns `None` for nested maps, whose leaves are rendered individually.
    #[must_use]
    pub fn as_scalar(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Integer(number) => Some(Cow::Owned(number.to_string())),
            Self::Nested(_) => None,
        }
    }

    /// Returns the text content of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(_) | Self::Nested(_) => None,
        }
    }

    /// Returns the nested map of a [`Value::Nested`].
    #[must_use]
    pub const fn as_nested(&self) -> Option<&Params> {
        match self {
            Self::Nested(params) => Some(params),
            Self::Text(_) | Self::Integer(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Params> for Value {
    fn from(value: Params) -> Self {
        Self::Nested(value)
    }
}

/// Parameter map with canonical key ordering.
///
/// Insertion order is irrelevant: iteration, hashing and encoding always
/// follow ascending key order. Nesting deeper than one level is accepted and
/// keeps applying the bracket rule of [`Params::flatten`], but the be2bill API
/// itself only defines one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Creates an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a parameter and returns the map, for chained construction.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value stored under `key` if it is text.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    /// Removes a parameter.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns `true` if a parameter is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map holds no parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the parameters in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Flattens the map into wire-safe keys.
    ///
    /// Scalar entries keep their key; nested entries are expanded as
    /// `key[nested_key]`, recursively.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::params::Params;
    ///
    /// let params = Params::new().with("AMOUNTS", Params::new().with("2015-09-12", 3000));
    /// let flat = params.flatten();
    /// assert_eq!(flat["AMOUNTS[2015-09-12]"], "3000");
    /// ```
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for (key, value) in &self.0 {
            flatten_into(key.clone(), value, &mut flat);
        }
        flat
    }
}

fn flatten_into(name: String, value: &Value, flat: &mut BTreeMap<String, String>) {
    if let Value::Nested(nested) = value {
        for (key, inner) in nested.iter() {
            flatten_into(format!("{name}[{key}]"), inner, flat);
        }
    } else if let Some(scalar) = value.as_scalar() {
        flat.insert(name, scalar.into_owned());
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
