//! Extended properties: the open key/value bag every attribute carries.
//!
//! Any member of an incoming JSON object that does not match a declared
//! field of the target type lands here unchanged (nested objects and arrays
//! stay structured), and every entry is written back out as a sibling of
//! the declared fields. This is what lets an older reader pass a newer
//! document through without losing data.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;

/// Member name used for the polymorphic type marker of document attributes.
pub const TYPE_MARKER: &str = "type";

/// A string-keyed bag of arbitrary JSON values.
///
/// Entry order carries no meaning; iteration is sorted by key so that
/// encoding is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<String, Value>);

impl Extensions {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a copy of this bag with `key` set to `value`.
    ///
    /// The receiver is left untouched; attribute values are immutable, so
    /// adding a property always produces a new bag.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut copy = self.clone();
        copy.0.insert(key.into(), value.into());
        copy
    }

    /// Returns the full mapping.
    pub fn all(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }
}

impl FromIterator<(String, Value)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Extensions {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rejects extension keys that would collide with a declared field or the
/// document-level type marker on encode.
pub(crate) fn check_key(key: &str, fields: &[&str]) -> Result<(), ModelError> {
    if key == TYPE_MARKER || fields.contains(&key) {
        return Err(ModelError::ReservedExtensionKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Generates the extended-property accessors shared by every attribute type.
///
/// The field list is the set of wire names the type declares; those names
/// can never be stored as extended properties of the same instance.
macro_rules! extensible {
    ($ty:ident { $($field:literal),* $(,)? }) => {
        impl $ty {
            /// Wire names of the declared fields.
            pub const FIELDS: &'static [&'static str] = &[$($field),*];

            /// Extended properties carried alongside the declared fields.
            pub fn extensions(&self) -> &$crate::model::Extensions {
                &self.extensions
            }

            /// Adds an extended property.
            ///
            /// Fails if `key` names a declared field or the type marker.
            pub fn with_extension(
                mut self,
                key: impl Into<String>,
                value: impl Into<serde_json::Value>,
            ) -> Result<Self, $crate::error::ModelError> {
                let key = key.into();
                $crate::model::extensions::check_key(&key, Self::FIELDS)?;
                self.extensions.insert(key, value.into());
                Ok(self)
            }

            /// Adds every entry of `extensions` under the rules of `with_extension`.
            pub fn with_extensions(
                mut self,
                extensions: $crate::model::Extensions,
            ) -> Result<Self, $crate::error::ModelError> {
                for (key, value) in extensions {
                    $crate::model::extensions::check_key(&key, Self::FIELDS)?;
                    self.extensions.insert(key, value);
                }
                Ok(self)
            }

            /// Copies entries from `extensions`, skipping keys the type declares.
            #[allow(dead_code)]
            pub(crate) fn absorb_extensions(mut self, extensions: &$crate::model::Extensions) -> Self {
                for (key, value) in extensions {
                    if $crate::model::extensions::check_key(key, Self::FIELDS).is_ok() {
                        self.extensions.insert(key.clone(), value.clone());
                    } else {
                        tracing::debug!(key = %key, "dropping extended property shadowed by a declared field");
                    }
                }
                self
            }
        }
    };
}

pub(crate) use extensible;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_leaves_the_original_untouched() {
        let empty = Extensions::new();
        let one = empty.with("ek", "ev");

        assert!(empty.is_empty());
        assert_eq!(one.get("ek"), Some(&json!("ev")));
    }

    #[test]
    fn nested_values_stay_structured() {
        let bag: Extensions =
            serde_json::from_value(json!({"nested": {"a": [1, 2, {"b": null}]}})).unwrap();
        assert_eq!(bag.get("nested"), Some(&json!({"a": [1, 2, {"b": null}]})));

        let back = serde_json::to_value(&bag).unwrap();
        assert_eq!(back, json!({"nested": {"a": [1, 2, {"b": null}]}}));
    }

    #[test]
    fn declared_fields_and_type_marker_are_reserved() {
        assert!(check_key("free", &["startOffset"]).is_ok());
        assert_eq!(
            check_key("startOffset", &["startOffset"]),
            Err(ModelError::ReservedExtensionKey {
                key: "startOffset".into()
            })
        );
        assert!(check_key(TYPE_MARKER, &[]).is_err());
    }
}
