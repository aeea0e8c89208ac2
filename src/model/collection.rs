//! Homogeneous ordered and keyed collections of attributes.
//!
//! Both collection types record their element type once and check every
//! element against it when built. Neither has a mutating API; to change a
//! collection, build a new one.

use std::collections::BTreeMap;

use super::extensions::{check_key, extensible, Extensions};
use super::registry::{AttributeKind, KeyKind, KeyTag, TypeTag};
use super::value::{AttributeType, AttributeValue};
use crate::error::ModelError;

/// An ordered list of attributes that all share one type.
#[derive(Clone, Debug, PartialEq)]
pub struct ListAttribute {
    item_type: TypeTag,
    items: Vec<AttributeValue>,
    extensions: Extensions,
}

extensible!(ListAttribute { "itemType", "items" });

impl ListAttribute {
    /// Starts a list whose items are of `kind`, tagged canonically.
    pub fn builder(kind: AttributeKind) -> ListBuilder {
        Self::builder_tagged(TypeTag::of(kind))
    }

    /// Starts a list under a specific tag spelling, e.g. `sentimentResults`.
    pub fn builder_tagged(item_type: TypeTag) -> ListBuilder {
        ListBuilder {
            item_type,
            items: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    /// Collects typed values into a list. Homogeneous by construction.
    pub fn of<T: AttributeType>(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            item_type: TypeTag::of(T::KIND),
            items: items.into_iter().map(T::into_value).collect(),
            extensions: Extensions::new(),
        }
    }

    /// Assembles a decoded list; the caller guarantees homogeneity.
    pub(crate) fn from_parts(
        item_type: TypeTag,
        items: Vec<AttributeValue>,
        extensions: Extensions,
    ) -> Self {
        Self {
            item_type,
            items,
            extensions,
        }
    }

    pub fn item_type(&self) -> &TypeTag {
        &self.item_type
    }

    pub fn item_kind(&self) -> AttributeKind {
        self.item_type.kind()
    }

    pub fn items(&self) -> &[AttributeValue] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.items.get(index)
    }

    /// Iterates over the items as `T`. Empty if the list holds another type.
    pub fn typed<'a, T: AttributeType + 'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter_map(T::from_value)
    }
}

/// Incrementally assembles a [`ListAttribute`].
#[derive(Clone, Debug)]
pub struct ListBuilder {
    item_type: TypeTag,
    items: Vec<AttributeValue>,
    extensions: Extensions,
}

impl ListBuilder {
    pub fn item(mut self, item: impl Into<AttributeValue>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items<I, V>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<Self, ModelError> {
        let key = key.into();
        check_key(&key, ListAttribute::FIELDS)?;
        self.extensions.insert(key, value.into());
        Ok(self)
    }

    /// Finishes the list, failing on the first item of the wrong type.
    pub fn build(self) -> Result<ListAttribute, ModelError> {
        let expected = self.item_type.kind();
        if let Some((index, item)) = self
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| item.kind() != expected)
        {
            return Err(ModelError::HeterogeneousItem {
                expected: self.item_type.as_str().to_string(),
                found: item.wire_tag().to_string(),
                index,
            });
        }
        Ok(ListAttribute {
            item_type: self.item_type,
            items: self.items,
            extensions: self.extensions,
        })
    }
}

/// A string-keyed map of attributes that all share one type.
///
/// The key type is recorded for the wire, but keys are always held as
/// strings; the key type only says how to interpret them.
#[derive(Clone, Debug, PartialEq)]
pub struct MapAttribute {
    key_type: KeyTag,
    value_type: TypeTag,
    items: BTreeMap<String, AttributeValue>,
    extensions: Extensions,
}

extensible!(MapAttribute { "keyType", "valueType", "items" });

impl MapAttribute {
    pub fn builder(key_kind: KeyKind, value_kind: AttributeKind) -> MapBuilder {
        Self::builder_tagged(KeyTag::of(key_kind), TypeTag::of(value_kind))
    }

    pub fn builder_tagged(key_type: KeyTag, value_type: TypeTag) -> MapBuilder {
        MapBuilder {
            key_type,
            value_type,
            items: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Collects typed entries into a map. Homogeneous by construction.
    pub fn of<K, T>(key_kind: KeyKind, items: impl IntoIterator<Item = (K, T)>) -> Self
    where
        K: Into<String>,
        T: AttributeType,
    {
        Self {
            key_type: KeyTag::of(key_kind),
            value_type: TypeTag::of(T::KIND),
            items: items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_value()))
                .collect(),
            extensions: Extensions::new(),
        }
    }

    pub(crate) fn from_parts(
        key_type: KeyTag,
        value_type: TypeTag,
        items: BTreeMap<String, AttributeValue>,
        extensions: Extensions,
    ) -> Self {
        Self {
            key_type,
            value_type,
            items,
            extensions,
        }
    }

    pub fn key_type(&self) -> &KeyTag {
        &self.key_type
    }

    pub fn value_type(&self) -> &TypeTag {
        &self.value_type
    }

    pub fn items(&self) -> &BTreeMap<String, AttributeValue> {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.items.get(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the entries whose value is a `T`.
    pub fn typed<'a, T: AttributeType + 'a>(&'a self) -> impl Iterator<Item = (&'a str, &'a T)> + 'a {
        self.items
            .iter()
            .filter_map(|(k, v)| T::from_value(v).map(|t| (k.as_str(), t)))
    }
}

/// Incrementally assembles a [`MapAttribute`].
#[derive(Clone, Debug)]
pub struct MapBuilder {
    key_type: KeyTag,
    value_type: TypeTag,
    items: BTreeMap<String, AttributeValue>,
    extensions: Extensions,
}

impl MapBuilder {
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    pub fn extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<Self, ModelError> {
        let key = key.into();
        check_key(&key, MapAttribute::FIELDS)?;
        self.extensions.insert(key, value.into());
        Ok(self)
    }

    pub fn build(self) -> Result<MapAttribute, ModelError> {
        let expected = self.value_type.kind();
        for (index, value) in self.items.values().enumerate() {
            if value.kind() != expected {
                return Err(ModelError::HeterogeneousItem {
                    expected: self.value_type.as_str().to_string(),
                    found: value.wire_tag().to_string(),
                    index,
                });
            }
        }
        Ok(MapAttribute {
            key_type: self.key_type,
            value_type: self.value_type,
            items: self.items,
            extensions: self.extensions,
        })
    }
}
