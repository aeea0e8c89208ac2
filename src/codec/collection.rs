//! Wire format for homogeneous collections.
//!
//! A list is written as
//!
//! ```json
//! {"itemType": "sentence", "items": [{...}, {...}], "ek": "ev"}
//! ```
//!
//! and a map as
//!
//! ```json
//! {"keyType": "languageCode", "valueType": "translatedData", "items": {"eng": {...}}}
//! ```
//!
//! The element type is written once; elements carry no tags of their own.
//! Members besides the markers and `items` are the collection's extended
//! properties. On decode the markers may appear anywhere in the object.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::element::ElementSeed;
use super::replay::{read_until, tag_string, Replay};
use crate::model::{AttributeValue, Extensions, KeyTag, ListAttribute, MapAttribute, TypeTag};

const ITEM_TYPE: &str = "itemType";
const KEY_TYPE: &str = "keyType";
const VALUE_TYPE: &str = "valueType";
const ITEMS: &str = "items";

impl Serialize for ListAttribute {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ITEM_TYPE, self.item_type().as_str())?;
        map.serialize_entry(ITEMS, self.items())?;
        for (key, value) in self.extensions() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for MapAttribute {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(KEY_TYPE, self.key_type().as_str())?;
        map.serialize_entry(VALUE_TYPE, self.value_type().as_str())?;
        map.serialize_entry(ITEMS, self.items())?;
        for (key, value) in self.extensions() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ListAttribute {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ListVisitor)
    }
}

impl<'de> Deserialize<'de> for MapAttribute {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor)
    }
}

struct ListVisitor;

impl<'de> Visitor<'de> for ListVisitor {
    type Value = ListAttribute;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list attribute object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let (buffered, marker) = read_until(&mut map, |key| key == ITEM_TYPE)?;
        let Some((_, tag)) = marker else {
            return Err(de::Error::custom("no itemType provided in a list"));
        };
        let item_type = TypeTag::parse(&tag_string::<A::Error>(tag, ITEM_TYPE)?);

        let mut rest = Replay::new(buffered, map);
        let mut items = None;
        let mut extensions = Extensions::new();
        while let Some(key) = rest.next_key::<String>()? {
            match key.as_str() {
                ITEM_TYPE => return Err(de::Error::duplicate_field(ITEM_TYPE)),
                ITEMS => {
                    if items.is_some() {
                        return Err(de::Error::duplicate_field(ITEMS));
                    }
                    items = Some(rest.next_value_seed(ListItemsSeed { tag: &item_type })?);
                }
                _ => {
                    let value: Value = rest.next_value()?;
                    extensions.insert(key, value);
                }
            }
        }

        Ok(ListAttribute::from_parts(
            item_type,
            items.unwrap_or_default(),
            extensions,
        ))
    }
}

struct ListItemsSeed<'a> {
    tag: &'a TypeTag,
}

impl<'de> DeserializeSeed<'de> for ListItemsSeed<'_> {
    type Value = Vec<AttributeValue>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ListItemsSeed<'_> {
    type Value = Vec<AttributeValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an array of '{}' items", self.tag)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element_seed(ElementSeed { tag: self.tag })? {
            items.push(item);
        }
        Ok(items)
    }
}

struct MapVisitor;

impl<'de> Visitor<'de> for MapVisitor {
    type Value = MapAttribute;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map attribute object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut buffered = Vec::new();
        let mut key_type = None;
        let mut value_type = None;
        while key_type.is_none() || value_type.is_none() {
            let (mut ahead, marker) =
                read_until(&mut map, |key| key == KEY_TYPE || key == VALUE_TYPE)?;
            buffered.append(&mut ahead);
            match marker {
                Some((key, tag)) if key == KEY_TYPE => {
                    key_type = Some(KeyTag::parse(&tag_string::<A::Error>(tag, KEY_TYPE)?));
                }
                Some((_, tag)) => {
                    value_type = Some(TypeTag::parse(&tag_string::<A::Error>(tag, VALUE_TYPE)?));
                }
                None => {
                    let missing = if key_type.is_none() { KEY_TYPE } else { VALUE_TYPE };
                    return Err(de::Error::custom(format!(
                        "no {missing} provided in a map"
                    )));
                }
            }
        }
        let (Some(key_type), Some(value_type)) = (key_type, value_type) else {
            return Err(de::Error::custom("no keyType/valueType provided in a map"));
        };

        let mut rest = Replay::new(buffered, map);
        let mut items = None;
        let mut extensions = Extensions::new();
        while let Some(key) = rest.next_key::<String>()? {
            match key.as_str() {
                KEY_TYPE | VALUE_TYPE => {
                    return Err(de::Error::custom(format!("duplicate field `{key}`")))
                }
                ITEMS => {
                    if items.is_some() {
                        return Err(de::Error::duplicate_field(ITEMS));
                    }
                    items = Some(rest.next_value_seed(MapItemsSeed { tag: &value_type })?);
                }
                _ => {
                    let value: Value = rest.next_value()?;
                    extensions.insert(key, value);
                }
            }
        }

        Ok(MapAttribute::from_parts(
            key_type,
            value_type,
            items.unwrap_or_default(),
            extensions,
        ))
    }
}

struct MapItemsSeed<'a> {
    tag: &'a TypeTag,
}

impl<'de> DeserializeSeed<'de> for MapItemsSeed<'_> {
    type Value = BTreeMap<String, AttributeValue>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for MapItemsSeed<'_> {
    type Value = BTreeMap<String, AttributeValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object of '{}' items", self.tag)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut items = BTreeMap::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(ElementSeed { tag: self.tag })?;
            items.insert(key, value);
        }
        Ok(items)
    }
}
