//! Wire format for whole documents.
//!
//! ```json
//! {
//!   "data": "Bill Clinton was president.",
//!   "attributes": {
//!     "sentence": {"type": "list", "itemType": "sentence", "items": [...]},
//!     "languageDetection": {"type": "languageDetection", "startOffset": 0, ...}
//!   },
//!   "documentMetadata": {"source": ["newswire"]},
//!   "version": "1.1.0"
//! }
//! ```
//!
//! Every attribute value carries its own `type` member, so one document can
//! mix scalar attributes and collections freely. The marker may sit
//! anywhere in the value object. A tag this reader does not know decodes
//! as an [`UnknownAttribute`] that remembers the tag and writes it back.
//!
//! Decoding checks `version` and migrates legacy entity data before the
//! document is returned.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::element::ElementSeed;
use super::replay::{read_until, tag_string, Replay};
use super::version::{VersionGate, CURRENT_VERSION};
use crate::error::AnnotextError;
use crate::migrate::{self, MigrationReport};
use crate::model::{AnnotatedText, AttributeKind, AttributeValue, TypeTag, TYPE_MARKER};

const DATA: &str = "data";
const ATTRIBUTES: &str = "attributes";
const DOCUMENT_METADATA: &str = "documentMetadata";
const VERSION: &str = "version";

impl Serialize for AnnotatedText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(DATA, self.data())?;
        map.serialize_entry(ATTRIBUTES, &TaggedAttributes(self.attributes()))?;
        if !self.document_metadata().is_empty() {
            map.serialize_entry(DOCUMENT_METADATA, self.document_metadata())?;
        }
        map.serialize_entry(VERSION, CURRENT_VERSION)?;
        map.end()
    }
}

struct TaggedAttributes<'a>(&'a BTreeMap<String, AttributeValue>);

impl Serialize for TaggedAttributes<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(name, value)| {
            (
                name,
                Tagged {
                    tag: value.wire_tag(),
                    value,
                },
            )
        }))
    }
}

/// An attribute value with its type marker written first.
#[derive(Serialize)]
struct Tagged<'a> {
    #[serde(rename = "type")]
    tag: &'a str,
    #[serde(flatten)]
    value: &'a AttributeValue,
}

/// A document as read, before the version check and migration.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDocument {
    data: String,
    #[serde(default, deserialize_with = "deserialize_attributes")]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    document_metadata: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    version: Option<String>,
}

impl RawDocument {
    /// Gates on the version and runs whatever migration it calls for.
    pub(crate) fn into_document(self) -> Result<(AnnotatedText, MigrationReport), AnnotextError> {
        let epoch = VersionGate::check(self.version.as_deref())?;
        let mut attributes = self.attributes;
        let report = migrate::upgrade(epoch, &mut attributes)?;
        let document = AnnotatedText {
            data: self.data,
            attributes,
            document_metadata: self.document_metadata,
        };
        Ok((document, report))
    }
}

impl<'de> Deserialize<'de> for AnnotatedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDocument::deserialize(deserializer)?;
        raw.into_document()
            .map(|(document, _)| document)
            .map_err(de::Error::custom)
    }
}

fn deserialize_attributes<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, AttributeValue>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(AttributesVisitor)
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = BTreeMap<String, AttributeValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of named attributes")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut attributes = BTreeMap::new();
        while let Some(name) = map.next_key::<String>()? {
            let value = map.next_value_seed(TaggedValueSeed { name: &name })?;
            attributes.insert(name, value);
        }
        Ok(attributes)
    }
}

/// Decodes one attribute value whose type comes from its `type` member.
struct TaggedValueSeed<'a> {
    name: &'a str,
}

impl<'de> DeserializeSeed<'de> for TaggedValueSeed<'_> {
    type Value = AttributeValue;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for TaggedValueSeed<'_> {
    type Value = AttributeValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a tagged attribute object for '{}'", self.name)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let (buffered, marker) = read_until(&mut map, |key| key == TYPE_MARKER)?;
        let Some((_, tag)) = marker else {
            return Err(de::Error::custom(format!(
                "attribute '{}' has no type marker",
                self.name
            )));
        };
        let tag = TypeTag::parse(&tag_string::<A::Error>(tag, TYPE_MARKER)?);

        let rest = MapAccessDeserializer::new(Replay::new(buffered, map));
        let value = ElementSeed { tag: &tag }.deserialize(rest)?;

        Ok(match value {
            AttributeValue::Unknown(unknown) if tag.kind() == AttributeKind::Unknown => {
                if tag.is_registered() {
                    AttributeValue::Unknown(unknown)
                } else {
                    tracing::debug!(attribute = self.name, tag = %tag, "keeping attribute with unrecognized tag");
                    AttributeValue::Unknown(unknown.with_tag(tag.as_str()))
                }
            }
            other => other,
        })
    }
}

/// Fuzz-only entrypoint for decoding one tagged attribute value.
#[cfg(feature = "fuzzing")]
pub fn fuzz_decode_attribute(json: &str) -> Result<(), AnnotextError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let _ = TaggedValueSeed { name: "<fuzz>" }.deserialize(&mut deserializer)?;
    Ok(())
}
