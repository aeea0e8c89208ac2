//! The annotated-text document.

use std::collections::BTreeMap;

use super::attributes::{ScriptRegion, Sentence, Token};
use super::collection::ListAttribute;
use super::entity::{Entity, EntityMention, ResolvedEntity};
use super::registry::{AttributeKind, TypeRegistry};
use super::value::{AttributeType, AttributeValue};

/// Standard attribute names.
pub mod keys {
    pub const BASE_NOUN_PHRASES: &str = "baseNounPhrases";
    pub const ENTITIES: &str = "entities";
    pub const ENTITY_MENTIONS: &str = "entityMentions";
    pub const RELATIONSHIP_MENTIONS: &str = "relationshipMentions";
    pub const RESOLVED_ENTITIES: &str = "resolvedEntities";
    pub const LANGUAGE_DETECTION: &str = "languageDetection";
    pub const SCRIPT_REGIONS: &str = "scriptRegion";
    pub const SENTENCES: &str = "sentence";
    pub const TOKENS: &str = "token";
    pub const TRANSLATED_DATA: &str = "translatedData";
    pub const TRANSLATED_TOKENS: &str = "translatedTokens";
    pub const CATEGORIZER_RESULTS: &str = "categorizerResults";
    pub const SENTIMENT_RESULTS: &str = "sentimentResults";
    pub const TOPIC_RESULTS: &str = "topicResults";
    pub const DEPENDENCIES: &str = "dependency";
}

/// A text plus everything known about it.
///
/// Attributes are keyed by name; the value under a standard name is usually
/// a [`ListAttribute`] of the matching type. Legacy `entityMentions` and
/// `resolvedEntities` collections never survive decoding: they are migrated
/// into `entities` (see `crate::migrate`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotatedText {
    pub(crate) data: String,
    pub(crate) attributes: BTreeMap<String, AttributeValue>,
    pub(crate) document_metadata: BTreeMap<String, Vec<String>>,
}

impl AnnotatedText {
    pub fn builder(data: impl Into<String>) -> AnnotatedTextBuilder {
        AnnotatedTextBuilder {
            text: AnnotatedText {
                data: data.into(),
                ..Default::default()
            },
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn document_metadata(&self) -> &BTreeMap<String, Vec<String>> {
        &self.document_metadata
    }

    /// The list stored under `name`, if that attribute is a list.
    pub fn list(&self, name: &str) -> Option<&ListAttribute> {
        self.attribute(name).and_then(AttributeValue::as_list)
    }

    fn typed_list<T: AttributeType>(&self, name: &str) -> Vec<&T> {
        self.list(name)
            .map(|list| list.typed::<T>().collect())
            .unwrap_or_default()
    }

    pub fn entities(&self) -> Vec<&Entity> {
        self.typed_list(keys::ENTITIES)
    }

    pub fn tokens(&self) -> Vec<&Token> {
        self.typed_list(keys::TOKENS)
    }

    pub fn sentences(&self) -> Vec<&Sentence> {
        self.typed_list(keys::SENTENCES)
    }

    pub fn script_regions(&self) -> Vec<&ScriptRegion> {
        self.typed_list(keys::SCRIPT_REGIONS)
    }

    /// Rebuilds the pre-1.1 per-mention view from the entity list.
    ///
    /// Each mention becomes one record carrying its entity's type. Flags
    /// and chain ids are not reconstructed.
    pub fn legacy_entity_mentions(&self) -> ListAttribute {
        let mentions = self.entities().into_iter().flat_map(|entity| {
            let entity_type = entity.entity_type().unwrap_or_default();
            entity.mentions().iter().map(move |mention| {
                let mut legacy = EntityMention::new(mention.span(), entity_type);
                if let Some(confidence) = mention.confidence() {
                    legacy = legacy.with_confidence(confidence);
                }
                if let Some(normalized) = mention.normalized() {
                    legacy = legacy.with_normalized(normalized);
                }
                if let Some(source) = mention.source() {
                    legacy = legacy.with_source(source);
                }
                if let Some(subsource) = mention.subsource() {
                    legacy = legacy.with_subsource(subsource);
                }
                legacy.absorb_extensions(mention.extensions())
            })
        });
        ListAttribute::of(mentions)
    }

    /// Rebuilds the pre-1.1 resolution view: one record per entity, placed
    /// at its head mention (or at offset zero when there is none).
    pub fn legacy_resolved_entities(&self) -> ListAttribute {
        let resolved = self.entities().into_iter().map(|entity| {
            let span = entity
                .head_mention()
                .map(|head| head.span())
                .unwrap_or_default();
            let mut legacy = ResolvedEntity::new(span);
            if let Some(id) = entity.entity_id() {
                legacy = legacy.with_entity_id(id);
            }
            if let Some(confidence) = entity.confidence() {
                legacy = legacy.with_confidence(confidence);
            }
            if let Some(sentiment) = entity.sentiment().first() {
                legacy = legacy.with_sentiment(sentiment.clone());
            }
            legacy
        });
        ListAttribute::of(resolved)
    }

    /// Attribute names whose value is tagged with something this reader
    /// does not recognize.
    pub fn unrecognized_attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes.iter().filter_map(|(name, value)| {
            let tag = match value {
                AttributeValue::List(list) => list.item_type().as_str(),
                AttributeValue::Map(map) => map.value_type().as_str(),
                other => other.wire_tag(),
            };
            (TypeRegistry::kind_for(tag) == AttributeKind::Unknown).then_some((name.as_str(), tag))
        })
    }
}

/// Incrementally assembles an [`AnnotatedText`].
#[derive(Clone, Debug)]
pub struct AnnotatedTextBuilder {
    text: AnnotatedText,
}

impl AnnotatedTextBuilder {
    /// Sets (or replaces) the attribute stored under `name`.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.text.attributes.insert(name.into(), value.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.text.document_metadata.insert(key.into(), values);
        self
    }

    pub fn build(self) -> AnnotatedText {
        self.text
    }
}
