//! Entities and their mentions, plus the legacy mention/resolution types
//! that older documents carry instead.

use serde::{Deserialize, Serialize};

use super::attributes::CategorizerResult;
use super::extensions::{extensible, Extensions};
use super::span::Span;
use crate::error::ModelError;

/// One occurrence of an entity in the text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    #[serde(flatten)]
    span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linking_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(Mention {
    "startOffset",
    "endOffset",
    "confidence",
    "linkingConfidence",
    "source",
    "subsource",
    "normalized",
});

impl Mention {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            confidence: None,
            linking_confidence: None,
            source: None,
            subsource: None,
            normalized: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_linking_confidence(mut self, confidence: f64) -> Self {
        self.linking_confidence = Some(confidence);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_subsource(mut self, subsource: impl Into<String>) -> Self {
        self.subsource = Some(subsource.into());
        self
    }

    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized = Some(normalized.into());
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn linking_confidence(&self) -> Option<f64> {
        self.linking_confidence
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn subsource(&self) -> Option<&str> {
        self.subsource.as_deref()
    }

    pub fn normalized(&self) -> Option<&str> {
        self.normalized.as_deref()
    }
}

/// A real-world thing referred to one or more times in the text.
///
/// When present, `head_mention_index` is a valid index into `mentions`.
/// [`EntityBuilder::build`] enforces this; a decoded entity that breaks it
/// is reported by document validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    mentions: Vec<Mention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    head_mention_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sentiment: Vec<CategorizerResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salience: Option<f64>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(Entity {
    "mentions",
    "headMentionIndex",
    "entityType",
    "entityId",
    "confidence",
    "sentiment",
    "salience",
});

impl Entity {
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn head_mention_index(&self) -> Option<usize> {
        self.head_mention_index
    }

    /// The head mention, if an index is set and in range.
    pub fn head_mention(&self) -> Option<&Mention> {
        self.head_mention_index.and_then(|i| self.mentions.get(i))
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn sentiment(&self) -> &[CategorizerResult] {
        &self.sentiment
    }

    pub fn salience(&self) -> Option<f64> {
        self.salience
    }
}

/// Builds an [`Entity`], checking the head mention index on `build`.
#[derive(Clone, Debug, Default)]
pub struct EntityBuilder {
    mentions: Vec<Mention>,
    head_mention_index: Option<usize>,
    entity_type: Option<String>,
    entity_id: Option<String>,
    confidence: Option<f64>,
    sentiment: Vec<CategorizerResult>,
    salience: Option<f64>,
    extensions: Extensions,
}

impl EntityBuilder {
    pub fn mention(mut self, mention: Mention) -> Self {
        self.mentions.push(mention);
        self
    }

    pub fn mentions(mut self, mentions: impl IntoIterator<Item = Mention>) -> Self {
        self.mentions.extend(mentions);
        self
    }

    pub fn head_mention_index(mut self, index: usize) -> Self {
        self.head_mention_index = Some(index);
        self
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn sentiment(mut self, result: CategorizerResult) -> Self {
        self.sentiment.push(result);
        self
    }

    pub fn salience(mut self, salience: f64) -> Self {
        self.salience = Some(salience);
        self
    }

    /// Adds an extended property; fails on a declared field name.
    pub fn extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<Self, ModelError> {
        let key = key.into();
        super::extensions::check_key(&key, Entity::FIELDS)?;
        self.extensions.insert(key, value.into());
        Ok(self)
    }

    /// Copies extended properties, skipping declared field names.
    pub(crate) fn absorb_extensions(mut self, extensions: &Extensions) -> Self {
        for (key, value) in extensions {
            if super::extensions::check_key(key, Entity::FIELDS).is_ok() {
                self.extensions.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn build(self) -> Result<Entity, ModelError> {
        if let Some(index) = self.head_mention_index {
            if index >= self.mentions.len() {
                return Err(ModelError::HeadMentionOutOfRange {
                    index,
                    mentions: self.mentions.len(),
                });
            }
        }
        Ok(Entity {
            mentions: self.mentions,
            head_mention_index: self.head_mention_index,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            confidence: self.confidence,
            sentiment: self.sentiment,
            salience: self.salience,
            extensions: self.extensions,
        })
    }
}

/// A legacy per-occurrence entity record.
///
/// Documents older than 1.1 carry these under `entityMentions`, linked into
/// coreference chains by `coreferenceChainId` (`-1` or absent means none).
/// Decoding such a document rewrites them into [`Entity`] values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMention {
    #[serde(flatten)]
    span: Span,
    #[serde(default)]
    entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linking_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coreference_chain_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flags: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    normalized: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(EntityMention {
    "startOffset",
    "endOffset",
    "entityType",
    "confidence",
    "linkingConfidence",
    "coreferenceChainId",
    "flags",
    "source",
    "subsource",
    "normalized",
});

impl EntityMention {
    pub fn new(span: Span, entity_type: impl Into<String>) -> Self {
        Self {
            span,
            entity_type: entity_type.into(),
            confidence: None,
            linking_confidence: None,
            coreference_chain_id: None,
            flags: None,
            source: None,
            subsource: None,
            normalized: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_linking_confidence(mut self, confidence: f64) -> Self {
        self.linking_confidence = Some(confidence);
        self
    }

    pub fn with_coreference_chain_id(mut self, chain_id: i64) -> Self {
        self.coreference_chain_id = Some(chain_id);
        self
    }

    pub fn with_flags(mut self, flags: i64) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_subsource(mut self, subsource: impl Into<String>) -> Self {
        self.subsource = Some(subsource.into());
        self
    }

    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized = Some(normalized.into());
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn linking_confidence(&self) -> Option<f64> {
        self.linking_confidence
    }

    /// The chain id exactly as stored, including the `-1` sentinel.
    pub fn raw_coreference_chain_id(&self) -> Option<i64> {
        self.coreference_chain_id
    }

    /// The chain this mention belongs to; `None` for absent or `-1`.
    ///
    /// Ids below `-1` are treated as absent here; migration rejects them.
    pub fn chain_id(&self) -> Option<usize> {
        self.coreference_chain_id
            .filter(|id| *id >= 0)
            .and_then(|id| usize::try_from(id).ok())
    }

    pub fn flags(&self) -> Option<i64> {
        self.flags
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn subsource(&self) -> Option<&str> {
        self.subsource.as_deref()
    }

    pub fn normalized(&self) -> Option<&str> {
        self.normalized.as_deref()
    }
}

/// A legacy record linking a coreference chain to a knowledge-base id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntity {
    #[serde(flatten)]
    span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coreference_chain_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sentiment: Option<CategorizerResult>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(ResolvedEntity {
    "startOffset",
    "endOffset",
    "entityId",
    "coreferenceChainId",
    "confidence",
    "sentiment",
});

impl ResolvedEntity {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            entity_id: None,
            coreference_chain_id: None,
            confidence: None,
            sentiment: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_coreference_chain_id(mut self, chain_id: i64) -> Self {
        self.coreference_chain_id = Some(chain_id);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_sentiment(mut self, sentiment: CategorizerResult) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn raw_coreference_chain_id(&self) -> Option<i64> {
        self.coreference_chain_id
    }

    pub fn chain_id(&self) -> Option<usize> {
        self.coreference_chain_id
            .filter(|id| *id >= 0)
            .and_then(|id| usize::try_from(id).ok())
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn sentiment(&self) -> Option<&CategorizerResult> {
        self.sentiment.as_ref()
    }
}
