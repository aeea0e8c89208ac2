//! Decoding one attribute value once its type is known.

use serde::de::{DeserializeSeed, Deserializer};
use serde::Deserialize;

use crate::model::{
    AttributeKind, AttributeValue, BaseNounPhrase, CategorizerResult, Dependency, Entity,
    EntityMention, LanguageDetection, ListAttribute, MapAttribute, RelationshipComponent,
    RelationshipMention, ResolvedEntity, ScriptRegion, Sentence, Token, TranslatedData,
    TranslatedTokens, TypeTag, UnknownAttribute,
};

/// Decodes a value of the type named by `tag`.
///
/// An unregistered tag decodes as [`UnknownAttribute`], so nothing in the
/// input is dropped.
#[derive(Clone, Copy)]
pub(crate) struct ElementSeed<'a> {
    pub tag: &'a TypeTag,
}

impl<'de> DeserializeSeed<'de> for ElementSeed<'_> {
    type Value = AttributeValue;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match self.tag.kind() {
            AttributeKind::BaseNounPhrase => BaseNounPhrase::deserialize(deserializer)?.into(),
            AttributeKind::Entity => Entity::deserialize(deserializer)?.into(),
            AttributeKind::EntityMention => EntityMention::deserialize(deserializer)?.into(),
            AttributeKind::RelationshipMention => {
                RelationshipMention::deserialize(deserializer)?.into()
            }
            AttributeKind::ResolvedEntity => ResolvedEntity::deserialize(deserializer)?.into(),
            AttributeKind::LanguageDetection => {
                LanguageDetection::deserialize(deserializer)?.into()
            }
            AttributeKind::ScriptRegion => ScriptRegion::deserialize(deserializer)?.into(),
            AttributeKind::Sentence => Sentence::deserialize(deserializer)?.into(),
            AttributeKind::Token => Token::deserialize(deserializer)?.into(),
            AttributeKind::TranslatedData => TranslatedData::deserialize(deserializer)?.into(),
            AttributeKind::TranslatedTokens => TranslatedTokens::deserialize(deserializer)?.into(),
            AttributeKind::CategorizerResult => {
                CategorizerResult::deserialize(deserializer)?.into()
            }
            AttributeKind::RelationshipComponent => {
                RelationshipComponent::deserialize(deserializer)?.into()
            }
            AttributeKind::Dependency => Dependency::deserialize(deserializer)?.into(),
            AttributeKind::List => ListAttribute::deserialize(deserializer)?.into(),
            AttributeKind::Map => MapAttribute::deserialize(deserializer)?.into(),
            AttributeKind::Unknown => UnknownAttribute::deserialize(deserializer)?.into(),
        };
        Ok(value)
    }
}
