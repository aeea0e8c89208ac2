//! The closed union of attribute values.

use serde::{Serialize, Serializer};

use super::attributes::{
    BaseNounPhrase, CategorizerResult, Dependency, LanguageDetection, RelationshipComponent,
    RelationshipMention, ScriptRegion, Sentence, Token, TranslatedData, TranslatedTokens,
    UnknownAttribute,
};
use super::collection::{ListAttribute, MapAttribute};
use super::entity::{Entity, EntityMention, ResolvedEntity};
use super::extensions::Extensions;
use super::registry::{AttributeKind, TypeRegistry};
use super::span::Span;

/// Any attribute a document or collection can hold.
///
/// The variant is the discriminant; [`TypeRegistry`] maps it to and from
/// the wire tag.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    BaseNounPhrase(BaseNounPhrase),
    Entity(Entity),
    EntityMention(EntityMention),
    RelationshipMention(RelationshipMention),
    ResolvedEntity(ResolvedEntity),
    LanguageDetection(LanguageDetection),
    ScriptRegion(ScriptRegion),
    Sentence(Sentence),
    Token(Token),
    TranslatedData(TranslatedData),
    TranslatedTokens(TranslatedTokens),
    CategorizerResult(CategorizerResult),
    RelationshipComponent(RelationshipComponent),
    Dependency(Dependency),
    List(ListAttribute),
    Map(MapAttribute),
    Unknown(UnknownAttribute),
}

macro_rules! for_each_variant {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            AttributeValue::BaseNounPhrase($inner) => $body,
            AttributeValue::Entity($inner) => $body,
            AttributeValue::EntityMention($inner) => $body,
            AttributeValue::RelationshipMention($inner) => $body,
            AttributeValue::ResolvedEntity($inner) => $body,
            AttributeValue::LanguageDetection($inner) => $body,
            AttributeValue::ScriptRegion($inner) => $body,
            AttributeValue::Sentence($inner) => $body,
            AttributeValue::Token($inner) => $body,
            AttributeValue::TranslatedData($inner) => $body,
            AttributeValue::TranslatedTokens($inner) => $body,
            AttributeValue::CategorizerResult($inner) => $body,
            AttributeValue::RelationshipComponent($inner) => $body,
            AttributeValue::Dependency($inner) => $body,
            AttributeValue::List($inner) => $body,
            AttributeValue::Map($inner) => $body,
            AttributeValue::Unknown($inner) => $body,
        }
    };
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::BaseNounPhrase(_) => AttributeKind::BaseNounPhrase,
            AttributeValue::Entity(_) => AttributeKind::Entity,
            AttributeValue::EntityMention(_) => AttributeKind::EntityMention,
            AttributeValue::RelationshipMention(_) => AttributeKind::RelationshipMention,
            AttributeValue::ResolvedEntity(_) => AttributeKind::ResolvedEntity,
            AttributeValue::LanguageDetection(_) => AttributeKind::LanguageDetection,
            AttributeValue::ScriptRegion(_) => AttributeKind::ScriptRegion,
            AttributeValue::Sentence(_) => AttributeKind::Sentence,
            AttributeValue::Token(_) => AttributeKind::Token,
            AttributeValue::TranslatedData(_) => AttributeKind::TranslatedData,
            AttributeValue::TranslatedTokens(_) => AttributeKind::TranslatedTokens,
            AttributeValue::CategorizerResult(_) => AttributeKind::CategorizerResult,
            AttributeValue::RelationshipComponent(_) => AttributeKind::RelationshipComponent,
            AttributeValue::Dependency(_) => AttributeKind::Dependency,
            AttributeValue::List(_) => AttributeKind::List,
            AttributeValue::Map(_) => AttributeKind::Map,
            AttributeValue::Unknown(_) => AttributeKind::Unknown,
        }
    }

    /// The character range this value annotates, for the types that have one.
    pub fn span(&self) -> Option<Span> {
        match self {
            AttributeValue::BaseNounPhrase(v) => Some(v.span()),
            AttributeValue::EntityMention(v) => Some(v.span()),
            AttributeValue::RelationshipMention(v) => Some(v.span()),
            AttributeValue::ResolvedEntity(v) => Some(v.span()),
            AttributeValue::LanguageDetection(v) => Some(v.span()),
            AttributeValue::ScriptRegion(v) => Some(v.span()),
            AttributeValue::Sentence(v) => Some(v.span()),
            AttributeValue::Token(v) => Some(v.span()),
            _ => None,
        }
    }

    pub fn extensions(&self) -> &Extensions {
        for_each_variant!(self, v => v.extensions())
    }

    /// The tag this value is written under as a document attribute.
    ///
    /// Collections use their own tags; an unknown value keeps the tag it was
    /// read under.
    pub fn wire_tag(&self) -> &str {
        match self {
            AttributeValue::Unknown(unknown) => unknown
                .tag()
                .unwrap_or_else(|| TypeRegistry::tag_for(AttributeKind::Unknown)),
            other => TypeRegistry::tag_for(other.kind()),
        }
    }

    pub fn as_list(&self) -> Option<&ListAttribute> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapAttribute> {
        match self {
            AttributeValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner value if it is a `T`.
    pub fn downcast<T: AttributeType>(&self) -> Option<&T> {
        T::from_value(self)
    }
}

impl Serialize for AttributeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        for_each_variant!(self, v => v.serialize(serializer))
    }
}

/// A concrete type that can live inside an [`AttributeValue`].
pub trait AttributeType: Sized {
    const KIND: AttributeKind;

    fn from_value(value: &AttributeValue) -> Option<&Self>;

    fn into_value(self) -> AttributeValue;
}

macro_rules! attribute_type {
    ($($ty:ident),* $(,)?) => {
        $(
            impl AttributeType for $ty {
                const KIND: AttributeKind = AttributeKind::$ty;

                fn from_value(value: &AttributeValue) -> Option<&Self> {
                    match value {
                        AttributeValue::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_value(self) -> AttributeValue {
                    AttributeValue::$ty(self)
                }
            }

            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    AttributeValue::$ty(value)
                }
            }
        )*
    };
}

attribute_type!(
    BaseNounPhrase,
    Entity,
    EntityMention,
    RelationshipMention,
    ResolvedEntity,
    LanguageDetection,
    ScriptRegion,
    Sentence,
    Token,
    TranslatedData,
    TranslatedTokens,
    CategorizerResult,
    RelationshipComponent,
    Dependency,
);

impl AttributeType for ListAttribute {
    const KIND: AttributeKind = AttributeKind::List;

    fn from_value(value: &AttributeValue) -> Option<&Self> {
        value.as_list()
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::List(self)
    }
}

impl From<ListAttribute> for AttributeValue {
    fn from(value: ListAttribute) -> Self {
        AttributeValue::List(value)
    }
}

impl AttributeType for MapAttribute {
    const KIND: AttributeKind = AttributeKind::Map;

    fn from_value(value: &AttributeValue) -> Option<&Self> {
        value.as_map()
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Map(self)
    }
}

impl From<MapAttribute> for AttributeValue {
    fn from(value: MapAttribute) -> Self {
        AttributeValue::Map(value)
    }
}

impl AttributeType for UnknownAttribute {
    const KIND: AttributeKind = AttributeKind::Unknown;

    fn from_value(value: &AttributeValue) -> Option<&Self> {
        match value {
            AttributeValue::Unknown(inner) => Some(inner),
            _ => None,
        }
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Unknown(self)
    }
}

impl From<UnknownAttribute> for AttributeValue {
    fn from(value: UnknownAttribute) -> Self {
        AttributeValue::Unknown(value)
    }
}
