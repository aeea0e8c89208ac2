//! The in-memory attribute model.
//!
//! Everything here is an immutable value once built. Types that the
//! document format can tag are listed in [`AttributeKind`]; the
//! [`TypeRegistry`] maps them to their wire tags.

mod attributes;
mod collection;
mod document;
mod entity;
pub(crate) mod extensions;
mod morpho;
mod registry;
mod span;
mod value;

pub use attributes::{
    BaseNounPhrase, CategorizerResult, Dependency, DetectionResult, LanguageDetection,
    RelationshipComponent, RelationshipMention, ScriptRegion, Sentence, TextDomain, Token,
    TranslatedData, TranslatedTokens, UnknownAttribute,
};
pub use collection::{ListAttribute, ListBuilder, MapAttribute, MapBuilder};
pub use document::{keys, AnnotatedText, AnnotatedTextBuilder};
pub use entity::{Entity, EntityBuilder, EntityMention, Mention, ResolvedEntity};
pub use extensions::{Extensions, TYPE_MARKER};
pub use morpho::{
    classify, ArabicAnalysis, MorphoAnalysis, MorphoKind, MorphoVariant, TaggedPiece,
    ARABIC_FIELDS, BASE_FIELDS, HAN_FIELDS, KOREAN_FIELDS,
};
pub use registry::{AttributeKind, KeyKind, KeyTag, TypeRegistry, TypeTag};
pub use span::Span;
pub use value::{AttributeType, AttributeValue};
