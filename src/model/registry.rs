//! The type registry: wire tags for attribute and map-key types.
//!
//! Tags are looked up in both directions. Lookups are total: an
//! unrecognized tag resolves to [`AttributeKind::Unknown`] (or
//! [`KeyKind::Unknown`]) and a kind always has a tag. Several tags may
//! share one kind (`categorizerResults`, `sentimentResults`, `topicResults`);
//! the first registered tag is the canonical one used when encoding a
//! freshly constructed value.

use std::borrow::Cow;
use std::fmt;

/// The concrete attribute types a document can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
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
    List,
    Map,
    Unknown,
}

/// The types usable as map keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyKind {
    String,
    LanguageCode,
    Unknown,
}

const ATTRIBUTE_TAGS: &[(&str, AttributeKind)] = &[
    ("baseNounPhrases", AttributeKind::BaseNounPhrase),
    ("entities", AttributeKind::Entity),
    ("entityMentions", AttributeKind::EntityMention),
    ("relationshipMentions", AttributeKind::RelationshipMention),
    ("resolvedEntities", AttributeKind::ResolvedEntity),
    ("languageDetection", AttributeKind::LanguageDetection),
    ("scriptRegion", AttributeKind::ScriptRegion),
    ("sentence", AttributeKind::Sentence),
    ("token", AttributeKind::Token),
    ("translatedData", AttributeKind::TranslatedData),
    ("translatedTokens", AttributeKind::TranslatedTokens),
    ("categorizerResults", AttributeKind::CategorizerResult),
    ("sentimentResults", AttributeKind::CategorizerResult),
    ("topicResults", AttributeKind::CategorizerResult),
    ("list", AttributeKind::List),
    ("map", AttributeKind::Map),
    ("unknown", AttributeKind::Unknown),
    ("RelationshipComponent", AttributeKind::RelationshipComponent),
    ("dependency", AttributeKind::Dependency),
];

const KEY_TAGS: &[(&str, KeyKind)] = &[
    ("string", KeyKind::String),
    ("languageCode", KeyKind::LanguageCode),
    ("unknown", KeyKind::Unknown),
];

/// Bidirectional tag lookup. Holds no state; every method is a pure read
/// of static tables.
pub struct TypeRegistry;

impl TypeRegistry {
    /// Returns the canonical tag for `kind`.
    pub fn tag_for(kind: AttributeKind) -> &'static str {
        ATTRIBUTE_TAGS
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(tag, _)| *tag)
            .unwrap_or("unknown")
    }

    /// Returns the kind registered for `tag`, or `Unknown`.
    pub fn kind_for(tag: &str) -> AttributeKind {
        Self::lookup(tag)
            .map(|(_, kind)| kind)
            .unwrap_or(AttributeKind::Unknown)
    }

    /// Returns the canonical tag for a key kind.
    pub fn key_tag_for(kind: KeyKind) -> &'static str {
        KEY_TAGS
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(tag, _)| *tag)
            .unwrap_or("unknown")
    }

    /// Returns the key kind registered for `tag`, or `Unknown`.
    pub fn key_kind_for(tag: &str) -> KeyKind {
        Self::lookup_key(tag)
            .map(|(_, kind)| kind)
            .unwrap_or(KeyKind::Unknown)
    }

    /// All registered attribute tags, in registration order.
    pub fn attribute_tags() -> impl Iterator<Item = (&'static str, AttributeKind)> {
        ATTRIBUTE_TAGS.iter().copied()
    }

    fn lookup(tag: &str) -> Option<(&'static str, AttributeKind)> {
        ATTRIBUTE_TAGS.iter().copied().find(|(t, _)| *t == tag)
    }

    fn lookup_key(tag: &str) -> Option<(&'static str, KeyKind)> {
        KEY_TAGS.iter().copied().find(|(t, _)| *t == tag)
    }
}

/// A resolved attribute tag that remembers how it was spelled on the wire.
///
/// Decoding `"sentimentResults"` yields kind `CategorizerResult` but keeps
/// the spelling so the value re-encodes under the same tag; an unrecognized
/// tag resolves to `Unknown` and likewise keeps its spelling.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeTag {
    kind: AttributeKind,
    spelling: Cow<'static, str>,
}

impl TypeTag {
    /// The canonical tag for `kind`.
    pub fn of(kind: AttributeKind) -> Self {
        Self {
            kind,
            spelling: Cow::Borrowed(TypeRegistry::tag_for(kind)),
        }
    }

    /// Resolves a wire tag. Never fails.
    pub fn parse(tag: &str) -> Self {
        match TypeRegistry::lookup(tag) {
            Some((spelling, kind)) => Self {
                kind,
                spelling: Cow::Borrowed(spelling),
            },
            None => Self {
                kind: AttributeKind::Unknown,
                spelling: Cow::Owned(tag.to_string()),
            },
        }
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.spelling
    }

    /// Returns false if the tag was not found in the registry.
    pub fn is_registered(&self) -> bool {
        TypeRegistry::lookup(&self.spelling).is_some()
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({:?} as {:?})", self.kind, self.spelling)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}

/// A resolved map-key tag; see [`TypeTag`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KeyTag {
    kind: KeyKind,
    spelling: Cow<'static, str>,
}

impl KeyTag {
    pub fn of(kind: KeyKind) -> Self {
        Self {
            kind,
            spelling: Cow::Borrowed(TypeRegistry::key_tag_for(kind)),
        }
    }

    pub fn parse(tag: &str) -> Self {
        match TypeRegistry::lookup_key(tag) {
            Some((spelling, kind)) => Self {
                kind,
                spelling: Cow::Borrowed(spelling),
            },
            None => Self {
                kind: KeyKind::Unknown,
                spelling: Cow::Owned(tag.to_string()),
            },
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.spelling
    }
}

impl fmt::Debug for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyTag({:?} as {:?})", self.kind, self.spelling)
    }
}

impl fmt::Display for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling)
    }
}
