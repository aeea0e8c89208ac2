//! Morphological analyses: a base shape plus three language-specific
//! specializations.
//!
//! Analyses are written without a type tag. The variant is recovered on
//! decode from the member names left over after a generic decode, see
//! [`classify`] and `codec::morpho`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::attributes::Token;
use super::extensions::{extensible, Extensions};

/// Wire names of the base analysis fields.
pub const BASE_FIELDS: &[&str] = &["partOfSpeech", "lemma", "components", "raw"];

/// Fields only the Arabic shape declares.
pub const ARABIC_FIELDS: &[&str] = &[
    "prefixLength",
    "stemLength",
    "root",
    "definiteArticle",
    "strippablePrefix",
    "prefixes",
    "stems",
    "suffixes",
    "prefixTags",
    "stemTags",
    "suffixTags",
];

pub const HAN_FIELDS: &[&str] = &["readings"];

pub const KOREAN_FIELDS: &[&str] = &["morphemes", "morphemeTags"];

/// Which shape an analysis has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MorphoKind {
    #[default]
    Generic,
    Arabic,
    Han,
    Korean,
}

impl MorphoKind {
    fn matches(self, key: &str) -> bool {
        match self {
            MorphoKind::Generic => false,
            MorphoKind::Korean => key == "morphemes",
            MorphoKind::Han => key == "readings",
            MorphoKind::Arabic => ARABIC_FIELDS.contains(&key),
        }
    }
}

/// Picks the analysis shape from the member names a generic decode could
/// not place.
///
/// `hint` is tried first; it is the shape of the previous specialized
/// element in the same array. After that the signatures are checked in a
/// fixed order: `morphemes` means Korean, `readings` means Han, and any
/// Arabic-only field means Arabic. A key set matching none of them stays
/// generic.
///
/// Signatures are plain member names, so an extended property that happens
/// to be called `morphemes` on a generic analysis reclassifies it as Korean.
pub fn classify<'a, I>(leftovers: I, hint: MorphoKind) -> MorphoKind
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let keys = leftovers.into_iter();
    let has = |kind: MorphoKind| keys.clone().any(|key| kind.matches(key));

    if hint != MorphoKind::Generic && has(hint) {
        return hint;
    }
    [MorphoKind::Korean, MorphoKind::Han, MorphoKind::Arabic]
        .into_iter()
        .find(|kind| has(*kind))
        .unwrap_or(MorphoKind::Generic)
}

/// A surface piece paired with its tag, such as an Arabic stem or a Korean
/// morpheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedPiece {
    pub text: String,
    pub tag: String,
}

impl TaggedPiece {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

/// Arabic segmentation details.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArabicAnalysis {
    pub prefix_length: usize,
    pub stem_length: usize,
    pub root: Option<String>,
    pub definite_article: bool,
    pub strippable_prefix: bool,
    pub prefixes: Vec<TaggedPiece>,
    pub stems: Vec<TaggedPiece>,
    pub suffixes: Vec<TaggedPiece>,
}

/// The specialization-specific part of an analysis.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MorphoVariant {
    #[default]
    Generic,
    Arabic(ArabicAnalysis),
    Han { readings: Vec<String> },
    Korean { morphemes: Vec<TaggedPiece> },
}

impl MorphoVariant {
    pub fn kind(&self) -> MorphoKind {
        match self {
            MorphoVariant::Generic => MorphoKind::Generic,
            MorphoVariant::Arabic(_) => MorphoKind::Arabic,
            MorphoVariant::Han { .. } => MorphoKind::Han,
            MorphoVariant::Korean { .. } => MorphoKind::Korean,
        }
    }
}

/// One morphological analysis of a token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MorphoAnalysis {
    pub(crate) part_of_speech: Option<String>,
    pub(crate) lemma: Option<String>,
    pub(crate) components: Vec<Token>,
    pub(crate) raw: Option<String>,
    pub(crate) variant: MorphoVariant,
    pub(crate) extensions: Extensions,
}

extensible!(MorphoAnalysis {
    "partOfSpeech",
    "lemma",
    "components",
    "raw",
    "prefixLength",
    "stemLength",
    "root",
    "definiteArticle",
    "strippablePrefix",
    "prefixes",
    "stems",
    "suffixes",
    "prefixTags",
    "stemTags",
    "suffixTags",
    "readings",
    "morphemes",
    "morphemeTags",
});

impl MorphoAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part_of_speech(mut self, pos: impl Into<String>) -> Self {
        self.part_of_speech = Some(pos.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_component(mut self, component: Token) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_variant(mut self, variant: MorphoVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn part_of_speech(&self) -> Option<&str> {
        self.part_of_speech.as_deref()
    }

    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref()
    }

    pub fn components(&self) -> &[Token] {
        &self.components
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn variant(&self) -> &MorphoVariant {
        &self.variant
    }

    pub fn kind(&self) -> MorphoKind {
        self.variant.kind()
    }
}

fn serialize_pieces<M: SerializeMap>(
    map: &mut M,
    texts: &'static str,
    tags: &'static str,
    pieces: &[TaggedPiece],
) -> Result<(), M::Error> {
    if pieces.is_empty() {
        return Ok(());
    }
    let text: Vec<&str> = pieces.iter().map(|p| p.text.as_str()).collect();
    let tag: Vec<&str> = pieces.iter().map(|p| p.tag.as_str()).collect();
    map.serialize_entry(texts, &text)?;
    map.serialize_entry(tags, &tag)
}

impl Serialize for MorphoAnalysis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(pos) = &self.part_of_speech {
            map.serialize_entry("partOfSpeech", pos)?;
        }
        if let Some(lemma) = &self.lemma {
            map.serialize_entry("lemma", lemma)?;
        }
        if !self.components.is_empty() {
            map.serialize_entry("components", &self.components)?;
        }
        if let Some(raw) = &self.raw {
            map.serialize_entry("raw", raw)?;
        }

        // Every specialization writes at least one of its signature members
        // unconditionally so the shape survives the trip.
        match &self.variant {
            MorphoVariant::Generic => {}
            MorphoVariant::Arabic(arabic) => {
                map.serialize_entry("prefixLength", &arabic.prefix_length)?;
                map.serialize_entry("stemLength", &arabic.stem_length)?;
                if let Some(root) = &arabic.root {
                    map.serialize_entry("root", root)?;
                }
                map.serialize_entry("definiteArticle", &arabic.definite_article)?;
                map.serialize_entry("strippablePrefix", &arabic.strippable_prefix)?;
                serialize_pieces(&mut map, "prefixes", "prefixTags", &arabic.prefixes)?;
                serialize_pieces(&mut map, "stems", "stemTags", &arabic.stems)?;
                serialize_pieces(&mut map, "suffixes", "suffixTags", &arabic.suffixes)?;
            }
            MorphoVariant::Han { readings } => {
                map.serialize_entry("readings", readings)?;
            }
            MorphoVariant::Korean { morphemes } => {
                let text: Vec<&str> = morphemes.iter().map(|p| p.text.as_str()).collect();
                let tag: Vec<&str> = morphemes.iter().map(|p| p.tag.as_str()).collect();
                map.serialize_entry("morphemes", &text)?;
                map.serialize_entry("morphemeTags", &tag)?;
            }
        }

        for (key, value) in &self.extensions {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
