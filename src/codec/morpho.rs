//! Contextual decoding of untagged morphological analyses.
//!
//! Each element is read as the base shape first. Whatever that leaves in
//! the extended properties is handed to [`classify`], and the members that
//! make up the chosen specialization are pulled back out of the bag.
//!
//! The shape of the last specialized element is remembered and tried first
//! for the next one. That memory lives in the visitor for one array, so
//! concurrent or successive decodes never see each other's state.

use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::ModelError;
use crate::model::{
    classify, ArabicAnalysis, Extensions, MorphoAnalysis, MorphoKind, MorphoVariant, TaggedPiece,
    Token,
};

/// The base shape, with every other member left in `extensions`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenericAnalysis {
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    lemma: Option<String>,
    #[serde(default)]
    components: Vec<Token>,
    #[serde(default)]
    raw: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

fn take<T, E>(extensions: &mut Extensions, key: &str) -> Result<Option<T>, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    extensions
        .remove(key)
        .map(|value| {
            serde_json::from_value(value).map_err(|err| E::custom(format!("{key}: {err}")))
        })
        .transpose()
}

/// Zips a text list with its positional tag list.
fn take_pieces<E: de::Error>(
    extensions: &mut Extensions,
    texts_key: &'static str,
    tags_key: &str,
) -> Result<Vec<TaggedPiece>, E> {
    let texts: Vec<String> = take(extensions, texts_key)?.unwrap_or_default();
    let tags: Vec<String> = take(extensions, tags_key)?.unwrap_or_default();
    if texts.len() != tags.len() {
        return Err(E::custom(ModelError::MismatchedPairs {
            field: texts_key,
            left: texts.len(),
            right: tags.len(),
        }));
    }
    Ok(texts
        .into_iter()
        .zip(tags)
        .map(|(text, tag)| TaggedPiece { text, tag })
        .collect())
}

fn extract_arabic<E: de::Error>(extensions: &mut Extensions) -> Result<ArabicAnalysis, E> {
    let prefix_length: Option<usize> = take(extensions, "prefixLength")?;
    let stem_length: Option<usize> = take(extensions, "stemLength")?;
    // The lengths only mean something as a pair.
    let (prefix_length, stem_length) = match (prefix_length, stem_length) {
        (Some(prefix), Some(stem)) => (prefix, stem),
        _ => (0, 0),
    };

    Ok(ArabicAnalysis {
        prefix_length,
        stem_length,
        root: take(extensions, "root")?,
        definite_article: take(extensions, "definiteArticle")?.unwrap_or(false),
        strippable_prefix: take(extensions, "strippablePrefix")?.unwrap_or(false),
        prefixes: take_pieces(extensions, "prefixes", "prefixTags")?,
        stems: take_pieces(extensions, "stems", "stemTags")?,
        suffixes: take_pieces(extensions, "suffixes", "suffixTags")?,
    })
}

/// Turns a generic decode into the analysis shape its leftovers indicate.
fn specialize<E: de::Error>(
    generic: GenericAnalysis,
    hint: MorphoKind,
) -> Result<MorphoAnalysis, E> {
    let GenericAnalysis {
        part_of_speech,
        lemma,
        components,
        raw,
        mut extensions,
    } = generic;

    let kind = classify(extensions.iter().map(|(key, _)| key.as_str()), hint);
    let variant = match kind {
        MorphoKind::Generic => MorphoVariant::Generic,
        MorphoKind::Korean => MorphoVariant::Korean {
            morphemes: take_pieces(&mut extensions, "morphemes", "morphemeTags")?,
        },
        MorphoKind::Han => MorphoVariant::Han {
            readings: take(&mut extensions, "readings")?.unwrap_or_default(),
        },
        MorphoKind::Arabic => MorphoVariant::Arabic(extract_arabic(&mut extensions)?),
    };

    Ok(MorphoAnalysis {
        part_of_speech,
        lemma,
        components,
        raw,
        variant,
        extensions,
    })
}

impl<'de> Deserialize<'de> for MorphoAnalysis {
    /// Decodes a lone analysis; with no neighbours there is no hint.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let generic = GenericAnalysis::deserialize(deserializer)?;
        specialize(generic, MorphoKind::Generic)
    }
}

struct AnalysesVisitor;

impl<'de> Visitor<'de> for AnalysesVisitor {
    type Value = Vec<MorphoAnalysis>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of morphological analyses")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut hint = MorphoKind::Generic;
        let mut analyses = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(generic) = seq.next_element::<GenericAnalysis>()? {
            let analysis = specialize::<A::Error>(generic, hint)?;
            if analysis.kind() != MorphoKind::Generic {
                hint = analysis.kind();
            }
            analyses.push(analysis);
        }
        Ok(analyses)
    }
}

/// Field decoder for `Token::analyses`.
pub(crate) fn deserialize_analyses<'de, D>(deserializer: D) -> Result<Vec<MorphoAnalysis>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(AnalysesVisitor)
}

/// Decodes a JSON array of analyses on its own, outside any token.
pub fn analyses_from_json(json: &str) -> Result<Vec<MorphoAnalysis>, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let analyses = deserialize_analyses(&mut deserializer)?;
    deserializer.end()?;
    Ok(analyses)
}
