//! Plain attribute value types.
//!
//! These carry no algorithmic content of their own: a span (for the types
//! that annotate a range of text), a handful of declared fields, and the
//! extended-property bag. Construction goes through `new` plus consuming
//! `with_*` setters; once built a value is only ever shared by reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::extensions::{extensible, Extensions};
use super::morpho::MorphoAnalysis;
use super::span::Span;

/// A base noun phrase over a range of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseNounPhrase {
    #[serde(flatten)]
    span: Span,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(BaseNounPhrase { "startOffset", "endOffset" });

impl BaseNounPhrase {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            extensions: Extensions::new(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A sentence boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(flatten)]
    span: Span,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(Sentence { "startOffset", "endOffset" });

impl Sentence {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            extensions: Extensions::new(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A region of text written in a single script (ISO 15924 code).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptRegion {
    #[serde(flatten)]
    span: Span,
    script: String,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(ScriptRegion { "startOffset", "endOffset", "script" });

impl ScriptRegion {
    pub fn new(span: Span, script: impl Into<String>) -> Self {
        Self {
            span,
            script: script.into(),
            extensions: Extensions::new(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn script(&self) -> &str {
        &self.script
    }
}

/// A token, optionally carrying normalized forms and morphological analyses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(flatten)]
    span: Span,
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    normalized: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "crate::codec::morpho::deserialize_analyses"
    )]
    analyses: Vec<MorphoAnalysis>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(Token {
    "startOffset",
    "endOffset",
    "text",
    "normalized",
    "source",
    "analyses",
});

impl Token {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
            normalized: Vec::new(),
            source: None,
            analyses: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized.push(normalized.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_analysis(mut self, analysis: MorphoAnalysis) -> Self {
        self.analyses.push(analysis);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn analyses(&self) -> &[MorphoAnalysis] {
        &self.analyses
    }
}

/// One candidate language for a region of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(DetectionResult { "language", "encoding", "script", "confidence" });

impl DetectionResult {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            encoding: None,
            script: None,
            confidence: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

/// Language identification over a range of text, best candidate first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetection {
    #[serde(flatten)]
    span: Span,
    #[serde(default)]
    detection_results: Vec<DetectionResult>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(LanguageDetection { "startOffset", "endOffset", "detectionResults" });

impl LanguageDetection {
    pub fn new(span: Span, detection_results: Vec<DetectionResult>) -> Self {
        Self {
            span,
            detection_results,
            extensions: Extensions::new(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn detection_results(&self) -> &[DetectionResult] {
        &self.detection_results
    }
}

/// The language/script pair a translation is expressed in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration_scheme: Option<String>,
}

/// A translation of the whole document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslatedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<TextDomain>,
    translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(TranslatedData { "domain", "translation", "confidence" });

impl TranslatedData {
    pub fn new(translation: impl Into<String>) -> Self {
        Self {
            domain: None,
            translation: translation.into(),
            confidence: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_domain(mut self, domain: TextDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn domain(&self) -> Option<&TextDomain> {
        self.domain.as_ref()
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

/// Per-token translations, one entry per token of the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslatedTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<TextDomain>,
    #[serde(default)]
    translations: Vec<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(TranslatedTokens { "domain", "translations" });

impl TranslatedTokens {
    pub fn new(translations: Vec<String>) -> Self {
        Self {
            domain: None,
            translations,
            extensions: Extensions::new(),
        }
    }

    pub fn with_domain(mut self, domain: TextDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn domain(&self) -> Option<&TextDomain> {
        self.domain.as_ref()
    }

    pub fn translations(&self) -> &[String] {
        &self.translations
    }
}

/// A categorization, sentiment or topic label with its scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizerResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    explanation_set: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    per_feature_scores: BTreeMap<String, f64>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(CategorizerResult {
    "label",
    "score",
    "confidence",
    "explanationSet",
    "perFeatureScores",
});

impl CategorizerResult {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            score: None,
            confidence: None,
            explanation_set: Vec::new(),
            per_feature_scores: BTreeMap::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation_set.push(explanation.into());
        self
    }

    pub fn with_feature_score(mut self, feature: impl Into<String>, score: f64) -> Self {
        self.per_feature_scores.insert(feature.into(), score);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn explanation_set(&self) -> &[String] {
        &self.explanation_set
    }

    pub fn per_feature_scores(&self) -> &BTreeMap<String, f64> {
        &self.per_feature_scores
    }
}

/// A syntactic dependency between two tokens, by token index.
///
/// The root relation has a governor index of -1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    relationship: String,
    governor_token_index: i64,
    dependency_token_index: usize,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(Dependency {
    "relationship",
    "governorTokenIndex",
    "dependencyTokenIndex",
});

impl Dependency {
    pub fn new(
        relationship: impl Into<String>,
        governor_token_index: i64,
        dependency_token_index: usize,
    ) -> Self {
        Self {
            relationship: relationship.into(),
            governor_token_index,
            dependency_token_index,
            extensions: Extensions::new(),
        }
    }

    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    pub fn governor_token_index(&self) -> i64 {
        self.governor_token_index
    }

    pub fn dependency_token_index(&self) -> usize {
        self.dependency_token_index
    }
}

/// One participant of a relationship: a phrase plus the extents it covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extents: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(RelationshipComponent { "phrase", "extents", "identifier" });

impl RelationshipComponent {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: Some(phrase.into()),
            extents: Vec::new(),
            identifier: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_extent(mut self, extent: Span) -> Self {
        self.extents.push(extent);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn phrase(&self) -> Option<&str> {
        self.phrase.as_deref()
    }

    pub fn extents(&self) -> &[Span] {
        &self.extents
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

/// A relation between a predicate and up to three arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMention {
    #[serde(flatten)]
    span: Span,
    predicate: RelationshipComponent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg1: Option<RelationshipComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg2: Option<RelationshipComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arg3: Option<RelationshipComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    adjuncts: Vec<RelationshipComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    locatives: Vec<RelationshipComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    temporals: Vec<RelationshipComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(RelationshipMention {
    "startOffset",
    "endOffset",
    "predicate",
    "arg1",
    "arg2",
    "arg3",
    "adjuncts",
    "locatives",
    "temporals",
    "source",
    "confidence",
});

impl RelationshipMention {
    pub fn new(span: Span, predicate: RelationshipComponent) -> Self {
        Self {
            span,
            predicate,
            arg1: None,
            arg2: None,
            arg3: None,
            adjuncts: Vec::new(),
            locatives: Vec::new(),
            temporals: Vec::new(),
            source: None,
            confidence: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_arg1(mut self, arg: RelationshipComponent) -> Self {
        self.arg1 = Some(arg);
        self
    }

    pub fn with_arg2(mut self, arg: RelationshipComponent) -> Self {
        self.arg2 = Some(arg);
        self
    }

    pub fn with_arg3(mut self, arg: RelationshipComponent) -> Self {
        self.arg3 = Some(arg);
        self
    }

    pub fn with_adjunct(mut self, adjunct: RelationshipComponent) -> Self {
        self.adjuncts.push(adjunct);
        self
    }

    pub fn with_locative(mut self, locative: RelationshipComponent) -> Self {
        self.locatives.push(locative);
        self
    }

    pub fn with_temporal(mut self, temporal: RelationshipComponent) -> Self {
        self.temporals.push(temporal);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn predicate(&self) -> &RelationshipComponent {
        &self.predicate
    }

    pub fn arg1(&self) -> Option<&RelationshipComponent> {
        self.arg1.as_ref()
    }

    pub fn arg2(&self) -> Option<&RelationshipComponent> {
        self.arg2.as_ref()
    }

    pub fn arg3(&self) -> Option<&RelationshipComponent> {
        self.arg3.as_ref()
    }

    pub fn adjuncts(&self) -> &[RelationshipComponent] {
        &self.adjuncts
    }

    pub fn locatives(&self) -> &[RelationshipComponent] {
        &self.locatives
    }

    pub fn temporals(&self) -> &[RelationshipComponent] {
        &self.temporals
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }
}

/// The fallback for a tag this reader does not know.
///
/// It declares no fields, so every member of the incoming object lands in
/// the extended properties and is written back out unchanged. When decoded
/// from a document attribute it also remembers the tag it arrived under.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnknownAttribute {
    #[serde(skip)]
    tag: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

extensible!(UnknownAttribute {});

impl UnknownAttribute {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag this value was read under, if it was not `unknown` itself.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub(crate) fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}
