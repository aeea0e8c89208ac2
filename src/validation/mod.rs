//! Document validation.
//!
//! Decoding accepts anything that is structurally well-formed. This module
//! checks the things decoding does not:
//! - offsets that point past the end of the text
//! - entities whose head mention index is wrong, or that have no mentions
//! - leftovers from the legacy entity model
//! - attribute tags this reader does not recognize
//! - standard attribute names holding unexpected types

mod report;

pub use report::{
    IssueCode, IssueContext, ReportSummary, Severity, ValidationIssue, ValidationReport,
};

use crate::model::{
    keys, AnnotatedText, AttributeKind, AttributeValue, Entity, ListAttribute, Span,
    TranslatedTokens, TypeRegistry,
};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, callers treat warnings as errors.
    pub strict: bool,
}

/// The element type each standard list attribute is expected to hold.
const STANDARD_LISTS: &[(&str, AttributeKind)] = &[
    (keys::BASE_NOUN_PHRASES, AttributeKind::BaseNounPhrase),
    (keys::ENTITIES, AttributeKind::Entity),
    (keys::RELATIONSHIP_MENTIONS, AttributeKind::RelationshipMention),
    (keys::SCRIPT_REGIONS, AttributeKind::ScriptRegion),
    (keys::SENTENCES, AttributeKind::Sentence),
    (keys::TOKENS, AttributeKind::Token),
    (keys::CATEGORIZER_RESULTS, AttributeKind::CategorizerResult),
    (keys::SENTIMENT_RESULTS, AttributeKind::CategorizerResult),
    (keys::TOPIC_RESULTS, AttributeKind::CategorizerResult),
    (keys::DEPENDENCIES, AttributeKind::Dependency),
];

/// Validates a document and returns a report of all issues found.
pub fn validate_document(document: &AnnotatedText, _opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    // Offsets count UTF-16 code units.
    let text_len = document.data().encode_utf16().count();

    for (name, value) in document.attributes() {
        validate_spans(name, value, text_len, &mut report);
        if let AttributeValue::List(list) = value {
            validate_entities(name, list, &mut report);
        }
    }
    validate_attribute_types(document, &mut report);
    validate_translations(document, &mut report);

    report
}

/// Spans carried by a value, including those of an entity's mentions.
fn spans_of(value: &AttributeValue) -> Vec<Span> {
    match value {
        AttributeValue::Entity(entity) => entity.mentions().iter().map(|m| m.span()).collect(),
        other => other.span().into_iter().collect(),
    }
}

/// Checks that every span ends within the document text.
fn validate_spans(name: &str, value: &AttributeValue, text_len: usize, report: &mut ValidationReport) {
    let mut check = |span: Span, context: IssueContext| {
        if span.end() > text_len {
            report.add(ValidationIssue::warning(
                IssueCode::SpanOutOfBounds,
                format!(
                    "Span {} ends past the end of the text ({} characters)",
                    span, text_len
                ),
                context,
            ));
        }
    };

    match value {
        AttributeValue::List(list) => {
            for (index, item) in list.items().iter().enumerate() {
                for span in spans_of(item) {
                    check(
                        span,
                        IssueContext::Item {
                            name: name.to_string(),
                            index,
                        },
                    );
                }
            }
        }
        AttributeValue::Map(map) => {
            for span in map.items().values().flat_map(spans_of) {
                check(
                    span,
                    IssueContext::Attribute {
                        name: name.to_string(),
                    },
                );
            }
        }
        other => {
            for span in spans_of(other) {
                check(
                    span,
                    IssueContext::Attribute {
                        name: name.to_string(),
                    },
                );
            }
        }
    }
}

/// Checks head mention indexes and empty entities.
fn validate_entities(name: &str, list: &ListAttribute, report: &mut ValidationReport) {
    for (index, entity) in list.items().iter().enumerate() {
        let AttributeValue::Entity(entity) = entity else {
            continue;
        };
        let context = || IssueContext::Item {
            name: name.to_string(),
            index,
        };

        if entity.mentions().is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyEntity,
                describe("Entity has no mentions", entity),
                context(),
            ));
        }

        if let Some(head) = entity.head_mention_index() {
            if head >= entity.mentions().len() {
                report.add(ValidationIssue::error(
                    IssueCode::HeadMentionOutOfRange,
                    format!(
                        "Head mention index {} is out of range for {} mention(s)",
                        head,
                        entity.mentions().len()
                    ),
                    context(),
                ));
            }
        }
    }
}

fn describe(message: &str, entity: &Entity) -> String {
    match entity.entity_id() {
        Some(id) => format!("{} (entity id '{}')", message, id),
        None => message.to_string(),
    }
}

/// Checks legacy leftovers, unknown tags and standard names.
fn validate_attribute_types(document: &AnnotatedText, report: &mut ValidationReport) {
    for legacy in [keys::ENTITY_MENTIONS, keys::RESOLVED_ENTITIES] {
        if document.attribute(legacy).is_some() {
            report.add(ValidationIssue::warning(
                IssueCode::LegacyAttribute,
                format!(
                    "Legacy attribute '{}' is present; current documents use '{}'",
                    legacy,
                    keys::ENTITIES
                ),
                IssueContext::Attribute {
                    name: legacy.to_string(),
                },
            ));
        }
    }

    for (name, tag) in document.unrecognized_attributes() {
        report.add(ValidationIssue::warning(
            IssueCode::UnrecognizedTag,
            format!("Tag '{}' is not recognized; the value is kept as-is", tag),
            IssueContext::Attribute {
                name: name.to_string(),
            },
        ));
    }

    for (name, expected) in STANDARD_LISTS {
        let Some(value) = document.attribute(name) else {
            continue;
        };
        let found = match value {
            AttributeValue::List(list) => list.item_kind(),
            other => other.kind(),
        };
        // Unrecognized tags are reported above.
        if found != *expected && found != AttributeKind::Unknown {
            report.add(ValidationIssue::warning(
                IssueCode::UnexpectedAttributeType,
                format!(
                    "Expected a list of '{}' but found '{}'",
                    TypeRegistry::tag_for(*expected),
                    TypeRegistry::tag_for(found)
                ),
                IssueContext::Attribute {
                    name: name.to_string(),
                },
            ));
        }
    }
}

/// Checks that token translations line up with the tokens.
fn validate_translations(document: &AnnotatedText, report: &mut ValidationReport) {
    let token_count = document.tokens().len();
    if token_count == 0 {
        return;
    }
    let Some(value) = document.attribute(keys::TRANSLATED_TOKENS) else {
        return;
    };

    let translations: Vec<(Option<&str>, &TranslatedTokens)> = match value {
        AttributeValue::TranslatedTokens(t) => vec![(None, t)],
        AttributeValue::Map(map) => map
            .typed::<TranslatedTokens>()
            .map(|(key, t)| (Some(key), t))
            .collect(),
        AttributeValue::List(list) => list.typed::<TranslatedTokens>().map(|t| (None, t)).collect(),
        _ => Vec::new(),
    };

    for (key, tokens) in translations {
        if tokens.translations().len() != token_count {
            let which = key.map(|k| format!(" for '{}'", k)).unwrap_or_default();
            report.add(ValidationIssue::warning(
                IssueCode::TranslationLengthMismatch,
                format!(
                    "{} translated token(s){} but the document has {} token(s)",
                    tokens.translations().len(),
                    which,
                    token_count
                ),
                IssueContext::Attribute {
                    name: keys::TRANSLATED_TOKENS.to_string(),
                },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityMention, KeyKind, MapAttribute, Mention, Sentence, Token};

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end).unwrap()
    }

    fn valid_document() -> AnnotatedText {
        let entity = Entity::builder()
            .mention(Mention::new(span(0, 4)))
            .head_mention_index(0)
            .entity_type("PERSON")
            .build()
            .unwrap();
        AnnotatedText::builder("Bill sat.")
            .attribute(keys::ENTITIES, ListAttribute::of([entity]))
            .attribute(keys::SENTENCES, ListAttribute::of([Sentence::new(span(0, 9))]))
            .attribute(
                keys::TOKENS,
                ListAttribute::of([
                    Token::new(span(0, 4), "Bill"),
                    Token::new(span(5, 8), "sat"),
                    Token::new(span(8, 9), "."),
                ]),
            )
            .build()
    }

    fn has(report: &ValidationReport, code: IssueCode) -> bool {
        report.issues.iter().any(|i| i.code == code)
    }

    #[test]
    fn test_valid_document() {
        let report = validate_document(&valid_document(), &ValidateOptions::default());
        assert!(report.is_ok_strict(), "{report}");
    }

    #[test]
    fn test_span_past_end() {
        let doc = AnnotatedText::builder("short")
            .attribute(keys::SENTENCES, ListAttribute::of([Sentence::new(span(0, 40))]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert_eq!(report.warning_count(), 1);
        assert!(has(&report, IssueCode::SpanOutOfBounds));
    }

    #[test]
    fn test_offsets_count_characters() {
        // Four characters, twelve bytes.
        let doc = AnnotatedText::builder("東京大学")
            .attribute(keys::SENTENCES, ListAttribute::of([Sentence::new(span(0, 4))]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert!(report.is_ok_strict(), "{report}");
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        // Two emoji outside the BMP take two units each.
        let doc = AnnotatedText::builder("hi 😀😀")
            .attribute(keys::SENTENCES, ListAttribute::of([Sentence::new(span(0, 7))]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert!(report.is_ok_strict(), "{report}");

        let doc = AnnotatedText::builder("hi 😀😀")
            .attribute(keys::SENTENCES, ListAttribute::of([Sentence::new(span(0, 8))]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert!(has(&report, IssueCode::SpanOutOfBounds));
    }

    #[test]
    fn test_head_out_of_range() {
        let entities: ListAttribute = serde_json::from_value(serde_json::json!({
            "itemType": "entities",
            "items": [{"mentions": [{"startOffset": 0, "endOffset": 4}], "headMentionIndex": 3}]
        }))
        .unwrap();
        let doc = AnnotatedText::builder("Bill sat.")
            .attribute(keys::ENTITIES, entities)
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(has(&report, IssueCode::HeadMentionOutOfRange));
    }

    #[test]
    fn test_empty_entity() {
        let entity = Entity::builder().entity_id("Q1").build().unwrap();
        let doc = AnnotatedText::builder("x")
            .attribute(keys::ENTITIES, ListAttribute::of([entity]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert!(has(&report, IssueCode::EmptyEntity));
        assert!(report.issues[0].message.contains("Q1"));
    }

    #[test]
    fn test_legacy_attribute() {
        let doc = AnnotatedText::builder("Bill")
            .attribute(
                keys::ENTITY_MENTIONS,
                ListAttribute::of([EntityMention::new(span(0, 4), "PERSON")]),
            )
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert!(has(&report, IssueCode::LegacyAttribute));
        assert!(report.is_ok());
    }

    #[test]
    fn test_unexpected_type_under_standard_name() {
        let doc = AnnotatedText::builder("Bill sat.")
            .attribute(keys::TOKENS, ListAttribute::of([Sentence::new(span(0, 9))]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert!(has(&report, IssueCode::UnexpectedAttributeType));
    }

    #[test]
    fn test_translation_length() {
        let doc = AnnotatedText::builder("Bill sat.")
            .attribute(
                keys::TOKENS,
                ListAttribute::of([Token::new(span(0, 4), "Bill"), Token::new(span(5, 8), "sat")]),
            )
            .attribute(
                keys::TRANSLATED_TOKENS,
                MapAttribute::of(
                    KeyKind::LanguageCode,
                    [
                        ("fra", TranslatedTokens::new(vec!["Bill".into(), "assis".into()])),
                        ("deu", TranslatedTokens::new(vec!["Bill".into()])),
                    ],
                ),
            )
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        assert_eq!(report.warning_count(), 1);
        assert!(report.issues[0].message.contains("'deu'"));
    }

    #[test]
    fn test_report_serializes() {
        let doc = AnnotatedText::builder("short")
            .attribute(keys::SENTENCES, ListAttribute::of([Sentence::new(span(0, 40))]))
            .build();
        let report = validate_document(&doc, &ValidateOptions::default());
        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["warning_count"], 1);
        assert_eq!(json["issues"][0]["code"], "span_out_of_bounds");
        assert_eq!(json["issues"][0]["context"]["kind"], "item");
        assert_eq!(json["issues"][0]["context"]["index"], 0);
    }
}
