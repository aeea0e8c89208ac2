use std::fs;

use annotext::error::{AnnotextError, VersionError};
use annotext::model::{
    keys, AttributeKind, AttributeValue, BaseNounPhrase, CategorizerResult, Dependency, KeyKind,
    ListAttribute, MapAttribute, RelationshipMention, ScriptRegion, Sentence, Span,
    TranslatedData, TranslatedTokens, UnknownAttribute,
};
use annotext::{from_json_str, to_json_string, to_json_string_pretty, AnnotatedText};
use serde_json::{json, Value};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}")).expect("read fixture")
}

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end).unwrap()
}

#[test]
fn current_fixture_round_trips() {
    let input = fixture("current.json");
    let document = from_json_str(&input).expect("decode current fixture");

    assert_eq!(document.tokens().len(), 20);
    assert_eq!(document.sentences().len(), 3);
    assert_eq!(document.document_metadata()["source"], ["newswire"]);

    let tokens = document.list(keys::TOKENS).unwrap();
    assert_eq!(
        tokens.extensions().get("tokenizer"),
        Some(&json!("whitespace-punct"))
    );

    let written = to_json_string(&document).unwrap();
    let original: Value = serde_json::from_str(&input).unwrap();
    let rewritten: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(rewritten, original);
    assert_eq!(from_json_str(&written).unwrap(), document);
}

#[test]
fn every_list_type_round_trips_with_extensions() {
    let input = fixture("all_types.json");
    let document = from_json_str(&input).expect("decode all_types fixture");

    let phrases = document.list(keys::BASE_NOUN_PHRASES).unwrap();
    let first = phrases.typed::<BaseNounPhrase>().next().unwrap();
    assert_eq!(first.span(), span(0, 12));
    assert_eq!(first.extensions().get("chunker"), Some(&json!("np-v2")));

    let relations = document.list(keys::RELATIONSHIP_MENTIONS).unwrap();
    let relation = relations.typed::<RelationshipMention>().next().unwrap();
    assert_eq!(relation.predicate().identifier(), Some("meet.01"));
    assert_eq!(relation.predicate().extents(), [span(13, 16)]);
    assert_eq!(
        relation.arg2().unwrap().extensions().get("role"),
        Some(&json!("patient"))
    );
    assert_eq!(relation.locatives().len(), 1);
    assert_eq!(relation.extensions().get("zz"), Some(&json!([1])));

    let regions = document.list(keys::SCRIPT_REGIONS).unwrap();
    let region = regions.typed::<ScriptRegion>().next().unwrap();
    assert_eq!(region.script(), "Latn");
    assert_eq!(region.extensions().get("e"), Some(&json!(true)));

    let dependencies = document.list(keys::DEPENDENCIES).unwrap();
    let governors: Vec<_> = dependencies
        .typed::<Dependency>()
        .map(Dependency::governor_token_index)
        .collect();
    assert_eq!(governors, [-1, 2]);

    let translated = document.list(keys::TRANSLATED_TOKENS).unwrap();
    let tokens = translated.typed::<TranslatedTokens>().next().unwrap();
    assert_eq!(tokens.translations().len(), 8);
    assert_eq!(tokens.domain().unwrap().language.as_deref(), Some("deu"));

    let topics = document.list(keys::TOPIC_RESULTS).unwrap();
    assert_eq!(topics.item_kind(), AttributeKind::CategorizerResult);
    assert_eq!(topics.item_type().as_str(), "topicResults");
    let topic = topics.typed::<CategorizerResult>().next().unwrap();
    assert_eq!(topic.label(), Some("politics"));
    assert_eq!(topic.per_feature_scores()["Berlin"], 0.5);

    let written = to_json_string(&document).unwrap();
    let original: Value = serde_json::from_str(&input).unwrap();
    let rewritten: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(rewritten, original);
    assert_eq!(from_json_str(&written).unwrap(), document);
}

#[test]
fn unrecognized_attributes_are_kept_verbatim() {
    let input = fixture("unknown_attribute.json");
    let document = from_json_str(&input).expect("decode forward-compatible fixture");

    let embeddings = document.attribute("embeddings").unwrap();
    assert_eq!(embeddings.kind(), AttributeKind::Unknown);
    assert_eq!(embeddings.wire_tag(), "embedding");
    assert_eq!(embeddings.extensions().get("model"), Some(&json!("glove-300")));
    assert_eq!(embeddings.extensions().get("meta"), Some(&json!({"norm": true})));

    let keyphrases = document.list("keyphrases").unwrap();
    assert_eq!(keyphrases.item_type().as_str(), "keyphrase");
    let phrase = keyphrases.typed::<UnknownAttribute>().next().unwrap();
    assert_eq!(phrase.extensions().get("score"), Some(&json!(0.7)));

    let mut unrecognized: Vec<_> = document.unrecognized_attributes().collect();
    unrecognized.sort();
    assert_eq!(
        unrecognized,
        [("embeddings", "embedding"), ("keyphrases", "keyphrase")]
    );

    let original: Value = serde_json::from_str(&input).unwrap();
    let rewritten = serde_json::to_value(&document).unwrap();
    assert_eq!(rewritten, original);
}

#[test]
fn sentence_list_with_extension_round_trips_inside_a_document() {
    let sentences = ListAttribute::of([
        Sentence::new(span(0, 9)),
        Sentence::new(span(10, 20)),
    ])
    .with_extension("ek", "ev")
    .unwrap();

    let standalone = serde_json::to_string(&sentences).unwrap();
    assert_eq!(
        serde_json::from_str::<ListAttribute>(&standalone).unwrap(),
        sentences
    );

    let document = AnnotatedText::builder("One thing. Two things")
        .attribute(keys::SENTENCES, sentences.clone())
        .build();
    let decoded = from_json_str(&to_json_string(&document).unwrap()).unwrap();
    assert_eq!(decoded.list(keys::SENTENCES), Some(&sentences));
}

#[test]
fn language_keyed_maps_round_trip() {
    let translations = MapAttribute::of(
        KeyKind::LanguageCode,
        [
            ("fra", TranslatedData::new("Bonjour.")),
            ("deu", TranslatedData::new("Hallo.").with_confidence(0.9)),
        ],
    );
    let document = AnnotatedText::builder("Hello.")
        .attribute(keys::TRANSLATED_DATA, translations)
        .build();

    let json = to_json_string_pretty(&document).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    let written = &value["attributes"][keys::TRANSLATED_DATA];
    assert_eq!(written["type"], "map");
    assert_eq!(written["keyType"], "languageCode");
    assert_eq!(written["valueType"], "translatedData");
    assert_eq!(written["items"]["fra"]["translation"], "Bonjour.");

    let decoded = from_json_str(&json).unwrap();
    assert_eq!(decoded, document);
    let map = decoded
        .attribute(keys::TRANSLATED_DATA)
        .and_then(AttributeValue::as_map)
        .unwrap();
    assert_eq!(map.typed::<TranslatedData>().count(), 2);
}

#[test]
fn sentiment_results_keep_their_tag() {
    let input = json!({
        "data": "Great.",
        "attributes": {
            "sentimentResults": {
                "type": "list",
                "itemType": "sentimentResults",
                "items": [{"label": "pos", "confidence": 0.93}]
            }
        },
        "version": "1.1.0"
    });
    let document = from_json_str(&input.to_string()).unwrap();
    let list = document.list(keys::SENTIMENT_RESULTS).unwrap();
    assert_eq!(list.item_kind(), AttributeKind::CategorizerResult);
    assert_eq!(serde_json::to_value(&document).unwrap(), input);
}

#[test]
fn major_version_two_is_rejected() {
    let err = from_json_str(&fixture("v2.json")).unwrap_err();
    match err {
        AnnotextError::Version(VersionError::Incompatible { version, supported }) => {
            assert_eq!(version, "2.0.0");
            assert_eq!(supported, 1);
        }
        other => panic!("expected an incompatible version, got {other}"),
    }
}

#[test]
fn malformed_versions_are_rejected() {
    for version in ["1.1", "v1.1.0", "1.1.0-beta", ""] {
        let input = json!({"data": "", "version": version}).to_string();
        let err = from_json_str(&input).unwrap_err();
        assert!(
            matches!(err, AnnotextError::Version(VersionError::Malformed(_))),
            "{version}: {err}"
        );
        assert!(err.to_string().contains(version), "{err}");
    }
}

#[test]
fn snapshot_and_build_versions_are_accepted() {
    for version in ["1.1.0-SNAPSHOT", "1.2.3.4", "1.0.9"] {
        let input = json!({"data": "", "version": version}).to_string();
        assert!(from_json_str(&input).is_ok(), "{version}");
    }
}

#[test]
fn reversed_spans_fail_to_decode() {
    let input = json!({
        "data": "abc",
        "attributes": {
            "sentence": {"type": "list", "itemType": "sentence", "items": [{"startOffset": 3, "endOffset": 1}]}
        },
        "version": "1.1.0"
    });
    assert!(from_json_str(&input.to_string()).is_err());
}

#[test]
fn truncated_input_is_an_error() {
    let input = fixture("current.json");
    let cut = &input[..input.len() / 2];
    assert!(matches!(
        from_json_str(cut).unwrap_err(),
        AnnotextError::Json(_)
    ));
}
