#![allow(dead_code)]

use annotext::model::{
    keys, BaseNounPhrase, CategorizerResult, Dependency, Entity, Extensions, ListAttribute,
    Mention, RelationshipComponent, RelationshipMention, ScriptRegion, Sentence, Span, TextDomain,
    Token, TranslatedTokens, TypeTag, UnknownAttribute,
};
use annotext::AnnotatedText;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::Value;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Offsets are drawn against a fixed text length; validity against the
/// text is not the codec's concern.
pub fn arb_span(max: usize) -> impl Strategy<Value = Span> {
    (0..=max, 0..=max).prop_map(|(a, b)| Span::new(a.min(b), a.max(b)).unwrap())
}

/// Fractions with short exact decimal forms.
pub fn arb_confidence() -> impl Strategy<Value = f64> {
    (0u8..=8).prop_map(|n| f64::from(n) / 8.0)
}

/// JSON values an extended property may hold. Floats are left out so
/// equality does not depend on decimal formatting.
pub fn arb_json() -> BoxedStrategy<Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Value::Array),
            btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
    .boxed()
}

/// Extended properties. Keys start with `x` so they never collide with a
/// declared field or the type marker.
pub fn arb_extensions() -> impl Strategy<Value = Extensions> {
    btree_map("x[a-zA-Z]{0,6}", arb_json(), 0..3).prop_map(|m| m.into_iter().collect())
}

pub fn arb_sentence(max: usize) -> impl Strategy<Value = Sentence> {
    (arb_span(max), arb_extensions())
        .prop_map(|(span, ext)| Sentence::new(span).with_extensions(ext).unwrap())
}

pub fn arb_token(max: usize) -> impl Strategy<Value = Token> {
    (
        arb_span(max),
        "[a-zA-Z]{1,8}",
        proptest::option::of("[a-z]{1,8}"),
        arb_extensions(),
    )
        .prop_map(|(span, text, normalized, ext)| {
            let mut token = Token::new(span, text);
            if let Some(normalized) = normalized {
                token = token.with_normalized(normalized);
            }
            token.with_extensions(ext).unwrap()
        })
}

pub fn arb_mention(max: usize) -> impl Strategy<Value = Mention> {
    (
        arb_span(max),
        proptest::option::of(arb_confidence()),
        proptest::option::of("[A-Z][a-z]{0,8}"),
        arb_extensions(),
    )
        .prop_map(|(span, confidence, normalized, ext)| {
            let mut mention = Mention::new(span);
            if let Some(confidence) = confidence {
                mention = mention.with_confidence(confidence);
            }
            if let Some(normalized) = normalized {
                mention = mention.with_normalized(normalized);
            }
            mention.with_extensions(ext).unwrap()
        })
}

pub fn arb_entity(max: usize) -> impl Strategy<Value = Entity> {
    (
        vec(arb_mention(max), 1..4),
        any::<proptest::sample::Index>(),
        any::<bool>(),
        proptest::option::of(prop_oneof![
            Just("PERSON"),
            Just("ORGANIZATION"),
            Just("LOCATION"),
            Just("TITLE"),
        ]),
        proptest::option::of("Q[1-9][0-9]{0,6}"),
        proptest::option::of(arb_confidence()),
    )
        .prop_map(|(mentions, head, has_head, entity_type, entity_id, confidence)| {
            let head = head.index(mentions.len());
            let mut builder = Entity::builder().mentions(mentions);
            if has_head {
                builder = builder.head_mention_index(head);
            }
            if let Some(entity_type) = entity_type {
                builder = builder.entity_type(entity_type);
            }
            if let Some(entity_id) = entity_id {
                builder = builder.entity_id(entity_id);
            }
            if let Some(confidence) = confidence {
                builder = builder.confidence(confidence);
            }
            builder.build().unwrap()
        })
}

pub fn arb_base_noun_phrase(max: usize) -> impl Strategy<Value = BaseNounPhrase> {
    (arb_span(max), arb_extensions())
        .prop_map(|(span, ext)| BaseNounPhrase::new(span).with_extensions(ext).unwrap())
}

pub fn arb_script_region(max: usize) -> impl Strategy<Value = ScriptRegion> {
    (
        arb_span(max),
        prop_oneof![Just("Latn"), Just("Cyrl"), Just("Hani"), Just("Arab")],
        arb_extensions(),
    )
        .prop_map(|(span, script, ext)| {
            ScriptRegion::new(span, script).with_extensions(ext).unwrap()
        })
}

pub fn arb_relationship_component(max: usize) -> impl Strategy<Value = RelationshipComponent> {
    (
        "[a-z]{1,8}",
        vec(arb_span(max), 0..3),
        proptest::option::of("Q[1-9][0-9]{0,4}"),
        arb_extensions(),
    )
        .prop_map(|(phrase, extents, identifier, ext)| {
            let mut component = RelationshipComponent::new(phrase);
            for extent in extents {
                component = component.with_extent(extent);
            }
            if let Some(identifier) = identifier {
                component = component.with_identifier(identifier);
            }
            component.with_extensions(ext).unwrap()
        })
}

pub fn arb_relationship_mention(max: usize) -> impl Strategy<Value = RelationshipMention> {
    (
        arb_span(max),
        arb_relationship_component(max),
        proptest::option::of(arb_relationship_component(max)),
        proptest::option::of(arb_relationship_component(max)),
        vec(arb_relationship_component(max), 0..2),
        proptest::option::of(arb_confidence()),
        arb_extensions(),
    )
        .prop_map(|(span, predicate, arg1, arg2, temporals, confidence, ext)| {
            let mut mention = RelationshipMention::new(span, predicate);
            if let Some(arg1) = arg1 {
                mention = mention.with_arg1(arg1);
            }
            if let Some(arg2) = arg2 {
                mention = mention.with_arg2(arg2);
            }
            for temporal in temporals {
                mention = mention.with_temporal(temporal);
            }
            if let Some(confidence) = confidence {
                mention = mention.with_confidence(confidence);
            }
            mention.with_extensions(ext).unwrap()
        })
}

pub fn arb_dependency() -> impl Strategy<Value = Dependency> {
    (
        prop_oneof![Just("root"), Just("nsubj"), Just("obj"), Just("punct")],
        -1i64..20,
        0usize..20,
        arb_extensions(),
    )
        .prop_map(|(relationship, governor, dependent, ext)| {
            Dependency::new(relationship, governor, dependent)
                .with_extensions(ext)
                .unwrap()
        })
}

pub fn arb_translated_tokens() -> impl Strategy<Value = TranslatedTokens> {
    (
        vec("[a-z]{0,8}", 0..6),
        proptest::option::of(prop_oneof![Just("deu"), Just("fra"), Just("zho")]),
        arb_extensions(),
    )
        .prop_map(|(translations, language, ext)| {
            let mut tokens = TranslatedTokens::new(translations);
            if let Some(language) = language {
                tokens = tokens.with_domain(TextDomain {
                    language: Some(language.to_string()),
                    ..TextDomain::default()
                });
            }
            tokens.with_extensions(ext).unwrap()
        })
}

pub fn arb_categorizer_result() -> impl Strategy<Value = CategorizerResult> {
    (
        "[a-z]{1,10}",
        proptest::option::of(arb_confidence()),
        proptest::option::of(arb_confidence()),
        vec("[a-z]{1,6}", 0..3),
        btree_map("[a-z]{1,6}", arb_confidence(), 0..3),
        arb_extensions(),
    )
        .prop_map(|(label, score, confidence, explanations, features, ext)| {
            let mut result = CategorizerResult::new(label);
            if let Some(score) = score {
                result = result.with_score(score);
            }
            if let Some(confidence) = confidence {
                result = result.with_confidence(confidence);
            }
            for explanation in explanations {
                result = result.with_explanation(explanation);
            }
            for (feature, score) in features {
                result = result.with_feature_score(feature, score);
            }
            result.with_extensions(ext).unwrap()
        })
}

/// The list types that only appear in richer documents, each under its
/// standard attribute name. Categorizer results use the `topicResults`
/// spelling so the tag has to survive the round trip.
pub fn arb_rich_lists(
    max: usize,
    max_items: usize,
) -> impl Strategy<Value = Vec<(&'static str, ListAttribute)>> {
    (
        proptest::option::of(vec(arb_base_noun_phrase(max), 0..max_items)),
        proptest::option::of(vec(arb_relationship_mention(max), 0..max_items)),
        proptest::option::of(vec(arb_script_region(max), 0..max_items)),
        proptest::option::of(vec(arb_dependency(), 0..max_items)),
        proptest::option::of(vec(arb_translated_tokens(), 0..max_items)),
        proptest::option::of(vec(arb_categorizer_result(), 0..max_items)),
    )
        .prop_map(|(phrases, relations, regions, dependencies, translated, topics)| {
            let mut lists = Vec::new();
            if let Some(items) = phrases {
                lists.push((keys::BASE_NOUN_PHRASES, ListAttribute::of(items)));
            }
            if let Some(items) = relations {
                lists.push((keys::RELATIONSHIP_MENTIONS, ListAttribute::of(items)));
            }
            if let Some(items) = regions {
                lists.push((keys::SCRIPT_REGIONS, ListAttribute::of(items)));
            }
            if let Some(items) = dependencies {
                lists.push((keys::DEPENDENCIES, ListAttribute::of(items)));
            }
            if let Some(items) = translated {
                lists.push((keys::TRANSLATED_TOKENS, ListAttribute::of(items)));
            }
            if let Some(items) = topics {
                let list = ListAttribute::builder_tagged(TypeTag::parse(keys::TOPIC_RESULTS))
                    .items(items)
                    .build()
                    .unwrap();
                lists.push((keys::TOPIC_RESULTS, list));
            }
            lists
        })
}

pub fn arb_unknown() -> impl Strategy<Value = UnknownAttribute> {
    arb_extensions().prop_map(|ext| UnknownAttribute::new().with_extensions(ext).unwrap())
}

/// A document with any subset of the common attributes.
pub fn arb_document(max_items: usize) -> impl Strategy<Value = AnnotatedText> {
    const TEXT_LEN: usize = 40;
    (
        "[a-z ]{40}",
        proptest::option::of((vec(arb_sentence(TEXT_LEN), 0..max_items), arb_extensions())),
        proptest::option::of(vec(arb_token(TEXT_LEN), 0..max_items)),
        proptest::option::of(vec(arb_entity(TEXT_LEN), 0..max_items)),
        proptest::option::of(arb_unknown()),
        btree_map("[a-z]{1,8}", vec("[a-z]{0,8}", 0..3), 0..3),
        arb_rich_lists(TEXT_LEN, max_items),
    )
        .prop_map(|(data, sentences, tokens, entities, unknown, metadata, rich)| {
            let mut builder = AnnotatedText::builder(data);
            if let Some((sentences, ext)) = sentences {
                let list = ListAttribute::of(sentences).with_extensions(ext).unwrap();
                builder = builder.attribute(keys::SENTENCES, list);
            }
            if let Some(tokens) = tokens {
                builder = builder.attribute(keys::TOKENS, ListAttribute::of(tokens));
            }
            if let Some(entities) = entities {
                builder = builder.attribute(keys::ENTITIES, ListAttribute::of(entities));
            }
            for (name, list) in rich {
                builder = builder.attribute(name, list);
            }
            if let Some(unknown) = unknown {
                builder = builder.attribute("opaque", unknown);
            }
            for (key, values) in metadata {
                builder = builder.metadata(key, values);
            }
            builder.build()
        })
}
