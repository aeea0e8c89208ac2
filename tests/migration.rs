//! Legacy documents are rewritten into the current entity model on read.

use std::path::Path;

use annotext::codec::{read_document_with_report, SchemaEpoch};
use annotext::error::{AnnotextError, MigrationError};
use annotext::migrate::MigrationIssueCode;
use annotext::model::{keys, Entity};
use serde_json::json;

fn read(name: &str) -> (annotext::AnnotatedText, annotext::migrate::MigrationReport) {
    let path = Path::new("tests/fixtures").join(name);
    read_document_with_report(&path).expect("read fixture")
}

fn normalized(entity: &Entity) -> Vec<&str> {
    entity
        .mentions()
        .iter()
        .map(|m| m.normalized().expect("fixture mentions are normalized"))
        .collect()
}

#[test]
fn current_documents_are_not_migrated() {
    let (document, report) = read("current.json");
    assert_eq!(report.from, SchemaEpoch::Current);
    assert!(!report.migrated());
    assert_eq!(document.entities().len(), 4);
}

#[test]
fn flat_mentions_become_one_entity_each() {
    let (document, report) = read("v1_0_no_chains.json");
    assert_eq!(report.from, SchemaEpoch::V1_0);
    assert!(report.migrated());
    assert_eq!(report.input.entity_mentions, 7);

    let entities = document.entities();
    assert_eq!(entities.len(), 7);
    for entity in &entities {
        assert_eq!(entity.mentions().len(), 1);
        assert_eq!(entity.head_mention_index(), None);
    }
    assert_eq!(entities[4].entity_type(), Some("TITLE"));
    assert_eq!(normalized(entities[4]), ["Secretary of State"]);

    assert!(document.attribute(keys::ENTITY_MENTIONS).is_none());
    // Untouched attributes survive the migration.
    assert_eq!(document.sentences().len(), 3);
}

#[test]
fn chains_group_mentions_and_sort_by_head() {
    let (document, report) = read("v1_0_chains.json");
    let entities = document.entities();
    assert_eq!(entities.len(), 4);

    let hillary = entities[3];
    assert_eq!(normalized(hillary), ["Hillary", "Hillary Clinton"]);
    assert_eq!(hillary.head_mention_index(), Some(1));
    assert_eq!(hillary.entity_type(), Some("PERSON"));
    assert_eq!(hillary.entity_id(), None);

    let heads: Vec<usize> = entities
        .iter()
        .map(|e| e.head_mention().expect("chained entities have heads").span().start())
        .collect();
    assert_eq!(heads, [0, 17, 53, 73]);

    assert!(report
        .issues
        .iter()
        .any(|i| i.code == MigrationIssueCode::SortedByHead));
}

#[test]
fn resolutions_are_copied_onto_their_chain() {
    let (document, _) = read("v1_0_resolved.json");
    let entities = document.entities();
    assert_eq!(entities.len(), 4);

    let hillary = entities[3];
    assert_eq!(hillary.entity_id(), Some("Q6294"));
    assert_eq!(hillary.confidence(), Some(1.0));
    assert_eq!(hillary.extensions().get("oldCoreferenceChainId"), Some(&json!(5)));
    assert!(document.attribute(keys::RESOLVED_ENTITIES).is_none());
}

#[test]
fn unversioned_documents_use_the_oldest_rules() {
    let (document, report) = read("pre_v1.json");
    assert_eq!(report.from, SchemaEpoch::PreV1);

    let entities = document.entities();
    // One resolved chain plus the five mentions it does not claim.
    assert_eq!(entities.len(), 6);

    let hillary = entities[0];
    assert_eq!(hillary.entity_id(), Some("Q6294"));
    assert_eq!(normalized(hillary), ["Hillary", "Hillary Clinton"]);
    assert_eq!(
        hillary.head_mention().map(|m| m.span().start()),
        Some(73)
    );

    let bill = entities[1];
    assert_eq!(normalized(bill), ["Bill Clinton"]);
    assert_eq!(bill.head_mention_index(), Some(0));
    let mention = &bill.mentions()[0];
    assert_eq!(mention.extensions().get("oldFlags"), Some(&json!(3)));
    assert_eq!(mention.extensions().get("old-entity-type"), Some(&json!("PERSON")));
}

#[test]
fn a_resolution_with_no_mentions_is_fatal() {
    let err = read_document_with_report(Path::new("tests/fixtures/v1_0_empty_chain.json"))
        .unwrap_err();
    assert!(
        matches!(
            err,
            AnnotextError::Migration(MigrationError::EmptyCoreferenceChain { chain_id: 9 })
        ),
        "{err}"
    );
}

#[test]
fn migrated_documents_are_written_as_current() {
    let (document, _) = read("v1_0_chains.json");
    let json = annotext::to_json_string(&document).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], "1.1.0");
    assert_eq!(value["attributes"]["entities"]["itemType"], "entities");

    let (reread, report) = annotext::codec::from_json_str_with_report(&json).unwrap();
    assert!(!report.migrated());
    assert_eq!(reread, document);
}
