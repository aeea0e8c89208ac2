//! Document inspection.
//!
//! Summarizes what a document holds: its attributes and their sizes, and
//! how its entities break down by type.

mod report;

pub use report::{AttributeRow, InspectReport, LabelCount, LabelsSection, SummarySection};

use std::collections::HashMap;

use crate::codec::SchemaEpoch;
use crate::model::{AnnotatedText, AttributeValue, Entity};

/// Options for document inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Number of entity types to show in the histogram.
    pub top_labels: usize,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            top_labels: 10,
            bar_width: 20,
        }
    }
}

/// Inspects a decoded document.
///
/// `schema` is the epoch the document was read from, as reported by
/// migration.
pub fn inspect_document(
    document: &AnnotatedText,
    schema: SchemaEpoch,
    opts: &InspectOptions,
) -> InspectReport {
    let entities = document.entities();

    InspectReport {
        summary: SummarySection {
            schema,
            characters: document.data().chars().count(),
            attributes: document.attributes().len(),
            metadata_keys: document.document_metadata().len(),
            entities: entities.len(),
            mentions: entities.iter().map(|e| e.mentions().len()).sum(),
            linked_entities: entities.iter().filter(|e| e.entity_id().is_some()).count(),
        },
        attributes: compute_rows(document),
        entity_types: compute_labels(&entities, opts.top_labels),
        bar_width: opts.bar_width,
    }
}

fn compute_rows(document: &AnnotatedText) -> Vec<AttributeRow> {
    document
        .attributes()
        .iter()
        .map(|(name, value)| {
            let (item_tag, items) = match value {
                AttributeValue::List(list) => {
                    (Some(list.item_type().to_string()), Some(list.len()))
                }
                AttributeValue::Map(map) => (Some(map.value_type().to_string()), Some(map.len())),
                _ => (None, None),
            };
            AttributeRow {
                name: name.clone(),
                tag: value.wire_tag().to_string(),
                item_tag,
                items,
                extensions: value.extensions().len(),
            }
        })
        .collect()
}

fn compute_labels(entities: &[&Entity], top_n: usize) -> LabelsSection {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entity in entities {
        let label = entity.entity_type().unwrap_or("(untyped)").to_string();
        *counts.entry(label).or_insert(0) += 1;
    }

    // Count descending, then name ascending for deterministic output.
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let total_distinct = sorted.len();
    let rest = sorted.split_off(top_n.min(sorted.len()));

    LabelsSection {
        top_n,
        total_distinct,
        total_entities: entities.len(),
        entries: sorted
            .into_iter()
            .map(|(label, count)| LabelCount { label, count })
            .collect(),
        other_count: rest.into_iter().map(|(_, count)| count).sum(),
    }
}
