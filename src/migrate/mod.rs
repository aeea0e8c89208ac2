//! Rewriting legacy entity data into the current entity model.
//!
//! Documents written before 1.1 describe entities as two flat lists: one
//! `EntityMention` per occurrence, linked by coreference chain ids, and one
//! `ResolvedEntity` per linked chain. Decoding such a document removes both
//! lists and puts an `entities` list of [`Entity`] values in their place.
//!
//! Which pass runs depends on the document version:
//!
//! - no version: chains are grouped by id, resolutions matched by offsets
//! - 1.0.x: chains are grouped by first appearance; existing entities are kept
//! - 1.1 and later: nothing
//!
//! Fields of the legacy records that have no home in the new model are kept
//! as extended properties (`oldFlags`, `oldCoreferenceChainId`,
//! `old-entity-type`) so the old shape can still be reconstructed.

use std::collections::BTreeMap;

use crate::codec::SchemaEpoch;
use crate::error::MigrationError;
use crate::model::{
    keys, AttributeKind, AttributeValue, Entity, EntityBuilder, EntityMention, Extensions,
    ListAttribute, Mention, ResolvedEntity,
};

mod pre_v1;
mod pre_v11;
mod report;

pub use report::{
    MigrationCounts, MigrationIssue, MigrationIssueCode, MigrationReport, MigrationSeverity,
};

/// Upgrades the attribute map of a document written under `epoch`.
///
/// Returns a report describing what was done. Documents already on the
/// current schema pass through untouched.
pub fn upgrade(
    epoch: SchemaEpoch,
    attributes: &mut BTreeMap<String, AttributeValue>,
) -> Result<MigrationReport, MigrationError> {
    let mut report = MigrationReport::new(epoch);
    if !epoch.needs_migration() {
        return Ok(report);
    }

    let mentions = take_list(attributes, keys::ENTITY_MENTIONS, AttributeKind::EntityMention);
    let resolved = take_list(attributes, keys::RESOLVED_ENTITIES, AttributeKind::ResolvedEntity);
    if mentions.is_none() && resolved.is_none() {
        tracing::debug!(%epoch, "no legacy entity data to migrate");
        return Ok(report);
    }
    let existing = take_list(attributes, keys::ENTITIES, AttributeKind::Entity);

    let legacy = Legacy::new(mentions.as_ref(), resolved.as_ref())?;
    report.input = MigrationCounts {
        entity_mentions: legacy.mentions.len(),
        resolved_entities: legacy.resolved.len(),
        entities: existing.as_ref().map_or(0, ListAttribute::len),
    };

    let entities = match epoch {
        SchemaEpoch::PreV1 => {
            let converted = pre_v1::convert(&legacy, &mut report)?;
            match existing {
                Some(existing) => prepend(existing, converted)?,
                None => converted,
            }
        }
        SchemaEpoch::V1_0 => pre_v11::convert(existing.as_ref(), &legacy, &mut report)?,
        SchemaEpoch::Current => unreachable!("current documents return early"),
    };

    report.entities = entities.len();
    tracing::debug!(
        %epoch,
        mentions = report.input.entity_mentions,
        resolved = report.input.resolved_entities,
        entities = report.entities,
        "migrated legacy entity model"
    );
    attributes.insert(keys::ENTITIES.to_string(), entities.into());
    Ok(report)
}

/// Removes the list stored under `name` if it holds `kind` items.
fn take_list(
    attributes: &mut BTreeMap<String, AttributeValue>,
    name: &str,
    kind: AttributeKind,
) -> Option<ListAttribute> {
    match attributes.remove(name) {
        Some(AttributeValue::List(list)) if list.item_kind() == kind => Some(list),
        Some(other) => {
            tracing::warn!(attribute = name, tag = other.wire_tag(), "leaving unexpected legacy attribute in place");
            attributes.insert(name.to_string(), other);
            None
        }
        None => None,
    }
}

/// The legacy lists of one document, borrowed and checked.
pub(crate) struct Legacy<'a> {
    pub(crate) mentions: Vec<&'a EntityMention>,
    pub(crate) resolved: Vec<&'a ResolvedEntity>,
    pub(crate) mention_list_extensions: Option<&'a Extensions>,
    pub(crate) resolved_list_extensions: Option<&'a Extensions>,
}

impl<'a> Legacy<'a> {
    /// Borrows the legacy lists, rejecting chain ids below `-1`.
    pub(crate) fn new(
        mentions: Option<&'a ListAttribute>,
        resolved: Option<&'a ListAttribute>,
    ) -> Result<Self, MigrationError> {
        let legacy = Self {
            mentions: mentions.map(|l| l.typed().collect()).unwrap_or_default(),
            resolved: resolved.map(|l| l.typed().collect()).unwrap_or_default(),
            mention_list_extensions: mentions.map(ListAttribute::extensions),
            resolved_list_extensions: resolved.map(ListAttribute::extensions),
        };

        let chain_ids = legacy
            .mentions
            .iter()
            .map(|m| m.raw_coreference_chain_id())
            .chain(legacy.resolved.iter().map(|r| r.raw_coreference_chain_id()));
        for chain_id in chain_ids.flatten() {
            if chain_id < -1 {
                return Err(MigrationError::NegativeChainId { chain_id });
            }
        }
        Ok(legacy)
    }

    /// The mention list's own extended properties, renamed `mention.<key>`.
    pub(crate) fn prefixed_mention_list_extensions(&self) -> Extensions {
        self.mention_list_extensions
            .into_iter()
            .flatten()
            .map(|(key, value)| (format!("mention.{key}"), value.clone()))
            .collect()
    }
}

/// Converts one legacy mention, keeping what the new model has no field for.
pub(crate) fn convert_mention(legacy: &EntityMention) -> Mention {
    let mut mention = Mention::new(legacy.span());
    if let Some(confidence) = legacy.confidence() {
        mention = mention.with_confidence(confidence);
    }
    if let Some(confidence) = legacy.linking_confidence() {
        mention = mention.with_linking_confidence(confidence);
    }
    if let Some(normalized) = legacy.normalized() {
        mention = mention.with_normalized(normalized);
    }
    if let Some(source) = legacy.source() {
        mention = mention.with_source(source);
    }
    if let Some(subsource) = legacy.subsource() {
        mention = mention.with_subsource(subsource);
    }

    let mut carried = Extensions::new();
    if let Some(flags) = legacy.flags().filter(|flags| *flags != 0) {
        carried.insert("oldFlags", flags.into());
    }
    if let Some(chain_id) = legacy.raw_coreference_chain_id() {
        carried.insert("oldCoreferenceChainId", chain_id.into());
    }
    for (key, value) in legacy.extensions() {
        carried.insert(key.clone(), value.clone());
    }
    carried.insert("old-entity-type", legacy.entity_type().into());

    mention.absorb_extensions(&carried)
}

/// Copies a resolved entity's identity onto an entity under construction.
pub(crate) fn apply_resolution(mut builder: EntityBuilder, resolved: &ResolvedEntity) -> EntityBuilder {
    if let Some(id) = resolved.entity_id() {
        builder = builder.entity_id(id);
    }
    if let Some(confidence) = resolved.confidence() {
        builder = builder.confidence(confidence);
    }
    if let Some(sentiment) = resolved.sentiment() {
        builder = builder.sentiment(sentiment.clone());
    }
    let mut carried = resolved.extensions().clone();
    if let Some(chain_id) = resolved.raw_coreference_chain_id() {
        carried.insert("oldCoreferenceChainId", chain_id.into());
    }
    builder.absorb_extensions(&carried)
}

/// Sets the entity type from a legacy mention, unless it has none.
pub(crate) fn typed_by(builder: EntityBuilder, legacy: &EntityMention) -> EntityBuilder {
    match legacy.entity_type() {
        "" => builder,
        entity_type => builder.entity_type(entity_type),
    }
}

/// One entity holding one legacy mention, headed by it.
pub(crate) fn singleton(legacy: &EntityMention) -> Result<Entity, MigrationError> {
    let builder = Entity::builder()
        .mention(convert_mention(legacy))
        .head_mention_index(0);
    Ok(typed_by(builder, legacy).build()?)
}

/// Puts the entities of `existing` ahead of `converted`.
fn prepend(existing: ListAttribute, converted: ListAttribute) -> Result<ListAttribute, MigrationError> {
    let mut extensions = existing.extensions().clone();
    for (key, value) in converted.extensions() {
        extensions.insert(key.clone(), value.clone());
    }
    let entities: Vec<Entity> = existing
        .typed::<Entity>()
        .chain(converted.typed::<Entity>())
        .cloned()
        .collect();
    Ok(ListAttribute::of(entities).with_extensions(extensions)?)
}
