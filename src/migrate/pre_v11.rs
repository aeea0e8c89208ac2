//! 1.0.x documents: legacy lists, possibly next to entities already written
//! in the current model.
//!
//! Mentions are grouped by chain in order of first appearance; unchained
//! mentions become singletons. A chain's head is its mention at the chain's
//! own index in the mention list. Head indexes are only recorded, and the
//! entity list only re-sorted by head offset, when the document used
//! in-document coreference, which is signalled by the first mention
//! carrying a chain id. Otherwise resolved entities come first, in the
//! order of the resolution list.

use std::collections::BTreeMap;

use super::{
    apply_resolution, convert_mention, typed_by, Legacy, MigrationIssue, MigrationIssueCode,
    MigrationReport,
};
use crate::error::MigrationError;
use crate::model::{Entity, EntityMention, ListAttribute, ResolvedEntity};

pub(crate) fn convert(
    existing: Option<&ListAttribute>,
    legacy: &Legacy<'_>,
    report: &mut MigrationReport,
) -> Result<ListAttribute, MigrationError> {
    let mut entities: Vec<Entity> = existing
        .map(|list| list.typed::<Entity>().cloned().collect())
        .unwrap_or_default();

    let in_document = legacy
        .mentions
        .first()
        .is_some_and(|m| m.chain_id().is_some());
    if legacy.mentions.is_empty() {
        entities.extend(from_resolutions_only(legacy)?);
    } else {
        entities.extend(from_mentions(legacy, in_document, report)?);
    }

    if in_document {
        entities.sort_by_key(head_start);
        report.add(MigrationIssue::info(
            MigrationIssueCode::SortedByHead,
            format!("{} entit(ies) ordered by head mention offset", entities.len()),
        ));
    }

    let mut extensions = legacy.prefixed_mention_list_extensions();
    if !extensions.is_empty() {
        report.add(MigrationIssue::info(
            MigrationIssueCode::ListExtensionsPrefixed,
            format!(
                "{} extended propert(ies) of the mention list kept with a 'mention.' prefix",
                extensions.len()
            ),
        ));
    }
    for (key, value) in existing.map(ListAttribute::extensions).into_iter().flatten() {
        extensions.insert(key.clone(), value.clone());
    }
    Ok(ListAttribute::of(entities).with_extensions(extensions)?)
}

/// Mentions sharing a chain, or a single unchained mention.
struct Group<'a> {
    chain: Option<usize>,
    members: Vec<&'a EntityMention>,
    head: usize,
}

fn from_mentions(
    legacy: &Legacy<'_>,
    in_document: bool,
    report: &mut MigrationReport,
) -> Result<Vec<Entity>, MigrationError> {
    // Chain id to the resolution's position in its list, and the resolution.
    let mut resolutions: BTreeMap<usize, (usize, &ResolvedEntity)> = BTreeMap::new();
    for (index, resolved) in legacy.resolved.iter().enumerate() {
        let chain_id = resolved
            .chain_id()
            .ok_or(MigrationError::ResolvedEntityWithoutChain { index })?;
        resolutions.insert(chain_id, (index, *resolved));
    }

    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut by_chain: BTreeMap<usize, usize> = BTreeMap::new();
    for (index, mention) in legacy.mentions.iter().enumerate() {
        let Some(chain_id) = mention.chain_id() else {
            groups.push(Group {
                chain: None,
                members: vec![*mention],
                head: 0,
            });
            continue;
        };
        let slot = *by_chain.entry(chain_id).or_insert_with(|| {
            groups.push(Group {
                chain: Some(chain_id),
                members: Vec::new(),
                head: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        if index == chain_id {
            group.head = group.members.len();
        }
        group.members.push(*mention);
    }

    if let Some(chain_id) = resolutions.keys().find(|c| !by_chain.contains_key(*c)) {
        return Err(MigrationError::EmptyCoreferenceChain {
            chain_id: *chain_id,
        });
    }

    let mut ranked = Vec::with_capacity(groups.len());
    for group in &groups {
        let mut builder = Entity::builder().mentions(group.members.iter().map(|m| convert_mention(m)));
        builder = typed_by(builder, group.members[group.head]);
        if in_document {
            builder = builder.head_mention_index(group.head);
        }
        let resolution = group.chain.and_then(|c| resolutions.get(&c));
        if let Some((_, resolved)) = resolution {
            builder = apply_resolution(builder, resolved);
        }
        ranked.push((resolution.map(|(rank, _)| *rank), builder.build()?));
    }

    // Without in-document chains the resolution list sets the order;
    // unresolved entities follow in document order.
    if !in_document {
        ranked.sort_by_key(|(rank, _)| rank.unwrap_or(usize::MAX));
    }
    let entities: Vec<Entity> = ranked.into_iter().map(|(_, entity)| entity).collect();

    report.add(MigrationIssue::info(
        MigrationIssueCode::GroupedByChain,
        format!(
            "{} mention(s) grouped into {} entit(ies), {} of them resolved",
            legacy.mentions.len(),
            entities.len(),
            resolutions.len()
        ),
    ));
    Ok(entities)
}

/// Resolutions with no mention list at all. Only chainless ones make sense.
fn from_resolutions_only(legacy: &Legacy<'_>) -> Result<Vec<Entity>, MigrationError> {
    legacy
        .resolved
        .iter()
        .map(|resolved| match resolved.chain_id() {
            Some(chain_id) => Err(MigrationError::EmptyCoreferenceChain { chain_id }),
            None => Ok(apply_resolution(Entity::builder(), resolved).build()?),
        })
        .collect()
}

fn head_start(entity: &Entity) -> usize {
    entity
        .head_mention()
        .or_else(|| entity.mentions().first())
        .map_or(usize::MAX, |m| m.span().start())
}
