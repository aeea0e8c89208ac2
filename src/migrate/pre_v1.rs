//! Documents with no version member.
//!
//! Three shapes occur, and the first that applies wins:
//!
//! 1. resolved entities are present: one entity per resolution, holding its
//!    chain's mentions, followed by a singleton for every mention that no
//!    resolution claimed;
//! 2. some mention has a chain id: one entity per chain in chain id order,
//!    followed by the unchained mentions as singletons;
//! 3. otherwise one singleton entity per mention.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    apply_resolution, convert_mention, singleton, typed_by, Legacy, MigrationIssue,
    MigrationIssueCode, MigrationReport,
};
use crate::error::MigrationError;
use crate::model::{Entity, EntityMention, ListAttribute};

pub(crate) fn convert(
    legacy: &Legacy<'_>,
    report: &mut MigrationReport,
) -> Result<ListAttribute, MigrationError> {
    let entities = if legacy.resolved_list_extensions.is_some() {
        from_resolutions(legacy, report)?
    } else if legacy.mentions.iter().any(|m| m.chain_id().is_some()) {
        from_chains(legacy, report)?
    } else {
        report.add(MigrationIssue::info(
            MigrationIssueCode::TrivialConversion,
            format!(
                "{} mention(s) without coreference became one entity each",
                legacy.mentions.len()
            ),
        ));
        legacy
            .mentions
            .iter()
            .map(|m| singleton(m))
            .collect::<Result<Vec<_>, _>>()?
    };

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
    for (key, value) in legacy.resolved_list_extensions.into_iter().flatten() {
        extensions.insert(key.clone(), value.clone());
    }
    Ok(ListAttribute::of(entities).with_extensions(extensions)?)
}

fn from_resolutions(
    legacy: &Legacy<'_>,
    report: &mut MigrationReport,
) -> Result<Vec<Entity>, MigrationError> {
    let mut chains: BTreeMap<usize, Vec<&EntityMention>> = BTreeMap::new();
    for mention in &legacy.mentions {
        if let Some(chain_id) = mention.chain_id() {
            chains.entry(chain_id).or_default().push(*mention);
        }
    }

    let mut claimed = BTreeSet::new();
    let mut entities = Vec::with_capacity(legacy.resolved.len());
    for (index, resolved) in legacy.resolved.iter().enumerate() {
        let chain_id = resolved
            .chain_id()
            .ok_or(MigrationError::ResolvedEntityWithoutChain { index })?;
        let chain = chains
            .get(&chain_id)
            .filter(|chain| !chain.is_empty())
            .ok_or(MigrationError::EmptyCoreferenceChain { chain_id })?;
        claimed.insert(chain_id);

        let mut builder = Entity::builder().mentions(chain.iter().map(|m| convert_mention(m)));
        // Offsets are not unique; the last match is the head.
        let head = match chain.iter().rposition(|m| m.span() == resolved.span()) {
            Some(head) => {
                builder = builder.head_mention_index(head);
                head
            }
            None => {
                report.add(MigrationIssue::warning(
                    MigrationIssueCode::HeadNotFound,
                    format!(
                        "resolved entity {index} at {} matches no mention of chain {chain_id}; no head set",
                        resolved.span()
                    ),
                ));
                0
            }
        };
        builder = typed_by(builder, chain[head]);
        entities.push(apply_resolution(builder, resolved).build()?);
    }

    let mut unresolved = 0;
    for mention in &legacy.mentions {
        let is_claimed = mention
            .chain_id()
            .is_some_and(|chain_id| claimed.contains(&chain_id));
        if !is_claimed {
            entities.push(singleton(mention)?);
            unresolved += 1;
        }
    }

    report.add(MigrationIssue::info(
        MigrationIssueCode::ResolvedConversion,
        format!(
            "{} resolved entit(ies) built from their chains, {unresolved} unresolved mention(s) kept as singletons",
            legacy.resolved.len()
        ),
    ));
    Ok(entities)
}

fn from_chains(
    legacy: &Legacy<'_>,
    report: &mut MigrationReport,
) -> Result<Vec<Entity>, MigrationError> {
    let mut chains: BTreeMap<usize, Vec<(usize, &EntityMention)>> = BTreeMap::new();
    let mut unchained = Vec::new();
    for (index, mention) in legacy.mentions.iter().enumerate() {
        match mention.chain_id() {
            Some(chain_id) => chains.entry(chain_id).or_default().push((index, *mention)),
            None => unchained.push(*mention),
        }
    }

    let mut defaulted = 0;
    let mut entities = Vec::with_capacity(chains.len() + unchained.len());
    for (chain_id, members) in &chains {
        // The head is the mention sitting at the chain's own index.
        let head = members
            .iter()
            .position(|(index, _)| index == chain_id)
            .unwrap_or_else(|| {
                defaulted += 1;
                0
            });
        let builder = Entity::builder()
            .mentions(members.iter().map(|(_, m)| convert_mention(m)))
            .head_mention_index(head);
        entities.push(typed_by(builder, members[head].1).build()?);
    }
    for mention in &unchained {
        entities.push(singleton(mention)?);
    }

    report.add(MigrationIssue::info(
        MigrationIssueCode::GroupedByChain,
        format!(
            "{} mention(s) grouped into {} chain(s), {} unchained",
            legacy.mentions.len() - unchained.len(),
            chains.len(),
            unchained.len()
        ),
    ));
    if defaulted > 0 {
        report.add(MigrationIssue::info(
            MigrationIssueCode::DefaultHeadMention,
            format!("{defaulted} chain(s) had no mention at the chain's own index; first mention used as head"),
        ));
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::super::testdata::{self, NAMES};
    use super::*;
    use crate::codec::SchemaEpoch;
    use crate::model::{Mention, ResolvedEntity, Span};

    fn run(
        mentions: Option<&ListAttribute>,
        resolved: Option<&ListAttribute>,
    ) -> Result<(Vec<Entity>, MigrationReport), MigrationError> {
        let legacy = Legacy::new(mentions, resolved)?;
        let mut report = MigrationReport::new(SchemaEpoch::PreV1);
        let list = convert(&legacy, &mut report)?;
        Ok((list.typed::<Entity>().cloned().collect(), report))
    }

    fn names(entity: &Entity) -> Vec<&str> {
        entity
            .mentions()
            .iter()
            .filter_map(Mention::normalized)
            .collect()
    }

    #[test]
    fn unchained_mentions_become_headed_singletons() {
        let (entities, report) = run(Some(&testdata::mentions(false)), None).unwrap();
        assert_eq!(entities.len(), 7);
        for (entity, name) in entities.iter().zip(NAMES) {
            assert_eq!(names(entity), [name]);
            assert_eq!(entity.head_mention_index(), Some(0));
        }
        assert_eq!(report.issues[0].code, MigrationIssueCode::TrivialConversion);
    }

    #[test]
    fn chains_are_ordered_by_id() {
        let (entities, _) = run(Some(&testdata::mentions(true)), None).unwrap();
        let grouped: Vec<_> = entities.iter().map(names).collect();
        assert_eq!(
            grouped,
            [
                vec!["Bill Clinton", "Clinton"],
                vec!["president", "president"],
                vec!["Secretary of State"],
                vec!["Hillary", "Hillary Clinton"],
            ]
        );
        // Chain 5's mention at index 5 is "Hillary Clinton".
        assert_eq!(entities[3].head_mention_index(), Some(1));
        assert_eq!(entities[3].entity_type(), Some("PERSON"));
        // Chain 4's only mention sits at index 4.
        assert_eq!(entities[2].head_mention_index(), Some(0));
    }

    #[test]
    fn missing_head_defaults_to_first() {
        let mentions = ListAttribute::of([
            EntityMention::new(Span::new(0, 3).unwrap(), "ORG").with_coreference_chain_id(9),
            EntityMention::new(Span::new(5, 8).unwrap(), "ORG").with_coreference_chain_id(9),
        ]);
        let (entities, report) = run(Some(&mentions), None).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].head_mention_index(), Some(0));
        assert!(report
            .issues
            .iter()
            .any(|i| i.code == MigrationIssueCode::DefaultHeadMention));
    }

    #[test]
    fn resolutions_claim_their_chains() {
        let (entities, _) =
            run(Some(&testdata::mentions(true)), Some(&testdata::resolved())).unwrap();
        // One resolved entity, then the five mentions of unresolved chains.
        assert_eq!(entities.len(), 6);
        let hillary = &entities[0];
        assert_eq!(names(hillary), ["Hillary", "Hillary Clinton"]);
        assert_eq!(hillary.head_mention_index(), Some(1));
        assert_eq!(hillary.entity_id(), Some("Q6294"));
        assert_eq!(hillary.confidence(), Some(1.0));
        assert_eq!(
            hillary.extensions().get("oldCoreferenceChainId"),
            Some(&5.into())
        );
        let rest: Vec<_> = entities[1..].iter().flat_map(names).collect();
        assert_eq!(
            rest,
            ["Bill Clinton", "president", "Clinton", "Secretary of State", "president"]
        );
    }

    #[test]
    fn resolution_without_offsets_match_has_no_head() {
        let resolved = ListAttribute::of([
            ResolvedEntity::new(Span::new(1, 2).unwrap()).with_coreference_chain_id(5)
        ]);
        let (entities, report) = run(Some(&testdata::mentions(true)), Some(&resolved)).unwrap();
        assert_eq!(entities[0].head_mention_index(), None);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn resolution_of_an_empty_chain_is_fatal() {
        let resolved = ListAttribute::of([
            ResolvedEntity::new(Span::new(0, 1).unwrap()).with_coreference_chain_id(42)
        ]);
        assert_eq!(
            run(Some(&testdata::mentions(true)), Some(&resolved)).unwrap_err(),
            MigrationError::EmptyCoreferenceChain { chain_id: 42 }
        );
        assert_eq!(
            run(None, Some(&testdata::resolved())).unwrap_err(),
            MigrationError::EmptyCoreferenceChain { chain_id: 5 }
        );
    }

    #[test]
    fn list_extensions_are_carried() {
        let mentions = testdata::mentions(false).with_extension("origin", "ner").unwrap();
        let resolved = ListAttribute::of(Vec::<ResolvedEntity>::new())
            .with_extension("kb", "wikidata")
            .unwrap();
        let legacy = Legacy::new(Some(&mentions), Some(&resolved)).unwrap();
        let mut report = MigrationReport::new(SchemaEpoch::PreV1);
        let list = convert(&legacy, &mut report).unwrap();
        assert_eq!(list.extensions().get("mention.origin"), Some(&"ner".into()));
        assert_eq!(list.extensions().get("kb"), Some(&"wikidata".into()));
        assert_eq!(list.len(), 7);
    }
}
