//! Migration report types.
//!
//! A report records which pass ran over a legacy document, how many legacy
//! records went in and how many entities came out, and any notes about how
//! the old shape was interpreted.

use serde::Serialize;
use std::fmt;

use crate::codec::SchemaEpoch;

/// What happened while bringing a document up to the current entity model.
#[derive(Clone, Debug, Serialize)]
pub struct MigrationReport {
    /// The schema the document was written with.
    pub from: SchemaEpoch,
    /// Legacy records found in the input.
    pub input: MigrationCounts,
    /// Entities in the migrated document.
    pub entities: usize,
    /// Notes and warnings from the pass.
    pub issues: Vec<MigrationIssue>,
}

impl MigrationReport {
    /// Creates an empty report for a document of the given epoch.
    pub fn new(from: SchemaEpoch) -> Self {
        Self {
            from,
            input: MigrationCounts::default(),
            entities: 0,
            issues: Vec::new(),
        }
    }

    pub fn add(&mut self, issue: MigrationIssue) {
        self.issues.push(issue);
    }

    /// Returns true if a migration pass actually rewrote something.
    pub fn migrated(&self) -> bool {
        self.from.needs_migration() && self.input != MigrationCounts::default()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == MigrationSeverity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == MigrationSeverity::Info)
            .count()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  schema: {}", self.from)?;
        if self.migrated() {
            writeln!(
                f,
                "  {} entity mention(s), {} resolved entit(ies), {} entit(ies) -> {} entit(ies)",
                self.input.entity_mentions,
                self.input.resolved_entities,
                self.input.entities,
                self.entities
            )?;
        }

        for (label, severity) in [
            ("Warnings", MigrationSeverity::Warning),
            ("Notes", MigrationSeverity::Info),
        ] {
            let count = self.issues.iter().filter(|i| i.severity == severity).count();
            if count == 0 {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} ({}):", label, count)?;
            for issue in self.issues.iter().filter(|i| i.severity == severity) {
                writeln!(f, "  - {}", issue.message)?;
            }
        }
        Ok(())
    }
}

/// Legacy record counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MigrationCounts {
    pub entity_mentions: usize,
    pub resolved_entities: usize,
    pub entities: usize,
}

/// A single note produced by a migration pass.
#[derive(Clone, Debug, Serialize)]
pub struct MigrationIssue {
    pub severity: MigrationSeverity,
    pub code: MigrationIssueCode,
    pub message: String,
}

impl MigrationIssue {
    pub fn warning(code: MigrationIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: MigrationSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn info(code: MigrationIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: MigrationSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationSeverity {
    /// Something in the legacy data could not be carried over exactly.
    Warning,
    /// A description of how the legacy data was interpreted.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationIssueCode {
    /// Mentions without chains became one entity each, headed by that mention.
    TrivialConversion,
    /// Mentions were grouped into entities by coreference chain.
    GroupedByChain,
    /// Entities were built from resolved-entity records.
    ResolvedConversion,
    /// Entities were re-sorted by head mention offset.
    SortedByHead,
    /// No mention in a chain sat at the chain's own index; the first was used.
    DefaultHeadMention,
    /// A resolved entity's offsets matched none of its chain's mentions.
    HeadNotFound,
    /// The legacy mention list carried extended properties.
    ListExtensionsPrefixed,
}
