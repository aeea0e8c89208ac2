use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for annotext operations.
#[derive(Debug, Error)]
pub enum AnnotextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document JSON from {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write document JSON to {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },
}

/// Violations of the attribute model's construction contracts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid span: start offset {start} is after end offset {end}")]
    InvalidSpan { start: usize, end: usize },

    #[error("list item {index} is a '{found}' but the collection holds '{expected}' items")]
    HeterogeneousItem {
        expected: String,
        found: String,
        index: usize,
    },

    #[error("'{key}' is a declared field and cannot be used as an extended property")]
    ReservedExtensionKey { key: String },

    #[error("head mention index {index} is out of range for {mentions} mention(s)")]
    HeadMentionOutOfRange { index: usize, mentions: usize },

    #[error("'{field}' has {left} entries but its tag list has {right}")]
    MismatchedPairs {
        field: &'static str,
        left: usize,
        right: usize,
    },
}

/// Rejected `version` values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("malformed document version '{0}': expected major.minor.patch[-SNAPSHOT]")]
    Malformed(String),

    #[error("incompatible document version '{version}': only major version {supported} is supported")]
    Incompatible { version: String, supported: u32 },
}

/// Legacy entity data that cannot be reconciled with the current entity model.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("resolved entity refers to coreference chain {chain_id}, which has no mentions")]
    EmptyCoreferenceChain { chain_id: usize },

    #[error("resolved entity {index} has no coreference chain id")]
    ResolvedEntityWithoutChain { index: usize },

    #[error("coreference chain id {chain_id} is negative")]
    NegativeChainId { chain_id: i64 },

    #[error(transparent)]
    Model(#[from] ModelError),
}
