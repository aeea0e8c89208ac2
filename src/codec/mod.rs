//! JSON encoding and decoding of annotated-text documents.
//!
//! The entry points here read and write whole documents. Decoding always
//! runs the version gate and any migration the version calls for; use the
//! `_with_report` variants to see what migration did.

mod collection;
mod document;
mod element;
pub(crate) mod morpho;
mod replay;
mod version;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use document::RawDocument;

use crate::error::AnnotextError;
use crate::migrate::MigrationReport;
use crate::model::AnnotatedText;

#[cfg(feature = "fuzzing")]
pub use document::fuzz_decode_attribute;
pub use morpho::analyses_from_json;
pub use version::{DocumentVersion, SchemaEpoch, VersionGate, CURRENT_VERSION, SUPPORTED_MAJOR};

/// Decodes a document from a JSON string.
pub fn from_json_str(json: &str) -> Result<AnnotatedText, AnnotextError> {
    Ok(from_json_str_with_report(json)?.0)
}

/// Decodes a document from a JSON string, returning the migration report.
pub fn from_json_str_with_report(
    json: &str,
) -> Result<(AnnotatedText, MigrationReport), AnnotextError> {
    serde_json::from_str::<RawDocument>(json)?.into_document()
}

/// Decodes a document from JSON bytes.
pub fn from_json_slice(json: &[u8]) -> Result<AnnotatedText, AnnotextError> {
    Ok(serde_json::from_slice::<RawDocument>(json)?.into_document()?.0)
}

/// Decodes a document from a reader.
pub fn from_reader<R: Read>(reader: R) -> Result<AnnotatedText, AnnotextError> {
    Ok(serde_json::from_reader::<_, RawDocument>(reader)?.into_document()?.0)
}

/// Encodes a document as compact JSON.
pub fn to_json_string(document: &AnnotatedText) -> Result<String, AnnotextError> {
    Ok(serde_json::to_string(document)?)
}

/// Encodes a document as indented JSON.
pub fn to_json_string_pretty(document: &AnnotatedText) -> Result<String, AnnotextError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Reads a document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, if its version is
/// not supported, or if its legacy entity data is inconsistent.
pub fn read_document(path: &Path) -> Result<AnnotatedText, AnnotextError> {
    Ok(read_document_with_report(path)?.0)
}

/// Reads a document from a JSON file, returning the migration report.
pub fn read_document_with_report(
    path: &Path,
) -> Result<(AnnotatedText, MigrationReport), AnnotextError> {
    let file = File::open(path).map_err(AnnotextError::Io)?;
    let reader = BufReader::new(file);

    let raw: RawDocument =
        serde_json::from_reader(reader).map_err(|source| AnnotextError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;
    let (document, report) = raw.into_document()?;
    tracing::debug!(path = %path.display(), attributes = document.attributes().len(), "read document");
    Ok((document, report))
}

/// Writes a document to a JSON file, stamped with [`CURRENT_VERSION`].
pub fn write_document(path: &Path, document: &AnnotatedText, pretty: bool) -> Result<(), AnnotextError> {
    let file = File::create(path).map_err(AnnotextError::Io)?;
    let mut writer = BufWriter::new(file);

    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, document)
    } else {
        serde_json::to_writer(&mut writer, document)
    };
    written.map_err(|source| AnnotextError::DocumentWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
