//! Serialization of contact sequences into export files.
//!
//! JSON exports are a 2-space indented array. CSV exports take their header
//! from the fields present on the first record; later records contribute only
//! those columns, with blanks where a field is unset.

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::Contact;
use std::fmt;
use std::str::FromStr;

/// Supported export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "selected_contacts.json",
            Self::Csv => "selected_contacts.csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv;charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(DirectoryError::Export(format!(
                "unsupported format '{}', expected json or csv",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// A serialized export, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize `contacts`, in the order given, into `format`.
pub fn serialize_contacts(contacts: &[Contact], format: ExportFormat) -> DirectoryResult<ExportFile> {
    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(contacts)?,
        ExportFormat::Csv => to_csv(contacts)?,
    };

    Ok(ExportFile {
        file_name: format.file_name(),
        content_type: format.content_type(),
        bytes,
    })
}

fn to_csv(contacts: &[Contact]) -> DirectoryResult<Vec<u8>> {
    let Some(first) = contacts.first() else {
        return Ok(Vec::new());
    };

    let header: Vec<&str> = first
        .present_fields()
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&header).map_err(csv_error)?;
    for contact in contacts {
        let row = header
            .iter()
            .map(|name| contact.field(name).unwrap_or_default());
        writer.write_record(row).map_err(csv_error)?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| DirectoryError::Export(e.to_string()))?;

    // CRLF separates rows; the last row has none
    if bytes.ends_with(b"\r\n") {
        bytes.truncate(bytes.len() - 2);
    }
    Ok(bytes)
}

fn csv_error(e: csv::Error) -> DirectoryError {
    DirectoryError::Export(e.to_string())
}
