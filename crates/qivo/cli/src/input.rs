//! JSON input files: reports, standard documents and audit histories

use crate::error::{CliError, CliResult};
use qivo_mappers::{to_canonical, StandardView};
use qivo_types::{AuditResult, CanonicalReport, StandardId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A report read from disk
#[derive(Debug, Clone)]
pub enum ReportInput {
    Canonical(CanonicalReport),
    /// A document in one of the supported standards
    Document(StandardView),
}

impl ReportInput {
    /// The report in canonical form
    pub fn canonical(&self) -> CanonicalReport {
        match self {
            Self::Canonical(report) => report.clone(),
            Self::Document(view) => to_canonical(view),
        }
    }

    /// Standard the input follows, if it is a standard document
    pub fn standard(&self) -> Option<StandardId> {
        match self {
            Self::Canonical(_) => None,
            Self::Document(view) => Some(view.standard()),
        }
    }
}

fn read_value(path: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn decode<T: DeserializeOwned>(path: &Path, value: Value) -> CliResult<T> {
    serde_json::from_value(value).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a canonical report, or a standard document when a `standard` field is present
pub fn load_report(path: &Path) -> CliResult<ReportInput> {
    let value = read_value(path)?;
    if value.get("standard").is_some() {
        debug!(path = %path.display(), "Reading standard document");
        Ok(ReportInput::Document(StandardView::from_json(value)?))
    } else {
        debug!(path = %path.display(), "Reading canonical report");
        Ok(ReportInput::Canonical(decode(path, value)?))
    }
}

/// Read an audit history; a missing file is an empty history
pub fn load_history(path: &Path) -> CliResult<Vec<AuditResult>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let value = read_value(path)?;
    decode(path, value)
}

/// Write a value as pretty JSON
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text + "\n").map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
