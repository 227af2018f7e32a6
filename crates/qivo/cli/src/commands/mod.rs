//! CLI command implementations

pub mod audit;
pub mod compare;
pub mod convert;
pub mod plan;
pub mod rules;
pub mod trends;

use crate::error::{CliError, CliResult};
use crate::input::ReportInput;
use crate::output::OutputFormat;
use chrono::{NaiveDate, Utc};
use qivo_service::{
    AuditHistoryStore, ComplianceService, InMemoryStore, ServiceConfig, ServiceError,
};
use qivo_types::{AuditResult, CanonicalReport, StandardId};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ServiceConfig,
    pub format: OutputFormat,
}

impl Context {
    /// Service over an in-memory store seeded with `history`
    pub async fn service(
        &self,
        history: &[AuditResult],
    ) -> CliResult<(ComplianceService, Arc<InMemoryStore>)> {
        let store = Arc::new(InMemoryStore::new());
        for audit in history {
            store
                .append_audit(audit.clone())
                .await
                .map_err(ServiceError::from)?;
        }
        let service = ComplianceService::with_config(
            store.clone(),
            store.clone(),
            self.config.audit.clone(),
        );
        Ok((service, store))
    }
}

/// Evaluation date, defaulting to today
pub fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

/// Standard from the flag, else the document's own, else the one detected at ingestion
pub fn resolve_standard(
    flag: Option<StandardId>,
    input: &ReportInput,
    report: &CanonicalReport,
) -> CliResult<StandardId> {
    flag.or_else(|| input.standard())
        .or_else(|| report.detected_standard_id())
        .ok_or_else(|| {
            CliError::InvalidInput("cannot tell the report's standard; pass --standard".into())
        })
}

/// Report id from the flag, else the input file stem
pub fn report_id_for(path: &Path, report_id: Option<String>) -> String {
    report_id.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string())
    })
}

/// Report id from the flag, else the single report present in `history`
pub fn history_report_id(history: &[AuditResult], report_id: Option<String>) -> CliResult<String> {
    if let Some(id) = report_id {
        return Ok(id);
    }

    let ids: BTreeSet<&str> = history.iter().map(|a| a.report_id.as_str()).collect();
    let mut ids = ids.into_iter();
    match (ids.next(), ids.next()) {
        (Some(id), None) => Ok(id.to_string()),
        (None, _) => Err(CliError::InvalidInput("audit history is empty".to_string())),
        (Some(_), Some(_)) => Err(CliError::InvalidInput(
            "history holds several reports; pass --report-id".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn audit(report_id: &str) -> AuditResult {
        AuditResult {
            audit_id: format!("{report_id}-a"),
            report_id: report_id.into(),
            score: 100.0,
            total_rules: 0,
            passed_rules: 0,
            failed_rules: 0,
            issues: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_id_from_file_stem() {
        assert_eq!(report_id_for(Path::new("data/serra-azul.json"), None), "serra-azul");
        assert_eq!(report_id_for(Path::new("x.json"), Some("r9".into())), "r9");
    }

    #[test]
    fn test_history_report_id() {
        assert_eq!(history_report_id(&[audit("r1")], None).unwrap(), "r1");
        assert!(history_report_id(&[], None).is_err());
        assert!(history_report_id(&[audit("r1"), audit("r2")], None).is_err());
        assert_eq!(
            history_report_id(&[audit("r1"), audit("r2")], Some("r2".into())).unwrap(),
            "r2"
        );
    }
}
