//! Repository boundary
//!
//! The compliance core never performs I/O itself; reports and audit history come in
//! through these traits. Audit history is append-only.

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use qivo_types::{AuditResult, CanonicalReport};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of canonical reports produced by ingestion
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Get a report by id
    async fn fetch_report(&self, report_id: &str) -> StorageResult<Option<CanonicalReport>>;
}

/// Append-only store of audit results
#[async_trait]
pub trait AuditHistoryStore: Send + Sync {
    /// Record a completed audit; an existing audit id is a conflict
    async fn append_audit(&self, audit: AuditResult) -> StorageResult<()>;

    /// Every audit of a report, in insertion order
    async fn audit_history(&self, report_id: &str) -> StorageResult<Vec<AuditResult>>;
}

/// In-memory repository for development and testing
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    reports: Arc<RwLock<HashMap<String, CanonicalReport>>>,
    audits: Arc<RwLock<HashMap<String, Vec<AuditResult>>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a report snapshot
    pub async fn put_report(&self, report_id: impl Into<String>, report: CanonicalReport) {
        self.reports.write().await.insert(report_id.into(), report);
    }

    /// Total audits across all reports
    pub async fn audit_count(&self) -> usize {
        self.audits.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ReportSource for InMemoryStore {
    async fn fetch_report(&self, report_id: &str) -> StorageResult<Option<CanonicalReport>> {
        let reports = self.reports.read().await;
        Ok(reports.get(report_id).cloned())
    }
}

#[async_trait]
impl AuditHistoryStore for InMemoryStore {
    async fn append_audit(&self, audit: AuditResult) -> StorageResult<()> {
        let mut audits = self.audits.write().await;
        let duplicate = audits
            .values()
            .flatten()
            .any(|existing| existing.audit_id == audit.audit_id);
        if duplicate {
            return Err(StorageError::Conflict(format!(
                "audit {} already recorded",
                audit.audit_id
            )));
        }

        audits.entry(audit.report_id.clone()).or_default().push(audit);
        Ok(())
    }

    async fn audit_history(&self, report_id: &str) -> StorageResult<Vec<AuditResult>> {
        let audits = self.audits.read().await;
        Ok(audits.get(report_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn audit(id: &str, report_id: &str) -> AuditResult {
        AuditResult {
            audit_id: id.into(),
            report_id: report_id.into(),
            score: 50.0,
            total_rules: 2,
            passed_rules: 1,
            failed_rules: 1,
            issues: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_reports_round_trip() {
        let store = InMemoryStore::new();
        store
            .put_report("r1", CanonicalReport::new().with_project_name("Serra Azul"))
            .await;

        let report = store.fetch_report("r1").await.unwrap().unwrap();
        assert_eq!(report.metadata.project_name.as_deref(), Some("Serra Azul"));
        assert!(store.fetch_report("r2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_is_append_only() {
        let store = InMemoryStore::new();
        store.append_audit(audit("a1", "r1")).await.unwrap();
        store.append_audit(audit("a2", "r1")).await.unwrap();
        store.append_audit(audit("a3", "r2")).await.unwrap();

        let err = store.append_audit(audit("a1", "r1")).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let history = store.audit_history("r1").await.unwrap();
        let ids: Vec<_> = history.iter().map(|a| a.audit_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
        assert!(store.audit_history("missing").await.unwrap().is_empty());
        assert_eq!(store.audit_count().await, 3);
    }
}
