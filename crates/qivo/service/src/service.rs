//! Compliance service
//!
//! Orchestrates the pure engines over the repository boundary: fetch, audit, append.

use crate::config::AuditConfig;
use crate::error::{Result, ServiceError};
use crate::repository::{AuditHistoryStore, ReportSource};
use chrono::{NaiveDate, Utc};
use qivo_audit::{
    rule_set, run_scan, run_scan_concurrent, CatalogContext, CorrectionPlan, ScanMode,
    ScanReport,
};
use qivo_mappers::{to_standard, StandardView};
use qivo_trends::{
    audit_statistics, compare_by_id, compare_latest, compare_with_rewrites, compute_trends,
    AuditStatistics, ComparisonResult, RewriteComparison, SectionRewriter, TrendsResult,
};
use qivo_types::{AuditResult, CanonicalReport, StandardId};
use std::sync::Arc;
use tracing::{debug, info};

/// Audits, trends and conversions over injected repositories
#[derive(Clone)]
pub struct ComplianceService {
    reports: Arc<dyn ReportSource>,
    history: Arc<dyn AuditHistoryStore>,
    config: AuditConfig,
}

impl ComplianceService {
    /// Create a service with the default audit configuration
    pub fn new(reports: Arc<dyn ReportSource>, history: Arc<dyn AuditHistoryStore>) -> Self {
        Self::with_config(reports, history, AuditConfig::default())
    }

    pub fn with_config(
        reports: Arc<dyn ReportSource>,
        history: Arc<dyn AuditHistoryStore>,
        config: AuditConfig,
    ) -> Self {
        Self {
            reports,
            history,
            config,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Catalog context for a scan evaluated on `as_of`
    pub fn context(&self, as_of: NaiveDate) -> CatalogContext {
        CatalogContext::new(as_of).with_stale_after_months(self.config.stale_after_months)
    }

    async fn report(&self, report_id: &str) -> Result<CanonicalReport> {
        self.reports
            .fetch_report(report_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("report {report_id}")))
    }

    /// Audit a stored report and append the result to its history
    ///
    /// `mode` falls back to the configured default.
    pub async fn audit_report(
        &self,
        report_id: &str,
        standard: StandardId,
        mode: Option<ScanMode>,
        as_of: NaiveDate,
    ) -> Result<ScanReport> {
        let mode = mode.unwrap_or(self.config.default_mode);
        let report = self.report(report_id).await?;
        let context = self.context(as_of);

        debug!(
            report_id,
            standard = standard.id(),
            mode = mode.as_str(),
            parallel = self.config.parallel,
            "Auditing stored report"
        );

        let scan = if self.config.parallel {
            run_scan_concurrent(report_id, Arc::new(report), standard, mode, &context).await
        } else {
            run_scan(report_id, &report, standard, mode, &context)
        };

        self.history.append_audit(scan.audit.clone()).await?;

        info!(
            report_id,
            audit_id = %scan.audit.audit_id,
            score = scan.audit.score,
            issues = scan.audit.issues.len(),
            "Audit recorded"
        );

        Ok(scan)
    }

    /// Every recorded audit of a report
    pub async fn history(&self, report_id: &str) -> Result<Vec<AuditResult>> {
        Ok(self.history.audit_history(report_id).await?)
    }

    pub async fn trends(&self, report_id: &str) -> Result<TrendsResult> {
        let history = self.history(report_id).await?;
        Ok(compute_trends(&history)?)
    }

    /// Compare the two most recent audits of a report
    pub async fn compare_latest(&self, report_id: &str) -> Result<ComparisonResult> {
        let history = self.history(report_id).await?;
        Ok(compare_latest(&history)?)
    }

    /// Compare two specific audits of a report
    pub async fn compare(
        &self,
        report_id: &str,
        previous_id: &str,
        current_id: &str,
    ) -> Result<ComparisonResult> {
        let history = self.history(report_id).await?;
        Ok(compare_by_id(&history, previous_id, current_id)?)
    }

    pub async fn statistics(&self, report_id: &str) -> Result<AuditStatistics> {
        let history = self.history(report_id).await?;
        Ok(audit_statistics(&history))
    }

    /// Project a stored report into `target`
    pub async fn convert(&self, report_id: &str, target: StandardId) -> Result<StandardView> {
        let report = self.report(report_id).await?;
        Ok(to_standard(target, &report))
    }

    /// Correction plan for the most recent audit of a report
    ///
    /// Recommendations are looked up in the deep catalog so every issue code resolves.
    pub async fn correction_plan(
        &self,
        report_id: &str,
        standard: StandardId,
        as_of: NaiveDate,
    ) -> Result<CorrectionPlan> {
        let history = self.history(report_id).await?;
        let latest = history
            .iter()
            .max_by_key(|audit| audit.created_at)
            .ok_or_else(|| ServiceError::NotFound(format!("audits of report {report_id}")))?;

        let rules = rule_set(standard, ScanMode::Deep, &self.context(as_of));
        Ok(CorrectionPlan::generate(latest, &rules, Utc::now()))
    }

    /// Compare each section of a stored report with its rewrite
    pub async fn compare_with_rewrites(
        &self,
        report_id: &str,
        standard: StandardId,
        rewriter: &dyn SectionRewriter,
    ) -> Result<RewriteComparison> {
        let report = self.report(report_id).await?;
        Ok(compare_with_rewrites(report_id, &report, standard, rewriter, Utc::now()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use async_trait::async_trait;
    use qivo_trends::{RewriteError, Trend, TrendError};
    use qivo_types::{ResourceEstimate, ResponsiblePerson, Section};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn sparse_report() -> CanonicalReport {
        CanonicalReport::new().with_project_name("Serra Azul")
    }

    fn complete_report() -> CanonicalReport {
        CanonicalReport::new()
            .with_project_name("Serra Azul")
            .with_company("Mineração Azul S.A.")
            .with_effective_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
            .with_detected_standard("JORC")
            .with_person(
                ResponsiblePerson::new("Ana Souza")
                    .with_qualification("MAusIMM")
                    .with_organization("Azul Consulting"),
            )
            .with_resource(
                ResourceEstimate::new("Measured", 1_200_000.0)
                    .with_grade("Au", 2.4)
                    .with_cutoff_grade("Au", 0.5),
            )
            .with_section("Executive Summary", "Gold project in Minas Gerais.")
            .with_section("Introduction", "Scope of the resource statement.")
            .with_section("Geology", "Orogenic gold hosted in banded iron formation.")
            .with_section("QA/QC", "Blanks, duplicates and certified standards.")
    }

    async fn service_with(
        reports: &[(&str, CanonicalReport)],
    ) -> (ComplianceService, InMemoryStore) {
        let store = InMemoryStore::new();
        for (id, report) in reports {
            store.put_report(*id, report.clone()).await;
        }
        let shared = Arc::new(store.clone());
        (ComplianceService::new(shared.clone(), shared), store)
    }

    #[tokio::test]
    async fn test_audit_appends_to_history() {
        let (service, store) = service_with(&[("r1", sparse_report())]).await;

        let scan = service
            .audit_report("r1", StandardId::Jorc, None, as_of())
            .await
            .unwrap();
        assert_eq!(scan.mode, ScanMode::Full);
        assert_eq!(scan.audit.report_id, "r1");
        assert!(!scan.audit.issues.is_empty());

        let history = service.history("r1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].audit_id, scan.audit.audit_id);
        assert_eq!(store.audit_count().await, 1);
    }

    #[tokio::test]
    async fn test_sequential_and_parallel_agree() {
        let (parallel, _) = service_with(&[("r1", complete_report())]).await;
        let store = Arc::new(InMemoryStore::new());
        store.put_report("r1", complete_report()).await;
        let sequential = ComplianceService::with_config(
            store.clone(),
            store,
            AuditConfig {
                parallel: false,
                ..AuditConfig::default()
            },
        );

        let a = parallel
            .audit_report("r1", StandardId::Cbrr, Some(ScanMode::Deep), as_of())
            .await
            .unwrap();
        let b = sequential
            .audit_report("r1", StandardId::Cbrr, Some(ScanMode::Deep), as_of())
            .await
            .unwrap();

        assert_eq!(a.audit.score, b.audit.score);
        assert_eq!(a.audit.issues, b.audit.issues);
        assert_eq!(a.category_scores, b.category_scores);
    }

    #[tokio::test]
    async fn test_missing_report_is_not_found() {
        let (service, store) = service_with(&[]).await;
        let err = service
            .audit_report("ghost", StandardId::Jorc, None, as_of())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(store.audit_count().await, 0);

        assert!(matches!(
            service.convert("ghost", StandardId::Cbrr).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_trends_and_comparison_over_history() {
        let (service, store) = service_with(&[("r1", sparse_report())]).await;
        let first = service
            .audit_report("r1", StandardId::Jorc, Some(ScanMode::Light), as_of())
            .await
            .unwrap();

        assert!(matches!(
            service.compare_latest("r1").await,
            Err(ServiceError::Trend(TrendError::InsufficientHistory {
                required: 2,
                found: 1
            }))
        ));

        store.put_report("r1", complete_report()).await;
        let second = service
            .audit_report("r1", StandardId::Jorc, Some(ScanMode::Light), as_of())
            .await
            .unwrap();
        assert!(second.audit.score > first.audit.score);

        let trends = service.trends("r1").await.unwrap();
        assert_eq!(trends.summary.trend, Trend::Improving);

        let comparison = service
            .compare("r1", &first.audit.audit_id, &second.audit.audit_id)
            .await
            .unwrap();
        assert!(comparison.comparison.score_delta > 0.0);
        assert!(!comparison.comparison.resolved_issues.is_empty());
        assert_eq!(comparison.audits.len(), 2);

        let stats = service.statistics("r1").await.unwrap();
        assert_eq!(stats.total_audits, 2);
    }

    #[tokio::test]
    async fn test_trends_without_history() {
        let (service, _) = service_with(&[("r1", sparse_report())]).await;
        assert!(matches!(
            service.trends("r1").await,
            Err(ServiceError::Trend(TrendError::InsufficientHistory { .. }))
        ));
        assert_eq!(service.statistics("r1").await.unwrap().total_audits, 0);
    }

    #[tokio::test]
    async fn test_convert_projects_stored_report() {
        let (service, _) = service_with(&[("r1", complete_report())]).await;
        let view = service.convert("r1", StandardId::Cbrr).await.unwrap();
        assert_eq!(view.standard(), StandardId::Cbrr);
    }

    #[tokio::test]
    async fn test_correction_plan_uses_latest_audit() {
        let (service, _) = service_with(&[("r1", sparse_report())]).await;
        assert!(matches!(
            service.correction_plan("r1", StandardId::Jorc, as_of()).await,
            Err(ServiceError::NotFound(_))
        ));

        let scan = service
            .audit_report("r1", StandardId::Jorc, Some(ScanMode::Deep), as_of())
            .await
            .unwrap();
        let plan = service
            .correction_plan("r1", StandardId::Jorc, as_of())
            .await
            .unwrap();
        assert_eq!(plan.report_id, "r1");
        assert_eq!(plan.total_issues, scan.audit.issues.len());
        assert_eq!(plan.corrections.len(), scan.audit.issues.len());
    }

    struct Failing;

    #[async_trait]
    impl SectionRewriter for Failing {
        async fn rewrite(
            &self,
            _section: &Section,
            _standard: StandardId,
        ) -> std::result::Result<String, RewriteError> {
            Err(RewriteError("model offline".into()))
        }
    }

    #[tokio::test]
    async fn test_rewrite_comparison_survives_rewriter_failure() {
        let report = sparse_report().with_section(
            "Geology",
            "The deposit is hosted in a sequence of banded iron formation and schist.",
        );
        let (service, _) = service_with(&[("r1", report)]).await;

        let comparison = service
            .compare_with_rewrites("r1", StandardId::Jorc, &Failing)
            .await
            .unwrap();
        assert_eq!(comparison.sections_compared, 1);
        assert!(comparison.sections[0].rewrite_failed);
        assert_eq!(comparison.overall_similarity, 100);
    }
}
