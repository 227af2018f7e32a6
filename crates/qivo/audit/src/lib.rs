//! # Qivo Audit
//!
//! Weighted compliance auditing for canonical mining reports.
//!
//! ## Overview
//!
//! - [`run_audit`] / [`run_audit_concurrent`]: evaluate an ordered rule set and fold the
//!   outcomes into an [`AuditResult`](qivo_types::AuditResult). Rule errors and panics
//!   are contained as failed rules.
//! - [`krci`]: the KRCI rule catalog, per standard and [`ScanMode`]
//! - [`ScanReport`]: an audit plus per-category scores and recommendations
//! - [`CorrectionPlan`]: prioritized fixes with Markdown and CSV export
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use qivo_audit::{run_scan, CatalogContext, ScanMode};
//! use qivo_types::{CanonicalReport, StandardId};
//!
//! let context = CatalogContext::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
//! let report = CanonicalReport::new().with_project_name("Serra Azul");
//!
//! let scan = run_scan("report-1", &report, StandardId::Cbrr, ScanMode::Light, &context);
//! assert!(scan.audit.score < 100.0);
//! assert_eq!(
//!     scan.audit.passed_rules + scan.audit.failed_rules,
//!     scan.audit.total_rules
//! );
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod engine;
pub mod error;
pub mod krci;
pub mod plan;
pub mod rule;
pub mod scan;
pub mod summary;

// Re-exports
pub use engine::{run_audit, run_audit_concurrent, EVALUATION_ERROR};
pub use error::{AuditError, Result, RuleError};
pub use krci::{
    catalog, catalog_stats, rule_set, rule_set_for_id, CatalogContext, CatalogStats, Check,
    KrciRule, RuleDescriptor,
};
pub use plan::{CorrectionItem, CorrectionPlan};
pub use rule::{AuditRule, RuleOutcome, RuleSet};
pub use scan::{run_scan, run_scan_concurrent, ScanMode, ScanReport};
pub use summary::audit_summary;
