//! # Qivo Trends
//!
//! Temporal analysis over a report's append-only audit history.
//!
//! ## Overview
//!
//! - [`compute_trends`]: score progression, per-category issue series, first-versus-last
//!   improvements and regressions, and an overall [`Trend`]
//! - [`compare_audits`]: code-keyed resolved / new / persistent issue sets between two
//!   audits, with narrative insights and the audit timeline
//! - [`audit_statistics`]: dashboard aggregates
//! - [`compare_with_rewrites`]: word-level comparison of report sections against an
//!   injected [`SectionRewriter`]
//!
//! Every entry point is a pure function of its inputs except the rewrite comparison,
//! which awaits the rewriter.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use qivo_trends::{compute_trends, Trend};
//! use qivo_types::AuditResult;
//!
//! let audit = |id: &str, day: u32, score: f64| AuditResult {
//!     audit_id: id.to_string(),
//!     report_id: "report-1".to_string(),
//!     score,
//!     total_rules: 10,
//!     passed_rules: 10,
//!     failed_rules: 0,
//!     issues: Vec::new(),
//!     created_at: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
//! };
//!
//! let trends = compute_trends(&[audit("a2", 2, 85.01), audit("a1", 1, 80.0)]).unwrap();
//! assert_eq!(trends.summary.trend, Trend::Improving);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod compare;
pub mod error;
pub mod rewrite;
pub mod statistics;
pub mod trend;

// Re-exports
pub use compare::{
    compare_audits, compare_by_id, compare_latest, timeline, AuditComparison, AuditPoint,
    ComparisonResult,
};
pub use error::{Result, RewriteError, TrendError};
pub use rewrite::{
    compare_with_rewrites, RewriteComparison, RewriteRecommendation, SectionComparison,
    SectionRewriter,
};
pub use statistics::{audit_statistics, AuditStatistics};
pub use trend::{compute_trends, Trend, TrendPoint, TrendSummary, TrendsResult};
