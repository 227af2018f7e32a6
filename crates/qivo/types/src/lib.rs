//! # Qivo Types
//!
//! Shared data shapes for the Qivo compliance core.
//!
//! ## Overview
//!
//! Every other Qivo crate reads the types defined here:
//!
//! - [`CanonicalReport`]: standard-agnostic snapshot of a mining technical report
//! - [`StandardId`]: closed set of supported disclosure standards
//!   (JORC, NI 43-101, PERC, SAMREC, CBRR)
//! - [`normalize_category`]: fuzzy resolver from free-text resource/reserve classes
//!   to each standard's localized vocabulary
//! - [`AuditResult`] / [`AuditIssue`]: the append-only audit record consumed by the
//!   trend engine and the export layer
//!
//! ## Example
//!
//! ```rust
//! use qivo_types::{normalize_category, CanonicalReport, ResourceEstimate, StandardId};
//!
//! let report = CanonicalReport::new()
//!     .with_project_name("Serra Azul")
//!     .with_resource(ResourceEstimate::new("Measured", 1_000_000.0));
//!
//! let category = report.resource_estimates[0].category.as_deref().unwrap_or_default();
//! assert_eq!(normalize_category(category, StandardId::Cbrr), "Medido");
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod audit;
pub mod canonical;
pub mod category;
pub mod error;
pub mod matching;
pub mod standard;

// Re-exports
pub use audit::{AuditIssue, AuditResult, RuleCategory, Severity, SeverityCounts};
pub use canonical::{
    economic, CanonicalReport, EconomicAssumptions, EnvironmentalLicensing, Jurisdiction,
    ReportMetadata, ResourceEstimate, ResponsiblePerson, Section,
};
pub use category::{normalize_category, resolve_category, CategoryClass};
pub use error::{Result, TypesError};
pub use matching::{find_section, title_matches};
pub use standard::StandardId;
