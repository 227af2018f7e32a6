//! # Qivo Service
//!
//! Orchestration of conversion, auditing and trend analysis over an injected
//! repository boundary.
//!
//! ## Overview
//!
//! - **Repository**: [`ReportSource`] and the append-only [`AuditHistoryStore`], with an
//!   [`InMemoryStore`] for development and tests
//! - **Service**: [`ComplianceService`] runs fetch → audit → append and serves trends,
//!   comparisons, statistics, conversions and correction plans
//! - **Configuration**: [`ServiceConfig`] loaded from defaults, an optional file and
//!   `QIVO_` environment variables
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use qivo_service::{ComplianceService, InMemoryStore};
//! use qivo_types::{CanonicalReport, StandardId};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = Arc::new(InMemoryStore::new());
//! store
//!     .put_report("r1", CanonicalReport::new().with_project_name("Serra Azul"))
//!     .await;
//!
//! let service = ComplianceService::new(store.clone(), store);
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let scan = service
//!     .audit_report("r1", StandardId::Jorc, None, as_of)
//!     .await
//!     .unwrap();
//!
//! assert!(scan.audit.score < 100.0);
//! assert_eq!(service.history("r1").await.unwrap().len(), 1);
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod repository;
pub mod service;

// Re-exports
pub use config::{AuditConfig, LoggingConfig, ServiceConfig, ENV_PREFIX};
pub use error::{Result, ServiceError, StorageError, StorageResult};
pub use repository::{AuditHistoryStore, InMemoryStore, ReportSource};
pub use service::ComplianceService;
