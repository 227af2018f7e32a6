//! # Qivo Mappers
//!
//! Projections of the canonical report into the documents each disclosure standard
//! expects, plus direct conversions between those documents.
//!
//! ## Entry points
//!
//! - [`to_standard`]: canonical report → standard document
//! - [`convert`]: standard document → another standard, without the canonical model
//! - [`to_canonical`]: standard document → canonical report
//!
//! Lookups by free-text id ([`to_standard_by_id`], [`convert_by_id`]) fail with
//! [`MapperError::UnsupportedStandard`]; the typed entry points never fail.
//!
//! ## Example
//!
//! ```rust
//! use qivo_mappers::{convert, to_standard, StandardView};
//! use qivo_types::{CanonicalReport, ResourceEstimate, StandardId};
//!
//! let report = CanonicalReport::new()
//!     .with_resource(ResourceEstimate::new("Measured", 1_000_000.0));
//!
//! let jorc = to_standard(StandardId::Jorc, &report);
//! if let StandardView::Cbrr(cbrr) = convert(&jorc, StandardId::Cbrr) {
//!     assert_eq!(cbrr.resources_table[0].category, "Medido");
//!     assert_eq!(cbrr.anm_process, "A ser informado");
//! }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod cbrr;
pub mod common;
pub mod error;
pub mod jorc;
pub mod mapper;
pub mod ni43;
pub mod perc;
pub mod registry;
pub mod samrec;

// Re-exports
pub use cbrr::CbrrView;
pub use common::{PersonRow, ProjectHeader, ResourceRow, SharedFields};
pub use error::{MapperError, Result};
pub use jorc::JorcView;
pub use mapper::StandardMapper;
pub use ni43::Ni43View;
pub use perc::PercView;
pub use registry::{
    convert, convert_by_id, to_canonical, to_standard, to_standard_by_id, StandardView,
};
pub use samrec::SamrecView;
