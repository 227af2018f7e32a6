//! Mapper trait implemented by every standard document

use crate::common::SharedFields;
use crate::registry::StandardView;
use qivo_types::{CanonicalReport, StandardId};
use serde::{de::DeserializeOwned, Serialize};

/// A standard-shaped document with its three conversion entry points
///
/// Implementations are pure: none of the methods mutate their input, and a missing
/// section or field never fails a projection.
pub trait StandardMapper: Sized + Serialize + DeserializeOwned {
    /// Standard this document follows
    const STANDARD: StandardId;

    /// Project a canonical report into this standard
    fn from_canonical(report: &CanonicalReport) -> Self;

    /// Convert a document of another standard directly, without the canonical model
    fn from_other(source: &StandardView) -> Self;

    /// Fields shared by every standard, used as the source side of a conversion
    fn shared_fields(&self) -> SharedFields;

    /// Read the document back into a canonical report
    fn to_canonical(&self) -> CanonicalReport {
        self.shared_fields().into_canonical(Self::STANDARD)
    }
}
