//! Standard mapper registry
//!
//! Dispatch is an exhaustive match over [`StandardId`]: a new standard does not compile
//! until it has a document type implementing every [`StandardMapper`] entry point.
//! Both canonical → X and X → Y conversions are first-class entry points.

use crate::cbrr::CbrrView;
use crate::common::SharedFields;
use crate::error::{MapperError, Result};
use crate::jorc::JorcView;
use crate::mapper::StandardMapper;
use crate::ni43::Ni43View;
use crate::perc::PercView;
use crate::samrec::SamrecView;
use qivo_types::{CanonicalReport, StandardId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// A document in any supported standard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StandardView {
    Jorc(JorcView),
    Ni43101(Ni43View),
    Perc(PercView),
    Samrec(SamrecView),
    Cbrr(CbrrView),
}

impl StandardView {
    /// Standard the document follows
    pub fn standard(&self) -> StandardId {
        match self {
            Self::Jorc(_) => JorcView::STANDARD,
            Self::Ni43101(_) => Ni43View::STANDARD,
            Self::Perc(_) => PercView::STANDARD,
            Self::Samrec(_) => SamrecView::STANDARD,
            Self::Cbrr(_) => CbrrView::STANDARD,
        }
    }

    /// Fields every standard carries
    pub fn shared_fields(&self) -> SharedFields {
        match self {
            Self::Jorc(view) => view.shared_fields(),
            Self::Ni43101(view) => view.shared_fields(),
            Self::Perc(view) => view.shared_fields(),
            Self::Samrec(view) => view.shared_fields(),
            Self::Cbrr(view) => view.shared_fields(),
        }
    }

    /// Decode a document, dispatching on its `standard` discriminator
    pub fn from_json(value: Value) -> Result<Self> {
        let tag = value
            .get("standard")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MapperError::MalformedDocument("missing `standard` discriminator".to_string())
            })?;

        let standard: StandardId = tag.parse()?;

        let view = match standard {
            StandardId::Jorc => Self::Jorc(serde_json::from_value(value)?),
            StandardId::Ni43101 => Self::Ni43101(serde_json::from_value(value)?),
            StandardId::Perc => Self::Perc(serde_json::from_value(value)?),
            StandardId::Samrec => Self::Samrec(serde_json::from_value(value)?),
            StandardId::Cbrr => Self::Cbrr(serde_json::from_value(value)?),
        };
        Ok(view)
    }
}

impl<'de> Deserialize<'de> for StandardView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

/// Project a canonical report into `standard`
pub fn to_standard(standard: StandardId, report: &CanonicalReport) -> StandardView {
    debug!(standard = standard.id(), "Mapping canonical report");

    match standard {
        StandardId::Jorc => StandardView::Jorc(JorcView::from_canonical(report)),
        StandardId::Ni43101 => StandardView::Ni43101(Ni43View::from_canonical(report)),
        StandardId::Perc => StandardView::Perc(PercView::from_canonical(report)),
        StandardId::Samrec => StandardView::Samrec(SamrecView::from_canonical(report)),
        StandardId::Cbrr => StandardView::Cbrr(CbrrView::from_canonical(report)),
    }
}

/// [`to_standard`] for a free-text standard id
pub fn to_standard_by_id(standard: &str, report: &CanonicalReport) -> Result<StandardView> {
    Ok(to_standard(standard.parse()?, report))
}

/// Convert a document directly into `target`
///
/// Converting into the document's own standard returns it unchanged.
pub fn convert(source: &StandardView, target: StandardId) -> StandardView {
    if source.standard() == target {
        return source.clone();
    }

    debug!(
        from = source.standard().id(),
        to = target.id(),
        "Converting standard document"
    );

    match target {
        StandardId::Jorc => StandardView::Jorc(JorcView::from_other(source)),
        StandardId::Ni43101 => StandardView::Ni43101(Ni43View::from_other(source)),
        StandardId::Perc => StandardView::Perc(PercView::from_other(source)),
        StandardId::Samrec => StandardView::Samrec(SamrecView::from_other(source)),
        StandardId::Cbrr => StandardView::Cbrr(CbrrView::from_other(source)),
    }
}

/// [`convert`] for a free-text target id
pub fn convert_by_id(source: &StandardView, target: &str) -> Result<StandardView> {
    Ok(convert(source, target.parse()?))
}

/// Read any document back into a canonical report
pub fn to_canonical(view: &StandardView) -> CanonicalReport {
    match view {
        StandardView::Jorc(view) => view.to_canonical(),
        StandardView::Ni43101(view) => view.to_canonical(),
        StandardView::Perc(view) => view.to_canonical(),
        StandardView::Samrec(view) => view.to_canonical(),
        StandardView::Cbrr(view) => view.to_canonical(),
    }
}
