//! NI 43-101 document
//!
//! NI 43-101 technical reports are organized as numbered items. Only the items the
//! export layer renders are located; everything else stays in the canonical report.

use crate::common::{
    collect_sections, section_or_empty, PersonRow, ProjectHeader, ResourceRow, SharedFields,
};
use crate::mapper::StandardMapper;
use crate::registry::StandardView;
use qivo_types::{CanonicalReport, EconomicAssumptions, Section, StandardId};
use serde::{Deserialize, Serialize};

/// NI 43-101 technical report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ni43View {
    pub standard: String,
    pub standard_full_name: String,
    #[serde(flatten)]
    pub project: ProjectHeader,
    pub qualified_persons: Vec<PersonRow>,
    #[serde(default)]
    pub economic_assumptions: EconomicAssumptions,
    pub items: Ni43Items,
    pub resources_table: Vec<ResourceRow>,
}

/// Numbered report items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ni43Items {
    /// Introduction
    pub item2: Section,
    /// Mineral resource estimates
    pub item14: Section,
    /// References
    pub item27: Section,
}

// Trailing separators keep "item 2" from matching "item 20".."item 27"
const ITEM_2: &[&str] = &["item 2:", "item 2 ", "item 2.", "item 2-", "introduction"];
const ITEM_14: &[&str] = &["item 14", "mineral resource estimate"];
const ITEM_27: &[&str] = &["item 27", "references"];

impl Ni43Items {
    fn locate(sections: &[Section]) -> Self {
        Self {
            item2: section_or_empty(sections, ITEM_2),
            item14: section_or_empty(sections, ITEM_14),
            item27: section_or_empty(sections, ITEM_27),
        }
    }
}

impl StandardMapper for Ni43View {
    const STANDARD: StandardId = StandardId::Ni43101;

    fn from_canonical(report: &CanonicalReport) -> Self {
        let standard = Self::STANDARD;

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            project: ProjectHeader::from_metadata(&report.metadata),
            qualified_persons: report
                .responsible_persons
                .iter()
                .map(|p| PersonRow::titled(p, standard.person_role()))
                .collect(),
            economic_assumptions: report.economic_assumptions.clone().unwrap_or_default(),
            items: Ni43Items::locate(&report.sections),
            resources_table: report
                .resource_estimates
                .iter()
                .map(|e| ResourceRow::from_estimate(e, standard))
                .collect(),
        }
    }

    fn from_other(source: &StandardView) -> Self {
        let standard = Self::STANDARD;
        let shared = source.shared_fields();

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            qualified_persons: shared
                .persons
                .iter()
                .map(|p| p.with_role(standard.person_role()))
                .collect(),
            items: Ni43Items::locate(&shared.narrative_sections()),
            resources_table: shared
                .resources
                .iter()
                .map(|r| r.renormalized(standard))
                .collect(),
            economic_assumptions: shared.economics,
            project: shared.project,
        }
    }

    fn shared_fields(&self) -> SharedFields {
        SharedFields {
            project: self.project.clone(),
            persons: self.qualified_persons.clone(),
            resources: self.resources_table.clone(),
            economics: self.economic_assumptions.clone(),
            qa_qc: None,
            geology: None,
            sections: collect_sections([&self.items.item2, &self.items.item14, &self.items.item27]),
        }
    }
}
