//! SAMREC document

use crate::common::{
    collect_sections, section_or_empty, PersonRow, ProjectHeader, ResourceRow, SharedFields,
};
use crate::mapper::StandardMapper;
use crate::registry::StandardView;
use qivo_types::{CanonicalReport, EconomicAssumptions, Section, StandardId};
use serde::{Deserialize, Serialize};

/// SAMREC Code report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamrecView {
    pub standard: String,
    pub standard_full_name: String,
    #[serde(flatten)]
    pub project: ProjectHeader,
    pub competent_persons: Vec<PersonRow>,
    #[serde(default)]
    pub economic_assumptions: EconomicAssumptions,
    pub sections: SamrecSections,
    pub resources_table: Vec<ResourceRow>,
}

/// SAMREC Table 1 and Table 2 checklists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamrecSections {
    pub table1: Section,
    pub table2: Section,
}

impl SamrecSections {
    fn locate(sections: &[Section]) -> Self {
        Self {
            table1: section_or_empty(sections, &["table 1"]),
            table2: section_or_empty(sections, &["table 2"]),
        }
    }
}

impl StandardMapper for SamrecView {
    const STANDARD: StandardId = StandardId::Samrec;

    fn from_canonical(report: &CanonicalReport) -> Self {
        let standard = Self::STANDARD;

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            project: ProjectHeader::from_metadata(&report.metadata),
            competent_persons: report
                .responsible_persons
                .iter()
                .map(|p| PersonRow::titled(p, standard.person_role()))
                .collect(),
            economic_assumptions: report.economic_assumptions.clone().unwrap_or_default(),
            sections: SamrecSections::locate(&report.sections),
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
            competent_persons: shared
                .persons
                .iter()
                .map(|p| p.with_role(standard.person_role()))
                .collect(),
            sections: SamrecSections::locate(&shared.narrative_sections()),
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
            persons: self.competent_persons.clone(),
            resources: self.resources_table.clone(),
            economics: self.economic_assumptions.clone(),
            qa_qc: None,
            geology: None,
            sections: collect_sections([&self.sections.table1, &self.sections.table2]),
        }
    }
}
