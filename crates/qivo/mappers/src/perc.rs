//! PERC document

use crate::common::{
    collect_sections, section_or_empty, PersonRow, ProjectHeader, ResourceRow, SharedFields,
};
use crate::mapper::StandardMapper;
use crate::registry::StandardView;
use qivo_types::{CanonicalReport, EconomicAssumptions, Section, StandardId};
use serde::{Deserialize, Serialize};

/// PERC standard report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercView {
    pub standard: String,
    pub standard_full_name: String,
    #[serde(flatten)]
    pub project: ProjectHeader,
    pub competent_persons: Vec<PersonRow>,
    #[serde(default)]
    pub economic_assumptions: EconomicAssumptions,
    pub sections: PercSections,
    pub resources_table: Vec<ResourceRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercSections {
    pub section1: Section,
    pub section2: Section,
    pub section3: Section,
}

impl PercSections {
    fn locate(sections: &[Section]) -> Self {
        Self {
            section1: section_or_empty(sections, &["section 1"]),
            section2: section_or_empty(sections, &["section 2"]),
            section3: section_or_empty(sections, &["section 3"]),
        }
    }
}

impl StandardMapper for PercView {
    const STANDARD: StandardId = StandardId::Perc;

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
            sections: PercSections::locate(&report.sections),
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
            sections: PercSections::locate(&shared.narrative_sections()),
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
        let sections = &self.sections;
        SharedFields {
            project: self.project.clone(),
            persons: self.competent_persons.clone(),
            resources: self.resources_table.clone(),
            economics: self.economic_assumptions.clone(),
            qa_qc: None,
            geology: None,
            sections: collect_sections([&sections.section1, &sections.section2, &sections.section3]),
        }
    }
}
