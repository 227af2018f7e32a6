//! JORC 2012 document

use crate::common::{
    collect_sections, provided, section_or_empty, section_text, PersonRow, ProjectHeader,
    ResourceRow, SharedFields, GEOLOGY_TITLES, QA_QC_TITLES,
};
use crate::mapper::StandardMapper;
use crate::registry::StandardView;
use qivo_types::{CanonicalReport, EconomicAssumptions, Section, StandardId};
use serde::{Deserialize, Serialize};

/// JORC Code report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JorcView {
    pub standard: String,
    pub standard_full_name: String,
    #[serde(flatten)]
    pub project: ProjectHeader,
    pub competent_persons: Vec<PersonRow>,
    pub qa_qc: String,
    pub geology: String,
    #[serde(default)]
    pub economic_assumptions: EconomicAssumptions,
    pub sections: JorcSections,
    pub resources_table: Vec<ResourceRow>,
}

/// JORC Table 1 sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JorcSections {
    /// Sampling techniques and data
    pub table1_section1: Section,
    /// Reporting of exploration results
    pub table1_section2: Section,
    /// Estimation and reporting of mineral resources
    pub table1_section3: Section,
    /// Estimation and reporting of ore reserves
    pub table1_section4: Section,
}

impl JorcSections {
    fn locate(sections: &[Section]) -> Self {
        Self {
            table1_section1: section_or_empty(sections, &["section 1"]),
            table1_section2: section_or_empty(sections, &["section 2"]),
            table1_section3: section_or_empty(sections, &["section 3"]),
            table1_section4: section_or_empty(sections, &["section 4"]),
        }
    }

    fn slots(&self) -> [&Section; 4] {
        [
            &self.table1_section1,
            &self.table1_section2,
            &self.table1_section3,
            &self.table1_section4,
        ]
    }
}

impl StandardMapper for JorcView {
    const STANDARD: StandardId = StandardId::Jorc;

    fn from_canonical(report: &CanonicalReport) -> Self {
        let standard = Self::STANDARD;
        let sections = &report.sections;

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            project: ProjectHeader::from_metadata(&report.metadata),
            competent_persons: report
                .responsible_persons
                .iter()
                .map(|p| PersonRow::from_person(p, standard.person_role()))
                .collect(),
            qa_qc: section_text(sections, QA_QC_TITLES, standard.not_provided()),
            geology: section_text(sections, GEOLOGY_TITLES, standard.not_provided()),
            economic_assumptions: report.economic_assumptions.clone().unwrap_or_default(),
            sections: JorcSections::locate(sections),
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
        let sections = JorcSections::locate(&shared.narrative_sections());

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            competent_persons: shared
                .persons
                .iter()
                .map(|p| p.with_role(standard.person_role()))
                .collect(),
            qa_qc: shared
                .qa_qc
                .unwrap_or_else(|| standard.to_be_provided().to_string()),
            geology: shared
                .geology
                .unwrap_or_else(|| standard.to_be_provided().to_string()),
            sections,
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
            qa_qc: provided(&self.qa_qc),
            geology: provided(&self.geology),
            sections: collect_sections(self.sections.slots()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qivo_types::{ResourceEstimate, ResponsiblePerson};

    fn report() -> CanonicalReport {
        CanonicalReport::new()
            .with_project_name("Serra Azul")
            .with_section("Section 1 Sampling Techniques and Data", "Diamond drilling")
            .with_section("Section 3 Estimation of Mineral Resources", "Ordinary kriging")
            .with_section("QA/QC", "Blanks and CRMs inserted every 20 samples")
            .with_person(ResponsiblePerson::new("Maria Souza").with_qualification("MAusIMM"))
            .with_resource(ResourceEstimate::new("Medido", 1_000_000.0))
    }

    #[test]
    fn test_from_canonical() {
        let view = JorcView::from_canonical(&report());
        assert_eq!(view.standard, "JORC 2012");
        assert_eq!(view.sections.table1_section1.content_text, "Diamond drilling");
        assert!(view.sections.table1_section2.is_empty());
        assert_eq!(view.qa_qc, "Blanks and CRMs inserted every 20 samples");
        assert_eq!(view.geology, "Not provided");
        assert_eq!(view.competent_persons[0].role, "Competent Person");
        assert_eq!(view.resources_table[0].category, "Measured");
    }

    #[test]
    fn test_table1_sections_ignore_higher_numbers() {
        let report = CanonicalReport::new()
            .with_section("Section 10 Appendix", "appendix")
            .with_section("Section 1 Sampling Techniques", "Diamond drilling")
            .with_section("JORC Table 1 - Section 2", "Soil geochemistry");
        let view = JorcView::from_canonical(&report);
        assert_eq!(view.sections.table1_section1.content_text, "Diamond drilling");
        assert_eq!(view.sections.table1_section2.content_text, "Soil geochemistry");
    }

    #[test]
    fn test_sentinel_like_names_read_back_exactly() {
        let names = ["-", "Not provided", "  "];
        let report = names
            .iter()
            .fold(CanonicalReport::new(), |r, name| r.with_person(ResponsiblePerson::new(*name)));
        let back = JorcView::from_canonical(&report).to_canonical();
        let read: Vec<_> = back.responsible_persons.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(read, names);
    }

    #[test]
    fn test_json_discriminators() {
        let json = serde_json::to_value(JorcView::from_canonical(&report())).unwrap();
        assert_eq!(json["standard"], "JORC 2012");
        assert!(json["standardFullName"].as_str().unwrap().starts_with("Australasian"));
        assert_eq!(json["projectName"], "Serra Azul");
        assert!(json["sections"]["table1Section4"].is_object());
    }

    #[test]
    fn test_read_back_restores_qa_qc_once() {
        let canonical = JorcView::from_canonical(&report()).to_canonical();
        let qa_sections = canonical
            .sections
            .iter()
            .filter(|s| s.title == "QA/QC")
            .count();
        assert_eq!(qa_sections, 1);
        assert_eq!(canonical.responsible_persons[0].name, "Maria Souza");
    }
}
