//! Building blocks shared by every standard document

use chrono::NaiveDate;
use qivo_types::{
    normalize_category, resolve_category, CanonicalReport, EconomicAssumptions, ReportMetadata, ResourceEstimate,
    ResponsiblePerson, Section, StandardId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Placeholder for missing identity fields (names, dates, companies)
pub const MISSING: &str = "-";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Project identification block present in every document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHeader {
    pub project_name: String,
    pub company: String,
    pub effective_date: String,
}

impl ProjectHeader {
    pub fn from_metadata(metadata: &ReportMetadata) -> Self {
        Self {
            project_name: text_or(metadata.project_name.as_deref(), MISSING),
            company: text_or(metadata.company.as_deref(), MISSING),
            effective_date: metadata
                .effective_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }

    /// Read the header back into canonical metadata
    pub fn to_metadata(&self, standard: StandardId) -> ReportMetadata {
        ReportMetadata {
            project_name: provided(&self.project_name),
            company: provided(&self.company),
            effective_date: NaiveDate::parse_from_str(&self.effective_date, DATE_FORMAT).ok(),
            detected_standard: Some(standard.display_name().to_string()),
            jurisdiction: Default::default(),
        }
    }
}

/// Signing professional row for the international standards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRow {
    pub name: String,
    pub qualification: String,
    pub organization: String,
    pub role: String,
    /// Professional body membership number
    pub registration: String,
}

impl PersonRow {
    /// Project a canonical person; `role` is used when the person carries none.
    /// The name is carried verbatim, so it reads back exactly.
    pub fn from_person(person: &ResponsiblePerson, role: &str) -> Self {
        Self {
            name: person.name.clone(),
            qualification: text_or(person.qualification.as_deref(), MISSING),
            organization: text_or(person.organization.as_deref(), MISSING),
            role: text_or(person.role.as_deref(), role),
            registration: text_or(person.registration_id.as_deref(), MISSING),
        }
    }

    /// Project a canonical person under a fixed title
    pub fn titled(person: &ResponsiblePerson, role: &str) -> Self {
        Self::from_person(person, role).with_role(role)
    }

    /// Same person under another standard's title
    pub fn with_role(&self, role: &str) -> Self {
        Self {
            role: role.to_string(),
            ..self.clone()
        }
    }

    pub fn to_person(&self) -> ResponsiblePerson {
        ResponsiblePerson {
            name: self.name.clone(),
            qualification: provided(&self.qualification),
            organization: provided(&self.organization),
            role: provided(&self.role),
            registration_id: provided(&self.registration),
        }
    }
}

/// Resource/reserve table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRow {
    /// Category in the document standard's vocabulary
    pub category: String,
    pub tonnage: Option<f64>,
    #[serde(default)]
    pub grades: BTreeMap<String, f64>,
    #[serde(default)]
    pub cutoff: BTreeMap<String, f64>,
}

impl ResourceRow {
    pub fn from_estimate(estimate: &ResourceEstimate, standard: StandardId) -> Self {
        Self {
            category: project_category(estimate.category.as_deref(), standard),
            tonnage: estimate.tonnage,
            grades: estimate.grade.clone(),
            cutoff: estimate.cutoff_grade.clone(),
        }
    }

    /// Same row with its category re-rendered for `standard`
    pub fn renormalized(&self, standard: StandardId) -> Self {
        Self {
            category: project_category(Some(&self.category), standard),
            ..self.clone()
        }
    }

    pub fn to_estimate(&self) -> ResourceEstimate {
        ResourceEstimate {
            category: provided(&self.category),
            tonnage: self.tonnage,
            grade: self.grades.clone(),
            cutoff_grade: self.cutoff.clone(),
        }
    }
}

fn project_category(category: Option<&str>, standard: StandardId) -> String {
    match category {
        Some(term) if !StandardId::is_sentinel(term) => {
            if resolve_category(term).is_none() {
                warn!(
                    category = term,
                    standard = standard.id(),
                    "Unrecognized resource category, passing through"
                );
            }
            normalize_category(term, standard)
        }
        _ => MISSING.to_string(),
    }
}

/// Fields every document carries, extracted for standard-to-standard conversion
#[derive(Debug, Clone, PartialEq)]
pub struct SharedFields {
    pub project: ProjectHeader,
    pub persons: Vec<PersonRow>,
    pub resources: Vec<ResourceRow>,
    pub economics: EconomicAssumptions,
    pub qa_qc: Option<String>,
    pub geology: Option<String>,
    /// Non-empty narrative sections, in document order
    pub sections: Vec<Section>,
}

impl SharedFields {
    /// Narrative sections, with free-text QA/QC and geology lifted into sections when
    /// no matching section survived
    pub fn narrative_sections(&self) -> Vec<Section> {
        let mut sections = self.sections.clone();
        restore_section(&mut sections, QA_QC_TITLES, "QA/QC", self.qa_qc.as_deref());
        restore_section(&mut sections, GEOLOGY_TITLES, "Geology", self.geology.as_deref());
        sections
    }

    /// Read the shared fields back into a canonical report
    pub fn into_canonical(self, standard: StandardId) -> CanonicalReport {
        CanonicalReport {
            metadata: self.project.to_metadata(standard),
            sections: self.narrative_sections(),
            resource_estimates: self.resources.iter().map(ResourceRow::to_estimate).collect(),
            responsible_persons: self.persons.iter().map(PersonRow::to_person).collect(),
            economic_assumptions: (!self.economics.is_empty()).then_some(self.economics),
            environmental: None,
        }
    }
}

fn restore_section(
    sections: &mut Vec<Section>,
    candidates: &[&str],
    title: &str,
    text: Option<&str>,
) {
    if let Some(text) = text {
        if qivo_types::find_section(sections, candidates).is_none() {
            sections.push(Section::new(title, text));
        }
    }
}

/// Candidate titles for the QA/QC narrative
pub const QA_QC_TITLES: &[&str] = &["qa/qc", "quality"];

/// Candidate titles for the geology narrative
pub const GEOLOGY_TITLES: &[&str] = &["geologia", "geology"];

/// Content of the first matching section, or `sentinel`
pub fn section_text(sections: &[Section], candidates: &[&str], sentinel: &str) -> String {
    let content = qivo_types::find_section(sections, candidates).map(|s| s.content_text.as_str());
    text_or(content, sentinel)
}

/// First section matching any candidate, or an empty section
pub fn section_or_empty(sections: &[Section], candidates: &[&str]) -> Section {
    qivo_types::find_section(sections, candidates)
        .cloned()
        .unwrap_or_default()
}

/// Non-empty sections from a list of document slots
pub fn collect_sections<'a>(slots: impl IntoIterator<Item = &'a Section>) -> Vec<Section> {
    slots
        .into_iter()
        .filter(|section| !section.is_empty())
        .cloned()
        .collect()
}

/// Value or sentinel; blank values count as missing
pub fn text_or(value: Option<&str>, sentinel: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => sentinel.to_string(),
    }
}

/// Inverse of [`text_or`]: sentinels read back as missing
pub fn provided(value: &str) -> Option<String> {
    if StandardId::is_sentinel(value) {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_defaults_and_read_back() {
        let metadata = ReportMetadata {
            project_name: Some("Serra Azul".into()),
            effective_date: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..Default::default()
        };
        let header = ProjectHeader::from_metadata(&metadata);
        assert_eq!(header.company, MISSING);
        assert_eq!(header.effective_date, "2024-06-30");

        let back = header.to_metadata(StandardId::Jorc);
        assert_eq!(back.project_name.as_deref(), Some("Serra Azul"));
        assert_eq!(back.company, None);
        assert_eq!(back.effective_date, metadata.effective_date);
        assert_eq!(back.detected_standard.as_deref(), Some("JORC 2012"));
    }

    #[test]
    fn test_person_keeps_explicit_role() {
        let person = ResponsiblePerson::new("Ana Lima").with_role("Lead Geologist");
        let row = PersonRow::from_person(&person, "Competent Person");
        assert_eq!(row.role, "Lead Geologist");
        assert_eq!(row.registration, MISSING);

        let row = PersonRow::from_person(&ResponsiblePerson::new("Ana Lima"), "Competent Person");
        assert_eq!(row.role, "Competent Person");
    }

    #[test]
    fn test_person_name_is_never_folded_into_a_sentinel() {
        for name in ["-", "Not provided", "  ", ""] {
            let row = PersonRow::from_person(&ResponsiblePerson::new(name), "Competent Person");
            assert_eq!(row.name, name);
            assert_eq!(row.to_person().name, name);
        }
    }

    #[test]
    fn test_resource_row_translates_category_only() {
        let estimate = ResourceEstimate::new("Measured", 1_000_000.0).with_grade("Au", 2.5);
        let row = ResourceRow::from_estimate(&estimate, StandardId::Cbrr);
        assert_eq!(row.category, "Medido");
        assert_eq!(row.tonnage, Some(1_000_000.0));
        assert_eq!(row.grades.get("Au"), Some(&2.5));
        // canonical snapshot untouched
        assert_eq!(estimate.category.as_deref(), Some("Measured"));
    }

    #[test]
    fn test_missing_category_uses_placeholder() {
        let estimate = ResourceEstimate {
            tonnage: Some(10.0),
            ..Default::default()
        };
        let row = ResourceRow::from_estimate(&estimate, StandardId::Perc);
        assert_eq!(row.category, MISSING);
        assert_eq!(row.to_estimate().category, None);
    }

    #[test]
    fn test_section_or_empty() {
        let sections = vec![Section::new("Geologia Regional", "Greenstone belt")];
        assert_eq!(
            section_or_empty(&sections, &["geologia", "geology"]).content_text,
            "Greenstone belt"
        );
        assert!(section_or_empty(&sections, &["reservas"]).is_empty());
    }
}
