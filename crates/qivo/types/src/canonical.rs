//! Canonical technical report model
//!
//! A [`CanonicalReport`] is produced once per ingestion and never mutated in place.
//! The `with_*` builders consume the value and return a new snapshot, so an edited
//! report is always a distinct value from the one that was audited.

use crate::matching::find_section;
use crate::standard::StandardId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named economic parameters (see [`economic`] for the well-known keys)
pub type EconomicAssumptions = BTreeMap<String, f64>;

/// Well-known keys in [`EconomicAssumptions`]
pub mod economic {
    pub const RECOVERY_RATE: &str = "recovery_rate";
    pub const MINING_COST: &str = "mining_cost";
    pub const PROCESSING_COST: &str = "processing_cost";
    /// Royalty rate; CFEM under CBRR
    pub const ROYALTIES: &str = "royalties";
}

/// Standard-agnostic technical report snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalReport {
    #[serde(default)]
    pub metadata: ReportMetadata,

    /// Free-text narrative blocks in document order
    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub resource_estimates: Vec<ResourceEstimate>,

    #[serde(default)]
    pub responsible_persons: Vec<ResponsiblePerson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economic_assumptions: Option<EconomicAssumptions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental: Option<EnvironmentalLicensing>,
}

/// Report-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,

    /// Standard detected by ingestion, verbatim (e.g. "JORC 2012")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_standard: Option<String>,

    #[serde(default)]
    pub jurisdiction: Jurisdiction,
}

/// Jurisdiction identifiers issued by mining authorities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jurisdiction {
    /// ANM (Agência Nacional de Mineração) process number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anm_process: Option<String>,

    /// Legacy DNPM code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnpm_code: Option<String>,
}

/// Narrative section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content_text: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_text: content_text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content_text.trim().is_empty()
    }
}

/// Resource or reserve estimate row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEstimate {
    /// Classification in the source vocabulary (e.g. "Measured", "Medido")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonnage: Option<f64>,

    /// Grade per element
    #[serde(default)]
    pub grade: BTreeMap<String, f64>,

    /// Cutoff grade per element
    #[serde(default)]
    pub cutoff_grade: BTreeMap<String, f64>,
}

impl ResourceEstimate {
    pub fn new(category: impl Into<String>, tonnage: f64) -> Self {
        Self {
            category: Some(category.into()),
            tonnage: Some(tonnage),
            ..Default::default()
        }
    }

    pub fn with_grade(mut self, element: impl Into<String>, value: f64) -> Self {
        self.grade.insert(element.into(), value);
        self
    }

    pub fn with_cutoff_grade(mut self, element: impl Into<String>, value: f64) -> Self {
        self.cutoff_grade.insert(element.into(), value);
        self
    }
}

/// Signing professional (Competent Person, Qualified Person, Pessoa Qualificada)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiblePerson {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// CREA number under CBRR, professional body membership elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
}

impl ResponsiblePerson {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_qualification(mut self, qualification: impl Into<String>) -> Self {
        self.qualification = Some(qualification.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_registration_id(mut self, registration_id: impl Into<String>) -> Self {
        self.registration_id = Some(registration_id.into());
        self
    }
}

/// Environmental licensing block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalLicensing {
    /// License type (LP, LI, LO)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    /// Issuing agency (IBAMA, state agency)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
}

impl CanonicalReport {
    /// Create an empty report snapshot
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.project_name = Some(name.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.metadata.company = Some(company.into());
        self
    }

    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.metadata.effective_date = Some(date);
        self
    }

    pub fn with_detected_standard(mut self, standard: impl Into<String>) -> Self {
        self.metadata.detected_standard = Some(standard.into());
        self
    }

    pub fn with_anm_process(mut self, process: impl Into<String>) -> Self {
        self.metadata.jurisdiction.anm_process = Some(process.into());
        self
    }

    pub fn with_section(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.sections.push(Section::new(title, content));
        self
    }

    pub fn with_resource(mut self, estimate: ResourceEstimate) -> Self {
        self.resource_estimates.push(estimate);
        self
    }

    pub fn with_person(mut self, person: ResponsiblePerson) -> Self {
        self.responsible_persons.push(person);
        self
    }

    pub fn with_economic(mut self, key: impl Into<String>, value: f64) -> Self {
        self.economic_assumptions
            .get_or_insert_with(EconomicAssumptions::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_environmental(mut self, environmental: EnvironmentalLicensing) -> Self {
        self.environmental = Some(environmental);
        self
    }

    /// First section whose title matches any candidate, candidates tried in order
    pub fn find_section(&self, candidates: &[&str]) -> Option<&Section> {
        find_section(&self.sections, candidates)
    }

    /// Whether a section matching any candidate exists
    pub fn has_section(&self, candidates: &[&str]) -> bool {
        self.find_section(candidates).is_some()
    }

    /// Look up a named economic parameter
    pub fn economic_value(&self, key: &str) -> Option<f64> {
        self.economic_assumptions
            .as_ref()
            .and_then(|values| values.get(key).copied())
    }

    /// The detected source standard, when ingestion recognized one
    pub fn detected_standard_id(&self) -> Option<StandardId> {
        self.metadata
            .detected_standard
            .as_deref()
            .and_then(|s| s.parse().ok())
    }

    /// The first responsible person, if any
    pub fn lead_person(&self) -> Option<&ResponsiblePerson> {
        self.responsible_persons.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanonicalReport {
        CanonicalReport::new()
            .with_project_name("Serra Azul")
            .with_company("Mineração Azul S.A.")
            .with_detected_standard("JORC 2012")
            .with_section("1. Executive Summary", "Gold project in Minas Gerais")
            .with_section("7. Geology and Mineralization", "Banded iron formation")
            .with_resource(
                ResourceEstimate::new("Measured", 1_000_000.0)
                    .with_grade("Au", 2.5)
                    .with_cutoff_grade("Au", 0.5),
            )
            .with_person(
                ResponsiblePerson::new("Maria Souza")
                    .with_qualification("MAusIMM")
                    .with_registration_id("CREA-MG 12345"),
            )
            .with_economic(economic::ROYALTIES, 2.0)
    }

    #[test]
    fn test_builder_produces_new_snapshot() {
        let original = CanonicalReport::new().with_project_name("A");
        let edited = original.clone().with_project_name("B");
        assert_eq!(original.metadata.project_name.as_deref(), Some("A"));
        assert_eq!(edited.metadata.project_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_find_section_by_localized_candidates() {
        let report = sample();
        let section = report.find_section(&["geologia", "geology"]).unwrap();
        assert_eq!(section.content_text, "Banded iron formation");
        assert!(report.find_section(&["reservas", "reserves"]).is_none());
    }

    #[test]
    fn test_economic_lookup() {
        let report = sample();
        assert_eq!(report.economic_value(economic::ROYALTIES), Some(2.0));
        assert_eq!(report.economic_value(economic::RECOVERY_RATE), None);
    }

    #[test]
    fn test_detected_standard_id() {
        assert_eq!(sample().detected_standard_id(), Some(StandardId::Jorc));
        let unknown = CanonicalReport::new().with_detected_standard("CIM 2014");
        assert_eq!(unknown.detected_standard_id(), None);
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("resourceEstimates").is_some());
        assert!(json.get("responsiblePersons").is_some());
        assert_eq!(json["metadata"]["projectName"], "Serra Azul");
        assert_eq!(json["resourceEstimates"][0]["cutoffGrade"]["Au"], 0.5);
        assert_eq!(json["responsiblePersons"][0]["registrationId"], "CREA-MG 12345");
    }

    #[test]
    fn test_deserialize_partial_report() {
        let json = r#"{
            "metadata": { "projectName": "Lavra Norte", "effectiveDate": "2024-03-01" },
            "resourceEstimates": [ { "category": "Indicado", "tonnage": 250000 } ]
        }"#;
        let report: CanonicalReport = serde_json::from_str(json).unwrap();
        assert_eq!(
            report.metadata.effective_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(report.sections.is_empty());
        assert_eq!(report.resource_estimates[0].tonnage, Some(250_000.0));
    }
}
