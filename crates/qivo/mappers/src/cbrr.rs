//! CBRR document
//!
//! CBRR follows the CRIRSCO template adapted to Brazilian mining law. Compared to the
//! international standards it adds the ANM registration block, CREA registration of the
//! Pessoa Qualificada, the CFEM royalty rate and environmental licensing. Those fields
//! are never omitted: absent values render as "Não informado" from a canonical report
//! and as "A ser informado" when converted from another standard.

use crate::common::{
    collect_sections, provided, section_or_empty, section_text, text_or, PersonRow,
    ProjectHeader, ResourceRow, SharedFields, GEOLOGY_TITLES, QA_QC_TITLES,
};
use crate::mapper::StandardMapper;
use crate::registry::StandardView;
use qivo_types::{
    economic, CanonicalReport, EconomicAssumptions, EnvironmentalLicensing, ResponsiblePerson,
    Section, StandardId,
};
use serde::{Deserialize, Serialize};

const REGULATORY_BODY: &str = "ANM - Agência Nacional de Mineração";

/// CBRR report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbrrView {
    pub standard: String,
    pub standard_full_name: String,
    pub regulatory_body: String,
    #[serde(flatten)]
    pub project: ProjectHeader,
    pub anm_process: String,
    pub dnpm_code: String,
    pub qualified_persons: Vec<CbrrPerson>,
    pub qa_qc: String,
    pub geology: String,
    pub economic_assumptions: CbrrEconomics,
    pub environmental_licensing: CbrrLicensing,
    pub sections: CbrrSections,
    pub resources_table: Vec<ResourceRow>,
    pub anm_compliance: AnmCompliance,
}

/// Pessoa Qualificada
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbrrPerson {
    pub name: String,
    pub qualification: String,
    pub organization: String,
    pub role: String,
    /// CREA/CONFEA registration
    pub crea_number: String,
    pub cpf: String,
}

/// Economic assumptions plus the CFEM royalty rate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbrrEconomics {
    #[serde(flatten)]
    pub values: EconomicAssumptions,
    /// Compensação Financeira pela Exploração Mineral, percent; 0 when unknown
    pub cfem_rate: f64,
}

impl CbrrEconomics {
    fn from_values(values: EconomicAssumptions) -> Self {
        let cfem_rate = values.get(economic::ROYALTIES).copied().unwrap_or(0.0);
        Self { values, cfem_rate }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbrrLicensing {
    /// LP, LI or LO
    pub license_type: String,
    pub license_number: String,
    pub issuing_agency: String,
}

impl CbrrLicensing {
    fn filled_with(sentinel: &str) -> Self {
        Self {
            license_type: sentinel.to_string(),
            license_number: sentinel.to_string(),
            issuing_agency: sentinel.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CbrrSections {
    pub introducao: Section,
    pub localizacao: Section,
    pub geologia: Section,
    pub recursos_minerais: Section,
    pub reservas_minerais: Section,
    pub metodologia: Section,
    pub qa_qc: Section,
    pub conclusoes: Section,
}

impl CbrrSections {
    fn locate(sections: &[Section]) -> Self {
        Self {
            introducao: section_or_empty(sections, &["introdução", "introduction"]),
            localizacao: section_or_empty(sections, &["localização", "location"]),
            geologia: section_or_empty(sections, GEOLOGY_TITLES),
            recursos_minerais: section_or_empty(sections, &["recursos", "resources"]),
            reservas_minerais: section_or_empty(sections, &["reservas", "reserves"]),
            metodologia: section_or_empty(sections, &["metodologia", "methodology"]),
            qa_qc: section_or_empty(sections, QA_QC_TITLES),
            conclusoes: section_or_empty(sections, &["conclusões", "conclusions"]),
        }
    }

    fn slots(&self) -> [&Section; 8] {
        [
            &self.introducao,
            &self.localizacao,
            &self.geologia,
            &self.recursos_minerais,
            &self.reservas_minerais,
            &self.metodologia,
            &self.qa_qc,
            &self.conclusoes,
        ]
    }
}

/// NRM-01 compliance block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnmCompliance {
    pub norm: String,
    pub classification_system: String,
    pub requires_registration: bool,
    pub registration_body: String,
}

impl Default for AnmCompliance {
    fn default() -> Self {
        Self {
            norm: "NRM-01 - Norma Reguladora de Mineração".to_string(),
            classification_system: "CBRR (alinhado com CRIRSCO)".to_string(),
            requires_registration: true,
            registration_body: REGULATORY_BODY.to_string(),
        }
    }
}

impl StandardMapper for CbrrView {
    const STANDARD: StandardId = StandardId::Cbrr;

    fn from_canonical(report: &CanonicalReport) -> Self {
        let standard = Self::STANDARD;
        let missing = standard.not_provided();
        let sections = &report.sections;
        let jurisdiction = &report.metadata.jurisdiction;
        let environmental = report.environmental.clone().unwrap_or_default();

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            regulatory_body: REGULATORY_BODY.to_string(),
            project: ProjectHeader::from_metadata(&report.metadata),
            anm_process: text_or(jurisdiction.anm_process.as_deref(), missing),
            dnpm_code: text_or(jurisdiction.dnpm_code.as_deref(), missing),
            qualified_persons: report
                .responsible_persons
                .iter()
                .map(|p| CbrrPerson::from_person(p, missing))
                .collect(),
            qa_qc: section_text(sections, QA_QC_TITLES, missing),
            geology: section_text(sections, GEOLOGY_TITLES, missing),
            economic_assumptions: CbrrEconomics::from_values(
                report.economic_assumptions.clone().unwrap_or_default(),
            ),
            environmental_licensing: CbrrLicensing {
                license_type: text_or(environmental.license_type.as_deref(), missing),
                license_number: text_or(environmental.license_number.as_deref(), missing),
                issuing_agency: text_or(environmental.issuing_authority.as_deref(), missing),
            },
            sections: CbrrSections::locate(sections),
            resources_table: report
                .resource_estimates
                .iter()
                .map(|e| ResourceRow::from_estimate(e, standard))
                .collect(),
            anm_compliance: AnmCompliance::default(),
        }
    }

    fn from_other(source: &StandardView) -> Self {
        let standard = Self::STANDARD;
        let pending = standard.to_be_provided();
        let shared = source.shared_fields();
        let sections = CbrrSections::locate(&shared.narrative_sections());

        Self {
            standard: standard.display_name().to_string(),
            standard_full_name: standard.full_name().to_string(),
            regulatory_body: REGULATORY_BODY.to_string(),
            anm_process: pending.to_string(),
            dnpm_code: pending.to_string(),
            qualified_persons: shared
                .persons
                .iter()
                .map(|p| CbrrPerson::from_row(p, pending))
                .collect(),
            qa_qc: shared.qa_qc.unwrap_or_else(|| pending.to_string()),
            geology: shared.geology.unwrap_or_else(|| pending.to_string()),
            economic_assumptions: CbrrEconomics::from_values(shared.economics),
            environmental_licensing: CbrrLicensing::filled_with(pending),
            sections,
            resources_table: shared
                .resources
                .iter()
                .map(|r| r.renormalized(standard))
                .collect(),
            anm_compliance: AnmCompliance::default(),
            project: shared.project,
        }
    }

    fn shared_fields(&self) -> SharedFields {
        SharedFields {
            project: self.project.clone(),
            persons: self.qualified_persons.iter().map(CbrrPerson::to_row).collect(),
            resources: self.resources_table.clone(),
            economics: self.economic_assumptions.values.clone(),
            qa_qc: provided(&self.qa_qc),
            geology: provided(&self.geology),
            sections: collect_sections(self.sections.slots()),
        }
    }

    fn to_canonical(&self) -> CanonicalReport {
        let mut report = self.shared_fields().into_canonical(Self::STANDARD);
        report.metadata.jurisdiction.anm_process = provided(&self.anm_process);
        report.metadata.jurisdiction.dnpm_code = provided(&self.dnpm_code);

        let licensing = &self.environmental_licensing;
        let environmental = EnvironmentalLicensing {
            license_type: provided(&licensing.license_type),
            license_number: provided(&licensing.license_number),
            issuing_authority: provided(&licensing.issuing_agency),
        };
        if environmental != EnvironmentalLicensing::default() {
            report.environmental = Some(environmental);
        }
        report
    }
}

impl CbrrPerson {
    fn from_person(person: &ResponsiblePerson, missing: &str) -> Self {
        let row = PersonRow::from_person(person, StandardId::Cbrr.person_role());
        Self {
            crea_number: text_or(person.registration_id.as_deref(), missing),
            cpf: missing.to_string(),
            ..Self::from_row(&row, missing)
        }
    }

    /// Person from another standard; Brazilian registrations are never carried over
    fn from_row(row: &PersonRow, pending: &str) -> Self {
        Self {
            name: row.name.clone(),
            qualification: row.qualification.clone(),
            organization: row.organization.clone(),
            role: StandardId::Cbrr.person_role().to_string(),
            crea_number: pending.to_string(),
            cpf: pending.to_string(),
        }
    }

    fn to_row(&self) -> PersonRow {
        PersonRow {
            name: self.name.clone(),
            qualification: self.qualification.clone(),
            organization: self.organization.clone(),
            role: self.role.clone(),
            registration: self.crea_number.clone(),
        }
    }
}
