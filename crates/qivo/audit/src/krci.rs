//! KRCI rule catalog
//!
//! Core rules apply to every standard; standard-specific rules are appended through an
//! exhaustive match on [`StandardId`]. Catalog order is registration order.

use crate::error::{Result, RuleError};
use crate::rule::{AuditRule, RuleOutcome, RuleSet};
use crate::scan::ScanMode;
use chrono::{Months, NaiveDate};
use qivo_types::{
    economic, resolve_category, CanonicalReport, ResponsiblePerson, RuleCategory, Severity,
    StandardId,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use RuleCategory::{Esg, Geo, Norma, Tenure};
use ScanMode::{Deep, Full, Light};
use Severity::{Critical, High, Low, Medium};

/// Default age after which a report is considered outdated
pub const DEFAULT_STALE_AFTER_MONTHS: u32 = 24;

/// Reports effective before this date may still carry a legacy DNPM code
const DNPM_CUTOVER: (i32, u32, u32) = (2017, 1, 1);

/// Inputs that time-dependent rules read instead of the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogContext {
    /// Reference date for staleness checks
    pub as_of: NaiveDate,
    pub stale_after_months: u32,
}

impl CatalogContext {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            stale_after_months: DEFAULT_STALE_AFTER_MONTHS,
        }
    }

    pub fn with_stale_after_months(mut self, months: u32) -> Self {
        self.stale_after_months = months;
        self
    }
}

/// Verdict of a catalog check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Pass,
    Fail,
    /// Required input absent; counts as failed
    Undetermined(&'static str),
    /// Failed on specific offending values
    Flagged(Vec<String>),
}

impl From<bool> for Check {
    fn from(compliant: bool) -> Self {
        if compliant {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// Static description of a catalog rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
    pub code: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub weight: u32,
    pub mode: ScanMode,
    pub section: &'static str,
    pub message: &'static str,
    pub recommendation: &'static str,
}

impl RuleDescriptor {
    fn check<F>(self, check: F) -> KrciRule
    where
        F: Fn(&CanonicalReport) -> Check + Send + Sync + 'static,
    {
        KrciRule {
            descriptor: self,
            check: Box::new(check),
        }
    }
}

type CheckFn = Box<dyn Fn(&CanonicalReport) -> Check + Send + Sync>;

/// Catalog rule: a descriptor plus its check
pub struct KrciRule {
    descriptor: RuleDescriptor,
    check: CheckFn,
}

impl KrciRule {
    pub fn descriptor(&self) -> &RuleDescriptor {
        &self.descriptor
    }
}

impl fmt::Debug for KrciRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KrciRule")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl AuditRule for KrciRule {
    fn code(&self) -> &str {
        self.descriptor.code
    }

    fn category(&self) -> RuleCategory {
        self.descriptor.category
    }

    fn severity(&self) -> Severity {
        self.descriptor.severity
    }

    fn weight(&self) -> u32 {
        self.descriptor.weight
    }

    fn section(&self) -> &str {
        self.descriptor.section
    }

    fn mode(&self) -> ScanMode {
        self.descriptor.mode
    }

    fn recommendation(&self) -> Option<&str> {
        Some(self.descriptor.recommendation)
    }

    fn evaluate(&self, report: &CanonicalReport) -> std::result::Result<RuleOutcome, RuleError> {
        let message = self.descriptor.message;
        let outcome = match (self.check)(report) {
            Check::Pass => RuleOutcome::pass("Passed"),
            Check::Fail => RuleOutcome::fail(message),
            Check::Undetermined(reason) => RuleOutcome::fail(format!("{message} ({reason})")),
            Check::Flagged(values) => RuleOutcome::fail(format!("{message}: {}", values.join(", ")))
                .with_details(serde_json::json!(values)),
        };
        Ok(outcome)
    }
}

/// Every catalog rule for `standard`, regardless of scan mode
pub fn catalog(standard: StandardId, context: &CatalogContext) -> Vec<KrciRule> {
    let mut rules = core_rules(context);

    match standard {
        StandardId::Cbrr => rules.extend(cbrr_rules()),
        StandardId::Jorc => rules.push(jorc_table1_rule()),
        StandardId::Ni43101 => rules.push(ni43_item14_rule()),
        StandardId::Perc | StandardId::Samrec => {}
    }

    rules.extend(cross_standard_rules(standard));
    rules
}

/// Rules run by a `mode` scan of a `standard` report, in registration order
pub fn rule_set(standard: StandardId, mode: ScanMode, context: &CatalogContext) -> RuleSet {
    catalog(standard, context)
        .into_iter()
        .filter(|rule| mode.includes(rule.descriptor.mode))
        .map(|rule| Arc::new(rule) as Arc<dyn AuditRule>)
        .collect()
}

/// [`rule_set`] for a free-text standard id
pub fn rule_set_for_id(
    standard: &str,
    mode: ScanMode,
    context: &CatalogContext,
) -> Result<RuleSet> {
    Ok(rule_set(standard.parse()?, mode, context))
}

/// Rule counts for a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    /// Rules run per scan mode (cumulative)
    pub by_mode: Vec<(ScanMode, usize)>,
    pub by_category: Vec<(RuleCategory, usize)>,
    pub by_severity: Vec<(Severity, usize)>,
}

/// Count the catalog for `standard` by mode, category and severity
pub fn catalog_stats(standard: StandardId, context: &CatalogContext) -> CatalogStats {
    let descriptors: Vec<RuleDescriptor> = catalog(standard, context)
        .into_iter()
        .map(|rule| rule.descriptor)
        .collect();

    CatalogStats {
        total: descriptors.len(),
        by_mode: ScanMode::ALL
            .iter()
            .map(|&mode| (mode, descriptors.iter().filter(|d| mode.includes(d.mode)).count()))
            .collect(),
        by_category: RuleCategory::ALL
            .iter()
            .map(|&c| (c, descriptors.iter().filter(|d| d.category == c).count()))
            .collect(),
        by_severity: Severity::ALL
            .iter()
            .map(|&s| (s, descriptors.iter().filter(|d| d.severity == s).count()))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Report probes
// ---------------------------------------------------------------------------

fn filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn lead(report: &CanonicalReport) -> Option<&ResponsiblePerson> {
    report.lead_person()
}

fn lead_has(report: &CanonicalReport, field: fn(&ResponsiblePerson) -> Option<&str>) -> bool {
    lead(report).is_some_and(|person| filled(field(person)))
}

fn section_has_content(report: &CanonicalReport, candidates: &[&str]) -> bool {
    report
        .find_section(candidates)
        .is_some_and(|section| !section.content_text.trim().is_empty())
}

const QA_QC_TITLES: &[&str] = &["qa/qc", "quality", "sampling"];

fn stale_check(report: &CanonicalReport, context: CatalogContext) -> Check {
    let Some(effective) = report.metadata.effective_date else {
        return Check::Undetermined("effective date missing");
    };
    match effective.checked_add_months(Months::new(context.stale_after_months)) {
        Some(limit) => (limit >= context.as_of).into(),
        None => Check::Undetermined("effective date out of range"),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

fn core_rules(context: &CatalogContext) -> Vec<KrciRule> {
    let context = *context;

    vec![
        RuleDescriptor {
            code: "KRCI-001",
            category: Norma,
            severity: Critical,
            weight: 20,
            mode: Light,
            section: "Competent Person",
            message: "Competent Person not declared or incomplete",
            recommendation: "Declare the Competent/Qualified Person responsible for the report",
        }
        .check(|r| lead(r).is_some_and(|p| filled(Some(p.name.as_str()))).into()),
        RuleDescriptor {
            code: "KRCI-002",
            category: Geo,
            severity: Critical,
            weight: 18,
            mode: Light,
            section: "Resource Estimate",
            message: "Resource estimate missing or empty",
            recommendation: "Include a resource table with tonnage and grade per category",
        }
        .check(|r| (!r.resource_estimates.is_empty()).into()),
        RuleDescriptor {
            code: "KRCI-003",
            category: Norma,
            severity: Critical,
            weight: 15,
            mode: Light,
            section: "Metadata",
            message: "Report effective date missing",
            recommendation: "State the effective date of the report",
        }
        .check(|r| r.metadata.effective_date.is_some().into()),
        RuleDescriptor {
            code: "KRCI-004",
            category: Geo,
            severity: High,
            weight: 12,
            mode: Light,
            section: "QA/QC",
            message: "Quality assurance and quality control (QA/QC) not documented",
            recommendation: "Document sampling, blanks, duplicates and reference materials",
        }
        .check(|r| section_has_content(r, QA_QC_TITLES).into()),
        RuleDescriptor {
            code: "KRCI-005",
            category: Geo,
            severity: High,
            weight: 12,
            mode: Full,
            section: "Economic Assumptions",
            message: "Economic assumptions missing (mining and processing costs)",
            recommendation: "Disclose mining and processing cost assumptions",
        }
        .check(|r| {
            (r.economic_value(economic::MINING_COST).is_some()
                || r.economic_value(economic::PROCESSING_COST).is_some())
            .into()
        }),
        RuleDescriptor {
            code: "KRCI-006",
            category: Geo,
            severity: High,
            weight: 10,
            mode: Full,
            section: "Resource Estimate",
            message: "Cutoff grade not specified",
            recommendation: "State the cutoff grade used for each reported estimate",
        }
        .check(|r| r.resource_estimates.iter().any(|e| !e.cutoff_grade.is_empty()).into()),
        RuleDescriptor {
            code: "KRCI-007",
            category: Norma,
            severity: High,
            weight: 10,
            mode: Light,
            section: "Competent Person",
            message: "Competent Person qualification not specified",
            recommendation: "State the professional qualification of the Competent Person",
        }
        .check(|r| lead_has(r, |p| p.qualification.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-008",
            category: Norma,
            severity: High,
            weight: 10,
            mode: Full,
            section: "Metadata",
            message: "Report is outdated",
            recommendation: "Update the report; disclosure older than the review window is stale",
        }
        .check(move |r| stale_check(r, context)),
        RuleDescriptor {
            code: "KRCI-009",
            category: Norma,
            severity: Medium,
            weight: 8,
            mode: Light,
            section: "Metadata",
            message: "Project name missing",
            recommendation: "Include the project name",
        }
        .check(|r| filled(r.metadata.project_name.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-010",
            category: Norma,
            severity: Medium,
            weight: 7,
            mode: Full,
            section: "Sections",
            message: "Report has fewer than 5 main sections",
            recommendation: "Structure the report following the standard's table of contents",
        }
        .check(|r| (r.sections.iter().filter(|s| !s.is_empty()).count() >= 5).into()),
        RuleDescriptor {
            code: "KRCI-011",
            category: Geo,
            severity: Medium,
            weight: 8,
            mode: Full,
            section: "Resource Estimate",
            message: "Resource category not specified (Measured/Indicated/Inferred)",
            recommendation: "Classify every estimate as Measured, Indicated or Inferred",
        }
        .check(|r| {
            r.resource_estimates
                .iter()
                .any(|e| filled(e.category.as_deref()))
                .into()
        }),
        RuleDescriptor {
            code: "KRCI-012",
            category: Geo,
            severity: Medium,
            weight: 6,
            mode: Full,
            section: "Economic Assumptions",
            message: "Metallurgical recovery rate not specified",
            recommendation: "Disclose the metallurgical recovery assumption",
        }
        .check(|r| r.economic_value(economic::RECOVERY_RATE).is_some().into()),
        RuleDescriptor {
            code: "KRCI-013",
            category: Norma,
            severity: Medium,
            weight: 5,
            mode: Full,
            section: "Competent Person",
            message: "Competent Person organization not specified",
            recommendation: "State the organization the Competent Person works for",
        }
        .check(|r| lead_has(r, |p| p.organization.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-014",
            category: Norma,
            severity: Medium,
            weight: 7,
            mode: Light,
            section: "Standards",
            message: "Reporting standard not identified",
            recommendation: "State the reporting standard (JORC, NI 43-101, PERC, SAMREC or CBRR)",
        }
        .check(|r| filled(r.metadata.detected_standard.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-015",
            category: Norma,
            severity: Low,
            weight: 4,
            mode: Deep,
            section: "Sections",
            message: "Executive Summary section missing",
            recommendation: "Add an Executive Summary section",
        }
        .check(|r| {
            r.has_section(&["executive summary", "sumário executivo", "resumo executivo"])
                .into()
        }),
        RuleDescriptor {
            code: "KRCI-016",
            category: Norma,
            severity: Low,
            weight: 3,
            mode: Deep,
            section: "Sections",
            message: "Introduction section missing",
            recommendation: "Add an Introduction section",
        }
        .check(|r| r.has_section(&["introduction", "introdução"]).into()),
        RuleDescriptor {
            code: "KRCI-017",
            category: Geo,
            severity: Low,
            weight: 4,
            mode: Full,
            section: "Sections",
            message: "Geology section missing",
            recommendation: "Add a Geology and Mineralization section",
        }
        .check(|r| r.has_section(&["geology", "geological", "geologia"]).into()),
        RuleDescriptor {
            code: "KRCI-018",
            category: Geo,
            severity: Low,
            weight: 4,
            mode: Deep,
            section: "Sections",
            message: "Sampling and Analysis section missing",
            recommendation: "Add a section describing sampling and assay procedures",
        }
        .check(|r| r.has_section(&["sampling", "analysis", "amostragem"]).into()),
        RuleDescriptor {
            code: "KRCI-019",
            category: Geo,
            severity: Low,
            weight: 3,
            mode: Full,
            section: "Resource Estimate",
            message: "Tonnage missing for one or more estimates",
            recommendation: "Report tonnage for every classified estimate",
        }
        .check(|r| r.resource_estimates.iter().all(|e| e.tonnage.is_some()).into()),
        RuleDescriptor {
            code: "KRCI-020",
            category: Geo,
            severity: Low,
            weight: 3,
            mode: Deep,
            section: "Resource Estimate",
            message: "Grade missing for one or more estimates",
            recommendation: "Report grade for every classified estimate",
        }
        .check(|r| r.resource_estimates.iter().all(|e| !e.grade.is_empty()).into()),
        RuleDescriptor {
            code: "KRCI-021",
            category: Norma,
            severity: Medium,
            weight: 5,
            mode: Light,
            section: "Metadata",
            message: "Reporting company not identified",
            recommendation: "Include the name of the issuing company",
        }
        .check(|r| filled(r.metadata.company.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-022",
            category: Geo,
            severity: Low,
            weight: 2,
            mode: Light,
            section: "Resource Estimate",
            message: "Unrecognized resource categories",
            recommendation: "Use Measured, Indicated, Inferred, Proved or Probable",
        }
        .check(|r| {
            let unknown: Vec<String> = r
                .resource_estimates
                .iter()
                .filter_map(|e| e.category.as_deref())
                .filter(|c| filled(Some(*c)) && resolve_category(c).is_none())
                .map(str::to_string)
                .collect();
            if unknown.is_empty() {
                Check::Pass
            } else {
                Check::Flagged(unknown)
            }
        }),
    ]
}

fn cbrr_rules() -> Vec<KrciRule> {
    let dnpm_cutover = NaiveDate::from_ymd_opt(DNPM_CUTOVER.0, DNPM_CUTOVER.1, DNPM_CUTOVER.2);

    vec![
        RuleDescriptor {
            code: "KRCI-T001",
            category: Tenure,
            severity: Critical,
            weight: 20,
            mode: Light,
            section: "Tenure",
            message: "ANM process number missing",
            recommendation: "Include the ANM process number (format 800.XXX/YEAR)",
        }
        .check(|r| filled(r.metadata.jurisdiction.anm_process.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-T002",
            category: Tenure,
            severity: Medium,
            weight: 10,
            mode: Full,
            section: "Tenure",
            message: "DNPM code missing for a pre-2017 process",
            recommendation: "Include the legacy DNPM code for processes opened before 2017",
        }
        .check(move |r| {
            let legacy = match (r.metadata.effective_date, dnpm_cutover) {
                (Some(date), Some(cutover)) => date < cutover,
                _ => false,
            };
            (!legacy || filled(r.metadata.jurisdiction.dnpm_code.as_deref())).into()
        }),
        RuleDescriptor {
            code: "KRCI-T003",
            category: Tenure,
            severity: High,
            weight: 12,
            mode: Full,
            section: "Economic Assumptions",
            message: "CFEM royalty rate not declared",
            recommendation: "Declare the CFEM rate applicable to the mineral substance (1% to 4%)",
        }
        .check(|r| r.economic_value(economic::ROYALTIES).is_some().into()),
        RuleDescriptor {
            code: "KRCI-N007",
            category: Norma,
            severity: High,
            weight: 15,
            mode: Light,
            section: "Competent Person",
            message: "Professional registration of the Pessoa Qualificada missing (CREA)",
            recommendation: "Include the CREA registration number of the Pessoa Qualificada",
        }
        .check(|r| lead_has(r, |p| p.registration_id.as_deref()).into()),
        RuleDescriptor {
            code: "KRCI-E001",
            category: Esg,
            severity: Critical,
            weight: 20,
            mode: Light,
            section: "Environmental",
            message: "Environmental license missing",
            recommendation: "Obtain the environmental license (LP, LI or LO)",
        }
        .check(|r| {
            let license_type = r.environmental.as_ref().and_then(|e| e.license_type.as_deref());
            filled(license_type).into()
        }),
        RuleDescriptor {
            code: "KRCI-E002",
            category: Esg,
            severity: High,
            weight: 15,
            mode: Light,
            section: "Environmental",
            message: "Environmental license number missing",
            recommendation: "Include the environmental license number",
        }
        .check(|r| {
            let number = r.environmental.as_ref().and_then(|e| e.license_number.as_deref());
            filled(number).into()
        }),
        RuleDescriptor {
            code: "KRCI-E003",
            category: Esg,
            severity: High,
            weight: 12,
            mode: Full,
            section: "Environmental",
            message: "License issuing authority not specified",
            recommendation: "Name the issuing authority (IBAMA or the state agency)",
        }
        .check(|r| {
            let authority = r.environmental.as_ref().and_then(|e| e.issuing_authority.as_deref());
            filled(authority).into()
        }),
    ]
}

fn jorc_table1_rule() -> KrciRule {
    RuleDescriptor {
        code: "KRCI-N003",
        category: Norma,
        severity: High,
        weight: 12,
        mode: Full,
        section: "Standards",
        message: "JORC Table 1 missing (Sampling Techniques and Data)",
        recommendation: "Include JORC Code Table 1",
    }
    .check(|r| r.has_section(&["table 1", "section 1"]).into())
}

fn ni43_item14_rule() -> KrciRule {
    RuleDescriptor {
        code: "KRCI-N005",
        category: Norma,
        severity: High,
        weight: 12,
        mode: Full,
        section: "Standards",
        message: "NI 43-101 Item 14 missing (Mineral Resource Estimates)",
        recommendation: "Include Item 14 as required by Form 43-101F1",
    }
    .check(|r| r.has_section(&["item 14", "mineral resource estimate"]).into())
}

fn cross_standard_rules(target: StandardId) -> Vec<KrciRule> {
    vec![
        RuleDescriptor {
            code: "KRCI-N008",
            category: Norma,
            severity: Medium,
            weight: 8,
            mode: Full,
            section: "Standards",
            message: "Report was prepared under a different standard",
            recommendation: "Convert the report to the target standard before filing",
        }
        .check(move |r| match r.detected_standard_id() {
            Some(detected) if detected != target => {
                Check::Flagged(vec![format!("{} (audited as {})", detected.id(), target.id())])
            }
            _ => Check::Pass,
        }),
        RuleDescriptor {
            code: "KRCI-023",
            category: Esg,
            severity: Medium,
            weight: 6,
            mode: Full,
            section: "Environmental",
            message: "Environmental and social studies section missing",
            recommendation: "Add a section on environmental studies, permitting and social impact",
        }
        .check(|r| r.has_section(&["environmental", "ambiental", "meio ambiente"]).into()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_audit;
    use qivo_types::{EnvironmentalLicensing, ResourceEstimate};
    use std::collections::HashSet;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn context() -> CatalogContext {
        CatalogContext::new(date(2025, 1, 1))
    }

    fn outcome(code: &str, standard: StandardId, report: &CanonicalReport) -> RuleOutcome {
        let rule = catalog(standard, &context())
            .into_iter()
            .find(|r| r.code() == code)
            .unwrap();
        rule.evaluate(report).unwrap()
    }

    #[test]
    fn test_codes_are_unique_per_standard() {
        for standard in StandardId::ALL {
            let rules = catalog(standard, &context());
            let codes: HashSet<_> = rules.iter().map(|r| r.code().to_string()).collect();
            assert_eq!(codes.len(), rules.len(), "duplicate code for {standard}");
        }
    }

    #[test]
    fn test_modes_are_nested() {
        for standard in StandardId::ALL {
            let light = rule_set(standard, Light, &context());
            let full = rule_set(standard, Full, &context());
            let deep = rule_set(standard, Deep, &context());
            assert!(light.len() < full.len() && full.len() < deep.len());

            let full_codes: HashSet<_> = full.iter().map(|r| r.code().to_string()).collect();
            assert!(light.iter().all(|r| full_codes.contains(r.code())));
        }
    }

    #[test]
    fn test_standard_specific_rules() {
        let codes = |standard| -> Vec<String> {
            catalog(standard, &context())
                .iter()
                .map(|r| r.code().to_string())
                .collect()
        };
        assert!(codes(StandardId::Cbrr).contains(&"KRCI-T001".to_string()));
        assert!(!codes(StandardId::Jorc).contains(&"KRCI-T001".to_string()));
        assert!(codes(StandardId::Jorc).contains(&"KRCI-N003".to_string()));
        assert!(codes(StandardId::Ni43101).contains(&"KRCI-N005".to_string()));
    }

    #[test]
    fn test_unknown_standard_id() {
        let err = rule_set_for_id("GOST", Full, &context()).unwrap_err();
        assert_eq!(err, crate::AuditError::UnsupportedStandard("GOST".into()));
    }

    #[test]
    fn test_staleness_uses_injected_date() {
        let fresh = CanonicalReport::new().with_effective_date(date(2023, 6, 1));
        assert!(outcome("KRCI-008", StandardId::Jorc, &fresh).passed);

        let stale = CanonicalReport::new().with_effective_date(date(2022, 12, 31));
        assert!(!outcome("KRCI-008", StandardId::Jorc, &stale).passed);

        let undated = outcome("KRCI-008", StandardId::Jorc, &CanonicalReport::new());
        assert!(!undated.passed);
        assert!(undated.message.contains("effective date missing"));
    }

    #[test]
    fn test_stale_window_is_configurable() {
        let report = CanonicalReport::new().with_effective_date(date(2024, 3, 1));
        let context = context().with_stale_after_months(6);
        let rules = rule_set(StandardId::Perc, Full, &context);
        let result = run_audit("r", &report, &rules);
        assert!(result.issue_codes().contains("KRCI-008"));
    }

    #[test]
    fn test_unrecognized_category_is_flagged() {
        let report = CanonicalReport::new()
            .with_resource(ResourceEstimate::new("Measured", 10.0))
            .with_resource(ResourceEstimate::new("Exploration Target", 20.0));
        let outcome = outcome("KRCI-022", StandardId::Samrec, &report);
        assert!(!outcome.passed);
        assert!(outcome.message.ends_with("Exploration Target"));
        assert_eq!(outcome.details, Some(serde_json::json!(["Exploration Target"])));
    }

    #[test]
    fn test_standard_mismatch() {
        let report = CanonicalReport::new().with_detected_standard("JORC 2012");
        assert!(outcome("KRCI-N008", StandardId::Jorc, &report).passed);

        let mismatch = outcome("KRCI-N008", StandardId::Cbrr, &report);
        assert!(!mismatch.passed);
        assert!(mismatch.message.contains("JORC (audited as CBRR)"));
    }

    #[test]
    fn test_cbrr_licensing_rules() {
        let report = CanonicalReport::new().with_environmental(EnvironmentalLicensing {
            license_type: Some("LO".into()),
            license_number: Some("1234/2021".into()),
            issuing_authority: None,
        });
        assert!(outcome("KRCI-E001", StandardId::Cbrr, &report).passed);
        assert!(outcome("KRCI-E002", StandardId::Cbrr, &report).passed);
        assert!(!outcome("KRCI-E003", StandardId::Cbrr, &report).passed);
    }

    #[test]
    fn test_dnpm_only_required_for_legacy_processes() {
        let recent = CanonicalReport::new().with_effective_date(date(2020, 1, 1));
        assert!(outcome("KRCI-T002", StandardId::Cbrr, &recent).passed);

        let legacy = CanonicalReport::new().with_effective_date(date(2015, 1, 1));
        assert!(!outcome("KRCI-T002", StandardId::Cbrr, &legacy).passed);
    }

    #[test]
    fn test_catalog_stats() {
        let stats = catalog_stats(StandardId::Cbrr, &context());
        assert_eq!(stats.total, catalog(StandardId::Cbrr, &context()).len());
        assert_eq!(stats.by_mode.last().map(|(_, n)| *n), Some(stats.total));
        let by_category: usize = stats.by_category.iter().map(|(_, n)| n).sum();
        assert_eq!(by_category, stats.total);
    }
}
