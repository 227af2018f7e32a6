//! Section rewrite comparison
//!
//! Compares each report section against a rewrite produced by an injected
//! [`SectionRewriter`]. Similarity is the Jaccard index of the two lowercase word sets;
//! differences are the words each side has that the other lacks.

use crate::error::RewriteError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qivo_types::{CanonicalReport, Section, StandardId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Sections shorter than this are not sent for rewriting
pub const MIN_SECTION_CHARS: usize = 50;
/// Most recommendations carried by a comparison
pub const MAX_RECOMMENDATIONS: usize = 10;

const HIGH_IMPACT_WORDS: usize = 20;
const MEDIUM_IMPACT_WORDS: usize = 5;
const LISTED_WORDS: usize = 5;

/// Produces an alternative wording for a report section
#[async_trait]
pub trait SectionRewriter: Send + Sync {
    /// Rewrite `section` for `standard`
    async fn rewrite(
        &self,
        section: &Section,
        standard: StandardId,
    ) -> Result<String, RewriteError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Addition,
    Deletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    fn of_word_count(words: usize) -> Self {
        if words >= HIGH_IMPACT_WORDS {
            Self::High
        } else if words >= MEDIUM_IMPACT_WORDS {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDifference {
    pub kind: DiffKind,
    pub description: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteRecommendation {
    KeepOriginal,
    UseRewrite,
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionComparison {
    pub section_name: String,
    pub original_text: String,
    pub rewritten_text: String,
    /// Jaccard word similarity, 0 to 100
    pub similarity_score: u32,
    pub differences: Vec<SectionDifference>,
    pub recommendation: RewriteRecommendation,
    /// The rewriter failed and the original text stands in for the rewrite
    pub rewrite_failed: bool,
}

impl SectionComparison {
    /// Compare an original text with its rewrite
    pub fn new(section_name: &str, original: &str, rewritten: &str) -> Self {
        let before = words(original);
        let after = words(rewritten);
        let similarity_score = similarity(&before, &after);
        let differences = differences(&before, &after);

        Self {
            section_name: section_name.to_string(),
            original_text: original.to_string(),
            rewritten_text: rewritten.to_string(),
            recommendation: recommend(similarity_score, &differences),
            similarity_score,
            differences,
            rewrite_failed: false,
        }
    }

    fn high_impact(&self) -> impl Iterator<Item = &SectionDifference> {
        self.differences.iter().filter(|d| d.impact == Impact::High)
    }
}

/// Rewrite comparison for a whole report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteComparison {
    pub report_id: String,
    /// Mean section similarity; 0 when nothing was compared
    pub overall_similarity: u32,
    pub sections_compared: usize,
    pub sections: Vec<SectionComparison>,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Compare every sufficiently long section of `report` with its rewrite
///
/// Sections are rewritten one at a time, in report order. A failing rewriter never
/// aborts the comparison: the original text is used in place of the rewrite.
pub async fn compare_with_rewrites(
    report_id: &str,
    report: &CanonicalReport,
    standard: StandardId,
    rewriter: &dyn SectionRewriter,
    created_at: DateTime<Utc>,
) -> RewriteComparison {
    let mut sections = Vec::new();

    for section in &report.sections {
        if section.content_text.chars().count() < MIN_SECTION_CHARS {
            debug!(report_id, section = %section.title, "Skipping short section");
            continue;
        }

        let comparison = match rewriter.rewrite(section, standard).await {
            Ok(rewritten) => {
                SectionComparison::new(&section.title, &section.content_text, &rewritten)
            }
            Err(err) => {
                warn!(
                    report_id,
                    section = %section.title,
                    error = %err,
                    "Rewrite failed, keeping original"
                );
                SectionComparison {
                    rewrite_failed: true,
                    ..SectionComparison::new(
                        &section.title,
                        &section.content_text,
                        &section.content_text,
                    )
                }
            }
        };
        sections.push(comparison);
    }

    let overall_similarity = if sections.is_empty() {
        0
    } else {
        let total: u32 = sections.iter().map(|s| s.similarity_score).sum();
        (f64::from(total) / sections.len() as f64).round() as u32
    };

    RewriteComparison {
        report_id: report_id.to_string(),
        overall_similarity,
        sections_compared: sections.len(),
        summary: summary(&sections, overall_similarity),
        recommendations: recommendations(&sections),
        sections,
        created_at,
    }
}

fn words(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard index of two word sets as a 0 to 100 percentage
pub fn similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> u32 {
    let union = a.union(b).count();
    if union == 0 {
        return 100;
    }
    let shared = a.intersection(b).count();
    (shared as f64 / union as f64 * 100.0).round() as u32
}

fn differences(before: &BTreeSet<String>, after: &BTreeSet<String>) -> Vec<SectionDifference> {
    let describe = |kind: DiffKind, changed: Vec<&String>| {
        let verb = match kind {
            DiffKind::Addition => "added",
            DiffKind::Deletion => "removed",
        };
        let sample: Vec<&str> = changed.iter().take(LISTED_WORDS).map(|w| w.as_str()).collect();
        SectionDifference {
            kind,
            description: format!("{} word(s) {verb}: {}", changed.len(), sample.join(", ")),
            impact: Impact::of_word_count(changed.len()),
        }
    };

    let added: Vec<&String> = after.difference(before).collect();
    let removed: Vec<&String> = before.difference(after).collect();

    let mut out = Vec::new();
    if !added.is_empty() {
        out.push(describe(DiffKind::Addition, added));
    }
    if !removed.is_empty() {
        out.push(describe(DiffKind::Deletion, removed));
    }
    out
}

fn impact_of(differences: &[SectionDifference], kind: DiffKind) -> Option<Impact> {
    differences.iter().find(|d| d.kind == kind).map(|d| d.impact)
}

fn recommend(similarity: u32, differences: &[SectionDifference]) -> RewriteRecommendation {
    let high = differences.iter().filter(|d| d.impact == Impact::High).count();

    if (similarity > 90 && high == 0) || similarity < 70 {
        return RewriteRecommendation::KeepOriginal;
    }

    let adds_substance = impact_of(differences, DiffKind::Addition) == Some(Impact::High);
    let removes_little = matches!(
        impact_of(differences, DiffKind::Deletion),
        None | Some(Impact::Low)
    );
    if adds_substance && removes_little {
        RewriteRecommendation::UseRewrite
    } else {
        RewriteRecommendation::Merge
    }
}

fn summary(sections: &[SectionComparison], overall: u32) -> String {
    let high: usize = sections.iter().map(|s| s.high_impact().count()).sum();
    let use_rewrite = sections
        .iter()
        .filter(|s| s.recommendation == RewriteRecommendation::UseRewrite)
        .count();

    if overall > 85 && high < 5 {
        format!(
            "The original report is in good standing. The rewrite is {overall}% similar with \
             {high} high-impact change(s); keep the original with minor adjustments."
        )
    } else if overall > 70 {
        let action = if use_rewrite > 0 {
            format!("replacing {use_rewrite} section(s)")
        } else {
            "merging".to_string()
        };
        format!(
            "The original report is of good quality, but the rewrite found {high} significant \
             improvement(s). Consider {action} to raise compliance."
        )
    } else {
        format!(
            "The rewrite differs substantially ({overall}% similar) with {high} high-impact \
             change(s). Review carefully before applying it."
        )
    }
}

fn recommendations(sections: &[SectionComparison]) -> Vec<String> {
    let named = |wanted: RewriteRecommendation| {
        sections
            .iter()
            .filter(|s| s.recommendation == wanted)
            .map(|s| s.section_name.as_str())
            .collect::<Vec<_>>()
    };

    let mut out = Vec::new();

    let replace = named(RewriteRecommendation::UseRewrite);
    if !replace.is_empty() {
        out.push(format!(
            "Replace {} section(s) with the rewrite: {}",
            replace.len(),
            replace.join(", ")
        ));
    }

    let merge = named(RewriteRecommendation::Merge);
    if !merge.is_empty() {
        out.push(format!(
            "Merge rewrite improvements into {} section(s): {}",
            merge.len(),
            merge.join(", ")
        ));
    }

    out.extend(sections.iter().filter_map(|section| {
        section
            .high_impact()
            .next()
            .map(|diff| format!("{}: {}", section.section_name, diff.description))
    }));

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOLOGY: &str = "The deposit is hosted in banded iron formation of the Itabira Group \
                           with hematite and magnetite as the main ore minerals";

    /// Appends a fixed tail to every section
    struct Appending(&'static str);

    #[async_trait]
    impl SectionRewriter for Appending {
        async fn rewrite(
            &self,
            section: &Section,
            _standard: StandardId,
        ) -> Result<String, RewriteError> {
            Ok(format!("{} {}", section.content_text, self.0))
        }
    }

    struct Unavailable;

    #[async_trait]
    impl SectionRewriter for Unavailable {
        async fn rewrite(
            &self,
            _section: &Section,
            _standard: StandardId,
        ) -> Result<String, RewriteError> {
            Err(RewriteError("service unavailable".into()))
        }
    }

    fn set(text: &str) -> BTreeSet<String> {
        words(text)
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity(&set("a b c d"), &set("A B C D")), 100);
        assert_eq!(similarity(&set("a b"), &set("c d")), 0);
        assert_eq!(similarity(&set("a b c"), &set("a b d")), 50);
        assert_eq!(similarity(&set(""), &set("")), 100);
    }

    #[test]
    fn test_impact_thresholds() {
        assert_eq!(Impact::of_word_count(20), Impact::High);
        assert_eq!(Impact::of_word_count(5), Impact::Medium);
        assert_eq!(Impact::of_word_count(4), Impact::Low);
    }

    #[test]
    fn test_recommendations() {
        let identical = SectionComparison::new("Geology", GEOLOGY, GEOLOGY);
        assert_eq!(identical.similarity_score, 100);
        assert!(identical.differences.is_empty());
        assert_eq!(identical.recommendation, RewriteRecommendation::KeepOriginal);

        let unrelated = SectionComparison::new("Geology", GEOLOGY, "completely different prose");
        assert_eq!(unrelated.recommendation, RewriteRecommendation::KeepOriginal);

        let diffs = |added: Impact, removed: Option<Impact>| {
            let mut out = vec![SectionDifference {
                kind: DiffKind::Addition,
                description: String::new(),
                impact: added,
            }];
            if let Some(impact) = removed {
                out.push(SectionDifference {
                    kind: DiffKind::Deletion,
                    description: String::new(),
                    impact,
                });
            }
            out
        };
        assert_eq!(recommend(80, &diffs(Impact::High, None)), RewriteRecommendation::UseRewrite);
        assert_eq!(
            recommend(80, &diffs(Impact::High, Some(Impact::Medium))),
            RewriteRecommendation::Merge
        );
        assert_eq!(recommend(80, &diffs(Impact::Low, None)), RewriteRecommendation::Merge);
        assert_eq!(
            recommend(95, &diffs(Impact::Medium, None)),
            RewriteRecommendation::KeepOriginal
        );
    }

    #[tokio::test]
    async fn test_short_sections_are_skipped() {
        let report = CanonicalReport::new()
            .with_section("Geology", GEOLOGY)
            .with_section("Notes", "Too short to compare");
        let result =
            compare_with_rewrites("r1", &report, StandardId::Jorc, &Appending("today"), Utc::now())
                .await;

        assert_eq!(result.sections_compared, 1);
        assert_eq!(result.sections[0].section_name, "Geology");
        assert_eq!(result.sections[0].differences.len(), 1);
        assert_eq!(result.sections[0].differences[0].kind, DiffKind::Addition);
        assert!(result.sections[0].differences[0].description.starts_with("1 word(s) added"));
    }

    #[tokio::test]
    async fn test_failed_rewrite_falls_back_to_original() {
        let report = CanonicalReport::new().with_section("Geology", GEOLOGY);
        let result =
            compare_with_rewrites("r1", &report, StandardId::Cbrr, &Unavailable, Utc::now()).await;

        let section = &result.sections[0];
        assert!(section.rewrite_failed);
        assert_eq!(section.rewritten_text, GEOLOGY);
        assert_eq!(section.similarity_score, 100);
        assert_eq!(section.recommendation, RewriteRecommendation::KeepOriginal);
        assert_eq!(result.overall_similarity, 100);
        assert!(result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_empty_report() {
        let result = compare_with_rewrites(
            "r1",
            &CanonicalReport::new(),
            StandardId::Perc,
            &Appending("x"),
            Utc::now(),
        )
        .await;
        assert_eq!(result.sections_compared, 0);
        assert_eq!(result.overall_similarity, 0);
    }
}
