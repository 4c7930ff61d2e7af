//! Canonical assessment data model
//!
//! `ProductAssessment` is the record the rest of the application consumes
//! and persists. It is created fresh on every scan, immutable once produced,
//! and deliberately carries no health score or verdict headline: scoring is
//! a separate rules-based stage outside this engine's authority.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Visual/semantic weight of a quick fact. The only valid values; anything
/// else coming off the wire is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }

    /// Parse a wire value; returns `None` for anything outside the enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "good" => Some(Severity::Good),
            "warning" => Some(Severity::Warning),
            "danger" => Some(Severity::Danger),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four headline metrics shown on the result card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFact {
    pub label: String,
    pub value: String,
    pub icon: String,
    pub severity: Severity,
}

/// A flagged additive with the reason it was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Additive {
    pub name: String,
    pub reason: String,
}

/// One ingredient with its safety annotation. List order is significant:
/// it mirrors the label's proportion-by-weight ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub name: String,
    pub safe: bool,
    pub description: String,
}

/// A supporting citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub title: String,
    pub organization_and_year: String,
}

/// Canonical output record of the assessment engine.
///
/// `harmful_additives` and `scientific_evidence` are always arrays,
/// possibly empty, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAssessment {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub quick_facts: Vec<QuickFact>,
    pub harmful_additives: Vec<Additive>,
    pub ingredients: Vec<IngredientEntry>,
    pub scientific_evidence: Vec<Citation>,
}

static SCAN_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a scan-time-unique id. The millisecond timestamp alone can
/// collide under rapid repeated scans, so a process-wide counter is
/// appended.
pub(crate) fn next_scan_id() -> String {
    let seq = SCAN_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("scanned-{}-{}", Utc::now().timestamp_millis(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_round_trip() {
        for s in [Severity::Good, Severity::Warning, Severity::Danger] {
            assert_eq!(Severity::parse(s.as_str()), Some(s));
        }
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn scan_ids_are_unique_and_prefixed() {
        let a = next_scan_id();
        let b = next_scan_id();
        assert!(a.starts_with("scanned-"));
        assert_ne!(a, b);
    }

    #[test]
    fn assessment_serializes_with_camel_case_keys() {
        let assessment = ProductAssessment {
            id: "scanned-1-0".to_string(),
            name: "Test".to_string(),
            brand: "Brand".to_string(),
            image: "https://example.com/x.jpg".to_string(),
            quick_facts: vec![],
            harmful_additives: vec![],
            ingredients: vec![],
            scientific_evidence: vec![],
        };
        let value = serde_json::to_value(&assessment).unwrap();
        assert!(value.get("quickFacts").is_some());
        assert!(value.get("harmfulAdditives").is_some());
        assert!(value.get("scientificEvidence").is_some());
    }
}
