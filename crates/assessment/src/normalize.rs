//! Schema validation of the model's JSON output
//!
//! The completion text is parsed as JSON upstream; this module shapes that
//! value into the canonical record with explicit field-by-field checks
//! instead of blind deserialization. Missing optional arrays are coerced to
//! empty; a bad severity or a non-boolean `safe` flag is rejected loudly,
//! since silently defaulting either would mis-color the UI for a
//! health-sensitive user.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use checkit_catalog::RawProductInfo;

use crate::model::{Additive, Citation, IngredientEntry, QuickFact, Severity};

/// エラー型
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has invalid type (expected {expected})")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid severity `{0}` (expected one of good, warning, danger)")]
    InvalidSeverity(String),
}

/// Validated assessment payload, before an id is stamped on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentBody {
    pub name: String,
    pub brand: String,
    pub image: String,
    pub quick_facts: Vec<QuickFact>,
    pub harmful_additives: Vec<Additive>,
    pub ingredients: Vec<IngredientEntry>,
    pub scientific_evidence: Vec<Citation>,
}

/// Validate and shape the parsed model output.
///
/// `product` supplies defaults for `name`/`brand`/`image` where the model
/// omitted them; the arrays are never defaulted from anywhere. Ingredient
/// order is preserved verbatim.
pub fn normalize(value: &Value, product: &RawProductInfo) -> Result<AssessmentBody, SchemaError> {
    let obj = value.as_object().ok_or(SchemaError::InvalidType {
        field: "(root)",
        expected: "object",
    })?;

    let quick_facts_raw = require_array(value, "quickFacts")?;
    if quick_facts_raw.len() != 4 {
        debug!(count = quick_facts_raw.len(), "expected exactly 4 quick facts");
    }
    let mut quick_facts = Vec::with_capacity(quick_facts_raw.len());
    for entry in quick_facts_raw {
        quick_facts.push(normalize_quick_fact(entry)?);
    }

    let mut ingredients = Vec::new();
    for entry in require_array(value, "ingredients")? {
        ingredients.push(normalize_ingredient(entry)?);
    }

    let mut harmful_additives = Vec::new();
    for entry in optional_array(value, "harmfulAdditives")? {
        harmful_additives.push(normalize_additive(entry)?);
    }

    let mut scientific_evidence = Vec::new();
    for entry in optional_array(value, "scientificEvidence")? {
        scientific_evidence.push(normalize_citation(entry)?);
    }

    Ok(AssessmentBody {
        name: string_or(obj, "name", &product.name),
        brand: string_or(obj, "brand", &product.brand),
        image: string_or(obj, "image", &product.image_url),
        quick_facts,
        harmful_additives,
        ingredients,
        scientific_evidence,
    })
}

fn normalize_quick_fact(entry: &Value) -> Result<QuickFact, SchemaError> {
    let severity_raw = entry
        .get("type")
        .ok_or(SchemaError::MissingField("quickFacts[].type"))?;
    let severity_str = severity_raw.as_str().ok_or(SchemaError::InvalidType {
        field: "quickFacts[].type",
        expected: "string",
    })?;
    let severity = Severity::parse(severity_str)
        .ok_or_else(|| SchemaError::InvalidSeverity(severity_str.to_string()))?;

    Ok(QuickFact {
        label: require_string(entry, "quickFacts[].label", "label")?,
        value: require_string(entry, "quickFacts[].value", "value")?,
        icon: entry
            .get("icon")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        severity,
    })
}

fn normalize_ingredient(entry: &Value) -> Result<IngredientEntry, SchemaError> {
    let safe_raw = entry
        .get("safe")
        .ok_or(SchemaError::MissingField("ingredients[].safe"))?;
    let safe = safe_raw.as_bool().ok_or(SchemaError::InvalidType {
        field: "ingredients[].safe",
        expected: "boolean",
    })?;

    Ok(IngredientEntry {
        name: require_string(entry, "ingredients[].name", "name")?,
        safe,
        description: entry
            .get("desc")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn normalize_additive(entry: &Value) -> Result<Additive, SchemaError> {
    Ok(Additive {
        name: require_string(entry, "harmfulAdditives[].name", "name")?,
        reason: entry
            .get("info")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn normalize_citation(entry: &Value) -> Result<Citation, SchemaError> {
    Ok(Citation {
        title: require_string(entry, "scientificEvidence[].title", "title")?,
        organization_and_year: entry
            .get("org")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn require_array<'a>(value: &'a Value, field: &'static str) -> Result<&'a Vec<Value>, SchemaError> {
    let raw = value.get(field).ok_or(SchemaError::MissingField(field))?;
    raw.as_array().ok_or(SchemaError::InvalidType {
        field,
        expected: "array",
    })
}

/// A missing or null optional array is coerced to empty; a present value of
/// the wrong type is still rejected.
fn optional_array<'a>(value: &'a Value, field: &'static str) -> Result<&'a [Value], SchemaError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(raw) => raw
            .as_array()
            .map(Vec::as_slice)
            .ok_or(SchemaError::InvalidType {
                field,
                expected: "array",
            }),
    }
}

fn require_string(
    entry: &Value,
    qualified: &'static str,
    key: &str,
) -> Result<String, SchemaError> {
    entry
        .get(key)
        .ok_or(SchemaError::MissingField(qualified))?
        .as_str()
        .map(str::to_string)
        .ok_or(SchemaError::InvalidType {
            field: qualified,
            expected: "string",
        })
}

fn string_or(obj: &serde_json::Map<String, Value>, key: &str, default: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}
