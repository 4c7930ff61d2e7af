//! Nutrient table formatting
//!
//! Collapses the per-100g nutrient table from the catalog into the single
//! human-readable summary string that gets embedded in the assessment
//! prompt.

use serde::Deserialize;

use crate::NUTRITION_UNAVAILABLE;

/// Per-100g nutrient table as reported by the catalog. Fields are optional;
/// only the ones present are emitted in the summary.
#[derive(Debug, Default, Deserialize)]
pub struct Nutriments {
    pub energy_100g: Option<f64>,
    pub proteins_100g: Option<f64>,
    pub carbohydrates_100g: Option<f64>,
    pub sugars_100g: Option<f64>,
    pub fat_100g: Option<f64>,
    pub sodium_100g: Option<f64>,
}

/// Format the nutrient table into a `", "`-joined summary.
///
/// Fields are emitted in a fixed order (energy, protein, carbs, sugar, fat,
/// sodium); absent fields are skipped. An empty or missing table yields the
/// unavailability sentinel.
pub fn format_nutrition(nutriments: Option<&Nutriments>) -> String {
    let Some(n) = nutriments else {
        return NUTRITION_UNAVAILABLE.to_string();
    };

    let mut parts = Vec::new();
    if let Some(v) = n.energy_100g {
        parts.push(format!("Energy: {} kJ", v));
    }
    if let Some(v) = n.proteins_100g {
        parts.push(format!("Protein: {}g", v));
    }
    if let Some(v) = n.carbohydrates_100g {
        parts.push(format!("Carbs: {}g", v));
    }
    if let Some(v) = n.sugars_100g {
        parts.push(format!("Sugar: {}g", v));
    }
    if let Some(v) = n.fat_100g {
        parts.push(format!("Fat: {}g", v));
    }
    if let Some(v) = n.sodium_100g {
        parts.push(format!("Sodium: {}g", v));
    }

    if parts.is_empty() {
        NUTRITION_UNAVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}
