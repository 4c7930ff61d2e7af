//! Deterministic prompt construction
//!
//! The prompt embeds the raw product attributes verbatim and pins down the
//! exact output JSON shape. Two prohibitions are part of the contract: the
//! model must not invent a numeric score or verdict headline (scoring is a
//! separate rules-based stage), and it must not guess missing information.

use checkit_catalog::RawProductInfo;

/// Identifies the prompt template. Any cache keyed by barcode must also key
/// on this value so a template change invalidates stale assessments.
pub const PROMPT_VERSION: u32 = 1;

/// Fixed system instruction sent with every request.
pub const SYSTEM_MESSAGE: &str = "You are a nutrition expert. Analyze food products and return \
detailed health assessments in JSON format. Always respond with valid JSON only. Your answers \
must be deterministic and reproducible.";

/// Build the user prompt for one product.
pub fn build_prompt(product: &RawProductInfo) -> String {
    format!(
        r#"
You are a nutrition expert. Analyze this food product and create a detailed health assessment in JSON format. Do NOT return a score or a mainVerdict/headline. Only return the product info, quickFacts, harmfulAdditives, ingredients, and scientificEvidence. Do not guess missing information.

Product: {name}
Brand: {brand}
Ingredients: {ingredients}
Nutrition: {nutrition}
Barcode: {barcode}
Existing Image: {image}

QuickFacts types: "good", "warning", "danger"
Use real product info based on barcode/name and assess strictly by the above logic!
IMPORTANT: Always use the provided image URL if available, or a food-related stock image if not.

Return EXACTLY this JSON structure:
{{
  "name": "Product Name",
  "brand": "Brand Name",
  "image": "{image}",
  "quickFacts": [
    {{"label": "ADDITIVES", "value": "2 concerning", "icon": "⚠️", "type": "warning"}},
    {{"label": "SUGAR", "value": "15g per 100g", "icon": "🍬", "type": "warning"}},
    {{"label": "PROCESSING", "value": "NOVA 3", "icon": "🏭", "type": "warning"}},
    {{"label": "PROTEIN", "value": "8g per 100g", "icon": "💪", "type": "good"}}
  ],
  "harmfulAdditives": [
    {{"name": "E621 (Monosodium glutamate)", "risk": "medium", "info": "May cause headaches in sensitive individuals"}}
  ],
  "ingredients": [
    {{"name": "Ingredient name", "safe": true, "desc": "Description of ingredient"}}
  ],
  "scientificEvidence": [
    {{"title": "Study title", "org": "Research organization, year"}}
  ]
}}
"#,
        name = product.name,
        brand = product.brand,
        ingredients = product.ingredients_text,
        nutrition = product.nutrition_summary,
        barcode = product.barcode,
        image = product.image_url,
    )
}
