//! Curated product images
//!
//! The catalog's own product photos are inconsistent (user-submitted, often
//! cropped badly), so the app ships a small curated table of clean stock
//! images matched by name/brand substring, with category fallbacks.

/// Ordered `(keyword, url)` table; first match wins.
const CURATED_IMAGES: &[(&str, &str)] = &[
    // Beverages
    (
        "coca cola",
        "https://images.unsplash.com/photo-1561758033-d89a9ad46330?w=400&h=400&fit=crop&auto=format",
    ),
    (
        "pepsi",
        "https://images.unsplash.com/photo-1629203851122-3726ecdf5507?w=400&h=400&fit=crop&auto=format",
    ),
    (
        "red bull",
        "https://images.unsplash.com/photo-1622543925917-763c34ba5602?w=400&h=400&fit=crop&auto=format",
    ),
    // Snacks & sweets
    (
        "nutella",
        "https://images.unsplash.com/photo-1481391319762-47dff72954d9?w=400&h=400&fit=crop&auto=format",
    ),
    (
        "chocolate",
        "https://images.unsplash.com/photo-1549007953-2f2dc0b24019?w=400&h=400&fit=crop&auto=format",
    ),
    (
        "chips",
        "https://images.unsplash.com/photo-1566478989037-eec170784d0b?w=400&h=400&fit=crop&auto=format",
    ),
];

const FALLBACK_FOOD: &str =
    "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?w=400&h=400&fit=crop&auto=format";
const FALLBACK_DRINK: &str =
    "https://images.unsplash.com/photo-1523362628745-0c100150b504?w=400&h=400&fit=crop&auto=format";

/// Resolve a clean product image for a name/brand pair.
///
/// Case-insensitive substring match against the curated table (name first,
/// then brand), then keyword classification into the beverage fallback,
/// then the generic food fallback.
pub fn resolve_image(name: &str, brand: &str) -> &'static str {
    let name = name.to_lowercase();
    let brand = brand.to_lowercase();

    for (keyword, url) in CURATED_IMAGES {
        if name.contains(keyword) || brand.contains(keyword) {
            return url;
        }
    }

    if ["cola", "drink", "juice"].iter().any(|k| name.contains(k)) {
        return FALLBACK_DRINK;
    }

    FALLBACK_FOOD
}
