//! Google Maps search links

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Build a Maps search URL for `"<item> <city>"`.
///
/// `city` may be empty, which is how the city-wide explore link is built.
#[must_use]
pub fn maps_link(item: &str, city: &str) -> String {
    let query = format!("{item} {city}");
    format!("{MAPS_SEARCH_URL}{}", urlencoding::encode(&query))
}
