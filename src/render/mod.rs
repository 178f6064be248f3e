//! Output renderers for a `GuidePage`
//!
//! - terminal: indented plain text for the CLI
//! - html: the single-page web UI

pub mod html;
pub mod terminal;

use crate::gemini::RecommendationError;

pub const APP_TITLE: &str = "🎀 𝒟𝐸𝒮𝒯𝐼𝒩𝒜 🎀 -- AI Travel App";
pub const INTRO: &str = "Enter any city to get travel insights and maps!";
pub const LINK_CAPTION: &str = "📍 Google Maps";
pub const EXPLORE_TITLE: &str = "Explore the city";
pub const UNRECOGNIZED_FORMAT_NOTE: &str =
    "The recommendations did not contain any recognizable categories.";

/// Heading shown above the description
#[must_use]
pub fn about_heading(display_name: &str) -> String {
    format!("📍 About {display_name}")
}

/// Caption of the city-wide map link
#[must_use]
pub fn explore_caption(display_name: &str) -> String {
    format!("🌐 Explore {display_name} on Google Maps")
}

/// Error line shown in place of the recommendation sections
#[must_use]
pub fn recommendation_error_line(error: &RecommendationError) -> String {
    format!("❗ Error getting info from Gemini: {error}")
}
