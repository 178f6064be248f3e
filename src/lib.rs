//! Destina - AI travel companion
//!
//! Looks up a short Wikipedia description of a city, asks Gemini for
//! categorized recommendations and renders every item with a Google Maps link.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod maps;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod web;
pub mod wikipedia;

// Re-export core types for public API
pub use config::DestinaConfig;
pub use error::DestinaError;
pub use gemini::{GeminiClient, GenerativeModel, RecommendationError};
pub use maps::maps_link;
pub use models::{Category, CityName, Recommendations};
pub use parser::parse_recommendations;
pub use pipeline::{CityReport, GuidePage, TravelGuide};
pub use wikipedia::{EncyclopediaService, LookupError, WikipediaClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DestinaError>;
