//! One lookup, start to finish
//!
//! Input → description → recommendations → parse. The two external calls
//! run one after the other. Failures are folded into the returned page; the
//! pipeline itself never errors.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::DestinaConfig;
use crate::gemini::{self, GeminiClient, GenerativeModel, RecommendationError};
use crate::maps::maps_link;
use crate::models::{CityName, Recommendations};
use crate::parser::parse_recommendations;
use crate::wikipedia::{self, EncyclopediaService, WikipediaClient};

/// Shown instead of a report when the input is blank
pub const EMPTY_CITY_WARNING: &str = "Please enter a valid city name.";

/// Result of one submission
#[derive(Debug, Clone, Serialize)]
pub enum GuidePage {
    /// Nothing was looked up
    Prompt { warning: &'static str },
    Report(CityReport),
}

/// Everything rendered for a city
#[derive(Debug, Clone, Serialize)]
pub struct CityReport {
    pub city: CityName,
    pub description: String,
    #[serde(serialize_with = "serialize_outcome")]
    pub recommendations: Result<Recommendations, RecommendationError>,
}

impl CityReport {
    /// Title-cased city for headings
    #[must_use]
    pub fn display_name(&self) -> String {
        self.city.display_name()
    }

    /// Map link for a single recommended item
    #[must_use]
    pub fn item_link(&self, item: &str) -> String {
        maps_link(item, self.city.as_str())
    }

    /// City-wide map link, always shown
    #[must_use]
    pub fn explore_link(&self) -> String {
        maps_link(self.city.as_str(), "")
    }

    /// True when the model answered but no heading matched
    #[must_use]
    pub fn has_unrecognized_format(&self) -> bool {
        matches!(&self.recommendations, Ok(r) if r.headings_found == 0)
    }
}

fn serialize_outcome<S: serde::Serializer>(
    outcome: &Result<Recommendations, RecommendationError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(1))?;
    match outcome {
        Ok(recommendations) => map.serialize_entry("ok", recommendations)?,
        Err(e) => map.serialize_entry("error", &e.to_string())?,
    }
    map.end()
}

/// The lookup pipeline with its two external services
#[derive(Clone)]
pub struct TravelGuide {
    encyclopedia: Arc<dyn EncyclopediaService>,
    model: Arc<dyn GenerativeModel>,
    sentences: u32,
}

impl TravelGuide {
    pub fn new(
        encyclopedia: Arc<dyn EncyclopediaService>,
        model: Arc<dyn GenerativeModel>,
        sentences: u32,
    ) -> Self {
        Self {
            encyclopedia,
            model,
            sentences,
        }
    }

    /// Build the guide with the real Wikipedia and Gemini clients
    pub fn from_config(config: &DestinaConfig) -> Result<Self> {
        let encyclopedia = WikipediaClient::new(&config.wikipedia)?;
        let model = GeminiClient::new(&config.gemini)?;
        if config.gemini.api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; recommendations will be unavailable");
        }
        Ok(Self::new(
            Arc::new(encyclopedia),
            Arc::new(model),
            config.wikipedia.sentences,
        ))
    }

    /// Run the full lookup for raw user input
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw_city: &str) -> GuidePage {
        let Some(city) = CityName::parse(raw_city) else {
            warn!("Empty city name submitted");
            return GuidePage::Prompt {
                warning: EMPTY_CITY_WARNING,
            };
        };

        let description =
            wikipedia::fetch_description(self.encyclopedia.as_ref(), &city, self.sentences).await;

        let recommendations = gemini::fetch_recommendations(self.model.as_ref(), &city)
            .await
            .map(|text| parse_recommendations(&text));

        match &recommendations {
            Ok(parsed) if parsed.headings_found == 0 => {
                warn!("No recognizable category headings in the model response for {}", city);
            }
            Ok(parsed) => info!(
                "Lookup for {} complete: {} places, {} foods, {} malls, {} restaurants",
                city,
                parsed.famous_places.len(),
                parsed.foods.len(),
                parsed.malls.len(),
                parsed.restaurants.len()
            ),
            Err(e) => warn!("Recommendations for {} unavailable: {}", city, e),
        }

        GuidePage::Report(CityReport {
            city,
            description,
            recommendations,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory service doubles shared by pipeline, renderer and web tests

    use super::*;
    use crate::wikipedia::LookupError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct StubEncyclopedia {
        pub summary: Result<String, String>,
        pub calls: AtomicUsize,
    }

    impl StubEncyclopedia {
        pub fn with_summary(summary: &str) -> Self {
            Self {
                summary: Ok(summary.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                summary: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EncyclopediaService for StubEncyclopedia {
        async fn summary(&self, _title: &str, _sentences: u32) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.summary.clone().map_err(LookupError::Transport)
        }
    }

    pub struct StubModel {
        pub response: Result<String, RecommendationError>,
        pub calls: AtomicUsize,
    }

    impl StubModel {
        pub fn with_text(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: RecommendationError) -> Self {
            Self {
                response: Err(error),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for StubModel {
        async fn generate(&self, _prompt: &str) -> Result<String, RecommendationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    pub fn guide(wiki: Arc<StubEncyclopedia>, model: Arc<StubModel>) -> TravelGuide {
        TravelGuide::new(wiki, model, 3)
    }

    pub fn call_count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn expect_report(page: GuidePage) -> CityReport {
        match page {
            GuidePage::Report(report) => report,
            GuidePage::Prompt { warning } => panic!("expected a report, got warning {warning}"),
        }
    }

    #[tokio::test]
    async fn test_paris_end_to_end() {
        let wiki = Arc::new(StubEncyclopedia::with_summary("Paris is the capital of France."));
        let model = Arc::new(StubModel::with_text(
            "Famous Places\n- Eiffel Tower\nLocal Foods\n- Croissant",
        ));
        let report = expect_report(guide(wiki, model).lookup("Paris").await);

        let recommendations = report.recommendations.as_ref().unwrap();
        assert_eq!(recommendations.famous_places, vec!["Eiffel Tower"]);
        assert_eq!(recommendations.foods, vec!["Croissant"]);
        assert!(recommendations.malls.is_empty());
        assert!(recommendations.restaurants.is_empty());
        assert_eq!(report.description, "Paris is the capital of France.");
        assert!(!report.has_unrecognized_format());
    }

    #[tokio::test]
    async fn test_empty_city_makes_no_calls() {
        let wiki = Arc::new(StubEncyclopedia::with_summary("unused"));
        let model = Arc::new(StubModel::with_text("unused"));
        let page = guide(wiki.clone(), model.clone()).lookup("   ").await;

        assert!(matches!(
            page,
            GuidePage::Prompt {
                warning: EMPTY_CITY_WARNING
            }
        ));
        assert_eq!(call_count(&wiki.calls), 0);
        assert_eq!(call_count(&model.calls), 0);
    }

    #[tokio::test]
    async fn test_each_service_called_once() {
        let wiki = Arc::new(StubEncyclopedia::with_summary("Rome is old."));
        let model = Arc::new(StubModel::with_text("Famous Places\n- Colosseum"));
        guide(wiki.clone(), model.clone()).lookup("rome").await;
        assert_eq!(call_count(&wiki.calls), 1);
        assert_eq!(call_count(&model.calls), 1);
    }

    #[tokio::test]
    async fn test_failures_are_folded_into_report() {
        let wiki = Arc::new(StubEncyclopedia::failing("connection reset"));
        let model = Arc::new(StubModel::failing(RecommendationError::MissingCredential));
        let report = expect_report(guide(wiki, model).lookup("Lima").await);

        assert!(report.description.starts_with("Sorry, couldn't fetch the description"));
        assert_eq!(
            report.recommendations.unwrap_err(),
            RecommendationError::MissingCredential
        );
    }

    #[tokio::test]
    async fn test_unrecognized_format_is_flagged() {
        let wiki = Arc::new(StubEncyclopedia::with_summary("Oslo is in Norway."));
        let model = Arc::new(StubModel::with_text("- Vigeland Park\n- Brunost"));
        let report = expect_report(guide(wiki, model).lookup("Oslo").await);
        assert!(report.has_unrecognized_format());
        assert!(report.recommendations.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_links_use_trimmed_city() {
        let wiki = Arc::new(StubEncyclopedia::with_summary("Paris."));
        let model = Arc::new(StubModel::with_text("Famous Places\n- Louvre"));
        let report = expect_report(guide(wiki, model).lookup("  paris ").await);

        assert_eq!(report.display_name(), "Paris");
        assert_eq!(
            report.item_link("Louvre"),
            "https://www.google.com/maps/search/?api=1&query=Louvre%20paris"
        );
        assert_eq!(
            report.explore_link(),
            "https://www.google.com/maps/search/?api=1&query=paris%20"
        );
    }
}
