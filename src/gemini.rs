//! Gemini recommendation fetcher
//!
//! Builds the travel prompt for a city and submits it to the Generative
//! Language API `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::DestinaError;
use crate::config::GeminiConfig;
use crate::models::{Category, CityName};

/// Why a recommendation request produced no text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("Gemini API key is not configured (set GEMINI_API_KEY)")]
    MissingCredential,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Gemini rejected the API key: {0}")]
    Unauthorized(String),

    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from Gemini: {0}")]
    InvalidResponse(String),

    #[error("Gemini blocked the prompt: {reason}")]
    Blocked { reason: String },

    #[error("Gemini returned an empty response")]
    EmptyResponse,
}

/// A single-shot text generation backend
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, RecommendationError>;
}

/// The fixed instruction sent for every city
#[must_use]
pub fn build_prompt(city: &CityName) -> String {
    let headings: Vec<String> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| format!("{}. {}", i + 1, category.prompt_heading()))
        .collect();

    format!(
        "Provide concise travel details for {city} including:\n{}\n\
         Use exactly these headings, one per line.\n\
         Only give names in bullet points, no extra description.",
        headings.join("\n")
    )
}

/// Ask the model for recommendations about `city`
#[instrument(skip(model, city), fields(city = %city))]
pub async fn fetch_recommendations(
    model: &dyn GenerativeModel,
    city: &CityName,
) -> Result<String, RecommendationError> {
    let prompt = build_prompt(city);
    debug!("Recommendation prompt: {}", prompt);

    let text = model.generate(&prompt).await?;
    if text.trim().is_empty() {
        return Err(RecommendationError::EmptyResponse);
    }
    Ok(text)
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client; a missing key is reported when generating
    pub fn new(config: &GeminiConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("Destina/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DestinaError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, RecommendationError> {
        debug!("Using Gemini model {}", self.model);
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RecommendationError::MissingCredential)?;

        let start_time = Instant::now();
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecommendationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RecommendationError::Transport(e.to_string()))?;

        if !status.is_success() {
            let error = api_error_from(status, &body);
            warn!("Gemini request failed: {}", error);
            return Err(error);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| RecommendationError::InvalidResponse(e.to_string()))?;

        let text = parsed.into_text()?;
        info!(
            "Received {} bytes from Gemini in {:.3}s",
            text.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(text)
    }
}

fn api_error_from(status: StatusCode, body: &str) -> RecommendationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RecommendationError::Unauthorized(message)
        }
        // Gemini reports a bad key as 400 INVALID_ARGUMENT
        StatusCode::BAD_REQUEST if message.contains("API key") => {
            RecommendationError::Unauthorized(message)
        }
        _ => RecommendationError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, RecommendationError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(RecommendationError::Blocked { reason });
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(RecommendationError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedModel(Result<String, RecommendationError>);

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate(&self, _prompt: &str) -> Result<String, RecommendationError> {
            self.0.clone()
        }
    }

    fn paris() -> CityName {
        CityName::parse("Paris").unwrap()
    }

    #[test]
    fn test_prompt_mentions_city_and_headings() {
        let prompt = build_prompt(&paris());
        assert!(prompt.contains("travel details for Paris"));
        for category in Category::ALL {
            assert!(prompt.contains(category.prompt_heading()));
        }
        assert!(prompt.contains("no extra description"));
    }

    #[tokio::test]
    async fn test_fetch_passes_text_through() {
        let model = CannedModel(Ok("Famous Places\n- Eiffel Tower".to_string()));
        let text = fetch_recommendations(&model, &paris()).await.unwrap();
        assert_eq!(text, "Famous Places\n- Eiffel Tower");
    }

    #[tokio::test]
    async fn test_fetch_rejects_blank_text() {
        let model = CannedModel(Ok("  \n ".to_string()));
        let err = fetch_recommendations(&model, &paris()).await.unwrap_err();
        assert_eq!(err, RecommendationError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = GeminiClient::new(&GeminiConfig::default()).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert_eq!(err, RecommendationError::MissingCredential);
    }

    #[test]
    fn test_endpoint_format() {
        let config = GeminiConfig {
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro-latest:generateContent"
        );
    }

    #[test]
    fn test_response_text_is_joined() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"Famous Places\n"},{"text":"- Eiffel Tower"}]},"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "Famous Places\n- Eiffel Tower");
    }

    #[test]
    fn test_blocked_prompt() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.into_text().unwrap_err(),
            RecommendationError::Blocked {
                reason: "SAFETY".to_string()
            }
        );
    }

    #[test]
    fn test_no_candidates_is_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            response.into_text().unwrap_err(),
            RecommendationError::EmptyResponse
        );
    }

    #[test]
    fn test_api_error_classification() {
        let invalid_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            api_error_from(StatusCode::BAD_REQUEST, invalid_key),
            RecommendationError::Unauthorized(_)
        ));

        assert!(matches!(
            api_error_from(StatusCode::FORBIDDEN, "denied"),
            RecommendationError::Unauthorized(m) if m == "denied"
        ));

        let overloaded = r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#;
        assert_eq!(
            api_error_from(StatusCode::SERVICE_UNAVAILABLE, overloaded),
            RecommendationError::Api {
                status: 503,
                message: "The model is overloaded.".to_string()
            }
        );
    }
}
