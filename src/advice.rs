//! Motivational messages from a generative-text service.
//!
//! The provider is an opaque I/O boundary. [`AdviceDesk`] sits in front of it
//! and guarantees callers always get something to show: a welcome pair for an
//! empty history, the fallback pair on any failure, and the newest answer when
//! overlapping requests finish out of order.

use crate::date_key::DateKey;
use crate::errors::AdviceUnavailable;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachAdvice {
    /// Encouragement.
    pub message: String,
    /// One actionable suggestion.
    pub advice: String,
}

impl CoachAdvice {
    pub fn fallback() -> Self {
        Self {
            message: "Keep going! Every drop of sweat is progress.".to_string(),
            advice: "Remember to eat enough protein and get plenty of sleep.".to_string(),
        }
    }

    pub fn welcome() -> Self {
        Self {
            message: "Hi! I'm your AI fitness coach. Where do you want to start today?"
                .to_string(),
            advice: "Mark a day on the calendar to log your first workout!".to_string(),
        }
    }
}

#[async_trait]
pub trait CoachProvider: Send + Sync {
    async fn coach(&self, dates: &[DateKey]) -> Result<CoachAdvice, AdviceUnavailable>;
}

/// Google Gemini `generateContent` with a structured JSON response.
pub struct GeminiCoach {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiCoach {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    // The key travels in a header so it never shows up in URLs or errors.
    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn build_prompt(dates: &[DateKey]) -> String {
    let listed = dates
        .iter()
        .map(DateKey::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are an energetic fitness coach. The user logged workouts on: {listed}. \
         Reply with one encouraging message and one concrete training suggestion. \
         JSON format: {{\"message\": \"...\", \"advice\": \"...\"}}"
    )
}

fn build_request(dates: &[DateKey]) -> serde_json::Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": build_prompt(dates) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "message": { "type": "STRING" },
                    "advice": { "type": "STRING" }
                },
                "required": ["message", "advice"]
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

fn parse_response(body: &str) -> Result<CoachAdvice, AdviceUnavailable> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|err| AdviceUnavailable(format!("unreadable response: {err}")))?;
    if let Some(error) = response.error {
        return Err(AdviceUnavailable(error.message));
    }

    let text = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect::<String>();
    if text.trim().is_empty() {
        return Err(AdviceUnavailable("response had no text".to_string()));
    }

    serde_json::from_str(text.trim())
        .map_err(|err| AdviceUnavailable(format!("advice is not the expected JSON: {err}")))
}

#[async_trait]
impl CoachProvider for GeminiCoach {
    async fn coach(&self, dates: &[DateKey]) -> Result<CoachAdvice, AdviceUnavailable> {
        debug!(model = %self.model, days = dates.len(), "requesting coach advice");

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&build_request(dates))
            .send()
            .await
            .map_err(|err| {
                AdviceUnavailable(format!("request failed: {}", err.without_url()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            AdviceUnavailable(format!("failed to read response: {}", err.without_url()))
        })?;
        if !status.is_success() {
            return Err(AdviceUnavailable(format!("provider returned {status}")));
        }

        parse_response(&body)
    }
}

/// Front door for advice requests.
pub struct AdviceDesk {
    provider: Option<Arc<dyn CoachProvider>>,
    issued: AtomicU64,
    latest: Mutex<Option<(u64, CoachAdvice)>>,
}

impl AdviceDesk {
    pub fn new(provider: Option<Arc<dyn CoachProvider>>) -> Self {
        Self {
            provider,
            issued: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    /// Never fails. `dates` is a snapshot taken by the caller.
    pub async fn request(&self, dates: Vec<DateKey>) -> CoachAdvice {
        let ticket = self.issue();

        let advice = if dates.is_empty() {
            CoachAdvice::welcome()
        } else if let Some(provider) = &self.provider {
            match provider.coach(&dates).await {
                Ok(advice) => advice,
                Err(err) => {
                    warn!("{err}; using fallback advice");
                    CoachAdvice::fallback()
                }
            }
        } else {
            debug!("no coach provider configured; using fallback advice");
            CoachAdvice::fallback()
        };

        self.settle(ticket, advice)
    }

    /// Last advice accepted by [`request`](Self::request).
    pub fn latest(&self) -> Option<CoachAdvice> {
        self.lock().as_ref().map(|(_, advice)| advice.clone())
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    // Only the most recently issued ticket may replace the kept advice. A
    // superseded answer is handed back to its own caller when nothing newer
    // has been kept yet, but never stored.
    fn settle(&self, ticket: u64, advice: CoachAdvice) -> CoachAdvice {
        let newest = self.issued.load(Ordering::SeqCst);
        let mut latest = self.lock();
        if ticket == newest {
            *latest = Some((ticket, advice.clone()));
            return advice;
        }

        debug!(ticket, newest, "discarding superseded coach advice");
        match latest.as_ref() {
            Some((_, kept)) => kept.clone(),
            None => advice,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(u64, CoachAdvice)>> {
        self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
