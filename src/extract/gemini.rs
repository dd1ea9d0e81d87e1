use std::fs;
use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{DocumentKind, ExtractError, Extractor};
use crate::config::Config;

const EXTRACTION_PROMPT: &str = "Extract all readable text from this document for typing \
practice. Return only the plain body text in reading order. Remove bullet symbols, special \
characters, page numbers and headers. Keep normal sentence punctuation. Separate paragraphs \
with a blank line.";

const TEMPERATURE: f32 = 0.1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    #[serde(rename_all = "camelCase")]
    Inline { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Sends a PDF or Word document to a Gemini model and returns the text it reads out.
pub struct GeminiExtractor {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiExtractor {
    /// Fails with [`ExtractError::MissingApiKey`] when the configured variable is unset or blank.
    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        let api_key = std::env::var(&config.extraction_api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ExtractError::MissingApiKey(config.extraction_api_key_env.clone()))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.extraction_timeout_secs))
            .build()
            .map_err(|e| ExtractError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.extraction_endpoint.clone(),
            model: config.extraction_model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl Extractor for GeminiExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| ExtractError::UnsupportedFormat(path.display().to_string()))?;
        let bytes = fs::read(path)?;
        info!(path = %path.display(), bytes = bytes.len(), model = %self.model, "requesting extraction");

        let body = request_body(kind.mime_type(), &bytes);
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ExtractError::Request(e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .map_err(|e| ExtractError::Request(e.to_string()))?;
        debug!(%status, bytes = payload.len(), "extraction response");
        if !status.is_success() {
            return Err(ExtractError::Request(error_message(status.as_u16(), &payload)));
        }
        parse_response(&payload)
    }
}

fn request_body<'a>(mime_type: &'a str, bytes: &[u8]) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![
                RequestPart::Inline {
                    inline_data: InlineData {
                        mime_type,
                        data: STANDARD.encode(bytes),
                    },
                },
                RequestPart::Text {
                    text: EXTRACTION_PROMPT,
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_response(payload: &str) -> Result<String, ExtractError> {
    let response: GenerateResponse =
        serde_json::from_str(payload).map_err(|e| ExtractError::Request(e.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyResponse);
    }
    Ok(text)
}

fn error_message(status: u16, payload: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(payload) {
        Ok(env) if !env.error.message.is_empty() => format!("{status}: {}", env.error.message),
        _ => format!("HTTP {status}"),
    }
}
