//! Gemini `generateContent` provider.
//!
//! Speaks the REST surface of the grounded-generation API: one POST per
//! analysis, search grounding enabled, the audit directive attached as the
//! system instruction. The reply is decoded into optional-field structs and
//! handed back raw; the interpreter decides what counts as usable.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AuditError, Result};

use super::{AnalysisProvider, AnalysisRequest, GroundingChunk, RawAnalysis, WebSource};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default analysis model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// System directive sent with every audit request.
const AUDIT_SYSTEM_INSTRUCTION: &str = r#"You are the Cirrus Lead Intelligence Auditor. Your objective is to perform a high-fidelity "Essentialist Audit" for enterprise codebases.

STRICT FORMATTING PROTOCOL:
1. CLICKABLE CITATIONS: Every recommendation, refactor, or deletion MUST be followed by a citation formatted as a Markdown link.
   - FORMAT: [Source: Name of Documentation](Full URL).
   - EXAMPLE: "Move client instantiation to the global scope [Source: Google Generative AI SDK Documentation](https://ai.google.dev/gemini-api/docs/best-practices)."
2. TONE: Authoritative, minimalist, and clinically precise.
3. REPORT ARCHITECTURE:
   - # 🎯 CORE ENTITY MISSION: A singular executive summary of the codebase's purpose.
   - ## 📉 CRITICAL ENTROPY: A bulleted list of redundant assets, dead logic paths, and "Zombie" code.
   - ## ⚡ SYSTEMIC REFACTOR: Deep logic optimizations with embedded documentation links.
   - ## 🛠️ THE ESSENTIALIST REWRITE: The finalized, high-performance logic snippets.
4. VISUAL STYLE: Use Bold for technical identifiers. Use Markdown tables for performance deltas.

Every single change must be justified by a linked source. Logic without a source link is prohibited."#;

/// Gemini-backed analysis provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API endpoint (self-hosted proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request_body(&self, request: &AnalysisRequest) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": request.contents }] }],
            "systemInstruction": { "parts": [{ "text": AUDIT_SYSTEM_INSTRUCTION }] },
            "generationConfig": { "temperature": request.temperature },
            "tools": [{ "googleSearch": {} }]
        })
    }
}

#[async_trait]
impl AnalysisProvider for GeminiProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<RawAnalysis> {
        let client = reqwest::Client::new();
        let body = self.build_request_body(&request);

        tracing::debug!(
            "[gemini] Sending {} byte payload to {}",
            request.contents.len(),
            self.model
        );

        let response = client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AuditError::Boundary(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::Boundary(format!(
                "API error ({status}): {body}"
            )));
        }

        let decoded: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AuditError::Boundary(format!("undecodable response: {e}")))?;

        Ok(into_raw(decoded))
    }

    fn description(&self) -> String {
        format!("Gemini ({})", self.model)
    }
}

// Wire shapes. Everything the reply does not guarantee is an Option or a
// defaulted container, so absence never fails the decode.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingChunk {
    web: Option<WireWebSource>,
}

#[derive(Debug, Deserialize)]
struct WireWebSource {
    title: Option<String>,
    uri: Option<String>,
}

/// Flatten the first candidate into the boundary's raw reply shape.
fn into_raw(response: GenerateContentResponse) -> RawAnalysis {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return RawAnalysis::default();
    };

    let text = candidate.content.map(|content| {
        content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("")
    });

    let grounding = candidate
        .grounding_metadata
        .map(|metadata| metadata.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .map(|chunk| GroundingChunk {
            web: chunk.web.map(|web| WebSource {
                title: web.title,
                uri: web.uri,
            }),
        })
        .collect();

    RawAnalysis { text, grounding }
}
