/// Gemini API client
///
/// Covers both capabilities the pipeline needs from Google: text embedding
/// (query mode at request time, document mode at ingestion time) and the
/// generative call used for re-ranking. One client, two traits.
use crate::{
    error::{AppError, AppResult},
    services::providers::{EmbeddingProvider, EmbeddingTask, GenerativeModel},
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    embedding_model: String,
    embedding_dim: usize,
    chat_model: String,
}

impl GeminiClient {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        embedding_model: String,
        embedding_dim: usize,
        chat_model: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            embedding_model,
            embedding_dim,
            chat_model,
        }
    }
}

fn task_type_param(task: EmbeddingTask) -> &'static str {
    match task {
        EmbeddingTask::Query => "RETRIEVAL_QUERY",
        EmbeddingTask::Document => "RETRIEVAL_DOCUMENT",
    }
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeneratedCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeneratedCandidate {
    content: GeneratedContent,
}

#[derive(Debug, Deserialize)]
struct GeneratedContent {
    #[serde(default)]
    parts: Vec<GeneratedPart>,
}

#[derive(Debug, Deserialize)]
struct GeneratedPart {
    text: String,
}

/// Pull the first candidate's text out of a generateContent response
fn first_candidate_text(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
}

#[async_trait::async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str, task: EmbeddingTask) -> AppResult<Vec<f32>> {
        let url = format!(
            "{}/v1beta/models/{}:embedContent",
            self.api_url, self.embedding_model
        );

        let body = json!({
            "model": format!("models/{}", self.embedding_model),
            "content": { "parts": [{ "text": text }] },
            "taskType": task_type_param(task),
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "Gemini returned status {}: {}",
                status, body
            )));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;

        let vector = parsed.embedding.values;
        if vector.len() != self.embedding_dim {
            return Err(AppError::Embedding(format!(
                "expected {}-dimensional vector, got {}",
                self.embedding_dim,
                vector.len()
            )));
        }

        Ok(vector)
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.chat_model
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini returned status {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))?;

        first_candidate_text(parsed)
            .ok_or_else(|| AppError::ExternalApi("Gemini response carried no candidates".to_string()))
    }
}
