/// Pinecone vector index client
///
/// Talks to the index data plane directly: one `POST /query` per request,
/// metadata included so candidates arrive ready for filtering and ranking.
use crate::{
    error::{AppError, AppResult},
    models::Candidate,
    services::providers::VectorIndexProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Clone)]
pub struct PineconeIndex {
    http_client: HttpClient,
    api_key: String,
    index_host: String,
}

impl PineconeIndex {
    pub fn new(http_client: HttpClient, api_key: String, index_host: String) -> Self {
        Self {
            http_client,
            api_key,
            index_host,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

#[derive(Debug, Deserialize)]
struct IndexMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

/// Flatten a metadata value to its string form; nulls are dropped upstream
fn metadata_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<IndexMatch> for Candidate {
    fn from(index_match: IndexMatch) -> Self {
        let metadata: HashMap<String, String> = index_match
            .metadata
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), metadata_string(value)))
            .collect();

        // The index stores either a relative path or a full URL, under one of
        // two historical keys; the stored value wins over nothing, resolution
        // happens at assembly time.
        let raw_poster = metadata
            .get("poster_url")
            .or_else(|| metadata.get("poster_path"))
            .cloned();

        Candidate {
            id: index_match.id,
            title: metadata.get("title").cloned().unwrap_or_default(),
            overview: metadata.get("overview").cloned().unwrap_or_default(),
            raw_poster,
            score: index_match.score,
            metadata,
        }
    }
}

#[async_trait::async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<Candidate>> {
        let url = format!("https://{}/query", self.index_host);

        let body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });

        let response = self
            .http_client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Pinecone returned status {}: {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let candidates: Vec<Candidate> =
            parsed.matches.into_iter().map(Candidate::from).collect();

        tracing::debug!(matches = candidates.len(), top_k, "Vector search completed");

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_to_candidate() {
        let json = r#"{
            "id": "27205",
            "score": 0.87,
            "metadata": {
                "title": "Inception",
                "overview": "A thief who steals corporate secrets.",
                "poster_path": "/inception.jpg",
                "vote_average": "8.3"
            }
        }"#;
        let index_match: IndexMatch = serde_json::from_str(json).unwrap();
        let candidate: Candidate = index_match.into();

        assert_eq!(candidate.id, "27205");
        assert_eq!(candidate.title, "Inception");
        assert_eq!(candidate.score, 0.87);
        assert_eq!(candidate.raw_poster, Some("/inception.jpg".to_string()));
        assert_eq!(candidate.metadata["vote_average"], "8.3");
    }

    #[test]
    fn test_match_prefers_poster_url_over_path() {
        let json = r#"{
            "id": "1",
            "score": 0.5,
            "metadata": {
                "poster_url": "https://cdn.example.com/a.jpg",
                "poster_path": "/a.jpg"
            }
        }"#;
        let index_match: IndexMatch = serde_json::from_str(json).unwrap();
        let candidate: Candidate = index_match.into();

        assert_eq!(
            candidate.raw_poster,
            Some("https://cdn.example.com/a.jpg".to_string())
        );
    }

    #[test]
    fn test_match_with_sparse_metadata() {
        let json = r#"{"id": "2", "score": 0.4, "metadata": {"release_date": null}}"#;
        let index_match: IndexMatch = serde_json::from_str(json).unwrap();
        let candidate: Candidate = index_match.into();

        assert_eq!(candidate.title, "");
        assert_eq!(candidate.overview, "");
        assert_eq!(candidate.raw_poster, None);
        assert!(!candidate.metadata.contains_key("release_date"));
    }

    #[test]
    fn test_non_string_metadata_is_stringified() {
        let json = r#"{"id": "3", "score": 0.2, "metadata": {"vote_average": 7.5}}"#;
        let index_match: IndexMatch = serde_json::from_str(json).unwrap();
        let candidate: Candidate = index_match.into();

        assert_eq!(candidate.metadata["vote_average"], "7.5");
    }

    #[test]
    fn test_empty_query_response() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"matches": []}"#).unwrap();
        assert!(parsed.matches.is_empty());
    }
}
