/// OMDB metadata client
///
/// Title-keyed lookups against the secondary metadata source. OMDB signals
/// "not found" inside a 200 body (`Response: "False"`) and pads absent fields
/// with the literal "N/A"; both quirks are normalized here so the enricher
/// only ever sees clean optional fields.
use crate::{
    error::{AppError, AppResult},
    models::EnrichedFields,
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

#[derive(Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbClient {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmdbTitleResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

/// OMDB uses "N/A" for fields it has no data for
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

impl From<OmdbTitleResponse> for EnrichedFields {
    fn from(payload: OmdbTitleResponse) -> Self {
        EnrichedFields {
            poster_url: present(payload.poster),
            year: present(payload.year),
            rating: present(payload.imdb_rating),
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbClient {
    async fn lookup(&self, title: &str) -> AppResult<EnrichedFields> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "OMDB returned status {}",
                status
            )));
        }

        let payload: OmdbTitleResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(e.to_string()))?;

        if payload.response != "True" {
            return Err(AppError::ExternalApi(format!(
                "OMDB lookup failed for {:?}: {}",
                title,
                payload.error.as_deref().unwrap_or("unknown error")
            )));
        }

        Ok(payload.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_response_to_fields() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
            "Response": "True"
        }"#;
        let payload: OmdbTitleResponse = serde_json::from_str(json).unwrap();
        let fields: EnrichedFields = payload.into();

        assert_eq!(fields.year, Some("2010".to_string()));
        assert_eq!(fields.rating, Some("8.8".to_string()));
        assert_eq!(
            fields.poster_url,
            Some("https://m.media-amazon.com/images/M/inception.jpg".to_string())
        );
    }

    #[test]
    fn test_na_fields_normalize_to_none() {
        let json = r#"{
            "Title": "Obscure Short",
            "Year": "N/A",
            "imdbRating": "N/A",
            "Poster": "N/A",
            "Response": "True"
        }"#;
        let payload: OmdbTitleResponse = serde_json::from_str(json).unwrap();
        let fields: EnrichedFields = payload.into();

        assert_eq!(fields, EnrichedFields::default());
    }

    #[test]
    fn test_not_found_body_deserializes() {
        let json = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let payload: OmdbTitleResponse = serde_json::from_str(json).unwrap();

        assert_eq!(payload.response, "False");
        assert_eq!(payload.error.as_deref(), Some("Movie not found!"));
    }
}
