use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reasoning attached to items the oracle could not explain individually
pub const DEFAULT_ITEM_REASONING: &str = "Recommended based on your preferences.";

/// Top-level explanation used when the oracle only produced per-item reasons
const PER_ITEM_HEADLINE: &str = "Each recommendation below comes with its own explanation.";

/// Body of `POST /recommend`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
    /// Items the user already picked. Opaque identifiers - never assumed numeric.
    #[serde(default)]
    pub selected_movie_ids: Vec<String>,
}

/// One item returned by the vector index for a query, prior to filtering
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Unique within a single index query's result set
    pub id: String,
    pub title: String,
    pub overview: String,
    /// Poster reference exactly as stored in the index; resolved at assembly
    pub raw_poster: Option<String>,
    /// Similarity score from the index. Higher is closer; never altered downstream.
    pub score: f32,
    /// Opaque index-supplied metadata
    pub metadata: HashMap<String, String>,
}

/// Supplemental per-item fields from the secondary metadata source
///
/// Produced independently per candidate; absence of any field is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedFields {
    pub poster_url: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
}

/// Justification produced by the ranking oracle
///
/// The model may return one global explanation or a per-id mapping; both are
/// legal and normalized at consumption time rather than by runtime inspection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reasoning {
    Uniform(String),
    PerItem(HashMap<String, String>),
}

impl Reasoning {
    /// Reasoning text for one selected item
    pub fn for_id(&self, id: &str) -> String {
        match self {
            Reasoning::Uniform(text) => text.clone(),
            Reasoning::PerItem(map) => map
                .get(id)
                .cloned()
                .unwrap_or_else(|| DEFAULT_ITEM_REASONING.to_string()),
        }
    }

    /// Top-level explanation for the response envelope
    pub fn headline(&self) -> String {
        match self {
            Reasoning::Uniform(text) => text.clone(),
            Reasoning::PerItem(_) => PER_ITEM_HEADLINE.to_string(),
        }
    }
}

/// Outcome of the ranking stage
///
/// `selected_ids` is the oracle's chosen subset (or the deterministic
/// fallback). Its order is NOT authoritative for display - the final list
/// always follows the vector-index order.
#[derive(Debug, Clone)]
pub struct RankingDecision {
    pub selected_ids: Vec<String>,
    pub reasoning: Reasoning,
}

/// One recommended movie in the response
#[derive(Debug, Clone, Serialize)]
pub struct MovieResult {
    pub id: String,
    pub title: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Envelope for `POST /recommend`
///
/// Three wire shapes share this struct: success carries `ai_reasoning` +
/// `movies`, the empty-match state carries a soft `ai_reasoning` with no
/// movies, and a fatal retrieval-stage failure carries `error` with no
/// movies. Errors ride in the payload, not the transport status.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub movies: Vec<MovieResult>,
}

impl RecommendResponse {
    pub fn success(ai_reasoning: String, movies: Vec<MovieResult>) -> Self {
        Self {
            ai_reasoning: Some(ai_reasoning),
            error: None,
            movies,
        }
    }

    pub fn no_matches(message: String) -> Self {
        Self {
            ai_reasoning: Some(message),
            error: None,
            movies: Vec::new(),
        }
    }

    pub fn fatal(message: String) -> Self {
        Self {
            ai_reasoning: None,
            error: Some(message),
            movies: Vec::new(),
        }
    }
}

/// One row of the paginated catalog listing
#[derive(Debug, Clone, Serialize)]
pub struct MovieListing {
    pub id: String,
    pub title: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// Pagination metadata for the catalog listing
#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub current_page: u32,
    pub limit: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

/// Envelope for `GET /movies`
#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub data: Vec<MovieListing>,
    pub meta: ListMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_deserializes_uniform_string() {
        let reasoning: Reasoning = serde_json::from_str(r#""A strong set of picks.""#).unwrap();
        assert_eq!(reasoning, Reasoning::Uniform("A strong set of picks.".to_string()));
    }

    #[test]
    fn test_reasoning_deserializes_per_item_map() {
        let reasoning: Reasoning =
            serde_json::from_str(r#"{"42": "Matches your taste for heists."}"#).unwrap();
        match reasoning {
            Reasoning::PerItem(map) => {
                assert_eq!(map["42"], "Matches your taste for heists.");
            }
            Reasoning::Uniform(_) => panic!("expected per-item mapping"),
        }
    }

    #[test]
    fn test_reasoning_rejects_other_shapes() {
        assert!(serde_json::from_str::<Reasoning>("17").is_err());
        assert!(serde_json::from_str::<Reasoning>("null").is_err());
        assert!(serde_json::from_str::<Reasoning>(r#"["a"]"#).is_err());
    }

    #[test]
    fn test_reasoning_for_id_uniform_applies_to_all() {
        let reasoning = Reasoning::Uniform("One line for everyone.".to_string());
        assert_eq!(reasoning.for_id("1"), "One line for everyone.");
        assert_eq!(reasoning.for_id("2"), "One line for everyone.");
    }

    #[test]
    fn test_reasoning_for_id_unmapped_falls_back_to_default() {
        let mut map = HashMap::new();
        map.insert("1".to_string(), "Specific reason.".to_string());
        let reasoning = Reasoning::PerItem(map);

        assert_eq!(reasoning.for_id("1"), "Specific reason.");
        assert_eq!(reasoning.for_id("2"), DEFAULT_ITEM_REASONING);
    }

    #[test]
    fn test_reasoning_headline() {
        let uniform = Reasoning::Uniform("Global take.".to_string());
        assert_eq!(uniform.headline(), "Global take.");

        let per_item = Reasoning::PerItem(HashMap::new());
        assert_eq!(per_item.headline(), PER_ITEM_HEADLINE);
    }

    #[test]
    fn test_request_defaults_selected_ids() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"query": "space operas"}"#).unwrap();
        assert!(request.selected_movie_ids.is_empty());
    }

    #[test]
    fn test_fatal_response_shape() {
        let response = RecommendResponse::fatal("Embedding failed: quota".to_string());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error"], "Embedding failed: quota");
        assert_eq!(json["movies"].as_array().unwrap().len(), 0);
        assert!(json.get("ai_reasoning").is_none());
    }

    #[test]
    fn test_success_response_omits_error_field() {
        let response = RecommendResponse::success("Because.".to_string(), Vec::new());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["ai_reasoning"], "Because.");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_movie_result_skips_absent_enrichment() {
        let movie = MovieResult {
            id: "603".to_string(),
            title: "The Matrix".to_string(),
            overview: "A hacker learns the truth.".to_string(),
            poster_url: None,
            score: 0.91,
            year: None,
            imdb_rating: None,
            reasoning: None,
        };
        let json = serde_json::to_value(&movie).unwrap();

        assert!(json.get("year").is_none());
        assert!(json.get("imdb_rating").is_none());
        assert!(json.get("reasoning").is_none());
        // poster_url stays present (null) - the client relies on the key
        assert!(json["poster_url"].is_null());
    }
}
