use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite movie catalog
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Gemini API key (embeddings + generative re-ranking)
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Expected embedding dimension (must match the vector index)
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Generative model used for re-ranking
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Pinecone API key
    pub pinecone_api_key: String,

    /// Pinecone index data-plane host
    pub pinecone_index_host: String,

    /// OMDB API key (metadata enrichment)
    pub omdb_api_key: String,

    /// OMDB API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Base URL that relative poster paths are resolved against
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Vector search fan-out (K) - how many candidates the index returns
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// Ranking context cap (C) - filtered candidates handed to the oracle
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// Curated selection size (R) - oracle target and fallback count
    #[serde(default = "default_curated_count")]
    pub curated_count: usize,

    /// Per-lookup enrichment timeout in seconds
    #[serde(default = "default_enrichment_timeout_secs")]
    pub enrichment_timeout_secs: u64,

    /// Whether in-flight enrichment lookups are aborted when the client
    /// disconnects. Off by default: lookups run to completion detached.
    #[serde(default)]
    pub enrichment_cancel_on_disconnect: bool,

    /// Timeout for outbound HTTP clients in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> String {
    "movies.db".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_embedding_dim() -> usize {
    768
}

fn default_chat_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_search_top_k() -> usize {
    50
}

fn default_context_size() -> usize {
    50
}

fn default_curated_count() -> usize {
    15
}

fn default_enrichment_timeout_secs() -> u64 {
    5
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
