use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::MovieCatalog,
    services::{
        enrichment::MetadataEnricher,
        providers::{
            gemini::GeminiClient, omdb::OmdbClient, pinecone::PineconeIndex, EmbeddingProvider,
            GenerativeModel,
        },
        ranking::RankingOracle,
        recommendation::RecommendationService,
    },
};

/// Shared application state
///
/// All external-service handles are constructed once at startup and injected
/// into handlers through this struct. Nothing here mutates after
/// construction, so concurrent requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: MovieCatalog,
    pub recommender: Arc<RecommendationService>,
    pub image_base_url: String,
}

impl AppState {
    pub fn new(
        catalog: MovieCatalog,
        recommender: Arc<RecommendationService>,
        image_base_url: String,
    ) -> Self {
        Self {
            catalog,
            recommender,
            image_base_url,
        }
    }

    /// Wire up the full production state from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let catalog = MovieCatalog::open(&config.database_path);

        let gemini = Arc::new(GeminiClient::new(
            http_client.clone(),
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.embedding_model.clone(),
            config.embedding_dim,
            config.chat_model.clone(),
        ));
        let index = Arc::new(PineconeIndex::new(
            http_client.clone(),
            config.pinecone_api_key.clone(),
            config.pinecone_index_host.clone(),
        ));
        let omdb = Arc::new(OmdbClient::new(
            http_client,
            config.omdb_api_key.clone(),
            config.omdb_api_url.clone(),
        ));

        let embedder: Arc<dyn EmbeddingProvider> = gemini.clone();
        let model: Arc<dyn GenerativeModel> = gemini;

        let oracle = RankingOracle::new(model, config.curated_count);
        let enricher = MetadataEnricher::new(
            omdb,
            Duration::from_secs(config.enrichment_timeout_secs),
            config.enrichment_cancel_on_disconnect,
        );

        let recommender = RecommendationService::new(
            Arc::new(catalog.clone()),
            embedder,
            index,
            oracle,
            enricher,
            config.image_base_url.clone(),
            config.search_top_k,
            config.context_size,
        );

        Ok(Self::new(
            catalog,
            Arc::new(recommender),
            config.image_base_url.clone(),
        ))
    }
}
