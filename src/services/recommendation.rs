/// The hybrid recommendation pipeline
///
/// Request flow: resolve prior selections to titles, augment the query, embed
/// it (query mode), pull top-K neighbors from the vector index, filter and
/// dedupe, let the oracle curate a subset (or fall back deterministically),
/// then enrich the survivors concurrently and assemble the response in the
/// index's similarity order.
///
/// Only embedding and vector search may abort a request. Everything after
/// retrieval degrades in place: lookup failures lose the selection context,
/// oracle failures fall back, enrichment failures lose fields per item.
use crate::{
    error::AppResult,
    models::{Candidate, MovieResult, RankingDecision, RecommendResponse, RecommendationRequest},
    services::{
        enrichment::MetadataEnricher,
        filter::filter_candidates,
        poster::resolve_poster_url,
        providers::{EmbeddingProvider, EmbeddingTask, TitleLookup, VectorIndexProvider},
        ranking::RankingOracle,
    },
};
use std::collections::HashSet;
use std::sync::Arc;

/// Soft message for the zero-match terminal state
const NO_MATCHES_MESSAGE: &str = "I couldn't find any matches. Try a broader search.";

pub struct RecommendationService {
    titles: Arc<dyn TitleLookup>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    oracle: RankingOracle,
    enricher: MetadataEnricher,
    image_base_url: String,
    search_top_k: usize,
    context_size: usize,
}

impl RecommendationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        titles: Arc<dyn TitleLookup>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        oracle: RankingOracle,
        enricher: MetadataEnricher,
        image_base_url: String,
        search_top_k: usize,
        context_size: usize,
    ) -> Self {
        Self {
            titles,
            embedder,
            index,
            oracle,
            enricher,
            image_base_url,
            search_top_k,
            context_size,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// Errors out of this function are exactly the retrieval-fatal classes
    /// (`Embedding`, `Search`); the handler folds them into the degraded
    /// payload.
    pub async fn recommend(&self, request: &RecommendationRequest) -> AppResult<RecommendResponse> {
        let selected_titles = match self.titles.titles_for_ids(&request.selected_movie_ids).await {
            Ok(titles) => titles,
            Err(e) => {
                tracing::warn!(error = %e, "Title lookup failed, continuing without selections");
                Vec::new()
            }
        };

        let augmented = augment_query(&request.query, &selected_titles);
        tracing::debug!(query = %augmented, "Embedding augmented query");

        let vector = self.embedder.embed(&augmented, EmbeddingTask::Query).await?;
        let matches = self.index.query(&vector, self.search_top_k).await?;

        if matches.is_empty() {
            tracing::info!("Vector search returned no matches");
            return Ok(RecommendResponse::no_matches(NO_MATCHES_MESSAGE.to_string()));
        }

        let filtered = filter_candidates(
            matches,
            &request.selected_movie_ids,
            &selected_titles,
            self.context_size,
        );

        let decision = self
            .oracle
            .rank(&request.query, &selected_titles, &filtered)
            .await;

        // Survivors keep the index's similarity order; the oracle's id order
        // is deliberately discarded here.
        let selected: HashSet<&str> = decision.selected_ids.iter().map(String::as_str).collect();
        let survivors: Vec<Candidate> = filtered
            .into_iter()
            .filter(|candidate| selected.contains(candidate.id.as_str()))
            .collect();

        let titles: Vec<String> = survivors
            .iter()
            .map(|candidate| candidate.title.clone())
            .collect();
        let enrichments = self.enricher.enrich_batch(&titles).await;

        let movies = assemble_movies(survivors, enrichments, &decision, &self.image_base_url);

        tracing::info!(movies = movies.len(), "Recommendation pipeline completed");

        Ok(RecommendResponse::success(
            decision.reasoning.headline(),
            movies,
        ))
    }
}

/// Build the effective search query from user text and prior selections
///
/// With no resolved titles the query passes through untouched; a lookup
/// failure upstream therefore degrades to plain search, never an error.
pub fn augment_query(query: &str, selected_titles: &[String]) -> String {
    if selected_titles.is_empty() {
        query.to_string()
    } else {
        format!(
            "Movies similar to {}. Context: {}",
            selected_titles.join(", "),
            query
        )
    }
}

/// Merge ranking, enrichment, and poster resolution into the final list
fn assemble_movies(
    survivors: Vec<Candidate>,
    enrichments: Vec<crate::models::EnrichedFields>,
    decision: &RankingDecision,
    image_base_url: &str,
) -> Vec<MovieResult> {
    survivors
        .into_iter()
        .zip(enrichments)
        .map(|(candidate, enriched)| {
            // The enrichment's poster reference wins over the stored one
            let raw_poster = enriched.poster_url.or(candidate.raw_poster);
            MovieResult {
                poster_url: resolve_poster_url(raw_poster.as_deref(), image_base_url),
                reasoning: Some(decision.reasoning.for_id(&candidate.id)),
                id: candidate.id,
                title: candidate.title,
                overview: candidate.overview,
                score: candidate.score,
                year: enriched.year,
                imdb_rating: enriched.rating,
            }
        })
        .collect()
}
