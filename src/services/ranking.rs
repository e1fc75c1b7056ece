/// Generative re-ranking with a deterministic fallback
///
/// The oracle curates a subset of the filtered candidates and justifies the
/// picks. Its output is untrusted: the raw text must parse as the exact
/// `{movie_ids, reasoning}` schema or the whole response is discarded in
/// favor of the fallback. The caller can rely on `rank` never failing - a
/// broken or unreachable model degrades the endpoint, it does not break it.
use crate::{
    models::{Candidate, RankingDecision, Reasoning},
    services::providers::GenerativeModel,
};
use serde::Deserialize;
use std::sync::Arc;

/// Uniform reasoning applied when the oracle is unavailable or unparsable
pub const FALLBACK_REASONING: &str = "Here are the most relevant movies from our database.";

pub struct RankingOracle {
    model: Arc<dyn GenerativeModel>,
    curated_count: usize,
}

/// Expected oracle output, parsed strictly
#[derive(Debug, Deserialize)]
struct OracleVerdict {
    movie_ids: Vec<String>,
    reasoning: Reasoning,
}

impl RankingOracle {
    pub fn new(model: Arc<dyn GenerativeModel>, curated_count: usize) -> Self {
        Self {
            model,
            curated_count,
        }
    }

    /// Select a curated subset of `candidates` with justification.
    ///
    /// The returned id order is not meaningful - display order is decided by
    /// the caller from the original index order.
    pub async fn rank(
        &self,
        query: &str,
        liked_titles: &[String],
        candidates: &[Candidate],
    ) -> RankingDecision {
        let prompt = self.build_prompt(query, liked_titles, candidates);

        let raw = match self.model.generate_json(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Ranking oracle call failed, using fallback");
                return self.fallback(candidates);
            }
        };

        let verdict: OracleVerdict = match serde_json::from_str(&raw) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(error = %e, "Ranking oracle output failed validation, using fallback");
                return self.fallback(candidates);
            }
        };

        // A valid response may still decline to pick anything; substitute the
        // similarity-order default but keep the model's reasoning.
        let selected_ids = if verdict.movie_ids.is_empty() {
            tracing::debug!("Ranking oracle selected nothing, defaulting to similarity order");
            self.default_selection(candidates)
        } else {
            verdict.movie_ids
        };

        RankingDecision {
            selected_ids,
            reasoning: verdict.reasoning,
        }
    }

    fn build_prompt(&self, query: &str, liked_titles: &[String], candidates: &[Candidate]) -> String {
        let mut context = String::new();
        for candidate in candidates {
            context.push_str(&format!(
                "ID: {} | Title: {} | Overview: {}\n",
                candidate.id, candidate.title, candidate.overview
            ));
        }

        format!(
            r#"User Query: "{query}"
User Likes: {likes}

Candidates:
{context}
Pick the top {count} movies for this user. Return JSON:
{{
    "movie_ids": ["id1", "id2"],
    "reasoning": "Short explanation"
}}
"reasoning" may instead be an object mapping each chosen id to a one-line reason."#,
            query = query,
            likes = liked_titles.join(", "),
            context = context,
            count = self.curated_count,
        )
    }

    /// First R candidates in similarity order, one generic explanation
    fn fallback(&self, candidates: &[Candidate]) -> RankingDecision {
        RankingDecision {
            selected_ids: self.default_selection(candidates),
            reasoning: Reasoning::Uniform(FALLBACK_REASONING.to_string()),
        }
    }

    fn default_selection(&self, candidates: &[Candidate]) -> Vec<String> {
        candidates
            .iter()
            .take(self.curated_count)
            .map(|candidate| candidate.id.clone())
            .collect()
    }
}
