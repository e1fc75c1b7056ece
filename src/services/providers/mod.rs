/// External capability seams
///
/// The pipeline only ever talks to the embedding service, the vector index,
/// the generative model, and the metadata source through these traits, so
/// every vendor can be swapped (or stubbed in tests) without touching the
/// core algorithm.
use crate::{
    error::AppResult,
    models::{Candidate, EnrichedFields},
};

pub mod gemini;
pub mod omdb;
pub mod pinecone;

/// Task type for text embedding
///
/// Documents are embedded with `Document` at ingestion time and queries with
/// `Query` at request time. Retrieval quality depends on keeping the model
/// symmetric and the task type asymmetric between the two sides, so the
/// distinction is part of the contract rather than a client detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    Query,
    Document,
}

/// Text -> fixed-dimension vector
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text` for the given task type.
    ///
    /// The returned vector's dimension must match the index configuration.
    /// Any failure is fatal for the calling request - no retries here.
    async fn embed(&self, text: &str, task: EmbeddingTask) -> AppResult<Vec<f32>>;
}

/// Nearest-neighbor search over the vector index
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Return up to `top_k` candidates ordered by descending similarity.
    ///
    /// An empty result is not an error - it is the "no matches" state.
    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<Candidate>>;
}

/// Generative model invoked for re-ranking
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run `prompt` and return the model's raw text, requested as JSON.
    ///
    /// The output is an untrusted payload; callers validate it against the
    /// expected schema and fall back on any violation.
    async fn generate_json(&self, prompt: &str) -> AppResult<String>;
}

/// Title store consulted for the user's prior selections
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TitleLookup: Send + Sync {
    /// Resolve catalog ids to display titles.
    ///
    /// Unknown ids are simply absent from the result. Callers treat any
    /// failure as "no titles" - this collaborator can never fail a request.
    async fn titles_for_ids(&self, ids: &[String]) -> AppResult<Vec<String>>;
}

/// Secondary per-title metadata source
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up supplemental fields for one title.
    ///
    /// "Not found" is an error at this layer; the enricher degrades it to
    /// empty fields for that item alone.
    async fn lookup(&self, title: &str) -> AppResult<EnrichedFields>;
}
