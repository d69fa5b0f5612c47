mod defaults;
mod error;
pub mod search;

pub use defaults::{QdrantSearchEngine, SqlChunkStore, SqlKnowledgeBaseStore};
pub use error::{Error, Result};
pub use search::{FaqEntry, FaqSearchRequest, SearchResult};

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use faqrank_config::{Config, EmbeddingProviderConfig};
use faqrank_domain::params::SearchParams;
use faqrank_providers::embedding;
use faqrank_storage::{
	db::Db,
	models::{Chunk, KnowledgeBase},
	qdrant::QdrantStore,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

/// Retrieval backend. Implementations own hit classification; callers
/// only see scored chunk references.
pub trait SearchEngine
where
	Self: Send + Sync,
{
	fn hybrid_search<'a>(
		&'a self,
		tenant_id: &'a str,
		knowledge_base_id: &'a str,
		query_text: &'a str,
		params: SearchParams,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchResult>>>;
}

pub trait ChunkStore
where
	Self: Send + Sync,
{
	fn list_by_ids<'a>(
		&'a self,
		tenant_id: &'a str,
		chunk_ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Chunk>>>;
}

pub trait KnowledgeBaseStore
where
	Self: Send + Sync,
{
	fn fetch<'a>(
		&'a self,
		tenant_id: &'a str,
		knowledge_base_id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<KnowledgeBase>>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub engine: Arc<dyn SearchEngine>,
	pub chunks: Arc<dyn ChunkStore>,
	pub knowledge_bases: Arc<dyn KnowledgeBaseStore>,
}

pub struct FaqService {
	pub cfg: Config,
	pub collaborators: Collaborators,
}

struct DefaultEmbedding;
impl EmbeddingProvider for DefaultEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl FaqService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		let db = Arc::new(db);
		let engine = Arc::new(QdrantSearchEngine::new(
			Arc::new(qdrant),
			Arc::new(DefaultEmbedding),
			cfg.providers.embedding.clone(),
		));
		let collaborators = Collaborators {
			engine,
			chunks: Arc::new(SqlChunkStore::new(db.clone())),
			knowledge_bases: Arc::new(SqlKnowledgeBaseStore::new(db)),
		};

		Self { cfg, collaborators }
	}

	pub fn with_collaborators(cfg: Config, collaborators: Collaborators) -> Self {
		Self { cfg, collaborators }
	}
}
