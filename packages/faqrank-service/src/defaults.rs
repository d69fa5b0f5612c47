use std::sync::Arc;

use qdrant_client::qdrant::{Condition, Filter, ScoredPoint, point_id::PointIdOptions};
use tracing::warn;
use uuid::Uuid;

use faqrank_config::EmbeddingProviderConfig;
use faqrank_domain::{faq::MatchType, params::SearchParams};
use faqrank_storage::{
	db::Db,
	models::{Chunk, KnowledgeBase},
	qdrant::{HybridQuery, QdrantStore},
	queries,
};

use crate::{BoxFuture, ChunkStore, EmbeddingProvider, KnowledgeBaseStore, SearchEngine, SearchResult};

pub struct QdrantSearchEngine {
	store: Arc<QdrantStore>,
	embedding: Arc<dyn EmbeddingProvider>,
	embedding_cfg: EmbeddingProviderConfig,
}
impl QdrantSearchEngine {
	pub fn new(
		store: Arc<QdrantStore>,
		embedding: Arc<dyn EmbeddingProvider>,
		embedding_cfg: EmbeddingProviderConfig,
	) -> Self {
		Self { store, embedding, embedding_cfg }
	}
}
impl SearchEngine for QdrantSearchEngine {
	fn hybrid_search<'a>(
		&'a self,
		tenant_id: &'a str,
		knowledge_base_id: &'a str,
		query_text: &'a str,
		params: SearchParams,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchResult>>> {
		Box::pin(async move {
			let inputs = vec![query_text.to_string()];
			let embeddings = self.embedding.embed(&self.embedding_cfg, &inputs).await?;
			let Some(vector) = embeddings.into_iter().next() else {
				color_eyre::eyre::bail!("Embedding provider returned no vectors.");
			};

			if vector.len() != self.store.vector_dim as usize {
				color_eyre::eyre::bail!(
					"Embedding vector dimension mismatch: got {}, expected {}.",
					vector.len(),
					self.store.vector_dim
				);
			}

			let keywords_enabled = !params.disable_keywords_match;
			let filter = Filter::all([
				Condition::matches("tenant_id", tenant_id.to_string()),
				Condition::matches("knowledge_base_id", knowledge_base_id.to_string()),
			]);
			let points = self
				.store
				.hybrid_query(HybridQuery {
					text: query_text,
					vector: &vector,
					filter,
					vector_threshold: params.vector_threshold,
					keywords_enabled,
					limit: params.match_count.max(1) as u64,
				})
				.await?;
			// Fused hits cannot be attributed to a single retrieval arm.
			let match_type =
				if keywords_enabled { MatchType::Hybrid } else { MatchType::Vector };

			Ok(collect_search_results(&points, match_type))
		})
	}
}

pub struct SqlChunkStore {
	db: Arc<Db>,
}
impl SqlChunkStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl ChunkStore for SqlChunkStore {
	fn list_by_ids<'a>(
		&'a self,
		tenant_id: &'a str,
		chunk_ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Chunk>>> {
		Box::pin(async move {
			Ok(queries::list_chunks_by_id(&self.db, tenant_id, chunk_ids).await?)
		})
	}
}

pub struct SqlKnowledgeBaseStore {
	db: Arc<Db>,
}
impl SqlKnowledgeBaseStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl KnowledgeBaseStore for SqlKnowledgeBaseStore {
	fn fetch<'a>(
		&'a self,
		tenant_id: &'a str,
		knowledge_base_id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Option<KnowledgeBase>>> {
		Box::pin(async move {
			Ok(queries::fetch_knowledge_base(&self.db, tenant_id, knowledge_base_id).await?)
		})
	}
}

fn collect_search_results(points: &[ScoredPoint], match_type: MatchType) -> Vec<SearchResult> {
	let mut out = Vec::with_capacity(points.len());

	for point in points {
		let Some(chunk_id) = point.id.as_ref().and_then(point_id_to_uuid) else {
			warn!(score = point.score, "Search hit is missing a UUID point id.");

			continue;
		};

		out.push(SearchResult { chunk_id, score: point.score, match_type });
	}

	out
}

fn point_id_to_uuid(point_id: &qdrant_client::qdrant::PointId) -> Option<Uuid> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Uuid(id)) => Uuid::parse_str(id).ok(),
		_ => None,
	}
}
