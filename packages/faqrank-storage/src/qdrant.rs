pub const DENSE_VECTOR_NAME: &str = "dense";
pub const BM25_VECTOR_NAME: &str = "bm25";
pub const BM25_MODEL: &str = "qdrant/bm25";

use qdrant_client::qdrant::{
	Document, Filter, Fusion, PrefetchQueryBuilder, Query, QueryPointsBuilder, ScoredPoint,
};

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}

/// One retrieval query against the chunk collection. `vector_threshold`
/// applies to dense similarity only; RRF-fused scores have no comparable
/// scale.
pub struct HybridQuery<'a> {
	pub text: &'a str,
	pub vector: &'a [f32],
	pub filter: Filter,
	pub vector_threshold: f32,
	pub keywords_enabled: bool,
	pub limit: u64,
}

impl QdrantStore {
	pub fn new(cfg: &faqrank_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// With keyword matching disabled this is a dense nearest-neighbor
	/// search thresholded on vector similarity; otherwise a dense + BM25
	/// prefetch pair fused server-side with RRF.
	pub async fn hybrid_query(&self, query: HybridQuery<'_>) -> Result<Vec<ScoredPoint>> {
		let search = if query.keywords_enabled {
			let dense_prefetch = PrefetchQueryBuilder::default()
				.query(Query::new_nearest(query.vector.to_vec()))
				.using(DENSE_VECTOR_NAME)
				.filter(query.filter.clone())
				.score_threshold(query.vector_threshold)
				.limit(query.limit);
			let bm25_prefetch = PrefetchQueryBuilder::default()
				.query(Query::new_nearest(Document::new(query.text.to_string(), BM25_MODEL)))
				.using(BM25_VECTOR_NAME)
				.filter(query.filter.clone())
				.limit(query.limit);

			QueryPointsBuilder::new(self.collection.clone())
				.add_prefetch(dense_prefetch)
				.add_prefetch(bm25_prefetch)
				.query(Fusion::Rrf)
		} else {
			QueryPointsBuilder::new(self.collection.clone())
				.query(Query::new_nearest(query.vector.to_vec()))
				.using(DENSE_VECTOR_NAME)
				.filter(query.filter)
				.score_threshold(query.vector_threshold)
		};
		let search = search.with_payload(true).limit(query.limit);
		let response = self.client.query(search).await?;

		Ok(response.result)
	}
}
