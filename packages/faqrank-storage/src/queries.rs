use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{Chunk, KnowledgeBase},
};

/// Tenant-scoped batch fetch. Row order is whatever Postgres returns;
/// callers reconcile rows by id. Ids with no row (deleted since the
/// search index last saw them) are simply absent from the result.
pub async fn list_chunks_by_id(
	db: &Db,
	tenant_id: &str,
	chunk_ids: &[Uuid],
) -> Result<Vec<Chunk>> {
	if chunk_ids.is_empty() {
		return Ok(Vec::new());
	}

	let chunks = sqlx::query_as(
		"\
SELECT chunk_id, tenant_id, knowledge_base_id, chunk_type, is_enabled, content, created_at, updated_at
FROM kb_chunks
WHERE tenant_id = $1 AND chunk_id = ANY($2)",
	)
	.bind(tenant_id)
	.bind(chunk_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(chunks)
}

pub async fn fetch_knowledge_base(
	db: &Db,
	tenant_id: &str,
	kb_id: &str,
) -> Result<Option<KnowledgeBase>> {
	let kb = sqlx::query_as(
		"\
SELECT kb_id, tenant_id, name, kb_type, settings, created_at, updated_at
FROM knowledge_bases
WHERE tenant_id = $1 AND kb_id = $2",
	)
	.bind(tenant_id)
	.bind(kb_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(kb)
}

pub async fn insert_knowledge_base(db: &Db, kb: &KnowledgeBase) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO knowledge_bases (kb_id, tenant_id, name, kb_type, settings, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(kb.kb_id.as_str())
	.bind(kb.tenant_id.as_str())
	.bind(kb.name.as_str())
	.bind(kb.kb_type.as_str())
	.bind(&kb.settings)
	.bind(kb.created_at)
	.bind(kb.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_chunk(db: &Db, chunk: &Chunk) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO kb_chunks (chunk_id, tenant_id, knowledge_base_id, chunk_type, is_enabled, content, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (chunk_id) DO UPDATE
SET
	chunk_type = EXCLUDED.chunk_type,
	is_enabled = EXCLUDED.is_enabled,
	content = EXCLUDED.content,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(chunk.chunk_id)
	.bind(chunk.tenant_id.as_str())
	.bind(chunk.knowledge_base_id.as_str())
	.bind(chunk.chunk_type.as_str())
	.bind(chunk.is_enabled)
	.bind(chunk.content.as_str())
	.bind(chunk.created_at)
	.bind(chunk.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}
