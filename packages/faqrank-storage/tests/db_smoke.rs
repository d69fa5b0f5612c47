use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use faqrank_config::Postgres;
use faqrank_storage::{
	db::Db,
	models::{Chunk, KnowledgeBase},
	queries,
};
use faqrank_testkit::TestDatabase;

fn chunk(id: Uuid, tenant_id: &str, chunk_type: &str, is_enabled: bool) -> Chunk {
	Chunk {
		chunk_id: id,
		tenant_id: tenant_id.to_string(),
		knowledge_base_id: "kb1".to_string(),
		chunk_type: chunk_type.to_string(),
		is_enabled,
		content: json!({ "question": "Q?", "answer": "A." }).to_string(),
		created_at: OffsetDateTime::UNIX_EPOCH,
		updated_at: OffsetDateTime::UNIX_EPOCH,
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FAQRANK_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = faqrank_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set FAQRANK_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	// Bootstrap must be re-runnable.
	db.ensure_schema().await.expect("Failed to re-run schema bootstrap.");

	for table in ["knowledge_bases", "kb_chunks"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "missing table {table}");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FAQRANK_PG_DSN to run."]
async fn chunk_batch_fetch_is_tenant_scoped() {
	let Some(base_dsn) = faqrank_testkit::env_dsn() else {
		eprintln!("Skipping chunk_batch_fetch_is_tenant_scoped; set FAQRANK_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let c1 = Uuid::new_v4();
	let c2 = Uuid::new_v4();
	let foreign = Uuid::new_v4();

	queries::insert_chunk(&db, &chunk(c1, "tenant_a", "faq", true))
		.await
		.expect("Failed to insert chunk.");
	queries::insert_chunk(&db, &chunk(c2, "tenant_a", "faq", false))
		.await
		.expect("Failed to insert chunk.");
	queries::insert_chunk(&db, &chunk(foreign, "tenant_b", "faq", true))
		.await
		.expect("Failed to insert chunk.");

	let fetched = queries::list_chunks_by_id(&db, "tenant_a", &[c1, c2, foreign])
		.await
		.expect("Failed to list chunks.");
	let mut ids = fetched.iter().map(|chunk| chunk.chunk_id).collect::<Vec<_>>();

	ids.sort();

	let mut expected = vec![c1, c2];

	expected.sort();

	assert_eq!(ids, expected);

	let empty = queries::list_chunks_by_id(&db, "tenant_a", &[]).await.expect("Failed to list.");

	assert!(empty.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FAQRANK_PG_DSN to run."]
async fn knowledge_base_round_trip() {
	let Some(base_dsn) = faqrank_testkit::env_dsn() else {
		eprintln!("Skipping knowledge_base_round_trip; set FAQRANK_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let kb = KnowledgeBase {
		kb_id: "kb1".to_string(),
		tenant_id: "tenant_a".to_string(),
		name: "Support".to_string(),
		kb_type: "faq".to_string(),
		settings: json!({ "answer_format": "plain" }),
		created_at: OffsetDateTime::UNIX_EPOCH,
		updated_at: OffsetDateTime::UNIX_EPOCH,
	};

	queries::insert_knowledge_base(&db, &kb).await.expect("Failed to insert knowledge base.");

	let fetched = queries::fetch_knowledge_base(&db, "tenant_a", "kb1")
		.await
		.expect("Failed to fetch knowledge base.")
		.expect("Knowledge base should exist.");

	assert_eq!(fetched.name, "Support");
	assert_eq!(fetched.kb_type, "faq");
	assert_eq!(fetched.settings, json!({ "answer_format": "plain" }));

	let missing = queries::fetch_knowledge_base(&db, "tenant_b", "kb1")
		.await
		.expect("Failed to fetch knowledge base.");

	assert!(missing.is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
