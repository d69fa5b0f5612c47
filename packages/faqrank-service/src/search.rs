use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use faqrank_domain::{
	faq::{CHUNK_TYPE_FAQ, KNOWLEDGE_BASE_TYPE_FAQ, MatchType},
	params::normalize_search_params,
	ranking,
	sanitize::sanitize_for_log,
};
use faqrank_storage::models::{Chunk, KnowledgeBase};

use crate::{Error, FaqService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FaqSearchRequest {
	pub tenant_id: String,
	pub knowledge_base_id: String,
	pub query_text: String,
	pub vector_threshold: f32,
	pub match_count: i32,
}

/// A scored chunk reference as the retrieval backend reports it.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
	pub chunk_id: Uuid,
	pub score: f32,
	pub match_type: MatchType,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FaqEntry {
	pub entry_id: Uuid,
	pub knowledge_base_id: String,
	pub question: String,
	pub answer: String,
	pub answer_format: String,
	pub source_name: Option<String>,
	pub score: f32,
	pub match_type: MatchType,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: time::OffsetDateTime,
}

/// Score and classification a search hit contributes to its entry.
/// The default (zero score, vector match) is what an entry keeps when
/// no hit claims its chunk.
#[derive(Debug, Clone, Copy, Default)]
struct ResultOverlay {
	score: f32,
	match_type: MatchType,
}

#[derive(Debug, thiserror::Error)]
enum EntryConstructionError {
	#[error("Malformed FAQ payload: {0}")]
	MalformedContent(#[from] serde_json::Error),
	#[error("FAQ payload is missing {0}.")]
	MissingField(&'static str),
}

#[derive(Debug, serde::Deserialize)]
struct FaqPayload {
	#[serde(default)]
	question: String,
	answer: String,
}

impl FaqService {
	/// Runs the FAQ retrieval pipeline: validate the knowledge base, query
	/// the retrieval backend, reconcile hits against stored chunks, and
	/// assemble ranked entries.
	///
	/// Hits whose chunk is disabled, non-FAQ, deleted, or malformed are
	/// dropped; the remaining entries come back sorted by score descending.
	pub async fn search_faq_entries(&self, req: FaqSearchRequest) -> Result<Vec<FaqEntry>> {
		let tenant_id = req.tenant_id.trim();
		let knowledge_base_id = req.knowledge_base_id.trim();

		if tenant_id.is_empty() || knowledge_base_id.is_empty() {
			return Err(Error::Validation {
				message: "tenant_id and knowledge_base_id are required.".to_string(),
			});
		}
		if req.query_text.trim().is_empty() {
			return Err(Error::Validation { message: "query_text is required.".to_string() });
		}

		let mut kb = self.validate_faq_knowledge_base(tenant_id, knowledge_base_id).await?;
		// Keyword matching stays off on this path; FAQ questions are short
		// and dense retrieval already covers them.
		let params = normalize_search_params(req.vector_threshold, req.match_count, true);

		debug!(
			tenant_id,
			knowledge_base_id,
			query = sanitize_for_log(&req.query_text).as_str(),
			vector_threshold = params.vector_threshold,
			match_count = params.match_count,
			"Searching FAQ entries."
		);

		let results = self
			.collaborators
			.engine
			.hybrid_search(tenant_id, knowledge_base_id, &req.query_text, params)
			.await
			.map_err(|err| Error::Search { message: err.to_string() })?;

		if results.is_empty() {
			return Ok(Vec::new());
		}

		let (chunk_ids, overlays) = index_results(&results);
		let chunks = self
			.collaborators
			.chunks
			.list_by_ids(tenant_id, &chunk_ids)
			.await
			.map_err(|err| Error::Repository { message: err.to_string() })?;

		kb.ensure_defaults();

		let answer_format = kb.answer_format().to_string();
		let source_name = kb.show_source().then(|| kb.name.clone());
		let mut entries = Vec::with_capacity(chunks.len());

		for chunk in &chunks {
			if chunk.chunk_type != CHUNK_TYPE_FAQ || !chunk.is_enabled {
				continue;
			}

			// A store may hand back rows beyond the requested ids; those
			// entries keep the default overlay.
			let overlay = overlays.get(&chunk.chunk_id).copied().unwrap_or_default();

			match chunk_to_faq_entry(chunk, overlay, &answer_format, source_name.as_deref()) {
				Ok(entry) => entries.push(entry),
				Err(err) => {
					warn!(chunk_id = %chunk.chunk_id, error = %err, "Skipping FAQ chunk.");
				},
			}
		}

		// Stable sort: equal scores keep assembly order.
		entries.sort_by(|a, b| ranking::by_score_desc(a.score, b.score));

		Ok(entries)
	}

	async fn validate_faq_knowledge_base(
		&self,
		tenant_id: &str,
		knowledge_base_id: &str,
	) -> Result<KnowledgeBase> {
		let kb = self
			.collaborators
			.knowledge_bases
			.fetch(tenant_id, knowledge_base_id)
			.await
			.map_err(|err| Error::Repository { message: err.to_string() })?;
		let Some(kb) = kb else {
			return Err(Error::NotFound {
				message: format!("Knowledge base {knowledge_base_id} does not exist."),
			});
		};

		if kb.kb_type != KNOWLEDGE_BASE_TYPE_FAQ {
			return Err(Error::Validation {
				message: format!("Knowledge base {knowledge_base_id} is not a FAQ knowledge base."),
			});
		}

		Ok(kb)
	}
}

/// Flattens search hits into the batch-fetch id list plus a score overlay
/// keyed by chunk id. Ids keep first-hit order; on a duplicate id the
/// overlay keeps the last hit.
fn index_results(results: &[SearchResult]) -> (Vec<Uuid>, HashMap<Uuid, ResultOverlay>) {
	let mut chunk_ids = Vec::with_capacity(results.len());
	let mut overlays = HashMap::with_capacity(results.len());

	for result in results {
		if overlays
			.insert(
				result.chunk_id,
				ResultOverlay { score: result.score, match_type: result.match_type },
			)
			.is_none()
		{
			chunk_ids.push(result.chunk_id);
		}
	}

	(chunk_ids, overlays)
}

fn chunk_to_faq_entry(
	chunk: &Chunk,
	overlay: ResultOverlay,
	answer_format: &str,
	source_name: Option<&str>,
) -> std::result::Result<FaqEntry, EntryConstructionError> {
	let payload: FaqPayload = serde_json::from_str(&chunk.content)?;

	if payload.question.trim().is_empty() {
		return Err(EntryConstructionError::MissingField("question"));
	}
	if payload.answer.trim().is_empty() {
		return Err(EntryConstructionError::MissingField("answer"));
	}

	Ok(FaqEntry {
		entry_id: chunk.chunk_id,
		knowledge_base_id: chunk.knowledge_base_id.clone(),
		question: payload.question,
		answer: payload.answer,
		answer_format: answer_format.to_string(),
		source_name: source_name.map(str::to_string),
		score: overlay.score,
		match_type: overlay.match_type,
		updated_at: chunk.updated_at,
	})
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;

	use super::*;

	fn hit(chunk_id: Uuid, score: f32) -> SearchResult {
		SearchResult { chunk_id, score, match_type: MatchType::Vector }
	}

	fn faq_chunk(content: &str) -> Chunk {
		Chunk {
			chunk_id: Uuid::new_v4(),
			tenant_id: "tenant1".to_string(),
			knowledge_base_id: "kb1".to_string(),
			chunk_type: CHUNK_TYPE_FAQ.to_string(),
			is_enabled: true,
			content: content.to_string(),
			created_at: OffsetDateTime::UNIX_EPOCH,
			updated_at: OffsetDateTime::UNIX_EPOCH,
		}
	}

	#[test]
	fn index_results_keeps_first_hit_order() {
		let a = Uuid::new_v4();
		let b = Uuid::new_v4();
		let c = Uuid::new_v4();
		let (chunk_ids, overlays) = index_results(&[hit(a, 0.9), hit(b, 0.8), hit(c, 0.7)]);

		assert_eq!(chunk_ids, vec![a, b, c]);
		assert_eq!(overlays.len(), 3);
		assert_eq!(overlays[&b].score, 0.8);
	}

	#[test]
	fn index_results_duplicate_id_keeps_last_overlay() {
		let a = Uuid::new_v4();
		let b = Uuid::new_v4();
		let (chunk_ids, overlays) = index_results(&[hit(a, 0.3), hit(b, 0.5), hit(a, 0.8)]);

		assert_eq!(chunk_ids, vec![a, b]);
		assert_eq!(overlays[&a].score, 0.8);
	}

	#[test]
	fn chunk_to_faq_entry_builds_from_payload() {
		let chunk = faq_chunk(r#"{"question":"How do I reset?","answer":"Use the reset form."}"#);
		let overlay = ResultOverlay { score: 0.91, match_type: MatchType::Vector };
		let entry = chunk_to_faq_entry(&chunk, overlay, "markdown", Some("Support"))
			.expect("entry should build");

		assert_eq!(entry.entry_id, chunk.chunk_id);
		assert_eq!(entry.question, "How do I reset?");
		assert_eq!(entry.answer, "Use the reset form.");
		assert_eq!(entry.answer_format, "markdown");
		assert_eq!(entry.source_name.as_deref(), Some("Support"));
		assert_eq!(entry.score, 0.91);
	}

	#[test]
	fn chunk_to_faq_entry_rejects_malformed_json() {
		let chunk = faq_chunk("not json at all");
		let overlay = ResultOverlay { score: 0.5, match_type: MatchType::Vector };

		assert!(matches!(
			chunk_to_faq_entry(&chunk, overlay, "markdown", None),
			Err(EntryConstructionError::MalformedContent(_))
		));
	}

	#[test]
	fn chunk_to_faq_entry_rejects_missing_question() {
		let chunk = faq_chunk(r#"{"answer":"An answer with no question."}"#);
		let overlay = ResultOverlay { score: 0.5, match_type: MatchType::Vector };

		assert!(matches!(
			chunk_to_faq_entry(&chunk, overlay, "markdown", None),
			Err(EntryConstructionError::MissingField("question"))
		));
	}

	#[test]
	fn chunk_to_faq_entry_rejects_missing_answer() {
		let chunk = faq_chunk(r#"{"question":"Where is the answer?"}"#);
		let overlay = ResultOverlay { score: 0.5, match_type: MatchType::Vector };

		assert!(matches!(
			chunk_to_faq_entry(&chunk, overlay, "markdown", None),
			Err(EntryConstructionError::MalformedContent(_))
		));
	}

	#[test]
	fn chunk_to_faq_entry_rejects_blank_answer() {
		let chunk = faq_chunk(r#"{"question":"Blank?","answer":"   "}"#);
		let overlay = ResultOverlay { score: 0.5, match_type: MatchType::Vector };

		assert!(matches!(
			chunk_to_faq_entry(&chunk, overlay, "markdown", None),
			Err(EntryConstructionError::MissingField("answer"))
		));
	}
}
