use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// Answer format applied when a knowledge base does not pin one.
pub const DEFAULT_ANSWER_FORMAT: &str = "markdown";

/// A stored content unit. The FAQ pipeline only reads these; `content`
/// holds a JSON question/answer payload when `chunk_type` is `"faq"`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Chunk {
	pub chunk_id: Uuid,
	pub tenant_id: String,
	pub knowledge_base_id: String,
	pub chunk_type: String,
	pub is_enabled: bool,
	pub content: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KnowledgeBase {
	pub kb_id: String,
	pub tenant_id: String,
	pub name: String,
	pub kb_type: String,
	pub settings: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

impl KnowledgeBase {
	/// Fills presentation defaults the settings payload omits. Idempotent;
	/// entry assembly relies on this having run once per request.
	pub fn ensure_defaults(&mut self) {
		if !self.settings.is_object() {
			self.settings = Value::Object(serde_json::Map::new());
		}

		let Some(settings) = self.settings.as_object_mut() else {
			return;
		};

		settings
			.entry("answer_format")
			.or_insert_with(|| Value::String(DEFAULT_ANSWER_FORMAT.to_string()));
		settings.entry("show_source").or_insert(Value::Bool(true));
	}

	pub fn answer_format(&self) -> &str {
		self.settings.get("answer_format").and_then(Value::as_str).unwrap_or(DEFAULT_ANSWER_FORMAT)
	}

	pub fn show_source(&self) -> bool {
		self.settings.get("show_source").and_then(Value::as_bool).unwrap_or(true)
	}
}
