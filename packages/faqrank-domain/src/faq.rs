/// Type tag carried by chunks that hold a question/answer payload. Chunks
/// with any other tag never surface through the FAQ pipeline.
pub const CHUNK_TYPE_FAQ: &str = "faq";
pub const CHUNK_TYPE_TEXT: &str = "text";

/// A knowledge base must carry this type to answer FAQ queries.
pub const KNOWLEDGE_BASE_TYPE_FAQ: &str = "faq";

/// Which retrieval mechanism produced a search hit.
///
/// `Vector` is the default the entry assembler seeds before the score
/// overlay runs; the keyword-disabled entry point only ever emits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
	#[default]
	Vector,
	Keywords,
	Hybrid,
}

impl MatchType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Vector => "vector",
			Self::Keywords => "keywords",
			Self::Hybrid => "hybrid",
		}
	}
}
