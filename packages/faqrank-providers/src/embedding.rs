use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

use faqrank_config::EmbeddingProviderConfig;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
	#[serde(default)]
	index: Option<usize>,
	embedding: Vec<f32>,
}

/// Embeds `texts` through an OpenAI-compatible endpoint. Vectors come
/// back in input order regardless of how the provider orders its
/// response items.
pub async fn embed(cfg: &EmbeddingProviderConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::request_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let parsed: EmbeddingResponse = res.error_for_status()?.json().await?;

	order_vectors(parsed, texts.len())
}

fn order_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
	if response.data.len() != expected {
		return Err(eyre::eyre!(
			"Embedding response returned {} vectors for {expected} inputs.",
			response.data.len()
		));
	}

	let mut rows: Vec<(usize, Vec<f32>)> = response
		.data
		.into_iter()
		.enumerate()
		.map(|(fallback, row)| (row.index.unwrap_or(fallback), row.embedding))
		.collect();

	rows.sort_by_key(|(index, _)| *index);

	Ok(rows.into_iter().map(|(_, vec)| vec).collect())
}
