use crate::domain::cell::SheetTable;
use crate::domain::chart::{ChartKind, ChartSpec};
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

const DIGEST_ROWS_PER_SHEET: usize = 5;

pub struct ChartSuggestionUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ChartSuggestionUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Asks the configured model for chart suggestions over the given
    /// tables. The model reply is untrusted: it is cleaned, parsed and
    /// shape-validated before anything reaches the caller, and suggestions
    /// that fail validation are dropped individually.
    pub async fn suggest(
        &self,
        tables: &[SheetTable],
        config: &LLMConfig,
        instruction: Option<&str>,
        max_suggestions: usize,
    ) -> Result<Vec<ChartSpec>> {
        if tables.is_empty() {
            return Ok(Vec::new());
        }

        let system_prompt = build_system_prompt();
        let user_prompt = build_user_prompt(tables, instruction);

        let raw = self
            .llm_client
            .generate(config, &system_prompt, &user_prompt)
            .await?;

        let cleaned = clean_llm_response(&raw);
        let payload = extract_json_payload(&cleaned);

        let suggestions = validate_suggestions(&payload, max_suggestions);
        info!(
            suggestions = suggestions.len(),
            "Validated AI chart suggestions"
        );

        Ok(suggestions)
    }
}

fn build_system_prompt() -> String {
    "You are a data visualization assistant. Given spreadsheet tables, propose charts. \
     Reply with ONLY a JSON array; each element must be an object with keys \
     \"type\" (one of \"bar\", \"line\", \"pie\"), \"title\" (string), \
     \"labels\" (array of strings), \"values\" (array of numbers, same length as labels) \
     and \"source_sheet\" (the sheet the data came from). No prose, no markdown."
        .to_string()
}

fn build_user_prompt(tables: &[SheetTable], instruction: Option<&str>) -> String {
    let mut prompt = String::from("Tables:\n");
    for table in tables {
        let columns: Vec<&str> = table
            .rows
            .first()
            .map(|row| row.columns().collect())
            .unwrap_or_default();

        prompt.push_str(&format!(
            "Sheet {:?} with columns [{}]\n",
            table.sheet_name,
            columns.join(", ")
        ));

        for row in table.rows.iter().skip(1).take(DIGEST_ROWS_PER_SHEET) {
            let fields: Vec<String> = columns
                .iter()
                .map(|&column| row.get(column).unwrap_or("").to_string())
                .collect();
            prompt.push_str(&format!("  {}\n", fields.join(" | ")));
        }
    }

    if let Some(instruction) = instruction {
        prompt.push_str(&format!("\nUser request: {}\n", instruction));
    }

    prompt
}

/// Pulls a JSON payload out of a model reply that may be wrapped in a
/// chat-completion envelope or a markdown code fence.
fn extract_json_payload(output: &str) -> String {
    let trimmed = output.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(content) = value
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
        {
            return strip_code_fence(content);
        }
        return trimmed.to_string();
    }
    strip_code_fence(trimmed)
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

/// Validates the untrusted suggestion payload.
///
/// Kept suggestions satisfy the ChartSpec invariants: known chart type,
/// non-empty parallel series, finite values. Labels may arrive as strings
/// or numbers; values must be JSON numbers. Arrays are truncated to the
/// shorter length and invalid points are dropped pairwise.
fn validate_suggestions(payload: &str, max_suggestions: usize) -> Vec<ChartSpec> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(payload) else {
        warn!("AI suggestion payload was not a JSON array");
        return Vec::new();
    };

    let mut charts = Vec::new();
    for item in items {
        if charts.len() >= max_suggestions {
            break;
        }
        if let Some(chart) = validate_suggestion(&item) {
            charts.push(chart);
        }
    }
    charts
}

fn validate_suggestion(item: &Value) -> Option<ChartSpec> {
    let chart_type = ChartKind::parse(item.get("type")?.as_str()?)?;

    let raw_labels = item.get("labels")?.as_array()?;
    let raw_values = item.get("values")?.as_array()?;

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (raw_label, raw_value) in raw_labels.iter().zip(raw_values.iter()) {
        let label = match raw_label {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        if label.is_empty() {
            continue;
        }
        let Some(value) = raw_value.as_f64().filter(|v| v.is_finite()) else {
            continue;
        };
        labels.push(label);
        values.push(value);
    }

    if labels.is_empty() {
        return None;
    }

    let source_sheet = item
        .get("source_sheet")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let title = item
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .unwrap_or_else(|| format!("Gráfico sugerido ({})", chart_type.as_str()));

    Some(ChartSpec {
        chart_type,
        title,
        labels,
        values,
        source_sheet,
    })
}
