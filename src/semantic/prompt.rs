use super::request::SemanticRequest;
use crate::error::Result;

pub const SYSTEM_PROMPT: &str = r#"You are a meticulous data quality reviewer.
You receive an automatically discovered schema, deterministic quality scores, and a sample of rows.
Judge whether the data makes sense semantically: implausible values, contradictory columns,
suspicious patterns, and anything the numeric checks cannot see.

Respond with a single JSON object and nothing else:
{
  "qualityScore": <0-100>,
  "logicalConsistency": <0-100>,
  "redFlags": ["..."],
  "insights": ["..."],
  "recommendations": ["..."],
  "reasoning": "..."
}"#;

/// Renders the user prompt for one validation request.
pub fn build_validation_prompt(request: &SemanticRequest) -> Result<String> {
    let schema = &request.schema;
    let scores = &request.scores;
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Dataset: {} rows, {} columns.\n",
        schema.total_rows, schema.total_columns
    ));
    prompt.push_str(&format!("\nSchema:\n{}\n", schema.summary));

    prompt.push_str(&format!(
        "\nDeterministic scores: overall {} (structural {}, statistical {}, anomaly {}), risk {}.\n",
        scores.overall, scores.structural, scores.statistical, scores.anomaly, scores.risk_level
    ));
    if scores.flags.is_empty() {
        prompt.push_str("No automated flags were raised.\n");
    } else {
        prompt.push_str("Automated flags:\n");
        for flag in &scores.flags {
            prompt.push_str(&format!("- [{}] {}\n", flag.severity, flag.message));
        }
    }

    prompt.push_str(&format!(
        "\nSample ({} of {} rows):\n{}\n",
        request.sample.len(),
        schema.total_rows,
        serde_json::to_string_pretty(&request.sample)?
    ));

    prompt.push_str("\nReturn only the JSON object described in your instructions.");
    Ok(prompt)
}
