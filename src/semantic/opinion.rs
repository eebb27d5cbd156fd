use crate::error::{DatalensError, Result};
use crate::profiling::value::{cell_text, parse_float};
use crate::quality::{Severity, ValidationScore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The reviewer's verdict on a table.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SemanticOpinion {
    /// 0-100
    pub quality_score: u8,
    /// 0-100
    pub logical_consistency: u8,
    pub red_flags: Vec<String>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub reasoning: String,
    /// Set when the opinion was synthesized locally because the reviewer
    /// could not be consulted.
    #[serde(default)]
    pub fallback: bool,
}

impl SemanticOpinion {
    /// Opinion used when the reviewer is unavailable: it mirrors the
    /// deterministic score and carries its critical findings forward.
    pub fn fallback(scores: &ValidationScore, reason: &str) -> Self {
        Self {
            quality_score: scores.overall,
            logical_consistency: scores.overall,
            red_flags: scores
                .flags_with(Severity::Critical)
                .map(|f| f.message.clone())
                .collect(),
            insights: Vec::new(),
            recommendations: Vec::new(),
            reasoning: format!(
                "Semantic validation was unavailable ({reason}). The score reflects the \
                 deterministic structural, statistical and anomaly checks only."
            ),
            fallback: true,
        }
    }
}

/// Lenient wire shape: models drift on types, so everything is optional.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawOpinion {
    quality_score: Option<Value>,
    logical_consistency: Option<Value>,
    red_flags: Vec<Value>,
    insights: Vec<Value>,
    recommendations: Vec<Value>,
    reasoning: Option<String>,
}

fn score_value(value: Option<&Value>) -> Option<u8> {
    let raw = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    }?;
    raw.is_finite()
        .then(|| (raw.clamp(0.0, 100.0) + 0.5).floor() as u8)
}

fn text_items(values: Vec<Value>) -> Vec<String> {
    values
        .iter()
        .map(|v| cell_text(v).into_owned())
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Locates the JSON payload in a model reply: a fenced ```json block if there
/// is one, else any fenced block that looks like an object, else the span from
/// the first `{` to the last `}`.
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = text.get(start + "```json".len()..)?;
        let end = body.find("```").unwrap_or(body.len());
        return body.get(..end).map(str::trim).filter(|s| !s.is_empty());
    }

    if let Some(start) = text.find("```") {
        let body = text.get(start + 3..)?;
        if let Some(end) = body.find("```") {
            let block = body.get(..end)?;
            // Skip an info string such as "JSON" on the opening fence line.
            let block = block
                .find('{')
                .and_then(|brace| block.get(brace..))
                .map(str::trim);
            if block.is_some_and(|b| b.ends_with('}')) {
                return block;
            }
        }
    }

    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| text.get(open..=close)).flatten()
}

/// Parses a model reply into an opinion. Missing scores default to the
/// deterministic overall score; missing lists default to empty.
pub fn parse_opinion(text: &str, scores: &ValidationScore) -> Result<SemanticOpinion> {
    let block = extract_json_block(text)
        .ok_or_else(|| DatalensError::Parse("No JSON object found in model reply".to_owned()))?;
    let raw: RawOpinion = serde_json::from_str(block)?;

    let quality_score = score_value(raw.quality_score.as_ref()).unwrap_or(scores.overall);
    Ok(SemanticOpinion {
        quality_score,
        logical_consistency: score_value(raw.logical_consistency.as_ref())
            .unwrap_or(quality_score),
        red_flags: text_items(raw.red_flags),
        insights: text_items(raw.insights),
        recommendations: text_items(raw.recommendations),
        reasoning: raw.reasoning.unwrap_or_default(),
        fallback: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{RiskLevel, ValidationFlag};

    fn scores(overall: u8) -> ValidationScore {
        ValidationScore {
            structural: overall,
            statistical: overall,
            anomaly: overall,
            overall,
            risk_level: RiskLevel::Medium,
            flags: vec![
                ValidationFlag::critical("Column 'email' is missing 60% of its values", 12.0)
                    .for_column("email"),
                ValidationFlag::info("2 of 40 rows are exact duplicates (5.0%)", 5.0),
            ],
        }
    }

    #[test]
    fn test_extract_fenced_json() {
        let reply = "Here you go:\n```json\n{\"qualityScore\": 80}\n```\nThanks";
        assert_eq!(extract_json_block(reply), Some("{\"qualityScore\": 80}"));
    }

    #[test]
    fn test_extract_bare_object_from_prose() {
        let reply = "Verdict: {\"qualityScore\": 70, \"insights\": [\"ok\"]} end.";
        assert_eq!(
            extract_json_block(reply),
            Some("{\"qualityScore\": 70, \"insights\": [\"ok\"]}")
        );
        assert_eq!(extract_json_block("no braces here"), None);
        assert_eq!(extract_json_block("} backwards {"), None);
    }

    #[test]
    fn test_parse_full_opinion() {
        let reply = r#"```json
{
  "qualityScore": 72,
  "logicalConsistency": 88.6,
  "redFlags": ["Ages above 150"],
  "insights": ["Sales peak in Q4"],
  "recommendations": ["Cap age at 120"],
  "reasoning": "Mostly consistent."
}
```"#;
        let opinion = parse_opinion(reply, &scores(60)).expect("parses");
        assert_eq!(opinion.quality_score, 72);
        assert_eq!(opinion.logical_consistency, 89);
        assert_eq!(opinion.red_flags, ["Ages above 150"]);
        assert_eq!(opinion.reasoning, "Mostly consistent.");
        assert!(!opinion.fallback);
    }

    #[test]
    fn test_parse_fills_gaps_and_clamps() {
        let opinion = parse_opinion(r#"{"qualityScore": 140}"#, &scores(60)).expect("parses");
        assert_eq!(opinion.quality_score, 100);
        assert_eq!(opinion.logical_consistency, 100);
        assert!(opinion.insights.is_empty());

        let opinion = parse_opinion(r#"{"qualityScore": "-5"}"#, &scores(60)).expect("parses");
        assert_eq!(opinion.quality_score, 0);

        let opinion = parse_opinion("{}", &scores(60)).expect("parses");
        assert_eq!(opinion.quality_score, 60);
    }

    #[test]
    fn test_parse_rejects_prose_and_broken_json() {
        assert!(matches!(
            parse_opinion("The data looks fine.", &scores(60)),
            Err(DatalensError::Parse(_))
        ));
        assert!(matches!(
            parse_opinion("{\"qualityScore\": 80,", &scores(60)),
            Err(DatalensError::Parse(_))
        ));
    }

    #[test]
    fn test_fallback_mirrors_deterministic_score() {
        let opinion = SemanticOpinion::fallback(&scores(64), "request timed out");
        assert_eq!(opinion.quality_score, 64);
        assert!(opinion.fallback);
        assert!(opinion.reasoning.contains("unavailable"));
        assert_eq!(opinion.red_flags.len(), 1);
    }
}
