use super::digest::{DatasetDigest, DigestStats};
use crate::error::Result;
use crate::profiling::value::format_float;

pub const SYSTEM_PROMPT: &str =
    "You are a data analyst AI. Answer concisely using only the provided data.";

const VISUALIZATION_KEYWORDS: [&str; 5] = ["visual", "chart", "graph", "plot", "draw"];
const PROMPT_SAMPLE_ROWS: usize = 5;
const PROMPT_TOP_VALUES: usize = 3;

/// True when the question asks for a chart rather than an answer.
pub fn wants_visualization(query: &str) -> bool {
    let query = query.to_lowercase();
    VISUALIZATION_KEYWORDS.iter().any(|k| query.contains(k))
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn statistics_block(digest: &DatasetDigest) -> String {
    let lines: Vec<String> = digest
        .columns
        .iter()
        .filter_map(|column| {
            let line = match column.stats.as_ref()? {
                DigestStats::Numeric(s) => format!(
                    "  • {}: {} values, Range: {} to {}, Average: {}, Sum: {}",
                    column.name,
                    s.count,
                    format_float(s.min),
                    format_float(s.max),
                    format_float(s.avg),
                    format_float(s.sum)
                ),
                DigestStats::Categorical(s) => {
                    let top = s
                        .top_values
                        .iter()
                        .take(PROMPT_TOP_VALUES)
                        .map(|t| format!("{} ({})", t.value, t.percentage))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("  • {}: {} unique values, Top: {top}", column.name, s.unique_count)
                }
            };
            Some(line)
        })
        .collect();

    if lines.is_empty() {
        "No statistics available".to_owned()
    } else {
        lines.join("\n")
    }
}

pub fn build_question_prompt(query: &str, digest: &DatasetDigest) -> Result<String> {
    let sample: Vec<_> = digest.sample.iter().take(PROMPT_SAMPLE_ROWS).collect();
    let mut prompt = String::new();

    prompt.push_str(&format!("**Question:** {query}\n\n"));
    prompt.push_str(&format!(
        "**Dataset:** {} - {} rows, {} columns\n",
        digest.name,
        group_thousands(digest.row_count),
        digest.columns.len()
    ));
    prompt.push_str(&format!(
        "**Columns:** {}\n\n",
        digest.column_names().collect::<Vec<_>>().join(", ")
    ));
    prompt.push_str(&format!(
        "**Statistics (from complete dataset):**\n{}\n\n",
        statistics_block(digest)
    ));
    prompt.push_str(&format!(
        "**Sample Data:**\n{}\n\n",
        serde_json::to_string_pretty(&sample)?
    ));
    prompt.push_str(
        "**Instructions:**\n\
         - Use EXACT numbers from statistics above\n\
         - Be concise - answer directly without lengthy explanations\n\
         - Use bullet points for clarity\n\
         - Format key numbers with **bold**\n\n\
         Answer the question:",
    );
    Ok(prompt)
}
