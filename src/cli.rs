use anyhow::Result;
use clap::{Parser, Subcommand};
use datalens::ai::OpenAiBackend;
use datalens::assistant::DataAssistant;
use datalens::config::{AppSettings, get_config_path, load_app_config, save_app_config};
use datalens::profiling::discover_schema;
use datalens::quality::validate_table;
use datalens::semantic::{SemanticRequest, SemanticValidator};
use datalens::table::read_rows;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "datalens", about = "Schema discovery and data quality scoring")]
pub struct Cli {
    /// Also write logs to rotating files in the data directory
    #[arg(long, global = true)]
    pub log_to_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer column types and statistics
    Profile {
        /// JSON file holding an array of row objects
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Score data quality
    Validate {
        /// JSON file holding an array of row objects
        #[arg(short, long)]
        file: PathBuf,

        /// Ask the configured language model for a second opinion
        #[arg(long)]
        semantic: bool,
    },
    /// Ask a question about a dataset
    Ask {
        /// JSON file holding an array of row objects
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        question: String,

        /// Dataset name shown to the model. Defaults to the file stem.
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show the AI settings, updating and saving any that are given
    Config {
        /// Chat model used for reviews and questions
        #[arg(long)]
        model: Option<String>,

        /// Upper bound on one model round trip, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Turn the AI features on or off
        #[arg(long)]
        enabled: Option<bool>,
    },
}

pub async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Profile { file } => handle_profile(&file),
        Commands::Validate { file, semantic } => handle_validate(&file, semantic).await,
        Commands::Ask {
            file,
            question,
            name,
        } => handle_ask(&file, &question, name).await,
        Commands::Config {
            model,
            timeout_secs,
            enabled,
        } => handle_config(model, timeout_secs, enabled),
    }
}

#[expect(clippy::print_stdout)]
fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_profile(file: &Path) -> Result<()> {
    let rows = read_rows(file)?;
    print_json(&discover_schema(&rows))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOutput {
    schema: datalens::DataSchema,
    scores: datalens::ValidationScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic: Option<datalens::semantic::SemanticOpinion>,
}

async fn handle_validate(file: &Path, semantic: bool) -> Result<()> {
    let rows = read_rows(file)?;
    let schema = discover_schema(&rows);
    let scores = validate_table(&rows, &schema);

    let semantic = if semantic {
        let config = load_app_config().ai;
        let backend = OpenAiBackend::from_env(config.clone())?;
        let validator = SemanticValidator::from_config(Arc::new(backend), &config);
        let request = SemanticRequest::new(schema.clone(), scores.clone(), &rows);
        Some(validator.validate(&request).await)
    } else {
        None
    };

    print_json(&ValidateOutput {
        schema,
        scores,
        semantic,
    })
}

async fn handle_ask(file: &Path, question: &str, name: Option<String>) -> Result<()> {
    let rows = read_rows(file)?;
    let name = name.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Dataset".to_owned())
    });

    let config = load_app_config().ai;
    let backend = OpenAiBackend::from_env(config.clone())?;
    let assistant = DataAssistant::from_config(Arc::new(backend), &config);
    let reply = assistant.answer(question, &name, &rows).await?;
    print_json(&reply)
}

/// Applies the given overrides. Returns true when anything changed.
fn apply_overrides(
    settings: &mut AppSettings,
    model: Option<String>,
    timeout_secs: Option<u64>,
    enabled: Option<bool>,
) -> bool {
    let before = settings.clone();
    if let Some(model) = model {
        settings.ai.model = model;
    }
    if let Some(secs) = timeout_secs {
        settings.ai.timeout_secs = secs.max(1);
    }
    if let Some(enabled) = enabled {
        settings.ai.enabled = enabled;
    }
    *settings != before
}

fn handle_config(
    model: Option<String>,
    timeout_secs: Option<u64>,
    enabled: Option<bool>,
) -> Result<()> {
    let mut settings = load_app_config();
    if apply_overrides(&mut settings, model, timeout_secs, enabled) {
        save_app_config(&settings)?;
        tracing::info!(path = %get_config_path()?.display(), "Settings saved");
    }
    print_json(&settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_flags() {
        let cli = Cli::try_parse_from(["datalens", "validate", "--file", "rows.json", "--semantic"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Commands::Validate { semantic: true, .. }
        ));
    }

    #[test]
    fn test_parse_config_overrides() {
        let cli = Cli::try_parse_from([
            "datalens",
            "config",
            "--model",
            "gpt-4o-mini",
            "--enabled",
            "false",
        ])
        .expect("parses");
        assert!(matches!(
            cli.command,
            Commands::Config {
                model: Some(_),
                timeout_secs: None,
                enabled: Some(false),
            }
        ));
    }

    #[test]
    fn test_overrides_only_report_real_changes() {
        let mut settings = AppSettings::default();
        assert!(!apply_overrides(&mut settings, None, None, None));
        assert!(!apply_overrides(&mut settings, Some("gpt-4o".to_owned()), None, None));

        assert!(apply_overrides(&mut settings, None, Some(0), Some(false)));
        assert_eq!(settings.ai.timeout_secs, 1);
        assert!(!settings.ai.enabled);
    }
}
