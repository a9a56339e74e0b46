use anyhow::{Context, Result};
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::scoring::{validate_scoring, ScoringConfig};

/// Prompt with a message and return the trimmed reply. End of input reads as empty.
fn prompt(input: &mut impl BufRead, output: &mut impl Write, message: &str) -> Result<String> {
    write!(output, "{}", message).context("Failed to write prompt")?;
    output.flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read input")?;
    Ok(line.trim().to_string())
}

/// Prompt for a number in [0, 1] until one is given. Empty input keeps the default.
fn prompt_unit(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
    default: f64,
) -> Result<f64> {
    loop {
        let reply = prompt(input, output, &format!("{} [{}]: ", message, default))?;
        if reply.is_empty() {
            return Ok(default);
        }
        match reply.parse::<f64>() {
            Ok(v) if (0.0..=1.0).contains(&v) => return Ok(v),
            Ok(_) => writeln!(output, "  Invalid: must be between 0 and 1. Try again.")?,
            Err(_) => writeln!(output, "  Invalid: must be a number. Try again.")?,
        }
    }
}

/// Ask for the criterion weights and confidence thresholds, re-asking the
/// whole set until it validates.
pub fn prompt_scoring(input: &mut impl BufRead, output: &mut impl Write) -> Result<ScoringConfig> {
    let defaults = ScoringConfig::default();

    loop {
        let mut scoring = defaults.clone();

        writeln!(output)?;
        writeln!(output, "Criterion weights (must sum to 1.0):")?;
        let weights = &mut scoring.weights;
        let current = defaults.weights;
        weights.mathematical =
            prompt_unit(input, output, "  Mathematical correctness", current.mathematical)?;
        weights.conceptual =
            prompt_unit(input, output, "  Conceptual soundness", current.conceptual)?;
        weights.options = prompt_unit(input, output, "  Option plausibility", current.options)?;
        weights.difficulty =
            prompt_unit(input, output, "  Difficulty appropriateness", current.difficulty)?;

        writeln!(output)?;
        writeln!(output, "Confidence thresholds:")?;
        let thresholds = defaults.confidence;
        scoring.confidence.high =
            prompt_unit(input, output, "  High at or above", thresholds.high)?;
        scoring.confidence.medium =
            prompt_unit(input, output, "  Medium at or above", thresholds.medium)?;

        match validate_scoring(&scoring) {
            Ok(()) => return Ok(scoring),
            Err(errors) => {
                writeln!(output)?;
                for error in errors {
                    writeln!(output, "  Invalid: {}", error)?;
                }
                writeln!(output, "Let's try again.")?;
            }
        }
    }
}

/// Run the init wizard and write the config file.
///
/// Prompts only when `assume_yes` is false and stdin is a terminal; otherwise
/// writes the defaults. Refuses to overwrite an existing file unless `force`.
/// Returns the path written.
pub fn run_init_wizard(path: Option<PathBuf>, force: bool, assume_yes: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(path) => path,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let interactive = !assume_yes && std::io::stdin().is_terminal();
    let scoring = if interactive {
        println!("MCQ Accuracy Configuration");
        println!("==========================");
        println!("Press Enter to keep the value in brackets.");
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt_scoring(&mut stdin.lock(), &mut stdout.lock())?
    } else {
        ScoringConfig::default()
    };

    let config = Config {
        scoring: Some(scoring),
    };
    write_config(&config, &config_path)?;
    Ok(config_path)
}

/// Serialize a config as YAML, creating parent directories.
pub fn write_config(config: &Config, path: &Path) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}
