//! TemplatePromoter CLI entry point

use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use templatepromoter::cli::{Cli, Command, TemplateArgs};
use templatepromoter::config::Config;
use templatepromoter::{Artifact, ArtifactManifest, Promotion, VERSION_ENV, VersionSources, resolve_version};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (WARN, keeps stdout/stderr quiet)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Build a promotion from CLI arguments, falling back to config values
fn build_promotion(config: &Config, template: TemplateArgs, into: Option<PathBuf>) -> Result<Promotion> {
    let source = template
        .source
        .or_else(|| config.promotion.source.clone())
        .ok_or_else(|| eyre!("No template given: pass SOURCE or set promotion.source in the config file"))?;

    let version = resolve_version(&VersionSources {
        explicit: template.project_version,
        env: std::env::var(VERSION_ENV).ok(),
        config: config.promotion.version.clone(),
        properties_file: config.promotion.version_file.clone(),
        properties_key: config.promotion.version_key.clone(),
    })
    .context("Failed to resolve project version")?;

    let into = into.unwrap_or_else(|| config.promotion.into.clone());
    Ok(Promotion::new(source, into, version))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Promote { template, into } => {
            let promotion = build_promotion(&config, template, into)?;
            let outcome = promotion.run().context("Promotion failed")?;
            let note = if outcome.unchanged { " (unchanged)" } else { "" };
            println!(
                "{} Promoted {} -> {} [{} {}]{}",
                "✓".green(),
                promotion.source.display(),
                outcome.output.display().to_string().cyan(),
                outcome.replacements,
                if outcome.replacements == 1 { "replacement" } else { "replacements" },
                note.dimmed()
            );
        }
        Command::Render { template } => {
            let promotion = build_promotion(&config, template, None)?;
            let rendered = promotion.render().context("Render failed")?;
            print!("{}", rendered);
        }
        Command::Check { template, into } => {
            let promotion = build_promotion(&config, template, into)?;
            let output = promotion.output_path()?;
            let status = promotion.check().context("Check failed")?;
            if !status.is_up_to_date() {
                eprintln!(
                    "{} {} is {} (version {})",
                    "✗".red(),
                    output.display(),
                    status.to_string().yellow(),
                    promotion.version
                );
                std::process::exit(1);
            }
            println!("{} {} is {}", "✓".green(), output.display(), status);
        }
        Command::Publish {
            template,
            into,
            category,
            manifest,
        } => {
            let promotion = build_promotion(&config, template, into)?;
            let outcome = promotion.run().context("Promotion failed")?;

            let category = category.unwrap_or_else(|| config.publish.category.clone());
            let manifest_path = manifest.unwrap_or_else(|| config.publish.manifest.clone());

            let mut manifest = ArtifactManifest::load(&manifest_path)?;
            manifest.publish(Artifact::describe(&category, &outcome.output, &promotion.version)?);
            manifest.save(&manifest_path)?;

            info!(category = %category, manifest = %manifest_path.display(), "Publish complete");
            println!(
                "{} Published {} as {}",
                "✓".green(),
                outcome.output.display(),
                category.cyan()
            );
        }
        Command::Resolve { category, manifest } => {
            let manifest_path = manifest.unwrap_or_else(|| config.publish.manifest.clone());
            let manifest = ArtifactManifest::load(&manifest_path)?;
            let artifact = manifest.resolve(&category)?;
            println!("{}", artifact.path.display());
        }
    }

    Ok(())
}
