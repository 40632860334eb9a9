//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use montage_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration and storage access
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            config.storage.s3.secret_key = mask_secret(&config.storage.s3.secret_key);
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => {
            let config = match super::load_config(config_path) {
                Ok(config) => config,
                Err(e) => {
                    output::print_error(&format!("Configuration invalid: {}", e));
                    return Err(e);
                }
            };

            output::print_success(&format!("Configuration '{}' is valid", config_path));
            output::print_kv("Provider", &config.storage.provider);
            output::print_kv("Video bucket", &config.storage.video_bucket);
            output::print_kv("Music bucket", &config.storage.music_bucket);
            output::print_kv("Logging", &format!("{} ({})", config.logging.level, config.logging.format));
            if config.storage.provider == "s3" {
                output::print_kv("S3 region", &config.storage.s3.region);
                output::print_kv("S3 access key", &mask_secret(&config.storage.s3.access_key));
            }

            let storage = montage_storage::StorageManager::from_config(&config.storage).await?;
            let mut health: Vec<_> = storage.health_check_all().await.into_iter().collect();
            health.sort_by_key(|(kind, _)| kind.as_str());
            for (kind, healthy) in health {
                if healthy {
                    output::print_success(&format!("{} bucket reachable", kind));
                } else {
                    output::print_warning(&format!("{} bucket unreachable", kind));
                }
            }
        }
        ConfigCommand::Generate { output: out_path } => {
            let default_config = include_str!("../../../../config/default.toml");

            if let Some(parent) = std::path::Path::new(out_path).parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::internal(format!("Failed to create dir: {}", e)))?;
            }

            tokio::fs::write(out_path, default_config)
                .await
                .map_err(|e| AppError::internal(format!("Failed to write config: {}", e)))?;

            output::print_success(&format!("Default config written to '{}'", out_path));
        }
    }

    Ok(())
}

/// Mask a credential for display, keeping the first four characters.
fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        return "****".to_string();
    }
    format!("{}****", visible)
}
