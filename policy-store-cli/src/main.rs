//! Policy Store - command line entry point
//!
//! Inspects and replaces a policy object stored in an S3-compatible bucket.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use policy_store_adapter::{Adapter, AdapterConfig, PolicyStorageAdapter};
use policy_store_core::{decode_text, encode_model, CsvLineCodec, PolicyModel};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "policy-store", version, about = "Load and store access-control policies in S3")]
struct Cli {
    /// Object storage endpoint as host[:port]
    #[arg(long, env = "POLICY_S3_ENDPOINT", default_value = "localhost:9000")]
    endpoint: String,

    #[arg(long, env = "POLICY_S3_ACCESS_KEY", default_value = "", hide_env_values = true)]
    access_key: String,

    #[arg(long, env = "POLICY_S3_SECRET_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,

    /// Use HTTPS
    #[arg(long, env = "POLICY_S3_SECURE")]
    secure: bool,

    #[arg(long, env = "POLICY_S3_REGION", default_value = "us-east-1")]
    region: String,

    /// Bucket holding the policy object
    #[arg(long, env = "POLICY_S3_BUCKET", default_value = "casbin-bucket")]
    bucket: String,

    /// Key of the policy object
    #[arg(long, env = "POLICY_S3_OBJECT", default_value = "policy.csv")]
    object: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect and verify that the bucket exists
    Check,
    /// Print the stored policy
    Show {
        /// Print the model as JSON instead of policy lines
        #[arg(long)]
        json: bool,
    },
    /// Replace the stored policy with the rules of a local policy file
    Push { file: PathBuf },
    /// Write the stored policy to a local policy file
    Pull { file: PathBuf },
}

impl Cli {
    fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            endpoint: self.endpoint.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            secure: self.secure,
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            object_key: self.object.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `show` output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,policy_store=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.adapter_config();

    tracing::info!(
        "Connecting to {} (bucket: {}, object: {})",
        config.endpoint,
        config.bucket,
        config.object_key
    );
    let adapter = PolicyStorageAdapter::connect(config)
        .await
        .context("Failed to create policy adapter")?;

    match cli.command {
        Command::Check => {
            println!("bucket {} is reachable", adapter.bucket());
        }
        Command::Show { json } => {
            let model = load(&adapter).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            } else {
                print!("{}", encode_model(&CsvLineCodec::new(), &model)?);
            }
        }
        Command::Push { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut model = PolicyModel::new();
            decode_text(&CsvLineCodec::new(), &text, &mut model);

            adapter
                .save_policy(&model)
                .await
                .context("Failed to save policy")?;
            tracing::info!("Pushed {} rules from {}", model.rule_count(), file.display());
        }
        Command::Pull { file } => {
            let model = load(&adapter).await?;
            let text = encode_model(&CsvLineCodec::new(), &model)?;
            tokio::fs::write(&file, text)
                .await
                .with_context(|| format!("Failed to write {}", file.display()))?;
            tracing::info!("Pulled {} rules into {}", model.rule_count(), file.display());
        }
    }

    Ok(())
}

async fn load(adapter: &PolicyStorageAdapter) -> Result<PolicyModel> {
    let mut model = PolicyModel::new();
    adapter
        .load_policy(&mut model)
        .await
        .context("Failed to load policy")?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_build_adapter_config() {
        let cli = Cli::try_parse_from([
            "policy-store",
            "--endpoint",
            "minio:9000",
            "--secure",
            "--bucket",
            "policies",
            "--object",
            "rbac.csv",
            "push",
            "rbac_policy.csv",
        ])
        .unwrap();

        let config = cli.adapter_config();
        assert_eq!(config.endpoint, "minio:9000");
        assert!(config.secure);
        assert_eq!(config.bucket, "policies");
        assert_eq!(config.object_key, "rbac.csv");
        assert!(matches!(cli.command, Command::Push { .. }));
    }
}
