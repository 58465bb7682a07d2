//! Hedera Agent CLI
//!
//! Command-line host for the Hedera agent plugin. It lists the plugin's
//! actions, checks operator settings, reads balances and topic messages from
//! the mirror node, and runs any action end to end against an
//! OpenAI-compatible model.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use futures::future::try_join_all;
use hedera_agent_core::config::{LogFormat, LoggingConfig};
use hedera_agent_core::ledger::{DetailedTokenBalance, TimestampRange};
use hedera_agent_core::time::convert_timestamp_to_utc;
use hedera_agent_core::{AccountId, MirrorNodeClient, MirrorQueries, PluginConfig, TopicId};
use hedera_agent_plugin::prelude::*;
use hedera_agent_plugin::OpenAiGenerator;
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "~/.config/hedera-agent/config.yaml";

/// Hedera Agent CLI
#[derive(Parser, Debug)]
#[command(
    name = "hedera-agent",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line host for the Hedera agent plugin",
    long_about = "Run the Hedera agent plugin's natural-language actions, check operator \
                 settings and read balances and topic messages from the mirror node."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HEDERA_AGENT_CONFIG", default_value = DEFAULT_CONFIG)]
    config: String,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Main CLI commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the plugin's actions
    Actions,

    /// Validate the operator settings
    Check,

    /// Show the HBAR balance of an account
    Balance {
        /// Account id, the operator account otherwise
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Show the token balances of an account
    Tokens {
        /// Account id, the operator account otherwise
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Show the messages posted to a topic
    TopicMessages {
        /// Topic id
        topic: String,
    },

    /// Run one action through the model
    Run {
        /// Action name or simile
        #[arg(short, long)]
        action: String,

        /// User message the parameters are extracted from
        message: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Configuration management
    #[command(subcommand, alias = "cfg")]
    Config(ConfigCommands),
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Runtime backed by the CLI configuration and an OpenAI-compatible model
struct CliRuntime {
    config: PluginConfig,
    generator: OpenAiGenerator,
}

#[async_trait]
impl ObjectGenerator for CliRuntime {
    async fn generate_object(&self, context: &str, model: ModelClass) -> Result<Value> {
        if self.config.llm.api_key.is_none() {
            warn!("No OPENAI_API_KEY configured, the request may be rejected");
        }
        self.generator.generate_object(context, model).await
    }
}

impl AgentRuntime for CliRuntime {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.config.setting(key)
    }
}

/// Reply sink printing every message to stdout
struct PrintCallback;

#[async_trait]
impl HandlerCallback for PrintCallback {
    async fn send(&self, content: Content) -> Result<()> {
        println!("{}", content.text);
        if let Some(payload) = &content.payload {
            debug!(payload = %payload, "Action payload");
        }
        Ok(())
    }
}

/// Initialize logging from the configured level and format
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        logging.level.to_tracing_level()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(err) = installed {
        eprintln!("Failed to install logger: {}", err);
    }
}

fn load_config(path: &str) -> Result<PluginConfig> {
    let config = PluginConfig::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path))?;
    Ok(config.with_settings(|key| std::env::var(key).ok()))
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.logging, cli.verbose);

    debug!("Hedera Agent CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Actions => list_actions(),
        Commands::Check => check(&config)?,
        Commands::Balance { account } => balance(&config, account).await?,
        Commands::Tokens { account } => tokens(&config, account).await?,
        Commands::TopicMessages { topic } => topic_messages(&config, &topic).await?,
        Commands::Run {
            action,
            message,
            yes,
        } => run_action(config, &action, &message, yes).await?,
        Commands::Config(cmd) => handle_config_command(cmd, &cli.config, &config)?,
    }

    Ok(())
}

fn list_actions() {
    let plugin = HederaPlugin::new();
    println!("{} - {}", plugin.name(), plugin.description());
    for action in plugin.actions() {
        println!();
        println!("{}", action.name());
        println!("  {}", action.description());
        println!("  similes: {}", action.similes().join(", "));
    }
}

fn check(config: &PluginConfig) -> Result<()> {
    let missing = config.hedera.missing_keys();
    if !missing.is_empty() {
        bail!("Missing settings: {}", missing.join(", "));
    }
    let credentials = config.validate()?;
    println!(
        "Settings OK: account {} on {} ({} key)",
        credentials.account_id,
        credentials.network,
        credentials.private_key.key_type()
    );
    Ok(())
}

fn mirror(config: &PluginConfig) -> Result<MirrorNodeClient> {
    let network = config.hedera.network_type()?;
    Ok(MirrorNodeClient::from_config(&config.mirror, network)?)
}

fn account_or_operator(config: &PluginConfig, account: Option<String>) -> Result<AccountId> {
    let raw = account
        .or_else(|| config.hedera.account_id.clone())
        .context("No account given and HEDERA_ACCOUNT_ID is not set")?;
    Ok(raw.parse()?)
}

async fn balance(config: &PluginConfig, account: Option<String>) -> Result<()> {
    let account = account_or_operator(config, account)?;
    let mirror = mirror(config)?;
    info!(account = %account, mirror = mirror.base_url(), "Fetching HBAR balance");

    let balance = mirror.hbar_balance(&account).await?;
    println!("Address {} has balance of {} HBAR", account, balance);
    Ok(())
}

async fn tokens(config: &PluginConfig, account: Option<String>) -> Result<()> {
    let account = account_or_operator(config, account)?;
    let mirror = mirror(config)?;

    let balances = mirror.account_token_balances(&account).await?;
    if balances.is_empty() {
        println!("Address {} does not have any token balances.", account);
        return Ok(());
    }
    let details = try_join_all(balances.iter().map(|b| mirror.token_details(&b.token_id))).await?;

    println!("Address {} has following token balances:", account);
    for (balance, details) in balances.iter().zip(details.iter()) {
        let detailed = DetailedTokenBalance::new(balance, details);
        println!(
            "{}: {} {} ({})",
            detailed.token_name,
            detailed.balance_in_display_unit,
            detailed.token_symbol,
            detailed.token_id
        );
    }
    Ok(())
}

async fn topic_messages(config: &PluginConfig, topic: &str) -> Result<()> {
    let topic: TopicId = topic.parse()?;
    let mirror = mirror(config)?;

    let messages = mirror
        .topic_messages(&topic, TimestampRange::default())
        .await?;
    if messages.is_empty() {
        println!("No messages found.");
        return Ok(());
    }
    for message in messages {
        println!("-----------------------");
        println!("Author: {}", message.payer_account_id);
        println!("Body: {}", message.message);
        println!(
            "Timestamp: {}",
            convert_timestamp_to_utc(&message.consensus_timestamp)?
        );
    }
    Ok(())
}

async fn run_action(config: PluginConfig, name: &str, text: &str, yes: bool) -> Result<()> {
    let plugin = HederaPlugin::with_ledgers(Arc::new(NetworkLedgerFactory::new(
        config.mirror.clone(),
    )));
    let action = plugin
        .find(name)
        .with_context(|| format!("Unknown action '{}'", name))?;

    if action.metadata().writes && !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} submits a transaction. Continue?", action.name()))
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let generator = OpenAiGenerator::new(config.llm.clone())?;
    info!(action = action.name(), model = generator.model(), "Running action");
    let runtime = CliRuntime { config, generator };

    let message = Memory::user(text);
    let mut state = State::for_agent("Hedera agent");
    state.push(message.clone());

    match plugin
        .dispatch(name, &runtime, &message, &mut state, Some(&PrintCallback))
        .await
    {
        Some(true) => Ok(()),
        Some(false) => bail!("Action {} failed", action.name()),
        None => bail!(
            "Missing settings: {}",
            runtime.config.hedera.missing_keys().join(", ")
        ),
    }
}

/// Handle config commands
fn handle_config_command(cmd: ConfigCommands, path: &str, config: &PluginConfig) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            let path = PathBuf::from(shellexpand::tilde(path).as_ref());
            if path.exists() && !force {
                bail!(
                    "Configuration already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let default = PluginConfig::default();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                default.save_to_json_file(&path)?;
            } else {
                default.save_to_yaml_file(&path)?;
            }
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigCommands::Show { json } => {
            let mut shown = config.clone();
            if shown.hedera.private_key.is_some() {
                shown.hedera.private_key = Some("<redacted>".into());
            }
            if shown.llm.api_key.is_some() {
                shown.llm.api_key = Some("<redacted>".into());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", serde_yaml::to_string(&shown)?);
            }
        }
    }
    Ok(())
}
