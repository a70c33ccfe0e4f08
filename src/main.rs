use clap::{Parser, Subcommand};
use std::sync::Arc;

use hisaab_bot::application::errors::BotError;
use hisaab_bot::application::extraction::Extractor;
use hisaab_bot::application::messaging::MessageDispatcher;
use hisaab_bot::domain::entities::ChannelKind;
use hisaab_bot::infrastructure::adapters::console::ConsoleAdapter;
use hisaab_bot::infrastructure::adapters::telegram::TelegramAdapter;
use hisaab_bot::infrastructure::adapters::whatsapp;
use hisaab_bot::infrastructure::config::Config;
use hisaab_bot::infrastructure::ledger::{connector_from_config, LedgerHandle};

#[derive(Parser)]
#[command(name = "hisaab-bot")]
#[command(about = "Chat bot that records expenses to a ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the configured channel
    Run,
    /// Start the WhatsApp webhook server
    Serve,
    /// Read expenses from stdin
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

enum Frontend {
    Auto,
    Webhook,
    Console,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, Frontend::Auto),
        Commands::Serve => run_bot(&cli.config, Frontend::Webhook),
        Commands::Console => run_bot(&cli.config, Frontend::Console),
        Commands::Version => {
            println!("hisaab-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str) -> Config {
    if std::path::Path::new(path).exists() {
        match Config::load(path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str, frontend: Frontend) -> Result<(), BotError> {
    let config = load_config(config_path);
    tracing::info!("Starting {} ({:?} mode)", config.bot.name, config.bot.mode);

    let missing = config.missing_ledger_fields();
    if !missing.is_empty() {
        tracing::warn!(
            "Ledger not configured (missing {}), expenses will be understood but not saved",
            missing.join(", ")
        );
    }

    let channel = match frontend {
        Frontend::Console => ChannelKind::Console,
        Frontend::Webhook => ChannelKind::WhatsApp,
        Frontend::Auto => config.primary_channel()?,
    };

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(async {
        let ledger = Arc::new(LedgerHandle::new(connector_from_config(&config.ledger)));
        if let Err(e) = ledger.init().await {
            tracing::warn!("Ledger connect deferred: {}", e);
        }

        let dispatcher = Arc::new(MessageDispatcher::new(
            Extractor::new(config.category_rules()),
            ledger,
            config.dispatch_config(),
        ));

        match channel {
            ChannelKind::WhatsApp => run_webhook(&config, dispatcher).await,
            ChannelKind::Telegram => {
                let token = config.telegram_token().unwrap_or_default();
                Arc::new(TelegramAdapter::new(token)).run(dispatcher).await;
                Ok(())
            }
            _ => ConsoleAdapter::new().run(dispatcher).await,
        }
    })
}

async fn run_webhook(config: &Config, dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
    let (listen, verify_token) = match &config.adapters.whatsapp {
        Some(w) => (w.listen.clone(), w.verify_token.clone().unwrap_or_default()),
        None => ("0.0.0.0:5000".to_string(), String::new()),
    };
    if verify_token.is_empty() {
        tracing::warn!("No WhatsApp verify token set, webhook verification will be rejected");
    }

    whatsapp::serve(&listen, whatsapp::router(dispatcher, verify_token)).await
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
