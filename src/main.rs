use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use affil::config::keys;
use affil::models::{AFFILIATE_PRODUCT_TYPE, AFFILIATE_VOCABULARY};
use affil::utils::{ensure_database_directory, get_database_path, parse_list};
use affil::{
    Database, EnvCredentials, FallbackList, OpenAiClientBuilder, Pipeline, PipelineConfig,
    ProductId, TagId,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// affil - affiliate product suggestions for article text
#[derive(Parser)]
#[command(name = "affil")]
#[command(about = "Suggest affiliate products for article text")]
#[command(version)]
struct Cli {
    /// Path to the catalog database (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Suggest products for CONTENT (or stdin)
    Suggest(SuggestCommand),
    /// Read or change pipeline settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage the fallback product list
    #[command(subcommand)]
    Fallback(FallbackCommand),
    /// Manage affiliate vocabulary tags
    #[command(subcommand)]
    Tag(TagCommand),
    /// Manage affiliate products
    #[command(subcommand)]
    Product(ProductCommand),
}

#[derive(Args)]
struct SuggestCommand {
    /// Article text; read from stdin when omitted
    #[arg(value_name = "CONTENT")]
    content: Option<String>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Set a configuration value
    Set { key: String, value: String },
    /// Print all settings and validate them
    Show,
}

#[derive(Subcommand)]
enum FallbackCommand {
    /// Replace the fallback list (only the first five ids are kept)
    Set {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum TagCommand {
    /// Add a tag to the affiliate vocabulary
    Add { name: String },
}

#[derive(Subcommand)]
enum ProductCommand {
    /// Add an affiliate product
    Add {
        title: String,

        /// Comma-separated tag names (created if missing)
        #[arg(short, long, value_name = "TAGS")]
        tags: Option<String>,

        /// Store the product as unpublished
        #[arg(long)]
        unpublished: bool,
    },
}

/// Invalid input from the command line.
#[derive(Debug, Error)]
#[error("{0}")]
struct UsageError(String);

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "affil=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let exit_code = if e.downcast_ref::<UsageError>().is_some() {
            1
        } else {
            2
        };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let db = open_database(cli.db)?;

    match cli.command {
        Commands::Suggest(cmd) => handle_suggest(cmd, db),
        Commands::Config(cmd) => handle_config(cmd, &db),
        Commands::Fallback(FallbackCommand::Set { ids }) => {
            let ids: Vec<ProductId> = ids.into_iter().map(ProductId::new).collect();
            let stored = db.set_fallback_products(&ids)?;
            if stored.len() < ids.len() {
                println!(
                    "Fallback list truncated to the first {} ids",
                    FallbackList::CAPACITY
                );
            }
            println!("Fallback products: {}", stored.to_config_value());
            Ok(())
        }
        Commands::Tag(TagCommand::Add { name }) => {
            if name.trim().is_empty() {
                return Err(UsageError("Tag name cannot be empty".to_string()).into());
            }
            let id = db.insert_tag(AFFILIATE_VOCABULARY, &name)?;
            println!("Tag '{name}' (id: {id})");
            Ok(())
        }
        Commands::Product(ProductCommand::Add {
            title,
            tags,
            unpublished,
        }) => {
            if title.trim().is_empty() {
                return Err(UsageError("Product title cannot be empty".to_string()).into());
            }
            let tag_ids = tags
                .as_deref()
                .map(parse_list)
                .unwrap_or_default()
                .iter()
                .map(|name| db.insert_tag(AFFILIATE_VOCABULARY, name))
                .collect::<Result<Vec<TagId>>>()?;
            let id = db.insert_product(AFFILIATE_PRODUCT_TYPE, &title, &tag_ids, !unpublished)?;
            println!("Product created (id: {id})");
            Ok(())
        }
    }
}

fn open_database(path: Option<PathBuf>) -> Result<Database> {
    let path = match path {
        Some(path) => path,
        None => get_database_path()?,
    };
    ensure_database_directory(&path)?;
    Database::open(&path).context("Failed to open database")
}

fn handle_suggest(cmd: SuggestCommand, db: Database) -> Result<()> {
    let content = match cmd.content {
        Some(content) => content,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read content from stdin")?;
            buf
        }
    };
    if content.trim().is_empty() {
        return Err(UsageError("Content cannot be empty".to_string()).into());
    }

    let db = Arc::new(db);
    let client = OpenAiClientBuilder::new()
        .build()
        .context("Failed to create language-model client")?;
    let pipeline = Pipeline::new(
        db.clone(),
        Arc::new(EnvCredentials::new()),
        Arc::new(client),
        db,
    );

    let outcome = pipeline.run_detailed(&content);
    println!("source: {}", outcome.source);
    for product in &outcome.products {
        println!("{}\t{}", product.id(), product.title());
    }
    Ok(())
}

fn handle_config(cmd: ConfigCommand, db: &Database) -> Result<()> {
    match cmd {
        ConfigCommand::Set { key, value } => {
            if !keys::ALL.contains(&key.as_str()) {
                return Err(UsageError(format!(
                    "Unknown configuration key '{key}' (expected one of: {})",
                    keys::ALL.join(", ")
                ))
                .into());
            }

            if key == keys::FALLBACK_PRODUCTS {
                let list = FallbackList::parse(&value).map_err(|e| {
                    UsageError(format!("fallback_products must be a JSON array of ids: {e}"))
                })?;
                db.set_fallback_products(list.ids())?;
            } else {
                db.set_setting(&key, &value)?;
            }
            println!("{key} updated");
            Ok(())
        }
        ConfigCommand::Show => {
            for (key, value) in db.settings()? {
                println!("{key} = {value}");
            }
            match PipelineConfig::load(db) {
                Ok(_) => println!("configuration: ok"),
                Err(e) => println!("configuration: {e}"),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn config_set_rejects_unknown_keys() {
        let db = Database::in_memory().unwrap();
        let result = handle_config(
            ConfigCommand::Set {
                key: "colour".to_string(),
                value: "blue".to_string(),
            },
            &db,
        );

        let err = result.unwrap_err();
        assert!(err.downcast_ref::<UsageError>().is_some());
    }

    #[test]
    fn config_set_fallback_products_truncates() {
        let db = Database::in_memory().unwrap();
        handle_config(
            ConfigCommand::Set {
                key: keys::FALLBACK_PRODUCTS.to_string(),
                value: "[1,2,3,4,5,6]".to_string(),
            },
            &db,
        )
        .unwrap();

        assert_eq!(
            db.setting(keys::FALLBACK_PRODUCTS).unwrap().as_deref(),
            Some("[1,2,3,4,5]")
        );
    }

    #[test]
    fn suggest_rejects_empty_content() {
        let db = Database::in_memory().unwrap();
        let result = handle_suggest(
            SuggestCommand {
                content: Some("   ".to_string()),
            },
            db,
        );

        assert!(result.unwrap_err().downcast_ref::<UsageError>().is_some());
    }
}
