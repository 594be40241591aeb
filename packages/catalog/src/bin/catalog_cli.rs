//! Catalog CLI: apply schema migrations and load a seed catalog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog_core::domains::categories::CategoryInput;
use catalog_core::domains::doughs::DoughInput;
use catalog_core::domains::ingredients::IngredientInput;
use catalog_core::domains::pizzas::PizzaInput;
use catalog_core::{Catalog, Config};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "catalog_cli")]
#[command(about = "Pizza catalog maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Migrate, then load a JSON catalog; every seeded entity is protected
    Seed { file: PathBuf },
}

/// Seed file layout. Categories go first, then ingredients (whose rules name
/// categories), then pizzas (which name both), then doughs.
#[derive(Debug, Deserialize)]
struct SeedCatalog {
    #[serde(default)]
    categories: Vec<CategoryInput>,
    #[serde(default)]
    ingredients: Vec<IngredientInput>,
    #[serde(default)]
    pizzas: Vec<PizzaInput>,
    #[serde(default)]
    doughs: Vec<DoughInput>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    migrate(&pool).await?;

    match cli.command {
        Commands::Migrate => Ok(()),
        Commands::Seed { file } => {
            let catalog = Catalog::from_config(pool, &config);
            seed(&catalog, &file).await
        }
    }
}

async fn migrate(pool: &PgPool) -> Result<()> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");
    Ok(())
}

async fn seed(catalog: &Catalog, file: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read seed file {}", file.display()))?;
    let seed: SeedCatalog = serde_json::from_str(&raw).context("Invalid seed file")?;

    for mut input in seed.categories {
        input.is_protected = true;
        let name = input.name.clone();
        catalog
            .create_category(input)
            .await
            .with_context(|| format!("Failed to seed category {}", name))?;
    }

    for mut input in seed.ingredients {
        input.is_protected = true;
        let name = input.name.clone();
        catalog
            .create_ingredient(input)
            .await
            .with_context(|| format!("Failed to seed ingredient {}", name))?;
    }

    for mut input in seed.pizzas {
        input.is_protected = true;
        let name = input.name.clone();
        catalog
            .create_pizza(input)
            .await
            .with_context(|| format!("Failed to seed pizza {}", name))?;
    }

    for mut input in seed.doughs {
        input.is_protected = true;
        let name = input.name.clone();
        catalog
            .create_dough(input)
            .await
            .with_context(|| format!("Failed to seed dough {}", name))?;
    }

    tracing::info!(file = %file.display(), "Seed complete");
    Ok(())
}
