//! stocksense command implementations

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use stocksense_agent::{build_registry, Orchestrator, ToolRegistry};
use stocksense_config::{self, Config};
use stocksense_data::DataStore;
use stocksense_kb::DocumentIndex;
use stocksense_provider::OpenAiProvider;

/// Initialize config and data directories
pub async fn init_command() -> Result<()> {
    println!("Initializing stocksense...");

    let config = stocksense_config::init().await?;

    println!("Config:   {}", stocksense_config::config_path().display());
    println!("Datasets: {}", config.datasets_path().display());
    println!("Docs:     {}", config.docs_path().display());
    println!();
    println!("Next steps:");
    println!("  1. Add your API key to {}", stocksense_config::config_path().display());
    println!("     (or export OPENAI_API_KEY)");
    println!("  2. Place products.json, inventory.json, orders.json and");
    println!("     order_items.json in the datasets directory");
    println!("  3. Drop internal docs (.md or .txt) in the docs directory");
    println!("  4. Ask away: stocksense ask \"What's low on stock?\"");

    Ok(())
}

/// Build the startup registry: datasets, document index, then tools.
///
/// The registry is complete before the first query runs; the retrieval tool
/// is skipped (with a warning) when the document corpus is missing or empty.
async fn build_startup_registry(config: &Config) -> Result<ToolRegistry> {
    let datasets_path = config.datasets_path();
    let store = DataStore::load(&datasets_path).await.with_context(|| {
        format!(
            "failed to load datasets from {} (run `stocksense init` first)",
            datasets_path.display()
        )
    })?;

    let index = DocumentIndex::load_dir(&config.docs_path()).await?;
    let index = if index.is_empty() {
        warn!(
            "no documents found in {}, retrieval tool disabled",
            config.docs_path().display()
        );
        None
    } else {
        info!(passages = index.len(), "retrieval tool enabled");
        Some(Arc::new(index))
    };

    Ok(build_registry(Arc::new(store), index))
}

/// Ask the agent one question
pub async fn ask_command(question: String, debug: bool) -> Result<()> {
    let config = Config::load().await?;

    let api_key = config.api_key().context(
        "No API key configured. Add one to ~/.stocksense/config.json or export OPENAI_API_KEY",
    )?;

    let registry = Arc::new(build_startup_registry(&config).await?);
    let provider = OpenAiProvider::new(api_key, config.api_base(), Some(config.default_model()));
    let orchestrator = Orchestrator::with_config(provider, registry, &config);

    let response = orchestrator.answer(&question).await;

    println!("{}", response.response);

    if debug {
        println!();
        println!("--- debug ---");
        println!("messages: {}", response.message_count);
        if let Some(error) = &response.error {
            println!("error:    {}", error);
        }
        for record in &response.tool_usage {
            println!("step {}: {}", record.step, record.tool);
            println!("  input:  {}", record.input);
            match (&record.output, &record.error) {
                (_, Some(error)) => println!("  error:  {}", error),
                (Some(output), None) => println!("  output: {}", output),
                (None, None) => println!("  output: (still in flight)"),
            }
        }
    }

    Ok(())
}

/// List the registered tools
pub async fn tools_command() -> Result<()> {
    let config = Config::load().await?;

    // Fall back to an empty dataset so the tool list is printable before
    // any data has been loaded.
    let registry = match build_startup_registry(&config).await {
        Ok(registry) => registry,
        Err(_) => {
            warn!("datasets not loaded, listing tools against an empty store");
            build_registry(Arc::new(DataStore::default()), None)
        }
    };

    println!("Registered tools:");
    for (name, description) in registry.descriptions() {
        println!("  {} - {}", name, description);
    }

    Ok(())
}

/// Show status
pub async fn status_command() -> Result<()> {
    let config_path = stocksense_config::config_path();

    println!("stocksense status");

    println!(
        "Config:   {} {}",
        config_path.display(),
        if config_path.exists() { "[OK]" } else { "[Missing]" }
    );

    let config = Config::load().await?;
    println!("Model:    {}", config.default_model());
    println!(
        "API key:  {}",
        if config.has_api_key() { "[Set]" } else { "[Missing]" }
    );

    let datasets = config.datasets_path();
    println!(
        "Datasets: {} {}",
        datasets.display(),
        if datasets.join("products.json").exists() {
            "[OK]"
        } else {
            "[Missing]"
        }
    );

    let docs = config.docs_path();
    println!(
        "Docs:     {} {}",
        docs.display(),
        if docs.exists() { "[OK]" } else { "[Missing]" }
    );

    println!(
        "Limits:   {} tool iterations, {}s timeout",
        config.max_tool_iterations(),
        config.answer_timeout().as_secs()
    );

    Ok(())
}
