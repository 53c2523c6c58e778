use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::{error, warn};

use product_kg_extractor::{
    config::Settings,
    core::{BatchRunner, CompletionBackend, OpenAiClient, RelationExtractor},
    corpus::load_corpus,
    graph::EdgeStrategy,
    schema::ExtractionSchema,
    utils::{GraphExporter, GraphFormat},
};

#[derive(Parser)]
#[command(
    name = "product_kg_extractor",
    about = "Extract product knowledge graphs from catalog text using LLM",
    long_about = None,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a knowledge graph from a product corpus
    Extract {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,

        /// Input corpus CSV (TITLE, BULLET_POINTS, DESCRIPTION columns)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of documents to process (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output file for the graph (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "dot")]
        format: GraphFormatArg,

        /// Chat-completion server URL (overrides config)
        #[arg(long)]
        server_url: Option<String>,

        /// API key (overrides config and OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Model to use (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Edge labeling strategy (overrides config)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Validate configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Check chat-completion server status
    CheckServer {
        /// Server URL
        #[arg(long, default_value = "http://localhost:8000")]
        server_url: String,

        /// API key for the server
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Generate example configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long)]
        output: PathBuf,

        /// Configuration format (yaml or json)
        #[arg(short, long, default_value = "yaml")]
        format: ConfigFormat,
    },
}

#[derive(clap::ValueEnum, Clone)]
enum GraphFormatArg {
    Dot,
    Json,
    EdgeList,
}

impl From<GraphFormatArg> for GraphFormat {
    fn from(format: GraphFormatArg) -> Self {
        match format {
            GraphFormatArg::Dot => Self::Dot,
            GraphFormatArg::Json => Self::Json,
            GraphFormatArg::EdgeList => Self::EdgeList,
        }
    }
}

#[derive(clap::ValueEnum, Clone)]
enum StrategyArg {
    Overwrite,
    Accumulate,
}

impl From<StrategyArg> for EdgeStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Overwrite => Self::Overwrite,
            StrategyArg::Accumulate => Self::Accumulate,
        }
    }
}

#[derive(clap::ValueEnum, Clone)]
enum ConfigFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Extract {
            config,
            input,
            limit,
            output,
            format,
            server_url,
            api_key,
            model,
            strategy,
        } => {
            extract_command(
                config, input, limit, output, format, server_url, api_key, model, strategy,
            )
            .await
        }
        Commands::Validate { config } => validate_command(config),
        Commands::CheckServer { server_url, api_key } => {
            check_server_command(server_url, api_key).await
        }
        Commands::GenerateConfig { output, format } => {
            generate_config_command(output, format).await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn extract_command(
    config_path: PathBuf,
    input: PathBuf,
    limit: Option<usize>,
    output: Option<PathBuf>,
    format: GraphFormatArg,
    server_url: Option<String>,
    api_key: Option<String>,
    model_override: Option<String>,
    strategy: Option<StrategyArg>,
) -> Result<()> {
    println!("{}", "Starting knowledge-graph extraction...".bright_blue().bold());

    let mut settings = Settings::from_file(&config_path)?;
    settings.validate()?;

    if let Some(url) = server_url {
        settings.llm.base_url = url;
    }
    if let Some(key) = api_key {
        settings.llm.api_key = Some(key);
    }
    if let Some(model) = model_override {
        settings.llm.model = model;
    }
    if let Some(limit) = limit {
        settings.extraction.document_limit = Some(limit);
    }
    let edge_strategy = strategy
        .map(EdgeStrategy::from)
        .unwrap_or(settings.extraction.edge_strategy);

    println!(" Model: {}", settings.llm.model.bright_green());
    println!(" Server: {}", settings.llm.base_url);

    let client = OpenAiClient::from_settings(&settings.llm)?;
    if !client.check_health().await {
        error!("Chat-completion server is not responding at {}", settings.llm.base_url);
        anyhow::bail!("server health check failed");
    }
    println!(" Server is healthy");

    let documents = load_corpus(&input)?;
    println!(" Documents: {}", documents.len().to_string().bright_cyan());

    let extractor = RelationExtractor::new(
        Box::new(client) as Box<dyn CompletionBackend>,
        ExtractionSchema::default(),
    );
    let runner = BatchRunner::new(extractor, edge_strategy, settings.extraction.document_limit);

    let report = runner.run(&documents).await;

    if report.documents_skipped > 0 {
        warn!("{} documents were skipped", report.documents_skipped);
    }

    let exporter = GraphExporter::new();
    let serialized = exporter.serialize(&report.graph, format.into())?;

    if let Some(output_path) = &output {
        tokio::fs::write(output_path, &serialized).await?;
        println!(" Graph written to: {}", output_path.display().to_string().bright_green());
    } else {
        println!("\n{}", serialized);
    }

    println!("\n{}", "Extraction Summary".bright_green().bold());
    println!(" Run ID: {}", report.id);
    println!(" Documents processed: {}", report.documents_processed.to_string().bright_cyan());
    println!(" Documents skipped: {}", report.documents_skipped.to_string().bright_yellow());
    println!(" Relations extracted: {}", report.relations_extracted.to_string().bright_cyan());
    println!(" {}", report.graph.stats());
    println!(" Total processing time: {:.2}s", report.processing_time_seconds);

    Ok(())
}

fn validate_command(config_path: PathBuf) -> Result<()> {
    println!("{}", "Validating configuration...".bright_blue().bold());

    match Settings::from_file(&config_path).and_then(|s| s.validate().map(|()| s)) {
        Ok(settings) => {
            println!(" Configuration is valid!");
            println!(" Server: {}", settings.llm.base_url.bright_green());
            println!(" Model: {}", settings.llm.model);
            println!(
                " Document limit: {}",
                settings
                    .extraction
                    .document_limit
                    .map_or("none".to_string(), |l| l.to_string())
            );
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}

async fn check_server_command(server_url: String, api_key: Option<String>) -> Result<()> {
    println!("{}", "Checking chat-completion server...".bright_blue().bold());

    let client = OpenAiClient::new(server_url.clone(), api_key, "test".to_string(), 0.0, 1024, 30, 0)?;

    if client.check_health().await {
        println!(" Server is healthy at {}", server_url.bright_green());
    } else {
        println!(" Server is not responding at {}", server_url.bright_red());
        return Ok(());
    }

    match client.list_models().await {
        Ok(models) => {
            println!(" Available models:");
            for model in models {
                println!("  - {}", model.bright_cyan());
            }
        }
        Err(e) => {
            warn!("Could not list models: {}", e);
        }
    }

    Ok(())
}

async fn generate_config_command(output_path: PathBuf, format: ConfigFormat) -> Result<()> {
    println!("{}", "Generating example configuration...".bright_blue().bold());

    let settings = Settings::example();

    let content = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(&settings)?,
        ConfigFormat::Json => serde_json::to_string_pretty(&settings)?,
    };

    tokio::fs::write(&output_path, content).await?;

    println!(
        " Example configuration generated at: {}",
        output_path.display().to_string().bright_green()
    );
    println!(" Edit the file to customize for your use case");

    Ok(())
}
