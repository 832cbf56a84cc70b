//! StoryWeaver gateway command line
//!
//! Runs single generation requests through the gateway and reports local
//! usage.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use storyweaver_gateway::config::Config;
use storyweaver_gateway::core::quota::QuotaTracker;
use storyweaver_gateway::storage::UsageStateFile;
use storyweaver_gateway::utils::logging::init_logging;
use storyweaver_gateway::{
    Artifact, CharacterBlueprint, ErrorResponse, GatewayError, GenerationGateway, ImageInput,
};
use tracing::debug;

const DEFAULT_CONFIG: &str = "config/gateway.yaml";

#[derive(Parser)]
#[command(
    name = "gateway",
    about = "StoryWeaver generation gateway",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, env = "GATEWAY_CONFIG", help = "Path to the gateway YAML config")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Generate story text")]
    Text {
        #[arg(help = "Prompt text")]
        prompt: String,
    },

    #[command(about = "Generate an image")]
    Image {
        #[arg(help = "Scene description")]
        prompt: String,

        #[arg(long = "character", value_parser = parse_character, help = "Character as id:name:blueprint")]
        characters: Vec<CharacterBlueprint>,

        #[arg(long = "style", help = "Style reference image file")]
        styles: Vec<PathBuf>,

        #[arg(short, long, help = "Write the image to this file")]
        out: Option<PathBuf>,
    },

    #[command(about = "Edit an existing image")]
    Edit {
        #[arg(help = "Source image file")]
        source: PathBuf,

        #[arg(help = "Edit instruction")]
        prompt: String,

        #[arg(long = "character", value_parser = parse_character, help = "Character as id:name:blueprint")]
        characters: Vec<CharacterBlueprint>,

        #[arg(short, long, help = "Write the image to this file")]
        out: Option<PathBuf>,
    },

    #[command(about = "Show local quota usage")]
    Usage,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<GatewayError>() {
                Some(gateway_error) => {
                    let response = ErrorResponse::from(gateway_error);
                    match serde_json::to_string_pretty(&response) {
                        Ok(json) => eprintln!("{}", json),
                        Err(_) => eprintln!("Error: {}", gateway_error),
                    }
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).await?;
    init_logging(&config.gateway.logging)?;

    match cli.command {
        Commands::Usage => show_usage(&config).await?,
        Commands::Text { prompt } => {
            let gateway = GenerationGateway::from_config(&config).await?;
            let text = gateway.generate_text(prompt).await?;
            println!("{}", text);
        }
        Commands::Image {
            prompt,
            characters,
            styles,
            out,
        } => {
            let gateway = GenerationGateway::from_config(&config).await?;
            let mut references = Vec::with_capacity(styles.len());
            for path in &styles {
                references.push(read_image(path).await?);
            }
            let artifact = gateway.generate_image(prompt, characters, references).await?;
            report(&artifact, out.as_deref()).await?;
        }
        Commands::Edit {
            source,
            prompt,
            characters,
            out,
        } => {
            let gateway = GenerationGateway::from_config(&config).await?;
            let source = read_image(&source).await?;
            let artifact = gateway
                .edit_image(source.bytes, source.mime_type, prompt, characters)
                .await?;
            report(&artifact, out.as_deref()).await?;
            debug!(stats = ?gateway.stats(), "Gateway statistics");
        }
    }

    Ok(())
}

async fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::from_file(DEFAULT_CONFIG).await?,
        None => Config::from_env()?,
    };
    Ok(config)
}

async fn show_usage(config: &Config) -> anyhow::Result<()> {
    let tracker = QuotaTracker::new(&config.gateway.quota);
    if let Some(path) = &config.gateway.quota.state_path {
        UsageStateFile::new(path).restore_into(&tracker).await?;
    }
    let snapshot = tracker.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn read_image(path: &Path) -> anyhow::Result<ImageInput> {
    let mime_type = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            "image/jpeg"
        }
        Some(ext) if ext.eq_ignore_ascii_case("webp") => "image/webp",
        Some(ext) if ext.eq_ignore_ascii_case("gif") => "image/gif",
        _ => bail!("Unsupported image type: {}", path.display()),
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(ImageInput::new(bytes, mime_type))
}

async fn report(artifact: &Artifact, out: Option<&Path>) -> anyhow::Result<()> {
    if let Some(out) = out {
        tokio::fs::write(out, &artifact.bytes)
            .await
            .with_context(|| format!("writing {}", out.display()))?;
    }
    let source = if artifact.from_cache { "cache" } else { "remote" };
    println!(
        "{} ({}, {} bytes, from {})",
        artifact.location,
        artifact.mime_type,
        artifact.len(),
        source
    );
    Ok(())
}

fn parse_character(value: &str) -> Result<CharacterBlueprint, String> {
    let mut fields = value.splitn(3, ':');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(id), Some(name), Some(blueprint)) if !id.is_empty() && !name.is_empty() => {
            Ok(CharacterBlueprint::new(id, name, blueprint))
        }
        _ => Err(format!("expected id:name:blueprint, got {:?}", value)),
    }
}
