//! Contentful Code-First CLI
//!
//! Command-line interface for compiling scope manifests into content types
//! and synchronizing them with a Contentful space.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use contentful_codefirst::{compile, load_types_from_file, CompiledContentType, TypeDescriptor};
#[cfg(feature = "remote")]
use contentful_codefirst::{sync, ClientConfig, HttpManagementClient, SyncOptions};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contentful-codefirst")]
#[command(about = "Compile annotated models into Contentful content types")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the annotated types of a scope manifest
    Scan {
        /// Scope manifest file
        manifest: PathBuf,
    },

    /// Compile a scope manifest into content type definitions
    Compile {
        /// Scope manifest file
        manifest: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Create or update the compiled content types in a space
    #[cfg(feature = "remote")]
    Sync {
        /// Scope manifest file
        manifest: PathBuf,

        /// Target space id
        #[arg(long, env = "CONTENTFUL_SPACE_ID")]
        space_id: String,

        /// Content management token
        #[arg(long, env = "CONTENTFUL_MANAGEMENT_TOKEN", hide_env_values = true)]
        token: String,

        /// Target environment (space default if not specified)
        #[arg(long, env = "CONTENTFUL_ENVIRONMENT")]
        environment: Option<String>,

        /// Management API base URL
        #[arg(long, default_value = "https://api.contentful.com")]
        base_url: String,

        /// Update content types that already exist in the space
        #[arg(long)]
        force_update: bool,

        /// Activate each content type after saving it
        #[arg(long)]
        publish: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan { manifest } => run_scan(&manifest),
        Commands::Compile {
            manifest,
            output,
            pretty,
        } => run_compile(&manifest, output, pretty),
        #[cfg(feature = "remote")]
        Commands::Sync {
            manifest,
            space_id,
            token,
            environment,
            base_url,
            force_update,
            publish,
            pretty,
        } => {
            let mut config = ClientConfig::new(space_id, token).base_url(base_url);
            if let Some(environment) = environment {
                config = config.environment(environment);
            }
            let options = SyncOptions::new()
                .force_update(force_update)
                .publish_automatically(publish);
            run_sync(&manifest, config, options, pretty)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load(manifest: &Path) -> Result<Vec<TypeDescriptor>, u8> {
    load_types_from_file(manifest).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_scan(manifest: &Path) -> Result<(), u8> {
    for descriptor in load(manifest)? {
        println!("{}", descriptor.ident);
    }
    Ok(())
}

fn run_compile(manifest: &Path, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let types = load(manifest)?;
    let compiled: Vec<CompiledContentType> = compile(&types).collect();
    let json_output = to_json(&compiled, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

#[cfg(feature = "remote")]
fn run_sync(
    manifest: &Path,
    config: ClientConfig,
    options: SyncOptions,
    pretty: bool,
) -> Result<(), u8> {
    let types = load(manifest)?;
    let compiled: Vec<CompiledContentType> = compile(&types).collect();

    let client = HttpManagementClient::new(config).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("Error starting runtime: {}", e);
        3u8
    })?;

    let synced = runtime
        .block_on(sync(compiled, &options, &client))
        .map_err(|e| {
            for def in &e.completed {
                eprintln!("Saved before failure: {}", def.id);
            }
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    println!("{}", to_json(&synced, pretty)?);
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}
