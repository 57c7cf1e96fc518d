//! SrcVeil CLI
//!
//! Command-line interface for the demo obfuscation service: run the HTTP
//! server, obfuscate files locally, and manage the demo credential store.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use srcveil_core::{finalize_markers, CredentialStore, JobReport, ObfuscateOptions, Obfuscator, PassKind};
use srcveil_server::{run_server, ServerConfig};

#[derive(Parser)]
#[command(name = "srcveil")]
#[command(about = "Demo source obfuscation tool (regex transforms, not a real obfuscator)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the obfuscation server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory for per-job artifacts (default: ./jobs)
        #[arg(long)]
        jobs_dir: Option<PathBuf>,
    },

    /// Obfuscate a source file locally without the server
    Obfuscate {
        /// Input source file
        input: PathBuf,

        /// Passes to apply (string-encrypt, rename-symbols, bogus-insert, cfg-flatten)
        #[arg(short = 'P', long = "pass")]
        passes: Vec<String>,

        /// Number of bogus routines for the dead-code pass
        #[arg(long, default_value = "0")]
        bogus_count: u32,

        /// Options file (overrides --pass / --bogus-count when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path (default: obf_app.c)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show server status
    Status {
        /// Server port to probe
        #[arg(short, long, default_value = "4000")]
        port: u16,
    },

    /// Register a new user in the demo credential store
    Register {
        username: String,
        password: String,
    },

    /// Log in and persist the session role
    Login {
        username: String,
        password: String,
    },

    /// Clear the session role
    Logout,

    /// Print the current session role
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("srcveil=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, jobs_dir } => {
            cmd_serve(port, jobs_dir).await?;
        }
        Commands::Obfuscate {
            input,
            passes,
            bogus_count,
            config,
            output,
        } => {
            cmd_obfuscate(input, passes, bogus_count, config, output)?;
        }
        Commands::Status { port } => {
            cmd_status(port).await?;
        }
        Commands::Register { username, password } => {
            cmd_register(&username, &password)?;
        }
        Commands::Login { username, password } => {
            cmd_login(&username, &password)?;
        }
        Commands::Logout => {
            cmd_logout()?;
        }
        Commands::Whoami => {
            cmd_whoami()?;
        }
    }

    Ok(())
}

/// Start the HTTP server
async fn cmd_serve(port: u16, jobs_dir: Option<PathBuf>) -> Result<()> {
    let mut config = ServerConfig {
        port,
        ..Default::default()
    };
    if let Some(dir) = jobs_dir {
        config.jobs_dir = dir;
    }

    println!("Starting SrcVeil server on port {}...", port);
    run_server(config).await
}

/// Run the pipeline on a local file
fn cmd_obfuscate(
    input: PathBuf,
    passes: Vec<String>,
    bogus_count: u32,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    tracing::info!("Obfuscating {}", input.display());

    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if source.is_empty() {
        bail!("No code provided: {} is empty", input.display());
    }

    let options = match config {
        Some(path) => ObfuscateOptions::from_config_file(&path)?,
        None => {
            let mut kinds = Vec::new();
            for name in &passes {
                match PassKind::from_name(name) {
                    Some(kind) => kinds.push(kind),
                    None => bail!("Unknown pass: {}", name),
                }
            }
            ObfuscateOptions {
                passes: kinds,
                bogus_count,
            }
        }
    };

    let outcome = Obfuscator::new(options).apply(&source);
    let final_source = finalize_markers(&outcome.source);

    let output_path = output.unwrap_or_else(|| PathBuf::from("obf_app.c"));
    std::fs::write(&output_path, &final_source)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    let report = JobReport::new(
        "local",
        &outcome,
        &output_path,
        source.len() as u64,
        final_source.len() as u64,
    );

    println!("Wrote {}", output_path.display());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Probe the server health endpoint
async fn cmd_status(port: u16) -> Result<()> {
    let client = reqwest::Client::new();

    match client
        .get(format!("http://localhost:{}/health", port))
        .send()
        .await
    {
        Ok(response) => {
            let health: serde_json::Value = response.json().await?;
            println!("Server status: {}", serde_json::to_string_pretty(&health)?);
        }
        Err(_) => {
            println!("Server is not running.");
            println!("Start it with: srcveil serve");
        }
    }

    Ok(())
}

/// Register a new user
fn cmd_register(username: &str, password: &str) -> Result<()> {
    let store = CredentialStore::open(CredentialStore::default_dir());
    store
        .register(username, password)
        .context("Registration failed")?;
    println!("Registration successful!");
    Ok(())
}

/// Validate credentials and persist the session role
fn cmd_login(username: &str, password: &str) -> Result<()> {
    let store = CredentialStore::open(CredentialStore::default_dir());
    let role = store
        .validate(username, password)
        .context("Login failed")?;
    store.set_role(role)?;
    println!("Logged in as {} ({})", username, role);
    Ok(())
}

/// Clear the session role
fn cmd_logout() -> Result<()> {
    let store = CredentialStore::open(CredentialStore::default_dir());
    store.clear_role()?;
    println!("Logged out.");
    Ok(())
}

/// Print the current session role
fn cmd_whoami() -> Result<()> {
    let store = CredentialStore::open(CredentialStore::default_dir());
    match store.current_role()? {
        Some(role) => println!("Current role: {}", role),
        None => println!("Not logged in."),
    }
    Ok(())
}
