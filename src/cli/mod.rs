pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "spark")]
#[command(about = "Agent Spark CLI - manage the themed post backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server")]
    Runserver {
        #[arg(long, help = "Bind host (overrides AGENT_SPARK_HOST)")]
        host: Option<String>,
        #[arg(long, help = "Bind port (overrides AGENT_SPARK_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Import legacy vault data into the database")]
    ImportLegacy,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Runserver { host, port } => commands::server::handle(host, port).await,
        Commands::ImportLegacy => commands::legacy::handle(output_format).await,
    }
}
