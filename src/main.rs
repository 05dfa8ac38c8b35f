use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use sign_builder::command::EditorCommand;
use sign_builder::config::{ConfigError, EditorConfig};
use sign_builder::doc::DesignData;
use sign_builder::engine::EngineCore;
use sign_builder::overlay::Overlay;
use sign_builder::template::{TemplateCatalog, TemplateError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "sign-builder", about = "Headless sign builder: replay edit scripts and apply templates")]
struct Cli {
    /// Pretty-print the JSON output.
    #[arg(long, env = "SIGN_BUILDER_PRETTY")]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON array of editor commands and print the resulting design.
    Replay {
        script: PathBuf,
        /// Also print the overlay geometry at the end of the script.
        #[arg(long)]
        overlay: bool,
    },
    /// Apply one template from a catalog and print the resulting design.
    Template { catalog: PathBuf, id: String },
}

#[derive(Serialize)]
struct Output {
    design: DesignData,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<Overlay>,
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!(%err, "sign-builder failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = EditorConfig::from_env()?;
    let mut engine = EngineCore::with_config(config);

    let output = match cli.command {
        Command::Replay { script, overlay } => {
            let commands: Vec<EditorCommand> = serde_json::from_str(&read(&script)?)?;
            tracing::info!(path = %script.display(), commands = commands.len(), "replaying script");
            engine.replay(commands);
            Output { design: engine.design_data(), overlay: overlay.then(|| engine.overlay()) }
        }
        Command::Template { catalog, id } => {
            let catalog = TemplateCatalog::from_json(&read(&catalog)?)?;
            catalog.find(&id)?.apply(&mut engine);
            Output { design: engine.design_data(), overlay: None }
        }
    };

    let json = if cli.pretty { serde_json::to_string_pretty(&output)? } else { serde_json::to_string(&output)? };
    println!("{json}");
    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}
