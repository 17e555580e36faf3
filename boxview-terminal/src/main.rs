/// BoxView Terminal - Packaging mockup previewer
///
/// Renders the assembled box in the terminal with the dieline's colours.
/// Controls:
///   - Left mouse drag: Rotate the box
///   - W/H/D then digits + Enter: Edit width / height / depth (mm)
///   - R: Reset the view
///   - X: Export the dimensions as JSON
///   - Q/ESC: Quit
use anyhow::Context;
use boxview_core::PreviewConfig;
use boxview_terminal::{load_dieline, TerminalApp};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "boxview-terminal", version, about = "Preview a packaging box in the terminal")]
struct Cli {
    /// Box width in millimetres
    #[arg(long)]
    width: Option<f64>,

    /// Box height in millimetres
    #[arg(long)]
    height: Option<f64>,

    /// Box depth in millimetres
    #[arg(long)]
    depth: Option<f64>,

    /// Dieline image (PNG)
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON preview configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the export key writes the dimensions
    #[arg(long, default_value = "boxview-export.json")]
    export: PathBuf,

    /// Write logs here (filtered by RUST_LOG); the preview owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,boxview_core=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .compact()
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<PreviewConfig> {
    let mut config = match &cli.config {
        Some(path) => PreviewConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PreviewConfig::default(),
    };

    let current = config.dimensions;
    config.dimensions = boxview_core::BoxDimensions::new(
        cli.width.unwrap_or(current.width()),
        cli.height.unwrap_or(current.height()),
        cli.depth.unwrap_or(current.depth()),
    )
    .context("invalid box dimensions")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = load_config(&cli)?;
    let dieline = cli
        .image
        .as_deref()
        .map(load_dieline)
        .transpose()
        .context("failed to load dieline")?;

    info!(
        width = config.dimensions.width(),
        height = config.dimensions.height(),
        depth = config.dimensions.depth(),
        dieline = dieline.is_some(),
        "starting BoxView terminal previewer"
    );

    let mut app = TerminalApp::new(&config, dieline, cli.export)?;
    app.run()?;

    println!("Thank you for using BoxView!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_dimensions() {
        let cli = Cli::parse_from(["boxview-terminal", "--width", "200", "--depth", "20"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.dimensions.width(), 200.0);
        assert_eq!(config.dimensions.height(), 150.0);
        assert_eq!(config.dimensions.depth(), 20.0);
    }

    #[test]
    fn test_cli_rejects_non_positive() {
        let cli = Cli::parse_from(["boxview-terminal", "--height=-5"]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
