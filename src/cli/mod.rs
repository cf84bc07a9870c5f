//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod export;
mod preview;
mod prompt;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, StudioConfig};
use crate::models::{AspectRatio, GridShape};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// SpriteStudio - preview, slice and export AI-generated sprite sheets
#[derive(Parser)]
#[command(name = "sprite-studio")]
#[command(about = "SpriteStudio - preview, slice and export grid sprite sheets")]
#[command(version)]
pub struct Cli {
    /// Path to a studio.toml (default: discovered from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Grid shape flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GridArgs {
    /// Number of rows in the sheet (default: from studio.toml, else 2)
    #[arg(long, allow_negative_numbers = true)]
    pub rows: Option<i64>,

    /// Number of columns in the sheet (default: from studio.toml, else 4)
    #[arg(long, allow_negative_numbers = true)]
    pub cols: Option<i64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play the flipbook animation of a sheet and print each frame
    Preview {
        /// Sheet reference (path, file:// or data: URI)
        sheet: String,

        #[command(flatten)]
        grid: GridArgs,

        /// Number of ticks to play before stopping (10 per second)
        #[arg(long, default_value = "16")]
        ticks: u32,

        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Print the CSS needed to show one frame inside the preview viewport
    Style {
        /// Sheet reference used as the background image
        sheet: String,

        #[command(flatten)]
        grid: GridArgs,

        /// Frame index (row-major, 0-based)
        #[arg(short, long, default_value = "0")]
        frame: u32,

        /// Print every frame instead of a single one
        #[arg(long)]
        all: bool,

        /// Square viewport edge in pixels (default: from studio.toml, else 128)
        #[arg(long)]
        viewport: Option<u32>,

        /// Output JSON instead of CSS
        #[arg(long)]
        json: bool,
    },

    /// Draw the cell grid over a sheet and save it as PNG
    Overlay {
        /// Sheet to annotate
        sheet: String,

        #[command(flatten)]
        grid: GridArgs,

        /// Output PNG (default: {sheet}_grid.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cut a sheet into one PNG per frame
    Split {
        /// Sheet to cut
        sheet: String,

        #[command(flatten)]
        grid: GridArgs,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale frames by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: Option<u32>,
    },

    /// Export the flipbook animation as a looping GIF
    Gif {
        /// Sheet to animate
        sheet: String,

        #[command(flatten)]
        grid: GridArgs,

        /// Output GIF (default: {sheet}.gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale frames by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: Option<u32>,
    },

    /// Build the image-generation request for a sprite idea
    Prompt {
        /// What the sprite should depict (e.g. "a cybernetic rogue walking cycle")
        description: String,

        #[command(flatten)]
        grid: GridArgs,

        /// Aspect ratio of the generated sheet: 1:1, 4:3 or 16:9
        #[arg(long, default_value = "1:1")]
        aspect: AspectRatio,

        /// Print the refinement instruction instead of the sheet request
        #[arg(long)]
        refine: bool,

        /// Output the request as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    crate::logging::init(&config.logging.level, cli.verbose);

    match cli.command {
        Commands::Preview { sheet, grid, ticks, json } => {
            let shape = match resolve_shape(&grid, &mut config) {
                Ok(shape) => shape,
                Err(code) => return code,
            };
            preview::run_preview(&sheet, shape, ticks, json)
        }
        Commands::Style { sheet, grid, frame, all, viewport, json } => {
            merge_cli_overrides(&mut config, &CliOverrides { viewport, ..Default::default() });
            let shape = match resolve_shape(&grid, &mut config) {
                Ok(shape) => shape,
                Err(code) => return code,
            };
            preview::run_style(&sheet, shape, frame, all, config.preview.viewport, json)
        }
        Commands::Overlay { sheet, grid, output } => {
            let shape = match resolve_shape(&grid, &mut config) {
                Ok(shape) => shape,
                Err(code) => return code,
            };
            export::run_overlay(&sheet, shape, output.as_deref(), config.overlay.color)
        }
        Commands::Split { sheet, grid, output, scale } => {
            merge_cli_overrides(&mut config, &CliOverrides { scale, ..Default::default() });
            let shape = match resolve_shape(&grid, &mut config) {
                Ok(shape) => shape,
                Err(code) => return code,
            };
            export::run_split(&sheet, shape, output.as_deref(), config.preview.scale)
        }
        Commands::Gif { sheet, grid, output, scale } => {
            merge_cli_overrides(&mut config, &CliOverrides { scale, ..Default::default() });
            let shape = match resolve_shape(&grid, &mut config) {
                Ok(shape) => shape,
                Err(code) => return code,
            };
            export::run_gif(&sheet, shape, output.as_deref(), config.preview.scale)
        }
        Commands::Prompt { description, grid, aspect, refine, json } => {
            let shape = match resolve_shape(&grid, &mut config) {
                Ok(shape) => shape,
                Err(code) => return code,
            };
            prompt::run_prompt(&description, shape, aspect, refine, json)
        }
    }
}

/// Combine `--rows/--cols` with the configured grid and check it.
///
/// Prints the problem and returns the exit code on failure.
fn resolve_shape(grid: &GridArgs, config: &mut StudioConfig) -> Result<GridShape, ExitCode> {
    let rows = grid.rows.unwrap_or_else(|| i64::from(config.grid.rows));
    let cols = grid.cols.unwrap_or_else(|| i64::from(config.grid.cols));

    let shape = match GridShape::checked(rows, cols) {
        Ok(shape) => shape,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    if !config.within_limits(shape) {
        eprintln!(
            "Error: grid {} exceeds the configured limit of {} rows x {} columns",
            shape, config.limits.max_rows, config.limits.max_cols
        );
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    merge_cli_overrides(
        config,
        &CliOverrides { rows: Some(shape.rows), cols: Some(shape.cols), ..Default::default() },
    );
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_preview() {
        let cli = Cli::parse_from(["sprite-studio", "preview", "a.png", "--rows", "3", "--ticks", "4"]);
        match cli.command {
            Commands::Preview { sheet, grid, ticks, json } => {
                assert_eq!(sheet, "a.png");
                assert_eq!(grid.rows, Some(3));
                assert_eq!(grid.cols, None);
                assert_eq!(ticks, 4);
                assert!(!json);
            }
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn test_cli_parses_prompt_aspect() {
        let cli = Cli::parse_from(["sprite-studio", "prompt", "bat", "--aspect", "16:9"]);
        match cli.command {
            Commands::Prompt { aspect, .. } => assert_eq!(aspect, AspectRatio::Wide),
            _ => panic!("expected prompt"),
        }
        assert!(Cli::try_parse_from(["sprite-studio", "prompt", "bat", "--aspect", "2:1"]).is_err());
    }

    #[test]
    fn test_cli_rejects_non_integer_rows() {
        assert!(Cli::try_parse_from(["sprite-studio", "style", "a.png", "--rows", "2.5"]).is_err());
    }

    #[test]
    fn test_resolve_shape_uses_config_defaults() {
        let mut config = StudioConfig::default();
        let shape = resolve_shape(&GridArgs::default(), &mut config).unwrap();
        assert_eq!(shape, GridShape::new(2, 4));

        let grid = GridArgs { rows: Some(1), cols: None };
        assert_eq!(resolve_shape(&grid, &mut config).unwrap(), GridShape::new(1, 4));
        assert_eq!(config.grid.rows, 1);
    }

    #[test]
    fn test_resolve_shape_rejects_invalid_and_oversized() {
        let mut config = StudioConfig::default();
        assert!(resolve_shape(&GridArgs { rows: Some(0), cols: Some(2) }, &mut config).is_err());
        assert!(resolve_shape(&GridArgs { rows: Some(-3), cols: Some(2) }, &mut config).is_err());
        assert!(resolve_shape(&GridArgs { rows: Some(9), cols: Some(2) }, &mut config).is_err());
        assert!(resolve_shape(&GridArgs { rows: Some(8), cols: Some(12) }, &mut config).is_ok());
    }
}
