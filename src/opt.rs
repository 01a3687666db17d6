//! Command-line options.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Parser, ValueEnum, crate_version};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rattler_conda_types::Platform;

/// Application subcommands.
#[derive(Parser)]
pub enum SubCommands {
    /// Expand recipes into the distributions a package index allows
    ///
    /// Every recipe is evaluated once without variables to find its
    /// requirements on python, numpy, perl and r. The versions of those
    /// packages in the index span the build matrix. Combinations the index
    /// does not support, or that the recipe skips, are left out.
    Render(RenderOpts),
}

/// The command line of `rattler-build-matrix`.
#[derive(Parser)]
#[clap(version = crate_version!())]
pub struct App {
    /// Subcommand.
    #[clap(subcommand)]
    pub subcommand: SubCommands,

    /// Enable verbose logging.
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Enable or disable colored log output.
    #[clap(
        long,
        env = "RATTLER_BUILD_MATRIX_COLOR",
        default_value = "auto",
        global = true
    )]
    pub color: Color,
}

/// Color mode of the log output
#[derive(ValueEnum, Clone, Debug, Copy, Eq, PartialEq)]
pub enum Color {
    /// Use colors when writing to a terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// How resolved distributions are printed
#[derive(ValueEnum, Clone, Debug, Copy, Eq, PartialEq, Default)]
pub enum OutputFormat {
    /// A table per recipe
    #[default]
    Table,
    /// A JSON array of all distributions
    Json,
}

/// Options for the `render` command.
#[derive(Parser, Debug, Clone)]
pub struct RenderOpts {
    /// Recipe files, or directories containing a `meta.yaml`.
    #[arg(required = true)]
    pub recipes: Vec<PathBuf>,

    /// `repodata.json` files that make up the package index. Use it multiple
    /// times to combine several files.
    #[arg(
        short,
        long = "index",
        env = "RATTLER_BUILD_MATRIX_INDEX",
        value_delimiter = ',',
        required = true
    )]
    pub indices: Vec<PathBuf>,

    /// Extra conditions on matrix variables, e.g. `python 2.6.*|>=3`.
    #[arg(
        long = "matrix-condition",
        env = "RATTLER_BUILD_MATRIX_CONDITIONS",
        value_delimiter = ';'
    )]
    pub matrix_conditions: Vec<String>,

    /// Keep only the newest N major versions of every matrix variable.
    #[arg(long)]
    pub matrix_max_n_major_versions: Option<NonZeroUsize>,

    /// Keep only the newest N minor versions within every major version.
    #[arg(long)]
    pub matrix_max_n_minor_versions: Option<NonZeroUsize>,

    /// The platform selectors are evaluated for. Defaults to the current platform.
    #[arg(long)]
    pub target_platform: Option<Platform>,

    /// Output format.
    #[arg(long, default_value = "table")]
    pub output: OutputFormat,
}
