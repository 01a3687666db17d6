//! This is the main entry point for the `rattler-build-matrix` binary.

use std::{collections::BTreeMap, io::IsTerminal, path::PathBuf};

use clap::Parser;
use miette::IntoDiagnostic;
use rattler_build_matrix::{ResolveError, ResolveOptions, ResolvedDistribution, resolve_all};
use rattler_build_matrix_index::InMemoryIndex;
use rattler_build_matrix_recipe::Recipe;
use rattler_build_matrix_types::VariableSet;
use rattler_conda_types::Platform;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*};

mod console_utils;
mod opt;

use crate::{
    console_utils::{TracingFormatter, env_filter},
    opt::{App, Color, OutputFormat, RenderOpts, SubCommands},
};

fn main() -> miette::Result<()> {
    let app = App::parse();

    let ansi = match app.color {
        Color::Always => true,
        Color::Never => false,
        Color::Auto => std::io::stderr().is_terminal(),
    };

    // Setup tracing subscriber
    tracing_subscriber::registry()
        .with(env_filter(app.verbose.tracing_level_filter()).into_diagnostic()?)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .event_format(TracingFormatter),
        )
        .init();

    match app.subcommand {
        SubCommands::Render(opts) => render_from_args(opts),
    }
}

/// One row of the output.
#[derive(Debug, Serialize)]
struct DistributionSummary {
    recipe: Option<PathBuf>,
    name: String,
    version: String,
    build_id: String,
    dist_name: String,
    variables: VariableSet,
    build_env: BTreeMap<String, String>,
}

impl DistributionSummary {
    fn new(recipe: &Recipe, distribution: &ResolvedDistribution<'_>) -> Result<Self, ResolveError> {
        Ok(Self {
            recipe: recipe.path().map(|p| p.to_path_buf()),
            name: distribution.name()?.to_string(),
            version: distribution.version()?.to_string(),
            build_id: distribution.build_id()?,
            dist_name: distribution.dist_name()?,
            variables: distribution.variables().clone(),
            build_env: distribution.build_config()?.env_vars(),
        })
    }
}

fn render_from_args(args: RenderOpts) -> miette::Result<()> {
    let index = InMemoryIndex::from_repodata_paths(&args.indices).map_err(ResolveError::from)?;
    tracing::debug!(
        "Loaded {} package records from {} file(s)",
        index.len(),
        args.indices.len()
    );

    let options = ResolveOptions {
        max_n_major_versions: args.matrix_max_n_major_versions,
        max_n_minor_versions: args.matrix_max_n_minor_versions,
        ..ResolveOptions::default()
    }
    .with_conditions(&args.matrix_conditions)?;

    let target_platform = args.target_platform.unwrap_or_else(|| {
        tracing::debug!("No target platform specified, using current platform");
        Platform::current()
    });

    let mut summaries = Vec::new();
    for path in &args.recipes {
        let recipe = Recipe::from_path(path)
            .map_err(ResolveError::from)?
            .with_target_platform(target_platform);
        let distributions = resolve_all(&recipe, &index, &options)?;
        if distributions.is_empty() {
            tracing::warn!("Nothing to build for {}", path.display());
        }
        for distribution in &distributions {
            summaries.push(DistributionSummary::new(&recipe, distribution)?);
        }
    }

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries).into_diagnostic()?);
        }
        OutputFormat::Table => {
            let mut table = comfy_table::Table::new();
            table
                .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
                .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
                .set_header(vec!["Package", "Version", "Build", "Variables"]);
            for summary in &summaries {
                table.add_row(vec![
                    summary.name.clone(),
                    summary.version.clone(),
                    summary.build_id.clone(),
                    summary.variables.to_string(),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
