//! statusgrid CLI - machine-comparison performance tables

#![deny(warnings)]

// Global invariants enforced:
// - Events are applied strictly in command-line order
// - Identical input yields byte-for-byte identical output

mod logger;

use anyhow::Context;
use clap::{Parser, Subcommand};
use statusgrid_core::config;
use statusgrid_core::event::apply_all;
use statusgrid_core::html::{render_html, HtmlOptions};
use statusgrid_core::navigation::drilldown_url;
use statusgrid_core::{open_view, render_json, render_text, ComparisonTable, Event, SortDirection};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "statusgrid")]
#[command(about = "Compare test timings across machines, worst time first")]
#[command(version = env!("STATUSGRID_VERSION"))]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a comparison table after replaying viewer events
    Render {
        /// Path to the table JSON file
        table: PathBuf,

        /// Viewer event, repeatable: ready, reset, view:NAME, toggle:COLUMN,
        /// sort:COLUMN[:asc|desc]
        #[arg(long = "event", short = 'e')]
        events: Vec<Event>,

        /// View to activate after loading (overrides config file)
        #[arg(long)]
        view: Option<String>,

        /// Initial worst-time sort direction, asc or desc (overrides config file)
        #[arg(long)]
        direction: Option<SortDirection>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Page URL used to build drill-down links (HTML only)
        #[arg(long)]
        page_url: Option<String>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the graph-page link for one table cell
    Drilldown {
        /// Current page URL
        #[arg(long)]
        url: String,

        /// Run the cell belongs to
        #[arg(long)]
        run_id: String,

        /// Test the cell belongs to
        #[arg(long)]
        test_id: String,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without rendering anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Commands::Render {
            table,
            events,
            view,
            direction,
            format,
            page_url,
            config: config_path,
            output,
        } => {
            let project_root = std::env::current_dir()?;
            let mut resolved_config =
                config::load_and_resolve(&project_root, config_path.as_deref())
                    .context("failed to load configuration")?;

            if let Some(config_path) = &resolved_config.config_path {
                eprintln!("Using config: {}", config_path.display());
            }

            // CLI flags override config file values
            if let Some(view) = view {
                resolved_config.initial_view = Some(view);
            }
            if let Some(direction) = direction {
                resolved_config.initial_direction = direction;
            }

            let mut table = ComparisonTable::load(&table)?;
            let mut state = open_view(&mut table, &resolved_config);
            apply_all(&mut table, &mut state, &events);

            let rendered = match format {
                OutputFormat::Text => render_text(&table, &state),
                OutputFormat::Json => render_json(&table, &state) + "\n",
                OutputFormat::Html => render_html(
                    &table,
                    &state,
                    &HtmlOptions {
                        page_url: page_url.as_deref(),
                        default_field: resolved_config.default_field,
                    },
                ),
            };

            match output {
                Some(path) => {
                    write_report(&path, &rendered)?;
                    eprintln!("Report written to: {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Commands::Drilldown {
            url,
            run_id,
            test_id,
            config: config_path,
        } => {
            let project_root = std::env::current_dir()?;
            let resolved_config = config::load_and_resolve(&project_root, config_path.as_deref())
                .context("failed to load configuration")?;
            println!(
                "{}",
                drilldown_url(&url, &run_id, &test_id, resolved_config.default_field)
            );
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Display:");
                println!("  neutral_color: {}", resolved.neutral_color);
                println!("  initial_direction: {}", resolved.initial_direction.as_str());
                println!(
                    "  initial_view: {}",
                    resolved.initial_view.as_deref().unwrap_or("all")
                );
                println!();
                println!("Drill-down:");
                println!("  default_field: {}", resolved.default_field);
            }
        },
    }

    Ok(())
}

/// Write a rendered report, creating parent directories as needed
fn write_report(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    // Atomic write (temp + rename pattern)
    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
