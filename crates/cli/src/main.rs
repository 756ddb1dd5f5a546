//! # kpidash-cli
//!
//! Command-line interface for the kpidash dashboard.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use kpidash_core::{load_path, sample_dataset, Dataset, HeaderMetrics};
use kpidash_viz::{render_dashboard, PageOptions, SourceStatus};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// kpidash - Digital transformation KPI dashboard
#[derive(Parser)]
#[command(name = "kpidash")]
#[command(author, version, about = "Render the KPI dashboard from sample data or an xlsx workbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render the dashboard to a static HTML file
    Render {
        /// Workbook with sheets Valor_Financiero, Cultura_Digital, CX_KPI, Riesgos
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Use the bundled sample data even if FILE is given
        #[arg(long)]
        sample: bool,

        /// Output HTML path
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },

    /// Print the header metrics
    Summary {
        /// Workbook to read (sample data when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Write the sample data as an xlsx template with the four sheets
    Template {
        /// Output workbook path
        #[arg(short, long, default_value = "kpidash_template.xlsx")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match cli.command {
        Command::Render {
            file,
            sample,
            output,
        } => {
            let file = if sample { None } else { file };
            run_render(file.as_deref(), &output)
        }
        Command::Summary { file } => run_summary(file.as_deref()),
        Command::Template { output } => run_template(&output),
    }
}

/// Load from a workbook, or the sample data when no path is given.
fn load_dataset(file: Option<&Path>) -> Result<(Dataset, SourceStatus)> {
    match file {
        Some(path) => {
            debug!(path = %path.display(), "loading workbook");
            let data = load_path(path).with_context(|| {
                format!("Error leyendo el Excel {}", path.display())
            })?;
            Ok((data, SourceStatus::Uploaded))
        }
        None => Ok((sample_dataset(), SourceStatus::Sample)),
    }
}

/// Render the dashboard page.
fn run_render(file: Option<&Path>, output: &Path) -> Result<()> {
    let (data, status) = load_dataset(file)?;
    let html = render_dashboard(&data, &status, &PageOptions::offline());

    std::fs::write(output, html)
        .with_context(|| format!("Failed to write file: {}", output.display()))?;
    info!(output = %output.display(), "dashboard written");

    let source = file.map_or_else(|| "sample data".to_string(), |p| p.display().to_string());
    println!(
        "{} {} ({})",
        "Rendered".green().bold(),
        output.display(),
        source.dimmed()
    );
    Ok(())
}

/// Print the four header metrics.
fn run_summary(file: Option<&Path>) -> Result<()> {
    let (data, _) = load_dataset(file)?;
    let header = HeaderMetrics::from_financial(&data.financial);

    for card in header.cards() {
        println!("{:>14}  {}", card.label.cyan(), card.value.bold());
    }
    println!(
        "{:>14}  {} etapas, {} indicadores, {} riesgos",
        "Tablas".cyan(),
        data.cx.len(),
        data.culture.len(),
        data.risks.len()
    );
    Ok(())
}

/// Write the template workbook.
fn run_template(output: &Path) -> Result<()> {
    sample_dataset()
        .to_book()
        .save_as_xlsx(output)
        .with_context(|| format!("Failed to write workbook: {}", output.display()))?;

    println!("{} {}", "Template".green().bold(), output.display());
    Ok(())
}
