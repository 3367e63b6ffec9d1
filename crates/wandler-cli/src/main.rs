// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wandler: PDF merge, split and compress, and conversion between PDF and
// Word, PowerPoint, Excel and images.
//
// Entry point. Parses arguments, initialises logging and configuration, and
// dispatches to the subcommand handlers.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wandler_core::ConverterConfig;
use wandler_core::human_errors::humanize_error;
use wandler_core::WandlerError;

use commands::{
    CompressArgs, ConvertArgs, FromImagesArgs, InfoArgs, MergeArgs, OfficeArgs, SplitArgs,
    ToJpgArgs, ToPptxArgs,
};

/// Convert, merge, split and compress documents
#[derive(Parser)]
#[command(name = "wandler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a JSON config file
    #[arg(short, long, global = true, env = "WANDLER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show page count and per-page contents of a PDF
    Info(InfoArgs),

    /// Merge two or more PDFs in the given order
    Merge(MergeArgs),

    /// Split a PDF into single pages (ZIP) or extract a page range
    Split(SplitArgs),

    /// Re-encode embedded images to shrink a PDF
    Compress(CompressArgs),

    /// Extract PDF text into a Word document
    ToDocx(ConvertArgs),

    /// Extract PDF text into a PowerPoint deck
    ToPptx(ToPptxArgs),

    /// Extract PDF text into an Excel sheet
    ToXlsx(ConvertArgs),

    /// Render one PDF page to JPEG
    ToJpg(ToJpgArgs),

    /// Build a PDF with one page per JPEG/PNG image
    FromImages(FromImagesArgs),

    /// Convert a Word or Excel file to PDF with LibreOffice
    OfficeToPdf(OfficeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbosity flag picks the level.
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    }
    .with_env_overrides();

    let result = match cli.command {
        Commands::Info(args) => commands::info(args),
        Commands::Merge(args) => commands::merge(args),
        Commands::Split(args) => commands::split(args),
        Commands::Compress(args) => commands::compress(args, &config),
        Commands::ToDocx(args) => commands::to_docx(args, &config),
        Commands::ToPptx(args) => commands::to_pptx(args, &config),
        Commands::ToXlsx(args) => commands::to_xlsx(args, &config),
        Commands::ToJpg(args) => commands::to_jpg(args, &config),
        Commands::FromImages(args) => commands::from_images(args, &config),
        Commands::OfficeToPdf(args) => commands::office_to_pdf(args, &config),
    };

    if let Err(err) = &result {
        if let Some(wandler_err) = err.downcast_ref::<WandlerError>() {
            let human = humanize_error(wandler_err);
            eprintln!("{}\n{}", human.message, human.suggestion);
        }
    }
    result
}
