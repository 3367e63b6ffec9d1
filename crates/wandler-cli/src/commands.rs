// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand arguments and handlers. Each handler reads its inputs from disk,
// runs one engine operation, and writes one output file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;
use wandler_bridge::{ConversionTarget, convert_bytes, office_converter};
use wandler_core::{CompressionProfile, ConverterConfig, DocumentType, OutputName, SplitRequest};
use wandler_document::{DocumentComposer, FormatTranscoder, PageSource, SplitOutput};

// -- Arguments ------------------------------------------------------------------

#[derive(Args)]
pub struct InfoArgs {
    /// Input PDF
    input: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Input PDFs, merged in this order
    #[arg(required = true, num_args = 2..)]
    inputs: Vec<PathBuf>,

    /// Output file (default: merged_document.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SplitArgs {
    /// Input PDF
    input: PathBuf,

    /// Extract pages START-END (1-based, inclusive) instead of every page
    #[arg(short, long, value_parser = parse_range)]
    range: Option<(usize, usize)>,

    /// Output file (default: split_pages.zip or pages_<s>_to_<e>.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompressArgs {
    /// Input PDF
    input: PathBuf,

    /// Compression level, 1 (light) to 5 (maximum)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
    level: Option<u8>,

    /// Output file (default: compressed_<name>)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input PDF
    input: PathBuf,

    /// Output file (default: input stem with the new extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ToPptxArgs {
    #[command(flatten)]
    convert: ConvertArgs,

    /// Name shown on the title slide (default: the input file name)
    #[arg(long)]
    source_name: Option<String>,
}

#[derive(Args)]
pub struct ToJpgArgs {
    /// Input PDF
    input: PathBuf,

    /// Page to render, 1-based; past the end renders page 1
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    page: u64,

    /// Output file (default: <stem>_page<n>.jpg)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct FromImagesArgs {
    /// JPEG or PNG images, one page each, in this order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output file (default: converted_document.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct OfficeArgs {
    /// Office document (.doc/.docx/.pptx/.xls/.xlsx)
    input: PathBuf,

    /// Output file (default: input stem with .pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Parse `START-END` (or a single page `N`) into 1-based bounds.
pub fn parse_range(value: &str) -> Result<(usize, usize), String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("`{}` is not a page number", part.trim()))
    };
    match value.split_once('-') {
        Some((start, end)) => Ok((parse(start)?, parse(end)?)),
        None => {
            let page = parse(value)?;
            Ok((page, page))
        }
    }
}

// -- Handlers -------------------------------------------------------------------

pub fn info(args: InfoArgs) -> anyhow::Result<()> {
    let source = open_pdf(&args.input)?;
    let info = source.info()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("Total pages: {}", info.page_count);
    for page in &info.pages {
        println!(
            "  page {:>4}  images: {:>3}  text: {}",
            page.index + 1,
            page.image_count,
            if page.has_text { "yes" } else { "no" }
        );
    }
    Ok(())
}

pub fn merge(args: MergeArgs) -> anyhow::Result<()> {
    let buffers = args
        .inputs
        .iter()
        .map(|path| read_input(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let merged = DocumentComposer::new().merge_pdfs(&buffers)?;
    write_output(args.output, OutputName::merged(), &merged)
}

pub fn split(args: SplitArgs) -> anyhow::Result<()> {
    let source = open_pdf(&args.input)?;
    let (request, default_name) = match args.range {
        Some((start, end)) => (
            SplitRequest::Range { start, end },
            OutputName::page_range(start, end),
        ),
        None => (SplitRequest::EveryPage, OutputName::split_archive().to_string()),
    };
    let output = DocumentComposer::new().split(&source, request)?;
    if let SplitOutput::Archive(_) = &output {
        info!(pages = source.page_count(), "Every page split out");
    }
    write_output(args.output, &default_name, output.bytes())
}

pub fn compress(args: CompressArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let profile = match args.level {
        Some(level) => CompressionProfile::from_level(level)?,
        None => config.default_compression,
    };
    let data = read_input(&args.input)?;
    let report = DocumentComposer::new().compress_pdf(&data, profile)?;
    println!("{}", report.summary());
    write_output(
        args.output,
        &OutputName::compressed(&display_name(&args.input)),
        &report.bytes,
    )
}

pub fn to_docx(args: ConvertArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let source = open_pdf(&args.input)?;
    let docx = FormatTranscoder::from_config(config).pdf_to_docx(&source)?;
    let name = OutputName::converted(&display_name(&args.input), DocumentType::Docx);
    write_output(args.output, &name, &docx)
}

pub fn to_pptx(args: ToPptxArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let input_name = display_name(&args.convert.input);
    let source = open_pdf(&args.convert.input)?;
    let title_name = args.source_name.unwrap_or_else(|| input_name.clone());
    let pptx = FormatTranscoder::from_config(config).pdf_to_pptx(&source, &title_name)?;
    let name = OutputName::converted(&input_name, DocumentType::Pptx);
    write_output(args.convert.output, &name, &pptx)
}

pub fn to_xlsx(args: ConvertArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let source = open_pdf(&args.input)?;
    let xlsx = FormatTranscoder::from_config(config).pdf_to_xlsx(&source)?;
    let name = OutputName::converted(&display_name(&args.input), DocumentType::Xlsx);
    write_output(args.output, &name, &xlsx)
}

pub fn to_jpg(args: ToJpgArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let source = open_pdf(&args.input)?;
    let page_number = usize::try_from(args.page).context("page number too large")?;
    // Out-of-range pages fall back to the first page, so name the file after
    // the page actually rendered.
    let rendered = if page_number <= source.page_count() { page_number } else { 1 };
    let jpeg = FormatTranscoder::from_config(config).pdf_to_jpeg(&source, page_number - 1)?;
    let name = OutputName::rasterized(&display_name(&args.input), rendered);
    write_output(args.output, &name, &jpeg)
}

pub fn from_images(args: FromImagesArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let images = args
        .images
        .iter()
        .map(|path| read_image(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let pdf = FormatTranscoder::from_config(config).images_to_pdf(&images)?;
    write_output(args.output, OutputName::images_to_pdf(), &pdf)
}

pub fn office_to_pdf(args: OfficeArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let input_name = display_name(&args.input);
    let data = read_input(&args.input)?;
    check_office_input(&args.input, &data)?;
    let converter = office_converter(config);
    let pdf = convert_bytes(
        converter.as_ref(),
        &data,
        &input_name,
        ConversionTarget::for_input(&input_name),
    )?;
    let name = OutputName::converted(&input_name, DocumentType::Pdf);
    write_output(args.output, &name, &pdf)
}

// -- Helpers --------------------------------------------------------------------

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read an image, refusing anything but JPEG and PNG.
fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = read_input(path)?;
    match DocumentType::sniff(&data) {
        Some(kind) if kind.is_raster() => Ok(data),
        _ => anyhow::bail!("{} is not a JPEG or PNG image", path.display()),
    }
}

/// The office bridge needs an office extension; OOXML content must also be a
/// ZIP container. Legacy binary formats are not sniffed.
fn check_office_input(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentType::from_extension);
    if !by_extension.is_some_and(|kind| kind.is_office()) {
        anyhow::bail!("{} is not an office document", path.display());
    }
    if let Some(kind) = DocumentType::sniff(data) {
        if kind != DocumentType::Zip {
            anyhow::bail!(
                "{} contains {} data, not an office document",
                path.display(),
                kind.extension()
            );
        }
    }
    Ok(())
}

fn open_pdf(path: &Path) -> anyhow::Result<PageSource> {
    let data = read_input(path)?;
    PageSource::open(&data).with_context(|| format!("failed to open {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Write `data` to `output`, or to `default_name` in the current directory.
fn write_output(output: Option<PathBuf>, default_name: &str, data: &[u8]) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(default_name));
    fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = data.len(), "Output written");
    println!("{}", path.display());
    Ok(())
}
