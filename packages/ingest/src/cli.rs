//! Command-line interface for the ingest pipeline.
//!
//! The CLI owns all file I/O; the library stages never touch the disk
//! except to load a configured pattern library.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;

use crate::config::{validate_max_article_length, PipelineConfig};
use crate::error::{IngestError, Result};
use crate::metadata::MetadataExtractor;
use crate::pipeline::{Pipeline, ProcessedDocument};

/// Peraturan Ingest - Clean, parse and chunk Indonesian legislation.
#[derive(Parser)]
#[command(name = "peraturan-ingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chunk a document and write the chunk records.
    Chunk {
        /// Extracted text of the document (UTF-8)
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Print metadata and a structure summary of a document.
    Inspect {
        /// Extracted text of the document (UTF-8)
        file: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Document identifier attached to chunks (default: file stem)
    #[arg(long)]
    pub document_id: Option<String>,

    /// Maximum article length in characters before splitting by clause
    #[arg(long)]
    pub max_article_length: Option<usize>,

    /// YAML pattern library replacing the built-in one
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Also remove institutional letterheads (may over-trim)
    #[arg(long)]
    pub strip_letterheads: bool,
}

impl PipelineArgs {
    /// Environment configuration overridden by explicit flags.
    fn to_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::from_env()?;
        if let Some(length) = self.max_article_length {
            validate_max_article_length(length)?;
            config = config.with_max_article_length(length);
        }
        if let Some(path) = &self.patterns {
            config = config.with_pattern_library(path.clone());
        }
        if self.strip_letterheads {
            config = config.with_strip_letterheads(true);
        }
        Ok(config)
    }

    fn document_id(&self, file: &Path) -> String {
        self.document_id.clone().unwrap_or_else(|| {
            file.file_stem()
                .map_or_else(|| "document".to_string(), |s| s.to_string_lossy().into_owned())
        })
    }
}

/// Serialization format for chunk records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chunk {
            file,
            output,
            format,
            pipeline,
        } => chunk_command(&file, output.as_deref(), format, &pipeline),
        Commands::Inspect { file, pipeline } => inspect_command(&file, &pipeline),
    }
}

fn load(file: &Path, args: &PipelineArgs) -> Result<(Pipeline, ProcessedDocument)> {
    let config = args.to_config()?;
    let pipeline = Pipeline::new(&config)?;

    if !file.is_file() {
        return Err(IngestError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file does not exist: {}", file.display()),
        )));
    }
    let bytes = std::fs::read(file)?;
    let document = pipeline.process_bytes(&args.document_id(file), &bytes)?;
    Ok((pipeline, document))
}

/// Execute the chunk command.
fn chunk_command(
    file: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    args: &PipelineArgs,
) -> Result<()> {
    let (_, document) = load(file, args)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&document.chunks)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(&document.chunks)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes())?;
            eprintln!(
                "{} {} chunks from {} to {}",
                style("Wrote").green().bold(),
                style(document.chunks.len()).cyan(),
                file.display(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Execute the inspect command.
fn inspect_command(file: &Path, args: &PipelineArgs) -> Result<()> {
    let (pipeline, document) = load(file, args)?;
    let metadata = &document.metadata;
    let structure = &document.structure;
    let extractor = MetadataExtractor::new(pipeline.library());
    let record = metadata.to_record();

    println!(
        "{} {}",
        style("Document").bold(),
        style(&document.document_id).cyan()
    );
    println!("  Title: {}", style(&metadata.full_title).green());
    println!("  Type: {} ({})", record.doc_type, record.type_abbrev);
    println!("  Number: {}", record.number);
    println!("  Year: {}", record.year);
    println!("  Topic: {}", record.topic);
    println!("  Status: {}", metadata.status);
    if !extractor.is_legal_document(&document.cleaned) {
        println!(
            "  {}",
            style("Text does not look like a statutory instrument").yellow()
        );
    }
    println!();

    println!("{}", style("Structure").bold());
    println!("  Preamble: {}", yes_no(structure.preamble.is_some()));
    println!("  Chapters: {}", structure.chapters.len());
    for chapter in &structure.chapters {
        println!(
            "    {} ({} articles, {} parts)",
            chapter.label(),
            chapter.all_articles().len(),
            chapter.parts.len()
        );
    }
    println!("  Articles: {}", structure.articles.len());
    println!("  Elucidation: {}", yes_no(structure.elucidation.is_some()));
    println!();

    println!("{}", style("Output").bold());
    println!("  Chunks: {}", style(document.chunks.len()).cyan());
    println!(
        "  Max article length: {} chars",
        pipeline.chunker().max_article_length()
    );
    println!(
        "  Cleaning removed {} matches ({} chars)",
        document.report.removed_matches, document.report.removed_chars
    );

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
