//! repdf CLI - PDF structure extraction and re-synthesis tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use repdf::render::{self, JsonFormat};
use repdf::synth::{self, SynthOptions};
use repdf::{
    convert, is_pdf, DocumentStructure, ExtractOptions, Modifications, PageSelection, PdfReader,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "repdf")]
#[command(version)]
#[command(about = "Extract PDF structure, convert it to editable models, and re-synthesize PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Fail on the first page-step error
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the document structure as JSON
    Extract {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Convert to the rich-text model (JSON)
    RichText {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert to the canvas model (JSON)
    Canvas {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export plain text
    Text {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export standalone HTML
    Html {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write a new PDF
    #[command(subcommand)]
    Synth(SynthCommands),
}

#[derive(Subcommand)]
enum SynthCommands {
    /// From a title and plain marked-up text
    Plain {
        /// Text file with the content
        #[arg(value_name = "CONTENT")]
        content: PathBuf,

        /// Document title
        #[arg(short, long)]
        title: String,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Add the generation date line under the title
        #[arg(long)]
        clean: bool,
    },

    /// From an extraction (JSON or the PDF itself) with modifications
    Structure {
        /// Extraction JSON or PDF file
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Document title
        #[arg(short, long)]
        title: String,

        /// Change list with `AVANT : ... APRÈS : ... ---` entries
        #[arg(long, value_name = "FILE")]
        changes: Option<PathBuf>,

        /// JSON object mapping old text to new text
        #[arg(long, value_name = "FILE")]
        modifications: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// From a rich-text model (JSON)
    RichText {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// From a canvas model (JSON)
    Canvas {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Keep page backgrounds, badges and table chrome
        #[arg(long)]
        keep_chrome: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            compact,
        } => cmd_extract(&input, output.as_deref(), compact),
        Commands::RichText { input, output } => cmd_rich_text(&input, output.as_deref()),
        Commands::Canvas { input, output } => cmd_canvas(&input, output.as_deref()),
        Commands::Text { input, output } => cmd_text(&input, output.as_deref()),
        Commands::Html { input, output } => cmd_html(&input, output.as_deref()),
        Commands::Info { input } => cmd_info(&input),
        Commands::Synth(command) => cmd_synth(command),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn extract(args: &InputArgs) -> Result<DocumentStructure, Box<dyn std::error::Error>> {
    let mut options = ExtractOptions::new();
    if let Some(pages) = &args.pages {
        let selection =
            PageSelection::parse(pages).map_err(|e| format!("Invalid page range: {}", e))?;
        options = options.with_pages(selection);
    }
    if args.strict {
        options = options.strict();
    }

    let pb = spinner("Extracting PDF structure...");
    let result = PdfReader::open_with_options(&args.input, options).and_then(|r| r.extract());
    pb.finish_and_clear();

    let doc = result?;
    for warning in &doc.stats.warnings {
        eprintln!("{} {}", "warning:".yellow(), warning);
    }
    Ok(doc)
}

fn emit(text: &str, output: Option<&Path>) -> CliResult {
    if let Some(path) = output {
        fs::write(path, text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn cmd_extract(input: &InputArgs, output: Option<&Path>, compact: bool) -> CliResult {
    let doc = extract(input)?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    emit(&render::to_json(&doc, format)?, output)
}

fn cmd_rich_text(input: &InputArgs, output: Option<&Path>) -> CliResult {
    let doc = extract(input)?;
    let model = convert::to_rich_text(&doc);
    emit(&render::to_json_value(&model, JsonFormat::Pretty)?, output)
}

fn cmd_canvas(input: &InputArgs, output: Option<&Path>) -> CliResult {
    let doc = extract(input)?;
    let model = convert::to_canvas(&doc);
    emit(&render::to_json_value(&model, JsonFormat::Pretty)?, output)
}

fn cmd_text(input: &InputArgs, output: Option<&Path>) -> CliResult {
    let doc = extract(input)?;
    emit(&render::to_text(&doc), output)
}

fn cmd_html(input: &InputArgs, output: Option<&Path>) -> CliResult {
    let doc = extract(input)?;
    emit(&render::to_html(&doc), output)
}

fn cmd_info(input: &Path) -> CliResult {
    let doc = PdfReader::open(input)?.extract()?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    for (key, value) in &doc.metadata {
        println!("{}: {}", key.bold(), value);
    }

    println!();
    println!("{}", "Extraction Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &doc.stats;
    println!("{}: {}", "Pages".bold(), doc.total_pages);
    println!("{}: {}", "Pages extracted".bold(), stats.pages_extracted);
    println!("{}: {}", "Text blocks".bold(), stats.text_blocks);
    println!("{}: {}", "Images".bold(), stats.images_extracted);
    println!("{}: {}", "Tables".bold(), stats.tables_detected);
    println!("{}: {:.3}s", "Time".bold(), doc.extraction_time);

    let words = doc.plain_text().split_whitespace().count();
    println!("{}: {}", "Words".bold(), words);

    for warning in &stats.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }
    for error in &stats.errors {
        println!("{} {}", "error:".red(), error);
    }

    Ok(())
}

fn load_structure(source: &Path) -> Result<DocumentStructure, Box<dyn std::error::Error>> {
    if is_pdf(source) {
        let pb = spinner("Extracting PDF structure...");
        let result = PdfReader::open(source).and_then(|r| r.extract());
        pb.finish_and_clear();
        return Ok(result?);
    }
    let json = fs::read_to_string(source)?;
    Ok(serde_json::from_str(&json)?)
}

fn load_modifications(
    changes: Option<&Path>,
    modifications: Option<&Path>,
) -> Result<Modifications, Box<dyn std::error::Error>> {
    let mut mods = Modifications::new();
    if let Some(path) = modifications {
        let parsed: Modifications = serde_json::from_str(&fs::read_to_string(path)?)?;
        for (old, new) in parsed.iter() {
            mods.push(old, new);
        }
    }
    if let Some(path) = changes {
        let parsed = Modifications::parse_change_list(&fs::read_to_string(path)?);
        for (old, new) in parsed.iter() {
            mods.push(old, new);
        }
    }
    Ok(mods)
}

fn write_pdf(bytes: &[u8], output: &Path) -> CliResult {
    fs::write(output, bytes)?;
    println!(
        "{} {} ({} bytes)",
        "Saved to".green(),
        output.display(),
        bytes.len()
    );
    Ok(())
}

fn cmd_synth(command: SynthCommands) -> CliResult {
    let options = SynthOptions::default();

    match command {
        SynthCommands::Plain {
            content,
            title,
            output,
            clean,
        } => {
            let text = fs::read_to_string(&content)?;
            let pdf = if clean {
                synth::synthesize_document(&title, &text, &options)?
            } else {
                synth::synthesize_plain(&title, &text, &options)?
            };
            write_pdf(&pdf, &output)
        }
        SynthCommands::Structure {
            source,
            title,
            changes,
            modifications,
            output,
        } => {
            let doc = load_structure(&source)?;
            let mods = load_modifications(changes.as_deref(), modifications.as_deref())?;
            println!("{} {} modifications", "Applying".cyan(), mods.len());
            let pdf = synth::synthesize_structure(&title, &doc, &mods, &options)?;
            write_pdf(&pdf, &output)
        }
        SynthCommands::RichText { input, output } => {
            let model = serde_json::from_str(&fs::read_to_string(&input)?)?;
            let pdf = synth::synthesize_rich_text(&model, &options)?;
            write_pdf(&pdf, &output)
        }
        SynthCommands::Canvas {
            input,
            output,
            keep_chrome,
        } => {
            let model = serde_json::from_str(&fs::read_to_string(&input)?)?;
            let options = options.with_skip_chrome(!keep_chrome);
            let pdf = synth::synthesize_canvas(&model, &options)?;
            write_pdf(&pdf, &output)
        }
    }
}
