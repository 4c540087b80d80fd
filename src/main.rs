#![forbid(unsafe_code)]
//! # Letter Entropy CLI
//!
//! Command-line interface for the `letter_entropy` crate. It analyzes plain
//! text (`.txt` files or the built-in demonstration texts), prints a summary
//! per text, exports letter-frequency and bigram tables, and can write an
//! HTML report with embedded SVG charts.
//!
//! ## Example
//! ```bash
//! cargo run --release -- path/to/texts --export-format csv --html
//! cargo run --release -- --demo --html --out-dir reports
//! ```
//!
//! See `--help` for all available options.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::error;
use rayon::prelude::*;

use letter_entropy::{
    AnalysisResult, ConsoleReporter, ExportFormat, HtmlReporter, ResultConsumer, analyze_text,
    collect_files, export_result, print_summary_table,
};

/// The four demonstration texts: Russian and English, literature and science.
const DEMO_TEXTS: &[(&str, &str)] = &[
    (
        "Russian literature",
        "Война и мир - великий роман Толстого о судьбах людей во время войны с Наполеоном. \
         Герои произведения проходят через испытания, любовь и потери, раскрывая глубину \
         человеческой души.",
    ),
    (
        "Russian science",
        "Квантовая механика изучает поведение частиц на атомном уровне. Волновая функция \
         описывает состояние системы согласно уравнению Шрёдингера.",
    ),
    (
        "English literature",
        "It was the best of times, it was the worst of times. The story of great expectations \
         and dramatic turns of fate that shape the lives of characters in Victorian England.",
    ),
    (
        "English science",
        "Machine learning algorithms improve through experience. Deep learning uses neural \
         networks to extract patterns from large datasets for artificial intelligence \
         applications.",
    ),
];

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// File or directory with .txt files to analyze
    #[arg(required_unless_present = "demo", conflicts_with = "demo")]
    path: Option<String>,

    /// Analyze the built-in demonstration texts instead of files
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Directory for exports and the HTML report (created if missing)
    #[arg(long, default_value = ".")]
    out_dir: String,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, default_value = "txt")]
    export_format: ExportFormat,

    /// Write an HTML report with SVG charts
    #[arg(long, default_value_t = false)]
    html: bool,

    /// Number of letters in the top-letters pie chart and txt summary
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> io::Result<()> {
    let out_dir = PathBuf::from(&cli.out_dir);
    fs::create_dir_all(&out_dir)?;

    let mut failed_files = 0usize;
    let inputs: Vec<(String, String)> = if cli.demo {
        DEMO_TEXTS
            .iter()
            .map(|&(title, text)| (title.to_string(), text.to_string()))
            .collect()
    } else {
        // path is always Some when --demo is absent
        let path = cli.path.as_deref().unwrap_or_default();
        let files = collect_files(Path::new(path));
        if files.is_empty() {
            return Err(io::Error::other(format!(
                "No .txt files found under {path}"
            )));
        }
        let mut inputs = Vec::with_capacity(files.len());
        for file in files {
            match fs::read_to_string(&file) {
                Ok(text) => inputs.push((title_of(&file), text)),
                Err(e) => {
                    error!("Failed to read {}: {e}", file.display());
                    failed_files += 1;
                }
            }
        }
        inputs
    };

    // Each analysis is independent, so texts are processed in parallel.
    let results: Vec<(String, AnalysisResult)> = inputs
        .par_iter()
        .map(|(title, text)| (title.clone(), analyze_text(text)))
        .collect();

    let mut console = ConsoleReporter;
    let mut html = cli
        .html
        .then(|| HtmlReporter::new(&out_dir).with_top(cli.top));

    for (title, result) in &results {
        console.render(result, title)?;
        if let Some(reporter) = html.as_mut() {
            reporter.render(result, title)?;
        }
        export_result(result, &export_stem(title), cli.export_format, &out_dir, cli.top)?;
    }

    if let Some(reporter) = html {
        let path = reporter.finish()?;
        println!("HTML report: {}", path.display());
    }

    if results.len() > 1 {
        print_summary_table(&results);
    }

    if failed_files > 0 {
        return Err(io::Error::other(format!(
            "{failed_files} file(s) could not be read"
        )));
    }
    Ok(())
}

/// Report title for a file: its stem, lossily decoded.
fn title_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "text".to_string())
}

/// Turns a title into a safe lowercase file-name stem.
fn export_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let stem = stem.to_lowercase();
    if stem.chars().all(|c| c == '_') {
        "text".to_string()
    } else {
        stem
    }
}
