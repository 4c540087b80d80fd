//! File export of analysis results: letter-frequency and bigram tables as
//! CSV/TSV, the full result as JSON, or a plain-text summary.
//!
//! Output files are named `<stem>_<YYYYMMDD>_<HHMMSS>_<table>.<ext>` so
//! repeated runs never overwrite each other.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use log::info;
use serde::Serialize;

use crate::AnalysisResult;

/// Export format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    title: &'a str,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

/// Writes `result` into `out_dir` in the requested format and returns the
/// paths of all files created (CSV/TSV produce two tables, the other
/// formats one file). `top` bounds the most-frequent-letters list in the
/// txt summary; the table formats always cover the full alphabet.
pub fn export_result(
    result: &AnalysisResult,
    stem: &str,
    format: ExportFormat,
    out_dir: &Path,
    top: usize,
) -> io::Result<Vec<PathBuf>> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let paths = match format {
        ExportFormat::Csv => export_tables(result, stem, &timestamp, out_dir, b',', "csv")?,
        ExportFormat::Tsv => export_tables(result, stem, &timestamp, out_dir, b'\t', "tsv")?,
        ExportFormat::Json => vec![export_json(result, stem, &timestamp, out_dir)?],
        ExportFormat::Txt => vec![export_txt(result, stem, &timestamp, out_dir, top)?],
    };
    for p in &paths {
        info!("Exported {}", p.display());
    }
    Ok(paths)
}

// ---- Internal helpers ----

fn export_tables(
    result: &AnalysisResult,
    stem: &str,
    timestamp: &str,
    out_dir: &Path,
    delimiter: u8,
    ext: &str,
) -> io::Result<Vec<PathBuf>> {
    let letters = result.alphabet.letters();

    let freq_path = out_dir.join(format!("{stem}_{timestamp}_letterfreq.{ext}"));
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(&freq_path)
        .map_err(io::Error::other)?;
    wtr.write_record(["letter", "probability"])
        .map_err(io::Error::other)?;
    for (&letter, &p) in letters.iter().zip(result.unigram_probs.iter()) {
        wtr.write_record([letter.to_string(), p.to_string()])
            .map_err(io::Error::other)?;
    }
    wtr.flush()?;

    // Bigram matrix: header row of second letters, one row per first letter.
    let bigram_path = out_dir.join(format!("{stem}_{timestamp}_bigrams.{ext}"));
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(&bigram_path)
        .map_err(io::Error::other)?;
    let mut header = vec![String::new()];
    header.extend(letters.iter().map(|c| c.to_string()));
    wtr.write_record(&header).map_err(io::Error::other)?;
    for (&letter, row) in letters.iter().zip(result.bigram_probs.iter()) {
        let mut record = vec![letter.to_string()];
        record.extend(row.iter().map(|p| p.to_string()));
        wtr.write_record(&record).map_err(io::Error::other)?;
    }
    wtr.flush()?;

    Ok(vec![freq_path, bigram_path])
}

fn export_json(
    result: &AnalysisResult,
    stem: &str,
    timestamp: &str,
    out_dir: &Path,
) -> io::Result<PathBuf> {
    let path = out_dir.join(format!("{stem}_{timestamp}_analysis.json"));
    let export = JsonExport {
        title: stem,
        result,
    };
    let json = serde_json::to_string_pretty(&export).map_err(io::Error::other)?;
    write_new(&path, json.as_bytes())?;
    Ok(path)
}

fn export_txt(
    result: &AnalysisResult,
    stem: &str,
    timestamp: &str,
    out_dir: &Path,
    top: usize,
) -> io::Result<PathBuf> {
    let path = out_dir.join(format!("{stem}_{timestamp}_summary.txt"));
    let mut out = String::new();
    out.push_str(&format!("Text: {stem}\n"));
    out.push_str(&format!(
        "Language: {} ({} letters)\n",
        result.alphabet.language(),
        result.alphabet.len()
    ));
    out.push_str(&format!("Length: {} letters\n", result.length));
    out.push_str(&format!(
        "Entropy: {:.3} bits/letter (max {:.3}, efficiency {:.1}%)\n\n",
        result.entropy,
        result.max_entropy(),
        result.efficiency() * 100.0
    ));
    out.push_str("Most frequent letters:\n");
    for (letter, p) in result.top_letters(top) {
        if p <= 0.0 {
            break;
        }
        out.push_str(&format!("  {letter}  {:.4}\n", p));
    }
    write_new(&path, out.as_bytes())?;
    Ok(path)
}

fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze_text;

    #[test]
    fn csv_export_writes_both_tables() {
        let td = tempfile::tempdir().unwrap();
        let r = analyze_text("hello world");
        let paths = export_result(&r, "greeting", ExportFormat::Csv, td.path(), 10).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].to_string_lossy().ends_with("_letterfreq.csv"));
        assert!(paths[1].to_string_lossy().ends_with("_bigrams.csv"));

        let freq = std::fs::read_to_string(&paths[0]).unwrap();
        // Header plus one row per Latin letter.
        assert_eq!(freq.lines().count(), 27);
        assert!(freq.starts_with("letter,probability"));
    }

    #[test]
    fn tsv_export_uses_tabs() {
        let td = tempfile::tempdir().unwrap();
        let r = analyze_text("hello");
        let paths = export_result(&r, "t", ExportFormat::Tsv, td.path(), 10).unwrap();
        let freq = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(freq.starts_with("letter\tprobability"));
    }

    #[test]
    fn json_export_round_trips_probabilities() {
        let td = tempfile::tempdir().unwrap();
        let r = analyze_text("the quick brown fox");
        let paths = export_result(&r, "fox", ExportFormat::Json, td.path(), 10).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths[0]).unwrap()).unwrap();
        assert_eq!(v["title"], "fox");
        assert_eq!(v["alphabet"], "latin");
        let sum: f64 = v["unigram_probs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_f64().unwrap())
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn txt_export_lists_top_letters() {
        let td = tempfile::tempdir().unwrap();
        let r = analyze_text("aaab");
        let paths = export_result(&r, "aaab", ExportFormat::Txt, td.path(), 10).unwrap();
        let txt = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(txt.contains("Language: English"));
        assert!(txt.contains("  a  0.7500"));
    }

    #[test]
    fn txt_export_respects_top_bound() {
        let td = tempfile::tempdir().unwrap();
        let r = analyze_text("aaabbc");
        let paths = export_result(&r, "abc", ExportFormat::Txt, td.path(), 2).unwrap();
        let txt = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(txt.contains("  a  "));
        assert!(txt.contains("  b  "));
        // Third-ranked letter is cut off by top=2.
        assert!(!txt.contains("  c  "));
    }
}
