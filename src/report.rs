//! Presentation layer: the two concrete [`ResultConsumer`]s.
//!
//! [`ConsoleReporter`] prints a per-text summary to stdout for interactive
//! use; [`HtmlReporter`] collects one section per text and writes a single
//! self-contained HTML file with embedded SVG charts. Both only read the
//! finished [`AnalysisResult`].

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use log::info;

use crate::charts::{self, ComparisonEntry};
use crate::{AnalysisResult, ResultConsumer};

/// Prints a short summary of each result to stdout.
pub struct ConsoleReporter;

impl ResultConsumer for ConsoleReporter {
    fn render(&mut self, result: &AnalysisResult, title: &str) -> io::Result<()> {
        println!("== {title} ==");
        println!(
            "  Language:   {} ({} letters)",
            result.alphabet.language(),
            result.alphabet.len()
        );
        println!("  Length:     {} letters", result.length);
        println!(
            "  Entropy:    {:.3} bits/letter (max {:.3})",
            result.entropy,
            result.max_entropy()
        );
        println!("  Efficiency: {:.1}%", result.efficiency() * 100.0);
        println!();
        Ok(())
    }
}

/// Prints the final cross-text table: title, language, entropy, efficiency.
pub fn print_summary_table(results: &[(String, AnalysisResult)]) {
    println!("{:-<72}", "");
    println!(
        "{:<30} {:<10} {:>14} {:>14}",
        "Text", "Language", "Entropy [bit]", "Efficiency"
    );
    println!("{:-<72}", "");
    for (title, result) in results {
        println!(
            "{:<30} {:<10} {:>14.3} {:>13.1}%",
            title,
            result.alphabet.language(),
            result.entropy,
            result.efficiency() * 100.0
        );
    }
    println!("{:-<72}", "");
}

/// Accumulates one report section per rendered result and writes a single
/// timestamped HTML file on [`HtmlReporter::finish`].
pub struct HtmlReporter {
    out_dir: PathBuf,
    top: usize,
    sections: Vec<String>,
    comparison: Vec<ComparisonEntry>,
}

impl HtmlReporter {
    pub fn new(out_dir: &Path) -> Self {
        HtmlReporter {
            out_dir: out_dir.to_path_buf(),
            top: 10,
            sections: Vec::new(),
            comparison: Vec::new(),
        }
    }

    /// Number of slices in the top-letters pie chart (default 10).
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top.max(1);
        self
    }

    /// Writes the collected sections as one HTML file and returns its path.
    /// A comparison chart is appended when more than one text was rendered.
    pub fn finish(self) -> io::Result<PathBuf> {
        let mut body = String::new();
        for section in &self.sections {
            body.push_str(section);
        }
        if self.comparison.len() > 1 {
            body.push_str("<section>\n<h2>Comparison</h2>\n");
            body.push_str(&charts::comparison_chart(&self.comparison));
            body.push_str(&charts::frequency_comparison(&self.comparison));
            body.push_str("</section>\n");
        }

        let html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Letter entropy report</title>\n\
             <style>body{{font-family:sans-serif;max-width:960px;margin:2em auto}}\
             section{{margin-bottom:3em}}table{{border-collapse:collapse}}\
             td,th{{padding:2px 10px;text-align:left}}</style>\n\
             </head>\n<body>\n<h1>Letter entropy report</h1>\n{body}</body>\n</html>\n"
        );

        let filename = Local::now()
            .format("%Y%m%d_%H%M%S_letter_entropy_report.html")
            .to_string();
        let path = self.out_dir.join(filename);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(html.as_bytes())?;
        info!("Wrote HTML report to {}", path.display());
        Ok(path)
    }
}

impl ResultConsumer for HtmlReporter {
    fn render(&mut self, result: &AnalysisResult, title: &str) -> io::Result<()> {
        let letters = result.alphabet.letters();
        let esc = charts::xml_escape(title);

        let mut section = format!(
            "<section>\n<h2>{esc}</h2>\n<table>\n\
             <tr><th>Language</th><td>{}</td></tr>\n\
             <tr><th>Length</th><td>{} letters</td></tr>\n\
             <tr><th>Entropy</th><td>{:.3} bits/letter</td></tr>\n\
             <tr><th>Maximum entropy</th><td>{:.3} bits/letter</td></tr>\n\
             <tr><th>Efficiency</th><td>{:.1}%</td></tr>\n</table>\n",
            result.alphabet.language(),
            result.length,
            result.entropy,
            result.max_entropy(),
            result.efficiency() * 100.0,
        );
        section.push_str(&charts::bar_chart(
            letters,
            &result.unigram_probs,
            &format!("Letter frequencies: {title}"),
        ));
        section.push_str(&charts::heatmap(
            letters,
            &result.bigram_probs,
            "Bigram probabilities (row: first letter, column: second)",
        ));
        section.push_str(&charts::pie_chart(
            &result.top_letters(self.top),
            &format!("Top {} letters", self.top),
        ));
        section.push_str("</section>\n");

        self.sections.push(section);
        self.comparison.push(ComparisonEntry::from_result(title, result));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze_text;

    #[test]
    fn console_reporter_renders() {
        let r = analyze_text("hello world");
        let mut c = ConsoleReporter;
        c.render(&r, "greeting").unwrap();
    }

    #[test]
    fn html_report_written_with_charts() {
        let td = tempfile::tempdir().unwrap();
        let mut reporter = HtmlReporter::new(td.path());
        reporter
            .render(&analyze_text("the quick brown fox"), "english")
            .unwrap();
        reporter.render(&analyze_text("привет мир"), "russian").unwrap();
        let path = reporter.finish().unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<h2>english</h2>"));
        assert!(html.contains("<h2>russian</h2>"));
        assert!(html.contains("<svg"));
        // Two texts rendered, so the comparison section is present, with
        // both the entropy bars and the overlaid frequency distributions.
        assert!(html.contains("<h2>Comparison</h2>"));
        assert!(html.contains("Entropy comparison"));
        assert!(html.contains("Letter-frequency distributions"));
        assert_eq!(html.matches("<polyline").count(), 2);
    }

    #[test]
    fn single_text_report_has_no_comparison() {
        let td = tempfile::tempdir().unwrap();
        let mut reporter = HtmlReporter::new(td.path());
        reporter.render(&analyze_text("only one"), "solo").unwrap();
        let path = reporter.finish().unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(!html.contains("<h2>Comparison</h2>"));
    }

    #[test]
    fn report_filename_is_timestamped() {
        let td = tempfile::tempdir().unwrap();
        let mut reporter = HtmlReporter::new(td.path());
        reporter.render(&analyze_text("abc"), "t").unwrap();
        let path = reporter.finish().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_letter_entropy_report.html"));
        assert!(name.chars().take(8).all(|c| c.is_ascii_digit()));
    }
}
