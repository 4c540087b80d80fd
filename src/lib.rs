//! Letter-frequency and entropy analysis for Russian and English text.
//!
//! The engine is three small steps: [`normalize`] lower-cases the input,
//! picks the dominant alphabet (Cyrillic vs. Latin) by counting letters and
//! strips everything else; [`analyze`] turns the cleaned text into unigram
//! probabilities, a bigram probability matrix and the Shannon entropy of the
//! unigram distribution; [`analyze_text`] composes the two.
//!
//! Analysis is a pure function of its input: no shared state, no I/O, no
//! failure modes. Degenerate inputs (empty text, single letter) produce
//! zero-filled probabilities instead of errors. Rendering and export live in
//! [`report`], [`charts`] and [`export`] and only read the finished
//! [`AnalysisResult`] through the [`ResultConsumer`] seam.

use std::io;
use std::path::Path;

use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

pub mod charts;
pub mod export;
pub mod report;

pub use export::{ExportFormat, export_result};
pub use report::{ConsoleReporter, HtmlReporter, print_summary_table};

/// The 32 lowercase letters of the Russian alphabet, `ё` excluded.
pub const CYRILLIC_LETTERS: [char; 32] = [
    'а', 'б', 'в', 'г', 'д', 'е', 'ж', 'з', 'и', 'й', 'к', 'л', 'м', 'н', 'о', 'п', 'р', 'с', 'т',
    'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ', 'ы', 'ь', 'э', 'ю', 'я',
];

/// The 26 lowercase letters of the English alphabet.
pub const LATIN_LETTERS: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// One of the two supported alphabets. Selected once per analysis by
/// [`normalize`] and carried in the result so consumers can map indices back
/// to letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    Cyrillic,
    Latin,
}

impl Alphabet {
    /// The ordered letter sequence; index `i` here corresponds to position
    /// `i` in `unigram_probs` and to row/column `i` in `bigram_probs`.
    pub fn letters(self) -> &'static [char] {
        match self {
            Alphabet::Cyrillic => &CYRILLIC_LETTERS,
            Alphabet::Latin => &LATIN_LETTERS,
        }
    }

    /// Number of letters (32 or 26).
    pub fn len(self) -> usize {
        self.letters().len()
    }

    /// Position of `c` in this alphabet, or `None` for any other character.
    pub fn index_of(self, c: char) -> Option<usize> {
        self.letters().iter().position(|&l| l == c)
    }

    pub fn contains(self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    /// `log2(n)`: the entropy of a uniform distribution over this alphabet,
    /// the upper bound for any text.
    pub fn max_entropy(self) -> f64 {
        (self.len() as f64).log2()
    }

    /// Human-readable language name for reports.
    pub fn language(self) -> &'static str {
        match self {
            Alphabet::Cyrillic => "Russian",
            Alphabet::Latin => "English",
        }
    }
}

/// Result of analyzing one text. Fully computed before it is returned and
/// never mutated afterwards; presentation code only reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Alphabet the probabilities are indexed by.
    pub alphabet: Alphabet,
    /// One probability per alphabet position. Sums to 1.0 for non-empty
    /// cleaned text, all-zero otherwise.
    pub unigram_probs: Vec<f64>,
    /// `bigram_probs[i][j]` is the probability of the ordered pair
    /// (letter `i`, letter `j`) among all adjacent pairs. All-zero when the
    /// cleaned text is shorter than two characters.
    pub bigram_probs: Vec<Vec<f64>>,
    /// Shannon entropy (base 2) of `unigram_probs`, in bits per letter.
    pub entropy: f64,
    /// Number of characters kept after cleaning.
    pub length: usize,
}

impl AnalysisResult {
    /// Entropy of a uniform distribution over the selected alphabet.
    pub fn max_entropy(&self) -> f64 {
        self.alphabet.max_entropy()
    }

    /// Fraction of the maximum entropy this text reaches, in `[0, 1]`.
    pub fn efficiency(&self) -> f64 {
        self.entropy / self.max_entropy()
    }

    /// The `n` most frequent letters with their probabilities, most frequent
    /// first. Ties keep alphabet order.
    pub fn top_letters(&self, n: usize) -> Vec<(char, f64)> {
        let mut pairs: Vec<(char, f64)> = self
            .alphabet
            .letters()
            .iter()
            .copied()
            .zip(self.unigram_probs.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        pairs.truncate(n);
        pairs
    }
}

/// Anything that can present an [`AnalysisResult`] under a title: a terminal
/// summary, an HTML report section, a chart file. The engine and the driver
/// depend only on this trait, never on a concrete renderer.
pub trait ResultConsumer {
    fn render(&mut self, result: &AnalysisResult, title: &str) -> io::Result<()>;
}

/// Lower-cases `text`, detects the dominant alphabet and strips every
/// character outside it.
///
/// Detection counts letters of each alphabet in the lower-cased text and
/// selects Cyrillic only when its count is strictly greater; ties, including
/// the 0–0 tie on empty or letter-free input, fall through to Latin. That
/// default is deliberate, not a detection failure.
///
/// Total over all inputs; the cleaned string may be empty.
///
/// # Example
/// ```
/// use letter_entropy::{Alphabet, normalize};
/// let (cleaned, alphabet) = normalize("Hello, World! 123");
/// assert_eq!(cleaned, "helloworld");
/// assert_eq!(alphabet, Alphabet::Latin);
/// ```
pub fn normalize(text: &str) -> (String, Alphabet) {
    let lowered = text.to_lowercase();

    let mut cyrillic = 0usize;
    let mut latin = 0usize;
    for c in lowered.chars() {
        if Alphabet::Cyrillic.contains(c) {
            cyrillic += 1;
        } else if Alphabet::Latin.contains(c) {
            latin += 1;
        }
    }

    let alphabet = if cyrillic > latin {
        Alphabet::Cyrillic
    } else {
        Alphabet::Latin
    };

    let cleaned: String = lowered.chars().filter(|&c| alphabet.contains(c)).collect();
    (cleaned, alphabet)
}

/// Computes unigram and bigram probabilities and Shannon entropy for
/// `cleaned` over `alphabet`.
///
/// `cleaned` is expected to come from [`normalize`]; characters outside the
/// alphabet are nevertheless ignored rather than causing an error, so the
/// function stays total. Empty input yields all-zero probabilities and zero
/// entropy; a single character yields an all-zero bigram matrix.
///
/// # Example
/// ```
/// use letter_entropy::{Alphabet, analyze};
/// let r = analyze("aab", Alphabet::Latin);
/// assert!((r.unigram_probs[0] - 2.0 / 3.0).abs() < 1e-12);
/// assert!((r.bigram_probs[0][1] - 0.5).abs() < 1e-12);
/// assert!((r.entropy - 0.9182958340544896).abs() < 1e-9);
/// ```
pub fn analyze(cleaned: &str, alphabet: Alphabet) -> AnalysisResult {
    let n = alphabet.len();
    let chars: Vec<char> = cleaned.chars().collect();
    let length = chars.len();

    // Unigram pass.
    let mut counts = vec![0u64; n];
    for &c in &chars {
        if let Some(i) = alphabet.index_of(c) {
            counts[i] += 1;
        }
    }
    let unigram_probs: Vec<f64> = if length == 0 {
        vec![0.0; n]
    } else {
        counts.iter().map(|&c| c as f64 / length as f64).collect()
    };

    // Bigram pass over adjacent ordered pairs.
    let mut pair_counts = vec![vec![0u64; n]; n];
    let mut pair_total = 0u64;
    for pair in chars.windows(2) {
        if let (Some(i), Some(j)) = (alphabet.index_of(pair[0]), alphabet.index_of(pair[1])) {
            pair_counts[i][j] += 1;
            pair_total += 1;
        }
    }
    let bigram_probs: Vec<Vec<f64>> = if pair_total == 0 {
        vec![vec![0.0; n]; n]
    } else {
        pair_counts
            .iter()
            .map(|row| row.iter().map(|&c| c as f64 / pair_total as f64).collect())
            .collect()
    };

    // Zero-probability terms contribute nothing and must not reach log2.
    let entropy: f64 = unigram_probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum();

    AnalysisResult {
        alphabet,
        unigram_probs,
        bigram_probs,
        entropy,
        length,
    }
}

/// Convenience entry point: [`normalize`] then [`analyze`].
pub fn analyze_text(raw: &str) -> AnalysisResult {
    let (cleaned, alphabet) = normalize(raw);
    analyze(&cleaned, alphabet)
}

/// Collects all `.txt` files under `path` (or `path` itself when it is a
/// file), sorted for deterministic processing order.
pub fn collect_files(path: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<std::path::PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            let keep = p.extension().map(|x| x == "txt").unwrap_or(false);
            if !keep {
                debug!("Skipping non-txt file {}", p.display());
            }
            keep
        })
        .collect();
    files.sort();
    files
}
