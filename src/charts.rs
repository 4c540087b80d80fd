//! Self-contained SVG charts over analysis results.
//!
//! Every function here is a pure `String` builder so the charts can be
//! embedded directly into the HTML report or written to standalone files.
//! Layout constants are tuned for an A4-ish report column and are not
//! configurable.

use crate::AnalysisResult;

const CHART_WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_TOP: f64 = 40.0;

/// Per-text data for the cross-text comparison charts.
#[derive(Debug, Clone)]
pub struct ComparisonEntry {
    pub title: String,
    pub entropy: f64,
    pub max_entropy: f64,
    /// Unigram distribution, indexed by alphabet position. Lengths may
    /// differ between entries (26 vs. 32 letters).
    pub probs: Vec<f64>,
}

impl ComparisonEntry {
    pub fn from_result(title: &str, result: &AnalysisResult) -> Self {
        ComparisonEntry {
            title: title.to_string(),
            entropy: result.entropy,
            max_entropy: result.max_entropy(),
            probs: result.unigram_probs.clone(),
        }
    }
}

/// Letter-frequency bar chart with one labelled bar per alphabet letter and
/// a dashed reference line at the uniform probability `1/n`.
pub fn bar_chart(letters: &[char], probs: &[f64], title: &str) -> String {
    let n = letters.len().max(1);
    let plot_w = CHART_WIDTH - MARGIN_LEFT - 10.0;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = plot_w / n as f64;
    let uniform = 1.0 / n as f64;
    let y_max = probs
        .iter()
        .copied()
        .fold(uniform, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut svg = svg_open(CHART_WIDTH, CHART_HEIGHT);
    svg.push_str(&svg_title(title));

    for (i, (&letter, &p)) in letters.iter().zip(probs.iter()).enumerate() {
        let h = p / y_max * plot_h;
        let x = MARGIN_LEFT + i as f64 * slot;
        let y = MARGIN_TOP + plot_h - h;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
            x,
            y,
            (slot * 0.8).max(1.0),
            h,
            gradient_color(i as f64 / n as f64),
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>\n",
            x + slot * 0.4,
            CHART_HEIGHT - MARGIN_BOTTOM + 14.0,
            xml_escape(&letter.to_string()),
        ));
    }

    // Uniform-distribution reference line.
    let uy = MARGIN_TOP + plot_h - uniform / y_max * plot_h;
    svg.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"#888\" stroke-dasharray=\"6 3\"/>\n",
        MARGIN_LEFT,
        uy,
        MARGIN_LEFT + plot_w,
        uy,
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#888\">uniform 1/{}</text>\n",
        MARGIN_LEFT + 4.0,
        uy - 4.0,
        n,
    ));

    svg.push_str("</svg>\n");
    svg
}

/// Bigram probability heat map: first letter on rows, second on columns,
/// darker cells for more probable pairs.
pub fn heatmap(letters: &[char], matrix: &[Vec<f64>], title: &str) -> String {
    let n = letters.len().max(1);
    let cell = (560.0 / n as f64).min(20.0);
    let width = MARGIN_LEFT + n as f64 * cell + 10.0;
    let height = MARGIN_TOP + n as f64 * cell + MARGIN_BOTTOM;
    let peak = matrix
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut svg = svg_open(width, height);
    svg.push_str(&svg_title(title));

    for (i, row) in matrix.iter().enumerate() {
        for (j, &p) in row.iter().enumerate() {
            let x = MARGIN_LEFT + j as f64 * cell;
            let y = MARGIN_TOP + i as f64 * cell;
            svg.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{} → {}: {:.5}</title></rect>\n",
                x,
                y,
                cell,
                cell,
                heat_color(p / peak),
                xml_escape(&letters[i].to_string()),
                xml_escape(&letters[j].to_string()),
                p,
            ));
        }
    }

    for (i, &letter) in letters.iter().enumerate() {
        let esc = xml_escape(&letter.to_string());
        // Row label (first letter) and column label (second letter).
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"9\" text-anchor=\"end\">{}</text>\n",
            MARGIN_LEFT - 4.0,
            MARGIN_TOP + i as f64 * cell + cell * 0.75,
            esc,
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"9\" text-anchor=\"middle\">{}</text>\n",
            MARGIN_LEFT + i as f64 * cell + cell * 0.5,
            MARGIN_TOP + n as f64 * cell + 12.0,
            esc,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Pie chart of the most frequent letters. Slices with zero probability are
/// dropped; an empty distribution renders a "no data" placeholder.
pub fn pie_chart(slices: &[(char, f64)], title: &str) -> String {
    let size = 360.0;
    let cx = size / 2.0;
    let cy = MARGIN_TOP + (size - MARGIN_TOP) / 2.0;
    let r = (size - MARGIN_TOP) / 2.0 - 30.0;

    let mut svg = svg_open(size, size);
    svg.push_str(&svg_title(title));

    let total: f64 = slices.iter().map(|&(_, p)| p).filter(|&p| p > 0.0).sum();
    if total <= 0.0 {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\">no data</text>\n",
            cx, cy,
        ));
        svg.push_str("</svg>\n");
        return svg;
    }

    let count = slices.iter().filter(|&&(_, p)| p > 0.0).count();
    // Start at twelve o'clock, clockwise.
    let mut angle = -std::f64::consts::FRAC_PI_2;
    let mut slice_index = 0usize;
    for &(letter, p) in slices {
        if p <= 0.0 {
            continue;
        }
        let frac = p / total;
        let sweep = frac * std::f64::consts::TAU;
        let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
        let end = angle + sweep;
        let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
        let color = gradient_color(slice_index as f64 / count.max(1) as f64);

        if count == 1 {
            // A single slice is the whole disc; an arc path would collapse.
            svg.push_str(&format!(
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\"/>\n",
                cx, cy, r, color,
            ));
        } else {
            let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
            svg.push_str(&format!(
                "<path d=\"M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large} 1 {x2:.1} {y2:.1} Z\" fill=\"{color}\" stroke=\"white\"/>\n",
            ));
        }

        let mid = angle + sweep / 2.0;
        let (lx, ly) = (cx + (r + 16.0) * mid.cos(), cy + (r + 16.0) * mid.sin());
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{} {:.1}%</text>\n",
            lx,
            ly,
            xml_escape(&letter.to_string()),
            frac * 100.0,
        ));

        angle = end;
        slice_index += 1;
    }

    svg.push_str("</svg>\n");
    svg
}

/// Actual vs. maximum entropy per text, with the alphabet-usage efficiency
/// printed above each pair of bars.
pub fn comparison_chart(entries: &[ComparisonEntry]) -> String {
    let n = entries.len().max(1);
    let plot_w = CHART_WIDTH - MARGIN_LEFT - 10.0;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = plot_w / n as f64;
    let y_max = entries
        .iter()
        .map(|e| e.max_entropy)
        .fold(1.0_f64, f64::max);

    let mut svg = svg_open(CHART_WIDTH, CHART_HEIGHT + 20.0);
    svg.push_str(&svg_title("Entropy comparison (bits per letter)"));

    for (i, e) in entries.iter().enumerate() {
        let x = MARGIN_LEFT + i as f64 * slot;
        let max_h = e.max_entropy / y_max * plot_h;
        let act_h = e.entropy / y_max * plot_h;
        let base = MARGIN_TOP + plot_h;

        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#c8d8ec\"/>\n",
            x + slot * 0.1,
            base - max_h,
            slot * 0.35,
            max_h,
        ));
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#3a6ea5\"/>\n",
            x + slot * 0.5,
            base - act_h,
            slot * 0.35,
            act_h,
        ));

        let efficiency = if e.max_entropy > 0.0 {
            e.entropy / e.max_entropy * 100.0
        } else {
            0.0
        };
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{:.1}%</text>\n",
            x + slot * 0.5,
            base - max_h.max(act_h) - 6.0,
            efficiency,
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>\n",
            x + slot * 0.5,
            base + 16.0,
            xml_escape(&e.title),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Overlaid per-letter frequency distributions: one polyline per text over
/// alphabet positions, with a legend keyed by title.
pub fn frequency_comparison(entries: &[ComparisonEntry]) -> String {
    let n = entries
        .iter()
        .map(|e| e.probs.len())
        .max()
        .unwrap_or(0)
        .max(2);
    let plot_w = CHART_WIDTH - MARGIN_LEFT - 10.0;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let y_max = entries
        .iter()
        .flat_map(|e| e.probs.iter().copied())
        .fold(f64::MIN_POSITIVE, f64::max);
    let base = MARGIN_TOP + plot_h;

    let mut svg = svg_open(CHART_WIDTH, CHART_HEIGHT);
    svg.push_str(&svg_title(
        "Letter-frequency distributions (by alphabet position)",
    ));

    for (k, e) in entries.iter().enumerate() {
        let color = gradient_color(k as f64 / entries.len().max(1) as f64);
        let points: Vec<String> = e
            .probs
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let x = MARGIN_LEFT + i as f64 / (n - 1) as f64 * plot_w;
                let y = base - p / y_max * plot_h;
                format!("{x:.1},{y:.1}")
            })
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            points.join(" "),
            color,
        ));

        // Legend, one row per text at the top right.
        let ly = MARGIN_TOP + k as f64 * 16.0;
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            CHART_WIDTH - 220.0,
            ly,
            color,
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">{}</text>\n",
            CHART_WIDTH - 202.0,
            ly + 10.0,
            xml_escape(&e.title),
        ));
    }

    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#888\">alphabet position 0..{}</text>\n",
        MARGIN_LEFT,
        base + 16.0,
        n - 1,
    ));

    svg.push_str("</svg>\n");
    svg
}

/// Escapes the five XML special characters for use in SVG/HTML text nodes
/// and attributes.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---- Internal helpers ----

fn svg_open(width: f64, height: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"sans-serif\">\n",
    )
}

fn svg_title(title: &str) -> String {
    format!(
        "<text x=\"10\" y=\"20\" font-size=\"14\" font-weight=\"bold\">{}</text>\n",
        xml_escape(title),
    )
}

/// Blue-to-green ramp indexed by a fraction in `[0, 1]`.
fn gradient_color(frac: f64) -> String {
    let f = frac.clamp(0.0, 1.0);
    let r = (60.0 + 40.0 * f) as u8;
    let g = (80.0 + 140.0 * f) as u8;
    let b = (170.0 - 90.0 * f) as u8;
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// White-to-red ramp for heat map cells, `frac` relative to the hottest cell.
fn heat_color(frac: f64) -> String {
    let f = frac.clamp(0.0, 1.0);
    let g = (255.0 - 190.0 * f) as u8;
    let b = (255.0 - 230.0 * f) as u8;
    format!("#ff{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Alphabet, analyze};

    #[test]
    fn bar_chart_has_one_bar_per_letter() {
        let r = analyze("aab", Alphabet::Latin);
        let svg = bar_chart(r.alphabet.letters(), &r.unigram_probs, "bars");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<rect").count(), 26);
    }

    #[test]
    fn heatmap_has_n_squared_cells() {
        let r = analyze("abab", Alphabet::Latin);
        let svg = heatmap(r.alphabet.letters(), &r.bigram_probs, "pairs");
        assert_eq!(svg.matches("<rect").count(), 26 * 26);
    }

    #[test]
    fn pie_chart_drops_zero_slices() {
        let r = analyze("aab", Alphabet::Latin);
        let svg = pie_chart(&r.top_letters(10), "top");
        // Two non-zero letters, two slices.
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn pie_chart_handles_empty_distribution() {
        let r = analyze("", Alphabet::Latin);
        let svg = pie_chart(&r.top_letters(10), "top");
        assert!(svg.contains("no data"));
        assert_eq!(svg.matches("<path").count(), 0);
    }

    #[test]
    fn pie_chart_single_letter_is_full_circle() {
        let r = analyze("aaaa", Alphabet::Latin);
        let svg = pie_chart(&r.top_letters(10), "top");
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn comparison_chart_escapes_titles() {
        let e = ComparisonEntry {
            title: "Dombey & Son".into(),
            entropy: 4.0,
            max_entropy: 26f64.log2(),
            probs: vec![1.0 / 26.0; 26],
        };
        let svg = comparison_chart(&[e]);
        assert!(svg.contains("Dombey &amp; Son"));
        assert!(!svg.contains("Dombey & Son"));
    }

    #[test]
    fn frequency_comparison_has_one_line_per_text() {
        let english = ComparisonEntry::from_result("english", &analyze("aab", Alphabet::Latin));
        let russian =
            ComparisonEntry::from_result("russian", &analyze("ааб", Alphabet::Cyrillic));
        let svg = frequency_comparison(&[english, russian]);
        assert_eq!(svg.matches("<polyline").count(), 2);
        // Legend lists both titles.
        assert!(svg.contains(">english</text>"));
        assert!(svg.contains(">russian</text>"));
    }

    #[test]
    fn frequency_comparison_spans_longest_alphabet() {
        let russian = ComparisonEntry::from_result("r", &analyze("ааб", Alphabet::Cyrillic));
        let svg = frequency_comparison(&[russian]);
        assert!(svg.contains("alphabet position 0..31"));
    }

    #[test]
    fn escape_covers_all_specials() {
        assert_eq!(xml_escape("<a & \"b\"'>"), "&lt;a &amp; &quot;b&quot;&#39;&gt;");
    }
}
