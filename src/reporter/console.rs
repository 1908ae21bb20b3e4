//! Console reporter with colored output

use crate::analyzer::matched_keywords;
use crate::{AnalysisResult, ProductInput, Recommendation};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, product: &ProductInput, result: &AnalysisResult) {
        print!("{}", self.render(product, result));
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, product: &ProductInput, result: &AnalysisResult) {
        println!("{}: {}", product.title, self.colorize_score(result.green_score));
    }

    /// Render the full report as a string
    pub fn render(&self, product: &ProductInput, result: &AnalysisResult) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&self.bold(&format!("🌱 Sustainability Analysis: {}", product.title)));
        out.push('\n');
        if !product.brand.is_empty() {
            out.push_str(&format!("   Brand: {}\n", product.brand));
        }
        out.push('\n');
        out.push_str(&format!(
            "  Green Score: {}/100\n",
            self.colorize_score(result.green_score)
        ));

        if self.verbose {
            out.push_str("\n  Keyword matches:\n");
            let matches = matched_keywords(&product.title);
            if matches.is_empty() {
                out.push_str("    (none)\n");
            }
            for m in matches {
                out.push_str(&format!("    {:+4}  {}\n", m.delta, m.keyword));
            }
        }

        out.push_str("\n  Positives:\n");
        for p in &result.positives {
            out.push_str(&format!("    {} {}\n", self.paint("✓", Tone::Good), p));
        }
        out.push_str("\n  Negatives:\n");
        for n in &result.negatives {
            out.push_str(&format!("    {} {}\n", self.paint("✗", Tone::Bad), n));
        }

        let tone = match result.recommendation {
            Recommendation::Positive => Tone::Good,
            Recommendation::Neutral => Tone::Fair,
            Recommendation::Negative => Tone::Bad,
        };
        out.push_str(&format!(
            "\n  💡 {}\n\n",
            self.paint(result.recommendation.as_str(), tone)
        ));
        out
    }

    fn colorize_score(&self, score: u8) -> String {
        let tone = match Recommendation::from_score(score) {
            Recommendation::Positive => Tone::Good,
            Recommendation::Neutral => Tone::Fair,
            Recommendation::Negative => Tone::Bad,
        };
        self.paint(&score.to_string(), tone)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        match tone {
            Tone::Good => text.green().to_string(),
            Tone::Fair => text.yellow().to_string(),
            Tone::Bad => text.red().to_string(),
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Good,
    Fair,
    Bad,
}
