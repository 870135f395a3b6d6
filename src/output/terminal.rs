// file: src/output/terminal.rs
// description: terminal rendering of query outcomes
// reference: colored summaries with per-result source previews

use crate::pipeline::QueryOutcome;
use crate::utils::Validator;
use colored::Colorize;

/// Renders outcomes for a terminal. Only the display is capped at
/// `max_display`; the outcome itself is untouched.
#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    max_display: usize,
    show_dsl: bool,
    preview_chars: usize,
}

impl TerminalPresenter {
    pub fn new(max_display: usize) -> Self {
        Self {
            max_display,
            show_dsl: false,
            preview_chars: 300,
        }
    }

    pub fn with_dsl(mut self, show_dsl: bool) -> Self {
        self.show_dsl = show_dsl;
        self
    }

    pub fn render(&self, outcome: &QueryOutcome) -> String {
        let mut output = String::new();

        if self.show_dsl {
            output.push_str(&format!("{}\n{}\n\n", "Generated DSL:".bold(), outcome.dsl));
        }

        if outcome.results.is_empty() {
            output.push_str(&format!(
                "No results found for query: \"{}\"\n",
                outcome.query
            ));
            return output;
        }

        let shown = outcome.results.len().min(self.max_display);
        output.push_str(&format!(
            "{} {} | displaying {} of {} results ({:.2}s)\n",
            "Total hits:".bold(),
            outcome.total_hits,
            shown,
            outcome.results.len(),
            outcome.elapsed.as_secs_f64()
        ));
        output.push_str(&format!("{}\n", "=".repeat(80)));

        for (idx, result) in outcome.results.iter().take(shown).enumerate() {
            let score = match result.score {
                Some(score) => format!("{:.4}", score),
                None => "n/a".to_string(),
            };

            output.push_str(&format!(
                "\n{} {} (Score: {})\n",
                format!("{}.", idx + 1).cyan().bold(),
                result.id,
                score
            ));
            output.push_str(&format!(
                "   Source: {}\n",
                Validator::truncate_text(&result.source_json(), self.preview_chars)
            ));
        }

        output.push_str(&format!("\n{}\n", "=".repeat(80)));
        output
    }

    pub fn print(&self, outcome: &QueryOutcome) {
        print!("{}", self.render(outcome));
    }
}
