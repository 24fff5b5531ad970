//! Text shown alongside a simulation run

use crate::types::SignificanceReport;

/// Title of the distribution plot
pub fn plot_title(flip_count: u64, trial_count: u64) -> String {
    format!(
        "Distribution of Expected Value of Heads\n{} Flips, {} Trials",
        flip_count, trial_count
    )
}

/// Horizontal axis label of the distribution plot
pub fn x_label() -> &'static str {
    "Expected Value of Heads"
}

/// Vertical axis label; bars and curve are on the density scale
pub fn y_label() -> &'static str {
    "Density"
}

/// Legend label of the dashed mean marker
pub fn mean_label(mean: f64) -> String {
    format!("Mean: {:.4}", mean)
}

impl SignificanceReport {
    /// Alpha, average p-value (4 decimals) and conclusion, one line each
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Significance Level (Alpha): {}", self.alpha),
            format!("Average P-Value from Simulation: {:.4}", self.average_p_value),
            format!("Conclusion: The coin is {}.", self.verdict),
        ]
    }
}

impl std::fmt::Display for SignificanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary_lines().join("\n"))
    }
}
