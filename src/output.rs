//! Output formatting and styling module.
//!
//! All progress reporting goes through `OutputFormatter`, so message style
//! stays consistent between the grouping and renaming pipelines.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗, on stderr)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for copy loops
/// - Summary tables with per-category counts
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use spritesort::output::OutputFormatter;
    /// OutputFormatter::success("All done!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for a copy loop.
    ///
    /// The bar draws on stderr and hides itself when stderr is not a terminal.
    /// Print per-file lines with [`OutputFormatter::above`] so they are not
    /// overwritten by the bar.
    ///
    /// ```no_run
    /// use spritesort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a plain line while temporarily clearing the progress bar.
    pub fn above(pb: &ProgressBar, message: &str) {
        pb.suspend(|| Self::plain(message));
    }

    /// Prints a summary table of file counts by category.
    ///
    /// Rows are printed in the order given.
    ///
    /// ```no_run
    /// use spritesort::output::OutputFormatter;
    ///
    /// let counts = vec![("Frame".to_string(), 15), ("IconArt".to_string(), 8)];
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &[(String, usize)], total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural_files(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files),
            width = max_category_len
        );
    }
}

/// "file" or "files" for a count.
pub fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_files() {
        assert_eq!(plural_files(0), "files");
        assert_eq!(plural_files(1), "file");
        assert_eq!(plural_files(2), "files");
    }

    #[test]
    fn test_progress_bar_length() {
        let pb = OutputFormatter::create_progress_bar(7);
        assert_eq!(pb.length(), Some(7));
        pb.finish_and_clear();
    }
}
