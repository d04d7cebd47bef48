//! Output formatting utilities for CLI.

use console::style;

/// Fixed-width table; column widths are declared once with the headers.
pub struct Table<const N: usize> {
    widths: [usize; N],
}

impl<const N: usize> Table<N> {
    /// Prints the bold header line and separator.
    pub fn new(columns: [(&str, usize); N]) -> Self {
        let widths = columns.map(|(_, width)| width);
        let header = Self { widths }.render(columns.map(|(name, _)| name));
        println!("{}", style(header).bold());
        println!("{}", "-".repeat(widths.iter().sum::<usize>() + N.saturating_sub(1)));
        Self { widths }
    }

    pub fn row(&self, values: [&str; N]) {
        println!("{}", self.render(values));
    }

    fn render(&self, values: [&str; N]) -> String {
        values
            .iter()
            .zip(self.widths)
            .map(|(value, width)| fit(value, width))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }
}

/// Pads `value` to `width` chars, cutting it with `...` when longer.
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", value)
    }
}

/// Prints a key-value pair with consistent formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("{:<18}{}", format!("{}:", key), value);
}

/// Prints a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(title).bold().underlined());
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Formats an optional value, using `-` when absent.
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Formats a boolean as `yes`/`no`.
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
