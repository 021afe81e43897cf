//! Console output helpers for the CLI.

use std::io;

use is_terminal::IsTerminal;

/// Log an informational message to stderr (respects quiet flag).
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Colorize text with ANSI escape codes (only if stdout is a terminal).
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Format an accuracy percentage with color based on threshold.
pub fn metric_colored(value: f64) -> String {
    let code = if value >= 90.0 {
        "1;32"
    } else if value >= 70.0 {
        "1;33"
    } else if value >= 50.0 {
        "33"
    } else {
        "1;31"
    };
    color(code, &format!("{:5.1}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_passthrough_when_not_terminal() {
        // Test harnesses capture stdout, so coloring is disabled and
        // the text passes through unchanged.
        assert_eq!(color("1;32", "ok"), "ok");
    }

    #[test]
    fn test_metric_colored_keeps_value_visible() {
        assert!(metric_colored(93.25).contains("93.2"));
        assert!(metric_colored(12.0).contains("12.0"));
    }
}
