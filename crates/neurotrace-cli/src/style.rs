//! Status line styling for the CLI.

use owo_colors::OwoColorize;

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format an info message.
pub fn format_info(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[--] {}", message)
    } else {
        format!("{} {}", "[--]".cyan(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Render a yes/no flag, green for yes.
pub fn format_flag(value: bool, no_color: bool) -> String {
    let text = if value { "yes" } else { "no" };
    if no_color {
        text.to_string()
    } else if value {
        text.green().to_string()
    } else {
        text.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_status_lines() {
        assert_eq!(format_success("done", true), "[OK] done");
        assert_eq!(format_info("note", true), "[--] note");
        assert_eq!(format_warning("careful", true), "[!!] careful");
    }

    #[test]
    fn test_colored_status_keeps_message() {
        let line = format_success("done", false);
        assert!(line.contains("done"));
        assert!(line.contains("\u{1b}["));
    }

    #[test]
    fn test_format_flag() {
        assert_eq!(format_flag(true, true), "yes");
        assert_eq!(format_flag(false, true), "no");
    }
}
