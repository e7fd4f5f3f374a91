//! Utility functions for terminal output formatting
//!
//! Consistent, colored status lines, the spinner shown around slow git
//! operations, and the column alignment used by the table listings.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::constants::{ENV_SWITCH_FILE, TABLE_COLUMN_GAP, TRUNCATION_SUFFIX};

const SPINNER_TICK_MILLIS: u64 = 100;

/// Displays a warning in yellow
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.yellow());
}

/// Starts a spinner on stderr; call `finish_and_clear` when done
///
/// ```no_run
/// let pb = giwo::utils::spinner("Fetching from origin...");
/// // slow work
/// pb.finish_and_clear();
/// ```
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MILLIS));
    pb
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(TRUNCATION_SUFFIX.len());
    let head: String = text.chars().take(keep).collect();
    format!("{head}{TRUNCATION_SUFFIX}")
}

/// Terminal column width of `text`, ignoring ANSI color codes
pub fn display_width(text: &str) -> usize {
    console::strip_ansi_codes(text).width()
}

/// Pads `text` with spaces up to `width` terminal columns
pub fn pad_display(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(padding))
}

/// Renders rows under a header with columns aligned by display width
///
/// Emoji and CJK text occupy two columns, so `format!("{:<w$}")` would
/// misalign them. The last column is never padded.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let gap = " ".repeat(TABLE_COLUMN_GAP);
    let render_row = |cells: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == last {
                    cell.to_string()
                } else {
                    pad_display(cell, widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join(&gap)
    };

    let mut lines = vec![render_row(headers.to_vec())];
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

/// File named by `GIWO_SWITCH_FILE`, if set and non-empty
pub fn switch_file_from_env() -> Option<PathBuf> {
    std::env::var_os(ENV_SWITCH_FILE)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Writes the switch target for the shell wrapper to pick up
pub fn write_switch_path(switch_file: &Path, target: &Path) -> io::Result<()> {
    std::fs::write(switch_file, target.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("short", 50 => "short"; "fits")]
    #[test_case("abcdefghij", 10 => "abcdefghij"; "exact width")]
    #[test_case("abcdefghijk", 10 => "abcdefg..."; "cut")]
    #[test_case("日本語のコミットメッセージ", 8 => "日本語のコ..."; "multibyte")]
    fn test_truncate(text: &str, max: usize) -> String {
        truncate(text, max)
    }

    #[test]
    fn test_truncate_never_exceeds_max() {
        let long = "x".repeat(200);
        assert_eq!(truncate(&long, 50).chars().count(), 50);
    }

    #[test]
    fn test_display_width_ignores_color_and_counts_wide_chars() {
        assert_eq!(display_width(&"abc".red().to_string()), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(pad_display("日本", 6), "日本  ");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["main".to_string(), "/repo".to_string(), "clean".to_string()],
            vec!["feature/long".to_string(), "/r".to_string(), "dirty".to_string()],
        ];
        let table = render_table(&["BRANCH", "PATH", "STATUS"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "BRANCH        PATH   STATUS");
        assert_eq!(lines[1], "main          /repo  clean");
        assert_eq!(lines[2], "feature/long  /r     dirty");
    }

    #[test]
    fn test_write_switch_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("switch");
        write_switch_path(&file, Path::new("/repo/.worktree/feat")).unwrap();
        assert_eq!(std::fs::read_to_string(file).unwrap(), "/repo/.worktree/feat");
    }
}
