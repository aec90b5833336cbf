use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format: {}", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Lays out a two-column table.
pub trait OutputFormatter {
    fn format_section(&self, title: &str) -> String;

    fn format_header(&self, columns: [&str; 2], widths: [usize; 2]) -> Vec<String>;

    fn format_row(&self, cells: [&str; 2], widths: [usize; 2]) -> String;

    fn format_footer(&self, widths: [usize; 2]) -> Option<String>;
}

pub struct TextFormatter;

impl TextFormatter {
    fn rule(widths: [usize; 2]) -> String {
        format!(
            "+{}+{}+",
            "-".repeat(widths[0] + 2),
            "-".repeat(widths[1] + 2)
        )
    }
}

impl OutputFormatter for TextFormatter {
    fn format_section(&self, title: &str) -> String {
        format!("=== {} ===", title)
    }

    fn format_header(&self, columns: [&str; 2], widths: [usize; 2]) -> Vec<String> {
        vec![
            Self::rule(widths),
            self.format_row(columns, widths),
            Self::rule(widths),
        ]
    }

    fn format_row(&self, cells: [&str; 2], widths: [usize; 2]) -> String {
        format!(
            "| {:<w0$} | {:<w1$} |",
            cells[0],
            cells[1],
            w0 = widths[0],
            w1 = widths[1]
        )
    }

    fn format_footer(&self, widths: [usize; 2]) -> Option<String> {
        Some(Self::rule(widths))
    }
}

pub struct MarkdownFormatter;

impl MarkdownFormatter {
    fn escape(cell: &str) -> String {
        cell.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_section(&self, title: &str) -> String {
        format!("## {}", title)
    }

    fn format_header(&self, columns: [&str; 2], widths: [usize; 2]) -> Vec<String> {
        vec![
            self.format_row(columns, widths),
            "| --- | --- |".to_string(),
        ]
    }

    fn format_row(&self, cells: [&str; 2], _widths: [usize; 2]) -> String {
        format!("| {} | {} |", Self::escape(cells[0]), Self::escape(cells[1]))
    }

    fn format_footer(&self, _widths: [usize; 2]) -> Option<String> {
        None
    }
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format_object<W: Write, T: Serialize>(writer: &mut W, obj: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, obj)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_formats() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_text_rows_are_padded() {
        let widths = [5, 3];
        assert_eq!(TextFormatter.format_row(["a", "b"], widths), "| a     | b   |");
        assert_eq!(
            TextFormatter.format_footer(widths).unwrap(),
            "+-------+-----+"
        );
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        assert_eq!(
            MarkdownFormatter.format_row(["a|b", "c"], [0, 0]),
            "| a\\|b | c |"
        );
        assert!(MarkdownFormatter.format_footer([1, 1]).is_none());
    }
}
