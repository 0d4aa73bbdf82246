use std::fmt;
use std::str::FromStr;

use colored::Colorize;

use crate::config::default::{PROTOCOL_COLUMN_WIDTH, TIME_COLUMN_WIDTH};
use crate::error::ConfigError;
use crate::probe::result::Report;

const SUCCESS_MARKER: &str = "✔";
const FAILURE_MARKER: &str = "✘";

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Grep,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "grep" => Ok(OutputFormat::Grep),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Grep => "grep",
        };
        f.write_str(name)
    }
}

/// Renders reports as single lines.
#[derive(Clone, Copy, Debug)]
pub struct ReportFormatter {
    pub format: OutputFormat,
    /// Only used by the human format.
    pub color: bool,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    /// Render one report, without trailing newline.
    pub fn format(&self, report: &Report) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Human => Ok(self.human(report)),
            OutputFormat::Json => serde_json::to_string(report),
            OutputFormat::Grep => Ok(grep(report)),
        }
    }

    fn human(&self, report: &Report) -> String {
        let (marker, detail) = match &report.error {
            Some(error) => (FAILURE_MARKER, error.as_str()),
            None => (SUCCESS_MARKER, report.extra.as_deref().unwrap_or_default()),
        };
        // Pad first: escape codes would otherwise count towards the width.
        let protocol = format!("{:<width$}", report.protocol, width = PROTOCOL_COLUMN_WIDTH);
        let time = format!("{:<width$}", format!("{:?}", report.time), width = TIME_COLUMN_WIDTH);
        let suffix = format!("({})", detail);
        if !self.color {
            return format!("{} {} {} {} {}", marker, protocol, time, report.rhost, suffix);
        }
        let marker = if report.is_success() {
            marker.green()
        } else {
            marker.red()
        };
        format!(
            "{} {} {} {} {}",
            marker,
            protocol.bold(),
            time,
            report.rhost,
            suffix.dimmed()
        )
    }
}

fn grep(report: &Report) -> String {
    let (status, detail) = match &report.error {
        Some(error) => ("error", error.as_str()),
        None => ("ok", report.extra.as_deref().unwrap_or_default()),
    };
    format!(
        "{}\t{:?}\t{}\t{}\t{}",
        report.protocol, report.time, report.rhost, status, detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn failed() -> Report {
        Report {
            protocol: "tcp".into(),
            rhost: "127.0.0.1:80".into(),
            time: Duration::from_nanos(1),
            extra: None,
            error: Some("probe error".into()),
        }
    }

    fn succeeded() -> Report {
        Report {
            protocol: "tcp".into(),
            rhost: "127.0.0.1:80".into(),
            time: Duration::from_nanos(1),
            extra: Some("127.0.0.1:50000".into()),
            error: None,
        }
    }

    #[test]
    fn test_human_failure_line() {
        let line = ReportFormatter::new(OutputFormat::Human, false)
            .format(&failed())
            .unwrap();
        assert_eq!(line, "✘ tcp             1ns            127.0.0.1:80 (probe error)");
    }

    #[test]
    fn test_human_columns_match_across_outcomes() {
        let formatter = ReportFormatter::new(OutputFormat::Human, false);
        let ok = formatter.format(&succeeded()).unwrap();
        let ko = formatter.format(&failed()).unwrap();
        assert!(ok.starts_with(SUCCESS_MARKER));
        assert!(ok.ends_with("(127.0.0.1:50000)"));
        assert_eq!(ok.find("127.0.0.1:80"), ko.find("127.0.0.1:80"));
    }

    #[test]
    fn test_human_color_keeps_text() {
        colored::control::set_override(true);
        let line = ReportFormatter::new(OutputFormat::Human, true)
            .format(&failed())
            .unwrap();
        assert!(line.contains("\u{1b}["));
        assert!(line.contains("127.0.0.1:80"));
        assert!(line.contains("(probe error)"));
    }

    #[test]
    fn test_grep_line() {
        let formatter = ReportFormatter::new(OutputFormat::Grep, false);
        assert_eq!(
            formatter.format(&succeeded()).unwrap(),
            "tcp\t1ns\t127.0.0.1:80\tok\t127.0.0.1:50000"
        );
        assert_eq!(
            formatter.format(&failed()).unwrap(),
            "tcp\t1ns\t127.0.0.1:80\terror\tprobe error"
        );
    }

    #[test]
    fn test_json_line() {
        let line = ReportFormatter::new(OutputFormat::Json, true)
            .format(&failed())
            .unwrap();
        assert_eq!(
            line,
            r#"{"protocol":"tcp","rhost":"127.0.0.1:80","time":1,"error":"probe error"}"#
        );
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("grep".parse::<OutputFormat>().unwrap(), OutputFormat::Grep);
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported output format: xml");
    }
}
