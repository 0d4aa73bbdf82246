use std::ffi::OsString;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;

use crate::config::default::DEFAULT_COUNT;
use crate::output::report::OutputFormat;

const AFTER_HELP: &str = "\
OUTPUT
  Details about each request:
  {Protocol used} {Response time} {Remote server} {Extra info}

EXIT STATUS
  0  At least one response was heard.
  2  The transmission was successful but no responses were received.
  1  An error occurred.";

/// Single-dash multi-letter flags accepted for compatibility, with the long
/// flag each one stands for.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-nc", "--no-color"),
    ("-nstd", "--no-stdin"),
    ("-dr", "--dns-resolver"),
    ("-tg", "--target"),
];

/// up - Troubleshoot problems with your Internet connection
#[derive(Parser, Debug)]
#[command(author, version, about = "up - Troubleshoot problems with your Internet connection based on different protocols and public servers", long_about = None, after_help = AFTER_HELP)]
pub struct Cli {
    /// Test only one protocol: http, tcp or dns
    #[arg(short, long, value_name = "ID")]
    pub protocol: Option<String>,

    /// Where to point the probe: URL for HTTP, host:port for TCP, domain for DNS.
    /// Requires --protocol since the format depends on it
    #[arg(long, visible_alias = "tg", value_name = "TARGET")]
    pub target: Option<String>,

    /// Number of iterations (0 = infinite)
    #[arg(short, long, default_value_t = DEFAULT_COUNT)]
    pub count: u64,

    /// Time to wait for a response
    #[arg(short, long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Delay between requests
    #[arg(short, long, default_value = "500ms", value_parser = humantime::parse_duration)]
    pub delay: Duration,

    /// Stop after the first successful request
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub stop: bool,

    /// Run the attempts of each iteration concurrently
    #[arg(short = 'P', long, action = ArgAction::SetTrue)]
    pub parallel: bool,

    /// DNS resolver used by the DNS protocol (ip or ip:port)
    #[arg(short = 'r', long, visible_alias = "dr", value_name = "ADDR")]
    pub dns_resolver: Option<String>,

    /// Output in JSON format
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "grep")]
    pub json: bool,

    /// Output in grepable format
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub grep: bool,

    /// Disable color output
    #[arg(long, visible_alias = "nc", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable reading targets from standard input
    #[arg(long, visible_alias = "nstd", action = ArgAction::SetTrue)]
    pub no_stdin: bool,

    /// List active network interfaces and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub interfaces: bool,
}

impl Cli {
    /// Parse the given arguments after rewriting legacy flags.
    pub fn try_parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Cli::try_parse_from(normalize_args(args))
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.grep {
            OutputFormat::Grep
        } else {
            OutputFormat::Human
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::ERROR,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }
}

/// Rewrite `-nc`, `-nstd`, `-dr` and `-tg` (also in `-dr=value` form) into
/// their long flags. Everything after `--` is left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;
    for arg in args.into_iter().map(Into::into) {
        if passthrough {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }
        let (flag, value) = match text.split_once('=') {
            Some((flag, value)) => (flag, Some(value)),
            None => (text, None),
        };
        match LEGACY_FLAGS.iter().find(|(legacy, _)| *legacy == flag) {
            Some((_, long)) => {
                let rewritten = match value {
                    Some(value) => format!("{}={}", long, value),
                    None => long.to_string(),
                };
                normalized.push(OsString::from(rewritten));
            }
            None => normalized.push(arg),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_args(std::iter::once("up").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.protocol, None);
        assert_eq!(cli.count, 0);
        assert_eq!(cli.timeout, Duration::from_secs(5));
        assert_eq!(cli.delay, Duration::from_millis(500));
        assert!(!cli.stop && !cli.parallel && !cli.no_color && !cli.no_stdin);
        assert_eq!(cli.output_format(), OutputFormat::Human);
        assert_eq!(cli.log_level(), LevelFilter::ERROR);
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-p", "tcp", "-c", "3", "-t", "2s", "-d", "0s", "-s", "-P", "-j", "-vv"]);
        assert_eq!(cli.protocol.as_deref(), Some("tcp"));
        assert_eq!(cli.count, 3);
        assert_eq!(cli.timeout, Duration::from_secs(2));
        assert_eq!(cli.delay, Duration::ZERO);
        assert!(cli.stop && cli.parallel);
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert_eq!(cli.log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_legacy_flags() {
        let cli = parse(&["-nc", "-nstd", "-dr", "1.1.1.1", "-p", "dns", "-tg=example.com"]);
        assert!(cli.no_color);
        assert!(cli.no_stdin);
        assert_eq!(cli.dns_resolver.as_deref(), Some("1.1.1.1"));
        assert_eq!(cli.target.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_normalize_leaves_other_args() {
        let args = normalize_args(["up", "-v", "-nc", "--", "-nc"]);
        assert_eq!(args, vec!["up", "-v", "--no-color", "--", "-nc"]);
    }

    #[test]
    fn test_json_conflicts_with_grep() {
        assert!(Cli::try_parse_args(["up", "-j", "-g"]).is_err());
    }

    #[test]
    fn test_invalid_duration() {
        assert!(Cli::try_parse_args(["up", "-t", "soon"]).is_err());
    }

    #[test]
    fn test_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
