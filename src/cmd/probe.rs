use std::io::{self, Write};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::Dispatch;

use crate::app::exit_code;
use crate::cli::Cli;
use crate::config::default::REPORT_CHANNEL_CAPACITY;
use crate::error::ConfigError;
use crate::output::report::ReportFormatter;
use crate::probe::result::Report;
use crate::probe::{CancellationToken, ExecMode, ProbeSetting, Prober};
use crate::protocol::{parse_resolver, Protocol, ProtocolOptions};

/// Build the protocols requested on the command line.
fn protocols(cli: &Cli) -> Result<Vec<Protocol>, ConfigError> {
    if cli.target.is_some() && cli.protocol.is_none() {
        return Err(ConfigError::TargetWithoutProtocol);
    }
    let opts = ProtocolOptions {
        timeout: cli.timeout,
        dns_resolver: cli.dns_resolver.as_deref().map(parse_resolver).transpose()?,
    };
    match &cli.protocol {
        Some(id) => Ok(vec![Protocol::from_id(id, &opts)?]),
        None => Protocol::all(&opts),
    }
}

/// Explicit target first, then whatever was piped on stdin.
fn targets(cli: &Cli) -> Result<Vec<String>> {
    if let Some(target) = &cli.target {
        return Ok(vec![target.clone()]);
    }
    if cli.no_stdin {
        return Ok(Vec::new());
    }
    let Some(input) = crate::stdin::read_stdin()? else {
        return Ok(Vec::new());
    };
    let (targets, errors) = crate::validator::process_targets(&input);
    for e in errors {
        eprintln!("{}: {}", crate::app::CRATE_BIN_NAME, e);
    }
    Ok(targets)
}

/// Print every report as it arrives and count the successful ones.
///
/// With `stop` set, the first success cancels the run.
pub async fn consume_reports<W: Write>(
    mut rx: mpsc::Receiver<Report>,
    formatter: ReportFormatter,
    stop: bool,
    cancel: CancellationToken,
    mut out: W,
) -> Result<u64> {
    let mut successes: u64 = 0;
    while let Some(report) = rx.recv().await {
        tracing::debug!(protocol = %report.protocol, target = %report.rhost, "new report");
        let line = formatter.format(&report).context("formatting report")?;
        writeln!(out, "{}", line).context("writing report")?;
        if report.is_success() {
            successes += 1;
            if stop && cancel.cancel() {
                tracing::debug!("stopping after first successful request");
            }
        }
    }
    out.flush()?;
    Ok(successes)
}

/// Run the probes and return the process exit code.
pub async fn run(cli: &Cli, logger: Dispatch) -> Result<i32> {
    let protocols = protocols(cli)?;
    let targets = targets(cli)?;
    tracing::info!(
        protocols = ?protocols.iter().map(Protocol::id).collect::<Vec<_>>(),
        targets = ?targets,
        count = cli.count,
        "running"
    );

    let cancel = CancellationToken::new();
    let signal_handler = crate::signal::spawn_signal_handler(cancel.clone());

    let (tx, rx) = mpsc::channel(REPORT_CHANNEL_CAPACITY);
    let formatter = ReportFormatter::new(cli.output_format(), !cli.no_color);
    let consumer = tokio::spawn(consume_reports(
        rx,
        formatter,
        cli.stop,
        cancel.clone(),
        io::stdout(),
    ));

    let setting = ProbeSetting {
        protocols,
        targets,
        count: cli.count,
        delay: cli.delay,
        timeout: cli.timeout,
        mode: if cli.parallel {
            ExecMode::Parallel
        } else {
            ExecMode::Serial
        },
        logger: Some(logger),
        report_tx: Some(tx),
    };
    let result = Prober::new(setting).run(&cancel).await;
    signal_handler.abort();
    result?;

    let successes = consumer.await.context("report printer failed")??;
    tracing::debug!(successes, "bye");
    Ok(exit_code(successes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::OutputFormat;
    use std::time::Duration;

    fn report(protocol: &str, error: Option<&str>) -> Report {
        Report {
            protocol: protocol.into(),
            rhost: "127.0.0.1:80".into(),
            time: Duration::from_millis(2),
            extra: error.is_none().then(|| "ok".to_string()),
            error: error.map(str::to_string),
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_args(std::iter::once("up").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_consume_reports_counts_successes() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(report("http", Some("boom"))).await.unwrap();
        tx.send(report("tcp", None)).await.unwrap();
        tx.send(report("dns", None)).await.unwrap();
        drop(tx);

        let cancel = CancellationToken::new();
        let mut out = Vec::new();
        let formatter = ReportFormatter::new(OutputFormat::Grep, false);
        let successes = consume_reports(rx, formatter, false, cancel.clone(), &mut out)
            .await
            .unwrap();
        assert_eq!(successes, 2);
        assert!(!cancel.is_cancelled());
        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("http\t"));
        assert!(lines[0].ends_with("\terror\tboom"));
    }

    #[tokio::test]
    async fn test_consume_reports_stop_cancels() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(report("http", Some("boom"))).await.unwrap();
        tx.send(report("tcp", None)).await.unwrap();
        drop(tx);

        let cancel = CancellationToken::new();
        let formatter = ReportFormatter::new(OutputFormat::Json, false);
        let successes = consume_reports(rx, formatter, true, cancel.clone(), io::sink())
            .await
            .unwrap();
        assert_eq!(successes, 1);
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_protocols_selection() {
        let all = protocols(&cli(&[])).unwrap();
        assert_eq!(all.len(), 3);
        let one = protocols(&cli(&["-p", "dns", "-r", "127.0.0.1:5353"])).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id(), "dns");
    }

    #[test]
    fn test_protocols_errors() {
        assert!(matches!(
            protocols(&cli(&["--target", "example.com"])),
            Err(ConfigError::TargetWithoutProtocol)
        ));
        assert!(matches!(
            protocols(&cli(&["-p", "icmp"])),
            Err(ConfigError::UnknownProtocol(_))
        ));
        assert!(matches!(
            protocols(&cli(&["-r", "resolver.local"])),
            Err(ConfigError::InvalidResolver(_))
        ));
    }

    #[test]
    fn test_explicit_target_skips_stdin() {
        let explicit = targets(&cli(&["-p", "tcp", "-tg", "127.0.0.1:80"])).unwrap();
        assert_eq!(explicit, vec!["127.0.0.1:80"]);
        let disabled = targets(&cli(&["--no-stdin"])).unwrap();
        assert!(disabled.is_empty());
    }
}
