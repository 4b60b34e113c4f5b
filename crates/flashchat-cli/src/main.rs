//! FlashChat command-line client - main entry point.

mod commands;
mod config;
mod error;

use crate::commands::send::{OtpArgs, SmsArgs, WhatsAppArgs};
use crate::commands::{bulk, lookup, send, stats, webhook};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use flashchat_client::{DispatchClient, MessageType, StatsWindow, WebhookReceiver};
use humantime_serde::re::humantime;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "flashchat", about = "Send SMS, WhatsApp and OTP messages through FlashChat")]
struct Cli {
    /// Gateway base URL (overrides GATEWAY__BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send an SMS
    Sms(SmsArgs),
    /// Send a WhatsApp message
    Whatsapp(WhatsAppArgs),
    /// Send a one-time passcode
    Otp(OtpArgs),
    /// Check a one-time passcode
    VerifyOtp {
        #[arg(long)]
        code: String,
    },
    /// List WhatsApp sending accounts
    Accounts,
    /// List connected sending devices
    Devices,
    /// Show dashboard statistics
    Stats {
        /// Window start (RFC 3339)
        #[arg(long, requires = "to")]
        from: Option<DateTime<Utc>>,
        /// Window end (RFC 3339)
        #[arg(long, requires = "from")]
        to: Option<DateTime<Utc>>,
        /// Window ending now (e.g. "7d", "24h")
        #[arg(long, value_parser = humantime::parse_duration, conflicts_with_all = ["from", "to"])]
        last: Option<Duration>,
    },
    /// Refresh dashboard statistics until interrupted
    WatchStats {
        /// Refresh period (e.g. "30s", "5m"); defaults to DASHBOARD__REFRESH_INTERVAL
        #[arg(long, value_parser = parse_interval)]
        interval: Option<Duration>,
    },
    /// Send one message per record from a JSON job file
    Bulk {
        #[arg(long)]
        file: PathBuf,
    },
    /// Verify and describe a captured webhook body
    Webhook {
        #[arg(long)]
        file: PathBuf,
        /// Value of the X-FlashChat-Signature header
        #[arg(long)]
        signature: Option<String>,
    },
}

fn parse_interval(s: &str) -> Result<Duration, String> {
    let interval = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if interval.is_zero() {
        return Err("interval must be greater than zero".into());
    }
    Ok(interval)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = run(cli).await;
    finish(result, &mut std::io::stdout(), &mut std::io::stderr())
}

/// Print the outcome once, to stdout on success or stderr on failure.
fn finish(result: AppResult<String>, out: &mut impl Write, err: &mut impl Write) -> ExitCode {
    match result {
        Ok(output) => {
            let _ = writeln!(out, "{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = writeln!(err, "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<String> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log_level);

    let base_url = cli.base_url.unwrap_or(config.gateway.base_url);
    let client = DispatchClient::new(
        base_url,
        config.gateway.api_secret.expose_secret().as_str(),
        config.gateway.timeout,
    )?;
    debug!("FlashChat gateway: {}", client.base_url());

    match cli.command {
        Command::Sms(args) => send::run(&client, MessageType::Sms, args.fields()).await,
        Command::Whatsapp(args) => send::run(&client, MessageType::WhatsApp, args.fields()).await,
        Command::Otp(args) => send::run(&client, MessageType::Otp, args.fields()).await,
        Command::VerifyOtp { code } => lookup::verify_otp(&client, &code).await,
        Command::Accounts => lookup::accounts(&client).await,
        Command::Devices => lookup::devices(&client).await,
        Command::Stats { from, to, last } => {
            let window = match last {
                Some(span) => Some(StatsWindow::last(span).ok_or_else(|| {
                    AppError::InvalidWindow(format!("{} is too long", humantime::format_duration(span)))
                })?),
                None => from.zip(to).map(|(from, to)| StatsWindow::new(from, to)),
            };
            stats::show(&client, window).await
        }
        Command::WatchStats { interval } => {
            let interval = interval.unwrap_or(config.dashboard.refresh_interval);
            stats::watch(client, interval).await
        }
        Command::Bulk { file } => bulk::run(client, &file).await,
        Command::Webhook { file, signature } => {
            let receiver = WebhookReceiver::new(config.webhook.secret);
            webhook::run(&receiver, &file, signature.as_deref()).await
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sms() {
        let cli = Cli::try_parse_from([
            "flashchat", "sms", "--phone", "+15555555555", "--message", "Hi", "--sim", "2",
        ])
        .unwrap();

        match cli.command {
            Command::Sms(args) => {
                let fields = args.fields();
                assert_eq!(fields.phone_number.as_deref(), Some("+15555555555"));
                assert_eq!(fields.sim_slot, Some(flashchat_client::SimSlot::Two));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_sim_slot_rejected() {
        let result = Cli::try_parse_from(["flashchat", "sms", "--sim", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_reference_requires_both_parts() {
        let result = Cli::try_parse_from(["flashchat", "otp", "--phone", "+1", "--ref-type", "Contact"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_window_requires_both_ends() {
        assert!(Cli::try_parse_from(["flashchat", "stats", "--from", "2025-01-01T00:00:00Z"]).is_err());
        assert!(Cli::try_parse_from([
            "flashchat",
            "stats",
            "--from",
            "2025-01-01T00:00:00Z",
            "--to",
            "2025-01-08T00:00:00Z",
        ])
        .is_ok());
    }

    #[test]
    fn test_watch_interval() {
        let cli = Cli::try_parse_from(["flashchat", "watch-stats", "--interval", "30s"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::WatchStats { interval: Some(d) } if d == Duration::from_secs(30)
        ));
    }

    #[test]
    fn test_zero_watch_interval_rejected() {
        for interval in ["0s", "0ms"] {
            let result = Cli::try_parse_from(["flashchat", "watch-stats", "--interval", interval]);
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_stats_last() {
        let cli = Cli::try_parse_from(["flashchat", "stats", "--last", "7d"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Stats { last: Some(d), from: None, to: None } if d == Duration::from_secs(7 * 24 * 3600)
        ));

        let result = Cli::try_parse_from([
            "flashchat",
            "stats",
            "--last",
            "7d",
            "--from",
            "2025-01-01T00:00:00Z",
            "--to",
            "2025-01-08T00:00:00Z",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_webhook() {
        let cli = Cli::try_parse_from([
            "flashchat",
            "webhook",
            "--file",
            "delivery.json",
            "--signature",
            "abc123",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Webhook { signature: Some(ref s), .. } if s == "abc123"
        ));
    }

    #[test]
    fn test_finish_reports_error_once() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = finish(
            Err(AppError::InvalidWindow("300000y is too long".into())),
            &mut out,
            &mut err,
        );

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Invalid statistics window: 300000y is too long\n"
        );
    }

    #[test]
    fn test_finish_prints_output() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = finish(Ok("SMS sent successfully".into()), &mut out, &mut err);

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(String::from_utf8(out).unwrap(), "SMS sent successfully\n");
        assert!(err.is_empty());
    }
}
