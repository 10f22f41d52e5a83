mod commands;
mod csvfile;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use pulse_engine::{Dispatcher, DispatcherConfig, EngineError, Matcher, RuleRegistry};
use pulse_notify::{NotifyError, WhatsAppConfig, WhatsAppNotifier};
use pulse_settings::{PulseSettings, SettingsError};
use pulse_store::{Database, LeadRepo, StoreError};
use pulse_telemetry::MetricsRecorder;

/// Lead prioritization pipeline for industrial sales signals.
#[derive(Parser)]
#[command(name = "pulse", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a synthetic demo corpus as CSV.
    Generate {
        #[arg(long, default_value_t = 600)]
        rows: usize,
        #[arg(long, default_value = "pulse_demo_leads.csv")]
        out: PathBuf,
    },
    /// Enrich a raw CSV into an analysis-ready one.
    Preprocess {
        #[arg(long, default_value = "pulse_demo_leads.csv")]
        input: PathBuf,
        #[arg(long, default_value = "pulse_preprocessed_leads.csv")]
        out: PathBuf,
    },
    /// Scan the news wire, infer products, and store fresh leads.
    Hunt,
    /// Bulk-load a preprocessed CSV into the lead store.
    Restore {
        #[arg(long, default_value = "pulse_preprocessed_leads.csv")]
        input: PathBuf,
    },
    /// Alert the officer about the single top-priority lead.
    Dispatch,
}

#[tokio::main]
async fn main() -> ExitCode {
    pulse_telemetry::init("info");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = pulse_settings::load_settings()?;
    let metrics = MetricsRecorder::new();
    let matcher = Matcher::new(RuleRegistry::builtin());

    match cli.command {
        Command::Generate { rows, out } => commands::generate(matcher, rows, &out, &metrics),
        Command::Preprocess { input, out } => {
            commands::preprocess(&input, &out, &settings, &metrics)
        }
        Command::Hunt => {
            let repo = open_repo(&settings)?;
            commands::hunt(&matcher, &repo, &settings, &metrics)
        }
        Command::Restore { input } => {
            let repo = open_repo(&settings)?;
            commands::restore(&input, &repo, &metrics)
        }
        Command::Dispatch => {
            let repo = open_repo(&settings)?;
            let dispatcher = build_dispatcher(repo, &settings, metrics)?;
            commands::dispatch(&dispatcher).await
        }
    }
}

fn open_repo(settings: &PulseSettings) -> anyhow::Result<LeadRepo> {
    let db = Database::open(std::path::Path::new(&settings.store.db_path))?;
    Ok(LeadRepo::new(db))
}

fn build_dispatcher(
    repo: LeadRepo,
    settings: &PulseSettings,
    metrics: MetricsRecorder,
) -> anyhow::Result<Dispatcher> {
    if !settings.notify.is_configured() {
        return Err(NotifyError::NotConfigured(
            "set PULSE_NOTIFY_ACCOUNT_SID, PULSE_NOTIFY_AUTH_TOKEN, PULSE_NOTIFY_FROM \
             and PULSE_NOTIFY_OFFICER (or the notify section of settings.json)"
                .into(),
        )
        .into());
    }

    let notifier = WhatsAppNotifier::new(WhatsAppConfig {
        account_sid: settings.notify.account_sid.clone(),
        auth_token: settings.notify.auth_token.clone().into(),
        from_address: settings.notify.from_address.clone(),
        base_url: settings.notify.base_url.clone(),
        timeout: Duration::from_millis(settings.notify.timeout_ms),
    })?;

    Ok(Dispatcher::new(
        repo,
        Arc::new(notifier),
        DispatcherConfig {
            officer_address: settings.notify.officer_address.clone(),
            dashboard_url: settings.dashboard.base_url.clone(),
        },
        metrics,
    ))
}

/// 0 success, 1 validation/config error, 2 external-dependency error.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(notify) = cause.downcast_ref::<NotifyError>() {
            return match notify {
                NotifyError::NotConfigured(_) => 1,
                _ => 2,
            };
        }
        if cause.downcast_ref::<StoreError>().is_some() {
            return 2;
        }
        if let Some(engine) = cause.downcast_ref::<EngineError>() {
            return match engine {
                EngineError::InvalidRule(_) => 1,
                EngineError::Store(_) | EngineError::Notify(_) => 2,
            };
        }
        if cause.downcast_ref::<SettingsError>().is_some() {
            return 1;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_exit_2() {
        let err = anyhow::Error::new(StoreError::Database("locked".into()));
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn delivery_errors_exit_2() {
        let err = anyhow::Error::new(NotifyError::Timeout(Duration::from_secs(10)));
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn missing_notifier_config_exits_1() {
        let err = anyhow::Error::new(NotifyError::NotConfigured("no sid".into()));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn wrapped_engine_errors_keep_their_class() {
        let err = anyhow::Error::new(EngineError::Store(StoreError::Database("io".into())));
        assert_eq!(exit_code(&err), 2);

        let err = anyhow::Error::new(EngineError::InvalidRule("empty product".into()));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn unknown_errors_default_to_1() {
        let err = anyhow::anyhow!("bad input file");
        assert_eq!(exit_code(&err), 1);
    }
}
