//! ml-probe: command-line checks against the GamePath AI ML backend
//!
//! Usage:
//!   ml-probe health [--url <base>]          One liveness probe
//!   ml-probe diagnose [--url <base>]        Per-model connectivity report
//!   ml-probe redirects [--url <base>]       Redirect protection self test
//!   ml-probe test-url <url>                 Check a URL for redirects
//!   ml-probe games [--url <base>]           List detected games

use gamepath_ml_client::{MlClient, MlClientBuilder, MlConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "health" => cmd_health(&args[2..]).await,
        "diagnose" => cmd_diagnose(&args[2..]).await,
        "redirects" => cmd_redirects(&args[2..]).await,
        "test-url" => cmd_test_url(&args[2..]).await,
        "games" => cmd_games(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("ml-probe {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!(
        r#"ml-probe: GamePath AI ML backend checks

USAGE:
    ml-probe <COMMAND> [OPTIONS]

COMMANDS:
    health [--url <base>]       Probe {{base}}/ml/health once
    diagnose [--url <base>]     Check every model health endpoint
    redirects [--url <base>]    Verify that redirects are refused
    test-url <url>              Report whether a URL redirects
    games [--url <base>]        List games detected by the backend
    version                     Show version information
    help                        Show this help message

OPTIONS:
    --config <file>             YAML configuration file

ENVIRONMENT:
    GAMEPATH_ML_BASE_URL        Backend origin (default http://127.0.0.1:8000)
    GAMEPATH_ML_DEV             Development mode (1/true)
    GAMEPATH_AUTH_TOKEN         Bearer token
    RUST_LOG                    Log filter (default warn)"#
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn build_client(args: &[String]) -> Option<MlClient> {
    let config = match flag_value(args, "--config") {
        Some(path) => match MlConfig::from_yaml_file(path) {
            Ok(cfg) => cfg.with_env_overrides(),
            Err(e) => {
                eprintln!("Error: {e}");
                return None;
            }
        },
        None => MlConfig::from_env(),
    };
    let mut builder = MlClientBuilder::new()
        .config(config)
        .advisory_sink(std::sync::Arc::new(gamepath_ml_client::advisory::TracingAdvisorySink));
    if let Some(url) = flag_value(args, "--url") {
        builder = builder.base_url_override(url);
    }
    match builder.build() {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

async fn cmd_health(args: &[String]) -> ExitCode {
    let Some(client) = build_client(args) else {
        return ExitCode::FAILURE;
    };
    let report = client.probe_health().await;
    let status = report
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} {} status={} latency={}ms{}",
        if report.healthy { "UP" } else { "DOWN" },
        client.health_prober().url(),
        status,
        report.latency.as_millis(),
        if report.timed_out { " (timed out)" } else { "" }
    );
    if report.healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn cmd_diagnose(args: &[String]) -> ExitCode {
    let Some(client) = build_client(args) else {
        return ExitCode::FAILURE;
    };
    let report = client.diagnostics().test_connectivity().await;
    print_json(&report);
    if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn cmd_redirects(args: &[String]) -> ExitCode {
    let Some(client) = build_client(args) else {
        return ExitCode::FAILURE;
    };
    let result = client.diagnostics().test_redirect_protection().await;
    print_json(&result);
    if result.protected {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn cmd_test_url(args: &[String]) -> ExitCode {
    let Some(url) = args.first().filter(|a| !a.starts_with("--")) else {
        eprintln!("Error: test-url requires a URL");
        return ExitCode::FAILURE;
    };
    let Some(client) = build_client(&args[1..]) else {
        return ExitCode::FAILURE;
    };
    let result = client.diagnostics().test_url(url).await;
    print_json(&result);
    if result.was_redirected && result.is_game_path_ai {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn cmd_games(args: &[String]) -> ExitCode {
    let Some(client) = build_client(args) else {
        return ExitCode::FAILURE;
    };
    let games = client.service().detect_games().await;
    print_json(&games);
    ExitCode::SUCCESS
}
