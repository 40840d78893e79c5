//! Command-line front end: JSON analysis requests in, JSON responses out.

use std::env;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use mutscope_enzymes::EnzymeLookup;
use mutscope_service::{
    analyze_json, build_lookup, telemetry, AnalysisSettings, AnalyzeResponse, CliOverrides, LookupMode, ServiceConfig,
    ServiceError,
};

/// Exit status of a single request rejected as invalid.
const EXIT_INVALID_REQUEST: i32 = 2;

fn usage() {
    println!(
        "Usage:\n  \
mutscope [--config PATH] [--input PATH] [--stdio] [--strategy NAME] [--lookup MODE] [--help|-h] [--version|-V]\n\n  \
Reads one JSON analysis request from --input (or stdin) and writes one JSON response.\n  \
With --stdio, reads newline-delimited requests until EOF and answers each on its own line.\n\n  \
Strategies: exponential-decay, similarity-ratio, linear-decay\n  \
Lookup modes: none, catalog, remote, catalog-then-remote\n  \
Log filter: {log_env} (default mutscope=info)\n",
        log_env = telemetry::LOG_ENV
    );
}

#[derive(Debug, Default)]
struct Args {
    overrides: CliOverrides,
    input: Option<PathBuf>,
    stdio: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut idx = 1usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        let value = |idx: usize| -> Result<&String, String> {
            args.get(idx + 1).ok_or_else(|| format!("Missing value after {flag}"))
        };
        match flag {
            "--config" => {
                parsed.overrides.config_path = Some(PathBuf::from(value(idx)?));
                idx += 2;
            }
            "--input" => {
                parsed.input = Some(PathBuf::from(value(idx)?));
                idx += 2;
            }
            "--strategy" => {
                let strategy = value(idx)?.parse().map_err(|e: mutscope_core::ValidationError| e.to_string())?;
                parsed.overrides.strategy = Some(strategy);
                idx += 2;
            }
            "--lookup" => {
                let mode: LookupMode = value(idx)?.parse().map_err(|e: mutscope_service::ConfigError| e.to_string())?;
                parsed.overrides.lookup_mode = Some(mode);
                idx += 2;
            }
            "--stdio" => {
                parsed.stdio = true;
                idx += 1;
            }
            other => {
                return Err(format!("Unknown argument '{other}'. Use --help for usage."));
            }
        }
    }
    Ok(parsed)
}

/// Serialize the outcome of one request. Failures become an error body.
fn render(outcome: Result<AnalyzeResponse, ServiceError>) -> Result<(String, Option<ServiceError>), ServiceError> {
    match outcome {
        Ok(response) => serde_json::to_string(&response)
            .map(|body| (body, None))
            .map_err(|e| ServiceError::Internal(format!("could not encode response: {e}"))),
        Err(err) => {
            tracing::warn!(status = err.status(), %err, "request rejected");
            serde_json::to_string(&err.to_dto())
                .map(|body| (body, Some(err)))
                .map_err(|e| ServiceError::Internal(format!("could not encode error: {e}")))
        }
    }
}

fn run_single(args: &Args, settings: &AnalysisSettings, lookup: &dyn EnzymeLookup) -> Result<i32, ServiceError> {
    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let (body, err) = render(analyze_json(&input, settings, lookup))?;
    println!("{body}");

    Ok(match err {
        Some(err) if err.is_client_error() => EXIT_INVALID_REQUEST,
        Some(_) => 1,
        None => 0,
    })
}

fn run_stdio(settings: &AnalysisSettings, lookup: &dyn EnzymeLookup) -> Result<i32, ServiceError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (body, _) = render(analyze_json(&line, settings, lookup))?;
        writeln!(stdout, "{body}")?;
        stdout.flush()?;
    }
    Ok(0)
}

fn run(args: &Args) -> Result<i32, ServiceError> {
    let config = ServiceConfig::load(&args.overrides)?;
    telemetry::init_tracing(config.logging.json);

    let settings = AnalysisSettings::from(&config);
    let lookup = build_lookup(&config.lookup)?;
    tracing::debug!(strategy = %settings.strategy, lookup = lookup.name(), "mutscope ready");

    if args.stdio {
        run_stdio(&settings, lookup.as_ref())
    } else {
        run_single(args, &settings, lookup.as_ref())
    }
}

fn main() {
    let argv = env::args().collect::<Vec<_>>();
    if argv.iter().any(|a| a == "--help" || a == "-h") {
        usage();
        return;
    }
    if argv.iter().any(|a| a == "--version" || a == "-V") {
        println!("mutscope {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    match run(&args) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
