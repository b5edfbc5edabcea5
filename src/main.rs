//! Agrivoltaic simulator entry point: CLI wiring and run output.

use std::env;
use std::path::Path;
use std::process;

use chrono::NaiveDate;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use agrivolt_sim::config::SiteConfig;
use agrivolt_sim::io::export::export_csv;
use agrivolt_sim::sim::simulate;

/// Parsed CLI arguments.
struct CliArgs {
    site_path: Option<String>,
    preset: Option<String>,
    date: Option<NaiveDate>,
    telemetry_out: Option<String>,
    #[cfg(feature = "tui")]
    tui: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("agrivolt-sim — Agrivoltaic single-axis tracker simulator");
    eprintln!();
    eprintln!("Usage: agrivolt-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --site <path>            Load site parameters from TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        SiteConfig::PRESETS.join(", ")
    );
    eprintln!("  --date <YYYY-MM-DD>      Override the simulated day");
    eprintln!("  --telemetry-out <path>   Export per-minute samples to CSV");
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Open the interactive terminal dashboard");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --site or --preset is given, the baseline preset is used.");
    eprintln!("Log level is read from RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, or exits with an error.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("error: {} requires {what}", args[*i - 1]);
        process::exit(1);
    }
    args[*i].clone()
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = env::args().collect();
    let mut cli = CliArgs {
        site_path: None,
        preset: None,
        date: None,
        telemetry_out: None,
        #[cfg(feature = "tui")]
        tui: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--site" => cli.site_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--date" => {
                let raw = flag_value(&args, &mut i, "a YYYY-MM-DD argument");
                if let Ok(d) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                    cli.date = Some(d);
                } else {
                    eprintln!("error: --date value \"{raw}\" is not a valid YYYY-MM-DD date");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                cli.telemetry_out = Some(flag_value(&args, &mut i, "a path argument"));
            }
            #[cfg(feature = "tui")]
            "--tui" => cli.tui = true,
            #[cfg(feature = "api")]
            "--serve" => cli.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                let raw = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Installs the stderr log subscriber, honouring `RUST_LOG`.
fn init_logging(default: Level) {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = parse_args();

    #[cfg(feature = "tui")]
    let default_level = if cli.tui { Level::ERROR } else { Level::INFO };
    #[cfg(not(feature = "tui"))]
    let default_level = Level::INFO;
    init_logging(default_level);

    // --site takes priority, then --preset, then baseline default
    let (mut config, name) = if let Some(ref path) = cli.site_path {
        match SiteConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => (cfg, "custom"),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match SiteConfig::from_preset(name) {
            Ok(cfg) => (cfg, name.as_str()),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        (SiteConfig::baseline(), "baseline")
    };

    if let Some(date) = cli.date {
        config.site.date = date;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    info!(source = name, date = %config.site.date, "configuration loaded");

    #[cfg(feature = "tui")]
    if cli.tui {
        if let Err(e) = agrivolt_sim::tui::run(config, name) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    let simulation = match simulate(&config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    // Hourly lines keep the output readable; the CSV carries every minute
    for s in simulation.hourly() {
        println!("{s}");
    }
    println!("\n{}", simulation.summary);

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&simulation.samples, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(agrivolt_sim::api::AppState { simulation });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to create tokio runtime: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = rt.block_on(agrivolt_sim::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
