//! `registry` command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto the `registry_core` person API.
//! - Report success through the exit code: `0` ok, `1` refused, `2` usage
//!   or environment error.

use clap::{Parser, Subcommand};
use log::debug;
use registry_core::validation::DATE_FORMAT;
use registry_core::{
    core_version, DemeritLedger, FlatFilePersonStore, Person, PersonRecord, PersonService,
    RegistryConfig, SystemClock,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Person registry over a comma-delimited data file.
#[derive(Parser, Debug)]
#[command(name = "registry", version, about)]
struct Cli {
    /// Data file path (overrides REGISTRY_DATA_FILE).
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error (overrides REGISTRY_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute log directory (overrides REGISTRY_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate and append a new person.
    Add {
        id: String,
        first_name: String,
        last_name: String,
        /// number|street|suburb|state|country
        address: String,
        /// DD-MM-YYYY
        birthdate: String,
    },
    /// Replace the fields of the person stored under CURRENT_ID.
    Update {
        current_id: String,
        new_id: String,
        first_name: String,
        last_name: String,
        address: String,
        birthdate: String,
    },
    /// Print the first stored person with ID.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Print every stored person in file order.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Record offenses (DATE=POINTS) against a stored person and report suspension.
    Offense {
        id: String,
        #[arg(required = true, value_parser = parse_offense)]
        offenses: Vec<(String, i32)>,
    },
    /// Print the core library version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool, String> {
    let config = resolve_config(&cli);
    config.init_logging()?;
    debug!(
        "event=cli_start module=cli status=ok data_file={}",
        config.data_file.display()
    );

    let store = FlatFilePersonStore::new(&config.data_file);
    let service = PersonService::new(&store, SystemClock);

    match cli.command {
        Commands::Add {
            id,
            first_name,
            last_name,
            address,
            birthdate,
        } => {
            let person = Person::new(id, first_name, last_name, address, birthdate);
            let ok = person.create(&store);
            println!("{}", if ok { "created" } else { "rejected" });
            Ok(ok)
        }
        Commands::Update {
            current_id,
            new_id,
            first_name,
            last_name,
            address,
            birthdate,
        } => {
            let Some(record) = service.find(&current_id).map_err(|err| err.to_string())? else {
                println!("not found: {current_id}");
                return Ok(false);
            };
            let mut person = Person::from_record(record);
            let ok = person.update(
                &store,
                &new_id,
                &first_name,
                &last_name,
                &address,
                &birthdate,
            );
            println!("{}", if ok { "updated" } else { "rejected" });
            Ok(ok)
        }
        Commands::Show { id, json } => {
            match service.find(&id).map_err(|err| err.to_string())? {
                Some(record) => {
                    print_records(std::slice::from_ref(&record), json)?;
                    Ok(true)
                }
                None => {
                    println!("not found: {id}");
                    Ok(false)
                }
            }
        }
        Commands::List { json } => {
            let records = service.list().map_err(|err| err.to_string())?;
            print_records(&records, json)?;
            Ok(true)
        }
        Commands::Offense { id, offenses } => {
            let Some(record) = service.find(&id).map_err(|err| err.to_string())? else {
                println!("not found: {id}");
                return Ok(false);
            };
            let mut person = Person::from_record(record);
            let mut all_recorded = true;
            for (date, points) in offenses {
                let outcome = person.record_offense(&date, points);
                all_recorded &= outcome.is_success();
                println!("{date} {points}: {outcome}");
            }
            for entry in ledger_lines(person.ledger()) {
                println!("{entry}");
            }
            println!(
                "total_points={} suspended={}",
                person.demerit_total(),
                person.is_suspended()
            );
            Ok(all_recorded)
        }
        Commands::Version => {
            println!("registry_core version={}", core_version());
            Ok(true)
        }
    }
}

fn resolve_config(cli: &Cli) -> RegistryConfig {
    let mut config = RegistryConfig::from_env();
    if let Some(path) = &cli.data_file {
        config.data_file = path.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config
}

fn print_records(records: &[PersonRecord], json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(records).map_err(|err| err.to_string())?;
        println!("{text}");
    } else {
        for record in records {
            println!("{record}");
        }
    }
    Ok(())
}

/// One `ledger DATE POINTS` line per recorded date, oldest first.
fn ledger_lines(ledger: &DemeritLedger) -> Vec<String> {
    ledger
        .entries()
        .map(|(date, points)| format!("ledger {} {points}", date.format(DATE_FORMAT)))
        .collect()
}

fn parse_offense(value: &str) -> Result<(String, i32), String> {
    let (date, points) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=POINTS, got `{value}`"))?;
    let points = points
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("invalid points `{points}`: {err}"))?;
    Ok((date.trim().to_string(), points))
}
