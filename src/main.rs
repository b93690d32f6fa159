use breakmywallet::{Config, MaintenanceRecord, RecordRow, Store, catalog, view};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "breakmywallet")]
#[command(about = "BreakMyWallet - BMW maintenance tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the config file (default: <config dir>/breakmywallet/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the database file, overriding the config
    #[arg(short, long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known vehicles
    Vehicles,

    /// List the default maintenance tasks
    Tasks,

    /// Show a vehicle's maintenance history
    List {
        /// Vehicle name or its number from `vehicles`
        vehicle: String,
    },

    /// Add a maintenance record
    Add {
        /// Vehicle name or its number from `vehicles`
        vehicle: String,

        #[arg(short, long)]
        task: String,

        /// Date of the service (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        date: String,

        /// Odometer reading; leave out if unknown
        #[arg(short, long, default_value = "")]
        mileage: String,

        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// Export all records to a JSON file
    Export { path: PathBuf },

    /// Import records from a JSON file
    Import { path: PathBuf },
}

fn main() {
    // Setup tracing; RUST_LOG overrides the quiet default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that only read the catalog never touch storage
    match &cli.command {
        Commands::Vehicles => {
            print_vehicles();
            return Ok(());
        }
        Commands::Tasks => {
            print_tasks();
            return Ok(());
        }
        _ => {}
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(db) = cli.db {
        config.database = db;
    }

    let mut store = Store::open_with_timeout(&config.database, config.busy_timeout())
        .wrap_err("Cannot start without storage")?;

    let result = dispatch(&mut store, cli.command);
    store.close()?;
    result
}

fn dispatch(store: &mut Store, command: Commands) -> Result<()> {
    match command {
        Commands::Vehicles | Commands::Tasks => {}
        Commands::List { vehicle } => {
            let vehicle = view::resolve_vehicle(&vehicle);
            let records = store.list_records(&vehicle)?;
            print_history(&vehicle, &records);
        }
        Commands::Add {
            vehicle,
            task,
            date,
            mileage,
            notes,
        } => {
            let vehicle = view::resolve_vehicle(&vehicle);
            let row = RecordRow::from_form(&vehicle, &task, &date, &mileage, &notes)?;

            for warning in [
                view::unknown_vehicle_warning(&row.vehicle),
                view::date_warning(row.last_date.as_deref()),
            ]
            .into_iter()
            .flatten()
            {
                println!("{} {}", "Warning:".yellow().bold(), warning);
            }

            let id = store.insert_record(&row)?;
            println!("{} record #{} for {}", "Saved".green(), id, row.vehicle.bold());
            print_history(&row.vehicle, &store.list_records(&row.vehicle)?);
        }
        Commands::Export { path } => {
            let count = store.export_to_file(&path)?;
            println!("{} {} records saved to {}", "Export complete:".green(), count, path.display());
        }
        Commands::Import { path } => {
            let count = store.import_from_file(&path)?;
            println!(
                "{} {} records imported from {}",
                "Import complete:".green(),
                count,
                path.display()
            );
        }
    }

    Ok(())
}

fn print_vehicles() {
    println!("{}", "Vehicles".bold());
    for (i, vehicle) in catalog::list_vehicles().iter().enumerate() {
        println!("  {}. {}", i + 1, vehicle.name);
    }
}

fn print_tasks() {
    println!("{}", "Default maintenance tasks".bold());
    for task in catalog::list_default_tasks() {
        println!(
            "  {:<14} every {:>6} mi / {:>2} months",
            task.task_name, task.interval_miles, task.interval_months
        );
    }
}

fn print_history(vehicle: &str, records: &[MaintenanceRecord]) {
    println!("\n{}", vehicle.bold());

    let rows = view::display_rows(records);
    let lines = view::format_table(&rows);
    if let Some((header, body)) = lines.split_first() {
        println!("{}", header.bold());
        for (line, row) in body.iter().zip(&rows) {
            if row.placeholder {
                println!("{}", line.dimmed());
            } else {
                println!("{}", line);
            }
        }
    }

    if records.is_empty() {
        println!("{}", "No records yet; showing default tasks.".dimmed());
    }
}
