use anyhow::Context;
use clap::Parser;
use flight_manifest::core::seed::distribute_passengers;
use flight_manifest::utils::logger;
use flight_manifest::Passenger;

#[derive(Parser)]
#[command(name = "seed-flights")]
#[command(about = "Distribute a passenger list across generated flights")]
struct Args {
    /// JSON array of passengers
    #[arg(short, long)]
    passengers: String,

    /// Where to write the generated flight requests
    #[arg(short, long, default_value = "flights.json")]
    output: String,

    #[arg(long, default_value = "5")]
    flights: usize,

    /// Seats per generated flight
    #[arg(long, default_value = "10")]
    capacity: i64,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let raw = std::fs::read(&args.passengers)
        .with_context(|| format!("failed to read passengers from {}", args.passengers))?;
    let passengers: Vec<Passenger> =
        serde_json::from_slice(&raw).context("passengers file is not a valid passenger list")?;

    let flights = distribute_passengers(passengers, args.flights, args.capacity, &mut rand::rng())?;

    std::fs::write(&args.output, serde_json::to_vec_pretty(&flights)?)
        .with_context(|| format!("failed to write {}", args.output))?;

    tracing::info!("✅ {} flights created with passengers", flights.len());
    println!("✅ {} flights written to {}", flights.len(), args.output);
    Ok(())
}
