use clap::Parser;
use flight_manifest::core::ConfigProvider;
use flight_manifest::utils::{logger, validation::Validate};
use flight_manifest::{LocalStorage, ManifestEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-manifest")]
#[command(about = "Seat allocation driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "manifest.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Allocate and print a summary without writing any output files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger_with_level(args.verbose, config.log_level());
    }

    tracing::info!("🚀 Starting TOML-based seat allocation");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let engine = ManifestEngine::new(LocalStorage::new(".".to_string()), config);

    let result = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&engine).await
    } else {
        engine.run().await.map(|paths| {
            for path in paths {
                println!("📁 Output saved to: {}", path);
            }
        })
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Manifest run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Manifest: {}", config.manifest.name);
    if let Some(description) = &config.manifest.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(
    engine: &ManifestEngine<LocalStorage, TomlConfig>,
) -> flight_manifest::Result<()> {
    let requests = engine.read_requests().await?;
    let reports = engine.allocate_all(requests).await;

    println!("🔍 Dry Run Analysis:");
    for report in &reports {
        match &report.data {
            Some(flight) => println!(
                "  ✈️ {} capacity {}: {} boarded, {} waitlisted",
                flight.flight_code,
                flight.capacity,
                flight.allocation.boarded_passengers.len(),
                flight.allocation.passengers_on_waiting_list.len()
            ),
            None => println!(
                "  ❌ {}: {}",
                report.error.as_deref().unwrap_or("Error"),
                report.message.as_deref().unwrap_or("")
            ),
        }
    }
    println!();
    println!("✅ Dry run analysis complete.");

    Ok(())
}
