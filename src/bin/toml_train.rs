use cardio_risk::core::ConfigProvider;
use cardio_risk::utils::{logger, validation::Validate};
use cardio_risk::{LocalStorage, TomlConfig, TrainingEngine, TrainingPipeline};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-train")]
#[command(about = "Train the risk classifier from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "train-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the dataset seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Dry run - show what would be trained without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based trainer");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 套用命令列覆蓋設定
    if let Some(seed) = args.seed {
        config.dataset.seed = seed;
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No model will be trained");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TrainingPipeline::new(storage, config);
    let engine = TrainingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Training completed successfully!");
            println!("✅ Training completed successfully!");
            if let Some(accuracy) = summary.metrics.accuracy {
                println!("🎯 Model accuracy: {:.2}", accuracy);
            }
            println!("📁 Model saved to: {}", summary.artifact_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Training failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let settings = config.settings();
    println!("📋 Configuration Summary:");
    println!("  Model: {} v{}", config.model.name, config.model.version);
    if let Some(description) = &config.model.description {
        println!("  Description: {}", description);
    }
    println!("  Samples: {} (seed {})", settings.samples, settings.seed);
    println!("  Trees: {}", settings.forest.trees);
    println!("  Output: {}/{}", config.output_path(), config.artifact_name());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    let settings = config.settings();
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🎲 Synthetic Data:");
    let ranges = &settings.ranges;
    for (name, range) in [
        ("age", ranges.age),
        ("sex", ranges.sex),
        ("cp", ranges.chest_pain),
        ("trestbps", ranges.blood_pressure),
        ("chol", ranges.cholesterol),
    ] {
        println!("  {:<9} [{}, {})", name, range.low, range.high);
    }

    println!();
    println!("🏷️ Labelling:");
    let c = &settings.calibration;
    println!(
        "  score = (age - {})/{} + sex*{} + cp*{} + (trestbps - {})/{} + (chol - {})/{}",
        c.age_offset,
        c.age_scale,
        c.sex_weight,
        c.chest_pain_weight,
        c.blood_pressure_offset,
        c.blood_pressure_scale,
        c.cholesterol_offset,
        c.cholesterol_scale
    );
    println!(
        "  Noise: labels flipped when draw > {} (~{:.0}%)",
        settings.noise_cutoff,
        (1.0 - settings.noise_cutoff) * 100.0
    );

    println!();
    println!("🌲 Forest:");
    println!("  Trees: {}", settings.forest.trees);
    match settings.forest.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Max features: {:?}", settings.forest.max_features);
    println!(
        "  Held-out fraction: {:.0}%",
        settings.test_fraction * 100.0
    );

    println!();
    println!("💾 Output:");
    println!("  Artifact: {}/{}", config.output_path(), config.artifact_name());
    if config.export_dataset() {
        println!("  ✅ dataset.csv and training_report.json will be exported");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
