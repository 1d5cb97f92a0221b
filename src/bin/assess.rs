use anyhow::{bail, Context};
use cardio_risk::config::DEFAULT_ARTIFACT;
use cardio_risk::utils::logger;
use cardio_risk::{
    ChestPain, Event, FeatureVector, LocalStorage, Predictor, Profile, RiskError, Session, Sex,
};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Gender {
    Male,
    Female,
}

#[derive(Parser, Debug)]
#[command(name = "assess")]
#[command(about = "Predict heart-disease risk with a trained artifact")]
struct Args {
    /// Trained model artifact
    #[arg(long, default_value_t = format!("./model/{}", DEFAULT_ARTIFACT))]
    artifact: String,

    /// Score every row of a CSV file (header: age,sex,cp,trestbps,chol)
    #[arg(long, conflicts_with_all = ["name", "age"])]
    input: Option<PathBuf>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    age: Option<u32>,

    #[arg(long, value_enum, default_value = "female")]
    gender: Gender,

    /// 0 no pain, 1 typical angina, 2 atypical angina, 3 non-anginal
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=3))]
    chest_pain: u8,

    #[arg(long, default_value = "120")]
    blood_pressure: u32,

    #[arg(long, default_value = "200")]
    cholesterol: u32,

    #[arg(short, long)]
    verbose: bool,

    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose, args.log_json);

    let (storage, artifact_name) = LocalStorage::for_file(&args.artifact);
    let predictor = Predictor::new(storage, artifact_name);

    let outcome = match &args.input {
        Some(path) => score_file(&predictor, path).await,
        None => assess_one(&predictor, &args).await,
    };

    if let Err(e) = outcome {
        if let Some(risk) = e.downcast_ref::<RiskError>() {
            tracing::error!(
                "❌ Assessment failed: {} (Category: {:?}, Severity: {:?})",
                risk,
                risk.category(),
                risk.severity()
            );
            eprintln!("❌ {}", risk.user_friendly_message());
            eprintln!("💡 建議: {}", risk.recovery_suggestion());
            std::process::exit(risk.exit_code().max(1));
        }
        return Err(e);
    }

    Ok(())
}

async fn assess_one(predictor: &Predictor<LocalStorage>, args: &Args) -> anyhow::Result<()> {
    let (Some(name), Some(age)) = (args.name.clone(), args.age) else {
        bail!("--name and --age are required unless --input is given");
    };

    let features = FeatureVector {
        age,
        sex: match args.gender {
            Gender::Male => Sex::Male,
            Gender::Female => Sex::Female,
        },
        chest_pain: ChestPain::try_from(args.chest_pain)?,
        blood_pressure: args.blood_pressure,
        cholesterol: args.cholesterol,
    };
    let profile = Profile { name, features };

    let mut session = Session::new();
    let prediction = predictor.predict(&profile.features).await?;
    session.apply(Event::Submit {
        profile,
        prediction,
    })?;

    let Some(profile) = session.profile() else {
        bail!("session lost the submitted profile");
    };

    println!("{}'s Health Profile", profile.name);
    println!("  Age: {} years", profile.features.age);
    println!("  Gender: {}", profile.features.sex);
    println!("  Chest Pain Type: {}", profile.features.chest_pain);
    println!("  Blood Pressure: {} mmHg", profile.features.blood_pressure);
    println!("  Cholesterol: {} mg/dL", profile.features.cholesterol);
    println!();
    if prediction {
        println!("⚠️ Indicators of heart disease risk factors detected");
    } else {
        println!("✅ No significant indicators of heart disease");
    }
    tracing::debug!("Session now on the {} page", session.page());

    Ok(())
}

async fn score_file(predictor: &Predictor<LocalStorage>, path: &Path) -> anyhow::Result<()> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let rows = reader
        .deserialize::<FeatureVector>()
        .collect::<Result<Vec<_>, csv::Error>>()
        .map_err(RiskError::from)?;

    tracing::info!("📥 Scoring {} rows from {}", rows.len(), path.display());
    let predictions = predictor.predict_batch(&rows).await?;

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(["age", "sex", "cp", "trestbps", "chol", "risk"])?;
    for (row, risk) in rows.iter().zip(predictions) {
        writer.write_record([
            row.age.to_string(),
            u8::from(row.sex).to_string(),
            u8::from(row.chest_pain).to_string(),
            row.blood_pressure.to_string(),
            row.cholesterol.to_string(),
            (risk as u8).to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
