use cardio_risk::core::forest::ForestConfig;
use cardio_risk::core::settings::TrainingSettings;
use cardio_risk::core::ConfigProvider;
use cardio_risk::{
    ChestPain, Event, FeatureVector, LocalStorage, Page, Predictor, Profile, RiskError, Session,
    Sex, TrainingEngine, TrainingPipeline,
};
use tempfile::TempDir;

struct FastConfig {
    output_path: String,
}

impl ConfigProvider for FastConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn artifact_name(&self) -> &str {
        "heart.json"
    }

    fn export_dataset(&self) -> bool {
        false
    }

    fn settings(&self) -> TrainingSettings {
        TrainingSettings {
            samples: 300,
            forest: ForestConfig {
                trees: 20,
                ..ForestConfig::default()
            },
            ..TrainingSettings::default()
        }
    }
}

async fn trained_predictor(dir: &TempDir) -> Predictor<LocalStorage> {
    let output_path = dir.path().to_string_lossy().into_owned();
    let pipeline = TrainingPipeline::new(
        LocalStorage::new(output_path.clone()),
        FastConfig {
            output_path: output_path.clone(),
        },
    );
    TrainingEngine::new(pipeline).run().await.unwrap();
    Predictor::new(LocalStorage::new(output_path), "heart.json")
}

fn profile(name: &str, age: u32) -> Profile {
    Profile {
        name: name.to_string(),
        features: FeatureVector {
            age,
            sex: Sex::Female,
            chest_pain: ChestPain::AtypicalAngina,
            blood_pressure: 140,
            cholesterol: 240,
        },
    }
}

#[tokio::test]
async fn test_assessment_walkthrough() {
    let temp_dir = TempDir::new().unwrap();
    let predictor = trained_predictor(&temp_dir).await;

    let mut session = Session::new();
    let submitted = profile("Jordan", 58);
    let prediction = predictor.predict(&submitted.features).await.unwrap();

    session
        .apply(Event::Submit {
            profile: submitted.clone(),
            prediction,
        })
        .unwrap();
    assert_eq!(session.page(), Page::Results);
    assert_eq!(session.profile(), Some(&submitted));
    assert_eq!(session.prediction(), Some(prediction));

    session.apply(Event::ViewDiet).unwrap();
    session.apply(Event::Back).unwrap();
    session.apply(Event::ViewDiet).unwrap();
    assert_eq!(session.apply(Event::StartOver).unwrap(), Page::Home);
    assert_eq!(session.prediction(), None);
}

#[tokio::test]
async fn test_invalid_form_never_leaves_home() {
    let temp_dir = TempDir::new().unwrap();
    let predictor = trained_predictor(&temp_dir).await;

    // 模型本身不檢查範圍，由 session 在送出時檢查
    let underage = profile("Sam", 12);
    let prediction = predictor.predict(&underage.features).await.unwrap();

    let mut session = Session::new();
    let err = session
        .apply(Event::Submit {
            profile: underage,
            prediction,
        })
        .unwrap_err();
    assert!(matches!(err, RiskError::ValidationError { .. }));
    assert_eq!(session.page(), Page::Home);
    assert!(session.profile().is_none());
}
