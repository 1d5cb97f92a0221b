use crate::domain::model::FeatureVector;
use crate::utils::error::{Result, RiskError};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Home,
    Results,
    Diet,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Home => write!(f, "home"),
            Page::Results => write!(f, "results"),
            Page::Diet => write!(f, "diet"),
        }
    }
}

/// What the person typed into the assessment form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub features: FeatureVector,
}

impl Validate for Profile {
    fn validate(&self) -> Result<()> {
        let check = || -> Result<()> {
            validate_non_empty_string("name", &self.name)?;
            validate_range("age", self.features.age, 18, 100)?;
            validate_range("blood_pressure", self.features.blood_pressure, 90, 200)?;
            validate_range("cholesterol", self.features.cholesterol, 100, 500)
        };
        // 表單錯誤一律回報為輸入驗證錯誤
        check().map_err(|e| RiskError::validation(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Submit { profile: Profile, prediction: bool },
    ViewDiet,
    Back,
    StartOver,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Submit { .. } => "submit",
            Event::ViewDiet => "view diet",
            Event::Back => "back",
            Event::StartOver => "start over",
        }
    }
}

/// Navigation state of one assessment. Replaces the implicit page flag of a
/// UI framework; rendering is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    page: Page,
    profile: Option<Profile>,
    prediction: Option<bool>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            page: Page::Home,
            profile: None,
            prediction: None,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn prediction(&self) -> Option<bool> {
        self.prediction
    }

    /// Applies `event`; on error the session is left untouched.
    pub fn apply(&mut self, event: Event) -> Result<Page> {
        let next = match (self.page, event) {
            (Page::Home, Event::Submit { profile, prediction }) => {
                profile.validate()?;
                self.profile = Some(profile);
                self.prediction = Some(prediction);
                Page::Results
            }
            (Page::Results, Event::ViewDiet) => Page::Diet,
            (Page::Diet, Event::Back) => Page::Results,
            (Page::Results | Page::Diet, Event::StartOver) => {
                self.profile = None;
                self.prediction = None;
                Page::Home
            }
            (from, event) => {
                return Err(RiskError::InvalidTransition {
                    from: from.to_string(),
                    event: event.name().to_string(),
                });
            }
        };

        tracing::debug!("Session moved {} -> {}", self.page, next);
        self.page = next;
        Ok(next)
    }
}
