use crate::core::templates::MessageTemplate;
use crate::error::{AppError, AppResult};

use chrono::{DateTime, Utc};
use minijinja::context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

pub const MAX_SCORE: i64 = 100;
pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_MESSAGE_LENGTH: usize = 280;
// Scores at or above this threshold make the nice list.
pub const NICE_THRESHOLD: u8 = 50;

static REGEX_COUNTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verdict {
    Naughty,
    Nice,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        match score >= NICE_THRESHOLD {
            true => Verdict::Nice,
            false => Verdict::Naughty,
        }
    }
}

/// A persisted quiz outcome. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub id: Uuid,
    pub name: String,
    pub verdict: Verdict,
    pub message: String,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Body of a score submission, as sent by the quiz front-end.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewScanResult {
    pub name: String,
    pub verdict: Verdict,
    pub score: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl NewScanResult {
    /// Validate the submission and stamp it with an id and the current time.
    pub fn into_scan_result(self) -> AppResult<ScanResult> {
        self.into_scan_result_at(Utc::now())
    }

    pub fn into_scan_result_at(self, timestamp: DateTime<Utc>) -> AppResult<ScanResult> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        if !(0..=MAX_SCORE).contains(&self.score) {
            return Err(AppError::Validation(format!(
                "score must be between 0 and {MAX_SCORE}, got {}",
                self.score
            )));
        }
        // safe cast, range checked above
        let score = self.score as u8;

        let country = match self.country.map(|c| c.trim().to_uppercase()) {
            None => None,
            Some(c) if c.is_empty() => None,
            Some(c) if REGEX_COUNTRY.is_match(&c) => Some(c),
            Some(c) => {
                return Err(AppError::Validation(format!(
                    "country must be a 2-letter code, got '{c}'"
                )))
            }
        };

        let message = match self.message.map(|m| m.trim().to_string()) {
            Some(m) if m.chars().count() > MAX_MESSAGE_LENGTH => {
                return Err(AppError::Validation(format!(
                    "message must be at most {MAX_MESSAGE_LENGTH} characters"
                )))
            }
            Some(m) if !m.is_empty() => m,
            _ => default_message(self.verdict, &name, score)?,
        };

        Ok(ScanResult {
            id: Uuid::new_v4(),
            name,
            verdict: self.verdict,
            message,
            score,
            country,
            timestamp,
        })
    }
}

fn default_message(verdict: Verdict, name: &str, score: u8) -> AppResult<String> {
    let rendered = MessageTemplate::for_verdict(verdict)
        .get()?
        .render(context! { name => name, score => score })?;
    Ok(rendered)
}
