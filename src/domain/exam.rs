//! ECG exam entity
//!
//! An exam is one recording session moving through the review workflow:
//! idle, claimed for reporting (the reporting lock), then approved with a
//! principal report. Exams are created by the ingestion side and mutated
//! only through [`EcgExam::begin_reporting`] and [`EcgExam::approve_with`],
//! which keep the state invariants.

use crate::domain::classification::Gender;
use crate::domain::errors::LaudoError;
use crate::domain::record::{make_key, split_key, Record, Value, EXAM_KEY_PREFIX};
use crate::domain::report::EcgReport;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn birth_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid birth date pattern"))
}

/// One ECG recording session pending or completed diagnostic review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgExam {
    pub id: String,

    /// Blob reference to the waveform file in object storage
    pub file_path: String,

    /// Acquisition time; doubles as the record's sort key
    pub made_at: DateTime<Utc>,

    pub gender: Gender,

    /// ISO date, `YYYY-MM-DD`
    pub birth_date: String,

    pub amplitude: String,
    pub speed: String,

    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,

    /// Reporting lock: set while a reviewer holds the exam
    pub is_reporting: bool,
    pub reporting_started_at: Option<DateTime<Utc>>,

    /// The official, approved diagnosis
    pub principal_report: Option<EcgReport>,

    #[serde(default)]
    pub reports: Vec<EcgReport>,
}

impl EcgExam {
    /// Creates an exam in the initial (idle, unapproved) state
    pub fn new(
        id: impl Into<String>,
        file_path: impl Into<String>,
        made_at: DateTime<Utc>,
        gender: Gender,
        birth_date: impl Into<String>,
        amplitude: impl Into<String>,
        speed: impl Into<String>,
    ) -> Result<Self> {
        let birth_date = birth_date.into();
        if !birth_date_pattern().is_match(&birth_date) {
            return Err(LaudoError::Validation(format!(
                "birth_date must be YYYY-MM-DD, got '{birth_date}'"
            )));
        }

        Ok(Self {
            id: id.into(),
            file_path: file_path.into(),
            made_at,
            gender,
            birth_date,
            amplitude: amplitude.into(),
            speed: speed.into(),
            approved: false,
            approved_at: None,
            is_reporting: false,
            reporting_started_at: None,
            principal_report: None,
            reports: Vec::new(),
        })
    }

    /// Primary key of the persisted record
    pub fn key(&self) -> String {
        make_key(EXAM_KEY_PREFIX, &self.id)
    }

    /// Takes the reporting lock
    ///
    /// Fails on an already-approved exam; the lock and approval are
    /// mutually exclusive states.
    pub fn begin_reporting(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.approved {
            return Err(LaudoError::Unprocessable(
                "exam is already approved".to_string(),
            ));
        }
        self.is_reporting = true;
        self.reporting_started_at = Some(now);
        Ok(())
    }

    /// Finalizes the exam with its principal report and clears the lock
    ///
    /// Approval is single-shot: an exam that is approved or already has a
    /// principal report cannot be approved again.
    pub fn approve_with(&mut self, report: EcgReport, now: DateTime<Utc>) -> Result<()> {
        if self.approved || self.principal_report.is_some() {
            return Err(LaudoError::Unprocessable(
                "exam already has a principal report".to_string(),
            ));
        }
        self.principal_report = Some(report);
        self.approved = true;
        self.approved_at = Some(now);
        self.is_reporting = false;
        self.reporting_started_at = None;
        Ok(())
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("PK", self.key())
            .set("SK", Value::from_timestamp(self.made_at))
            .set("file_path", self.file_path.as_str())
            .set("gender", self.gender.label())
            .set("birth_date", self.birth_date.as_str())
            .set("amplitude", self.amplitude.as_str())
            .set("speed", self.speed.as_str())
            .set("approved", self.approved)
            .set("approved_at", Value::opt(self.approved_at.map(Value::from_timestamp)))
            .set("is_reporting", self.is_reporting)
            .set(
                "reporting_started_at",
                Value::opt(self.reporting_started_at.map(Value::from_timestamp)),
            )
            .set(
                "principal_report",
                Value::opt(self.principal_report.as_ref().map(|r| r.to_record())),
            )
            .set(
                "reports",
                Value::List(
                    self.reports
                        .iter()
                        .map(|r| Value::Map(r.to_record()))
                        .collect(),
                ),
            );
        record
    }

    pub fn from_record(record: Record) -> Result<Self> {
        let record = record.normalize();

        let id = split_key(
            record
                .require("PK")?
                .as_str()
                .ok_or_else(|| validation("exam PK must be a string"))?,
            EXAM_KEY_PREFIX,
        )?
        .to_string();

        let made_at = record
            .require("SK")?
            .as_timestamp()
            .ok_or_else(|| validation("exam SK must be epoch seconds"))?;

        let gender = Gender::parse(
            record
                .require("gender")?
                .as_str()
                .ok_or_else(|| validation("exam gender must be a string"))?,
        )?;

        let birth_date = require_str(&record, "birth_date")?;
        if !birth_date_pattern().is_match(&birth_date) {
            return Err(validation("exam birth_date must be YYYY-MM-DD"));
        }

        let principal_report = record
            .optional("principal_report")
            .map(|value| {
                value
                    .as_map()
                    .ok_or_else(|| validation("principal_report must be a mapping"))
                    .and_then(EcgReport::from_record)
            })
            .transpose()?;

        // Absent list reads back as empty, matching records written before
        // any report existed.
        let reports = match record.optional("reports") {
            Some(value) => value
                .as_list()
                .ok_or_else(|| validation("reports must be a list"))?
                .iter()
                .map(|entry| {
                    entry
                        .as_map()
                        .ok_or_else(|| validation("report entry must be a mapping"))
                        .and_then(EcgReport::from_record)
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            id,
            file_path: require_str(&record, "file_path")?,
            made_at,
            gender,
            birth_date,
            amplitude: require_str(&record, "amplitude")?,
            speed: require_str(&record, "speed")?,
            approved: flag(&record, "approved"),
            approved_at: record.optional("approved_at").and_then(Value::as_timestamp),
            is_reporting: flag(&record, "is_reporting"),
            reporting_started_at: record
                .optional("reporting_started_at")
                .and_then(Value::as_timestamp),
            principal_report,
            reports,
        })
    }
}

/// Boolean flags absent on legacy records read back as false
fn flag(record: &Record, key: &str) -> bool {
    record
        .optional(key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn require_str(record: &Record, key: &str) -> Result<String> {
    record
        .require(key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| validation(&format!("exam field '{key}' must be a string")))
}

fn validation(message: &str) -> LaudoError {
    LaudoError::Validation(message.to_string())
}
