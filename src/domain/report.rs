//! Diagnostic report entities
//!
//! A report carries one classification, an optional polygon segmentation
//! locating the finding, the authoring user's e-mail and a list of
//! approval-status entries. Reports are created once and never edited
//! after being attached as an exam's principal report.

use crate::domain::classification::{ReportClassification, SegmentationCategory};
use crate::domain::errors::LaudoError;
use crate::domain::record::{Record, Value};
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Polygon annotation over the ECG waveform locating a finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgReportSegmentation {
    pub category: SegmentationCategory,

    /// Polygon coordinate lists, `[[x1, y1, x2, y2, ...]]`
    pub segmentation: Vec<Vec<f64>>,

    /// Bounding box as `[x, y, width, height]`
    pub bbox: Vec<f64>,

    pub area: f64,

    /// Crowd flag, COCO-style; restricted to 0 or 1
    #[serde(default)]
    pub iscrowd: u8,

    pub created_at: DateTime<Utc>,
}

impl EcgReportSegmentation {
    /// Checks the shape constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.iscrowd > 1 {
            return Err(LaudoError::Validation(format!(
                "iscrowd must be 0 or 1, got {}",
                self.iscrowd
            )));
        }
        if self.bbox.len() != 4 {
            return Err(LaudoError::Validation(format!(
                "bbox must be [x, y, width, height], got {} values",
                self.bbox.len()
            )));
        }
        Ok(())
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("category", self.category.label())
            .set(
                "segmentation",
                Value::List(
                    self.segmentation
                        .iter()
                        .map(|poly| {
                            Value::List(poly.iter().copied().map(Value::Float).collect())
                        })
                        .collect(),
                ),
            )
            .set(
                "bbox",
                Value::List(self.bbox.iter().copied().map(Value::Float).collect()),
            )
            .set("area", self.area)
            .set("iscrowd", i64::from(self.iscrowd))
            .set("created_at", Value::from_timestamp(self.created_at));
        record
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        let category = SegmentationCategory::parse(
            record
                .require("category")?
                .as_str()
                .ok_or_else(|| validation("segmentation category must be a string"))?,
        )?;

        let segmentation = record
            .require("segmentation")?
            .as_list()
            .ok_or_else(|| validation("segmentation must be a list of polygons"))?
            .iter()
            .map(|poly| f64_list(poly, "segmentation polygon"))
            .collect::<Result<Vec<_>>>()?;

        let bbox = f64_list(record.require("bbox")?, "bbox")?;

        let area = record
            .require("area")?
            .as_f64()
            .ok_or_else(|| validation("area must be numeric"))?;

        let iscrowd = record
            .require("iscrowd")?
            .as_i64()
            .filter(|n| *n == 0 || *n == 1)
            .ok_or_else(|| validation("iscrowd must be 0 or 1"))? as u8;

        let created_at = record
            .require("created_at")?
            .as_timestamp()
            .ok_or_else(|| validation("segmentation created_at must be epoch seconds"))?;

        let parsed = Self {
            category,
            segmentation,
            bbox,
            area,
            iscrowd,
            created_at,
        };
        parsed.validate()?;
        Ok(parsed)
    }
}

/// One approval-status entry attached to a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgReportApproval {
    pub status: bool,
    pub created_at: DateTime<Utc>,
    /// Approving user's e-mail
    pub created_by: String,
}

impl EcgReportApproval {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("status", self.status)
            .set("created_at", Value::from_timestamp(self.created_at))
            .set("created_by", self.created_by.as_str());
        record
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            status: record
                .require("status")?
                .as_bool()
                .ok_or_else(|| validation("approval status must be a boolean"))?,
            created_at: record
                .require("created_at")?
                .as_timestamp()
                .ok_or_else(|| validation("approval created_at must be epoch seconds"))?,
            created_by: record
                .require("created_by")?
                .as_str()
                .ok_or_else(|| validation("approval created_by must be a string"))?
                .to_string(),
        })
    }
}

/// A diagnostic report attached to an exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgReport {
    pub id: String,

    #[serde(rename = "report")]
    pub classification: ReportClassification,

    #[serde(rename = "report_segmentation")]
    pub segmentation: Option<EcgReportSegmentation>,

    pub created_at: DateTime<Utc>,

    /// Authoring user's e-mail
    pub created_by: String,

    #[serde(rename = "approves", default)]
    pub approvals: Vec<EcgReportApproval>,
}

impl EcgReport {
    /// Creates a new report authored now by `created_by`
    pub fn new(
        classification: ReportClassification,
        segmentation: Option<EcgReportSegmentation>,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            classification,
            segmentation,
            created_at,
            created_by: created_by.into(),
            approvals: Vec::new(),
        }
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("id", self.id.as_str())
            .set("report", self.classification.label())
            .set(
                "report_segmentation",
                Value::opt(self.segmentation.as_ref().map(|s| s.to_record())),
            )
            .set("created_at", Value::from_timestamp(self.created_at))
            .set("created_by", self.created_by.as_str())
            .set(
                "approves",
                Value::List(
                    self.approvals
                        .iter()
                        .map(|a| Value::Map(a.to_record()))
                        .collect(),
                ),
            );
        record
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        let classification = ReportClassification::parse(
            record
                .require("report")?
                .as_str()
                .ok_or_else(|| validation("report classification must be a string"))?,
        )?;

        let segmentation = record
            .optional("report_segmentation")
            .map(|value| {
                value
                    .as_map()
                    .ok_or_else(|| validation("report_segmentation must be a mapping"))
                    .and_then(EcgReportSegmentation::from_record)
            })
            .transpose()?;

        let approvals = match record.optional("approves") {
            Some(value) => value
                .as_list()
                .ok_or_else(|| validation("approves must be a list"))?
                .iter()
                .map(|entry| {
                    entry
                        .as_map()
                        .ok_or_else(|| validation("approval entry must be a mapping"))
                        .and_then(EcgReportApproval::from_record)
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            id: record
                .require("id")?
                .as_str()
                .ok_or_else(|| validation("report id must be a string"))?
                .to_string(),
            classification,
            segmentation,
            created_at: record
                .require("created_at")?
                .as_timestamp()
                .ok_or_else(|| validation("report created_at must be epoch seconds"))?,
            created_by: record
                .require("created_by")?
                .as_str()
                .ok_or_else(|| validation("report created_by must be a string"))?
                .to_string(),
            approvals,
        })
    }
}

fn f64_list(value: &Value, what: &str) -> Result<Vec<f64>> {
    value
        .as_list()
        .ok_or_else(|| validation(&format!("{what} must be a list of numbers")))?
        .iter()
        .map(|item| {
            item.as_f64()
                .ok_or_else(|| validation(&format!("{what} must contain only numbers")))
        })
        .collect()
}

fn validation(message: &str) -> LaudoError {
    LaudoError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn sample_segmentation() -> EcgReportSegmentation {
        EcgReportSegmentation {
            category: SegmentationCategory::AtrialFibrillation,
            segmentation: vec![vec![10.0, 20.0, 30.0, 20.0, 30.0, 40.0]],
            bbox: vec![10.0, 20.0, 20.0, 20.0],
            area: 400.0,
            iscrowd: 0,
            created_at: at(1_700_000_100),
        }
    }

    fn sample_report() -> EcgReport {
        EcgReport {
            id: "7b1c9a4e-0000-4000-8000-000000000001".to_string(),
            classification: ReportClassification::AtrialFibrillation,
            segmentation: Some(sample_segmentation()),
            created_at: at(1_700_000_200),
            created_by: "helena@example.com".to_string(),
            approvals: vec![EcgReportApproval {
                status: true,
                created_at: at(1_700_000_300),
                created_by: "chief@example.com".to_string(),
            }],
        }
    }

    #[test]
    fn test_report_record_round_trip() {
        let report = sample_report();
        let back = EcgReport::from_record(&report.to_record()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_report_without_segmentation_round_trips() {
        let report = EcgReport::new(
            ReportClassification::Inconclusive,
            None,
            "helena@example.com",
            at(1_700_000_000),
        );
        let record = report.to_record();
        assert!(record.optional("report_segmentation").is_none());

        let back = EcgReport::from_record(&record).unwrap();
        assert_eq!(back, report);
        assert!(back.segmentation.is_none());
        assert!(back.approvals.is_empty());
    }

    #[test]
    fn test_new_reports_get_distinct_ids() {
        let a = EcgReport::new(ReportClassification::Normal, None, "x@y", at(0));
        let b = EcgReport::new(ReportClassification::Normal, None, "x@y", at(0));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_segmentation_decimal_values_normalize() {
        let mut record = sample_segmentation().to_record();
        record.set("area", Value::Decimal("400".into()));
        // Normalization happens at the exam boundary; emulate it here.
        let seg = EcgReportSegmentation::from_record(&record.normalize()).unwrap();
        assert_eq!(seg.area, 400.0);
    }

    #[test]
    fn test_segmentation_rejects_bad_iscrowd() {
        let mut record = sample_segmentation().to_record();
        record.set("iscrowd", 2i64);
        assert!(EcgReportSegmentation::from_record(&record).is_err());
    }

    #[test]
    fn test_segmentation_rejects_short_bbox() {
        let mut seg = sample_segmentation();
        seg.bbox = vec![1.0, 2.0];
        assert!(seg.validate().is_err());
    }

    #[test]
    fn test_unknown_classification_label_rejected() {
        let mut record = sample_report().to_record();
        record.set("report", "Ritmo sinusal");
        assert!(EcgReport::from_record(&record).is_err());
    }

    #[test]
    fn test_json_uses_original_field_names() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert!(json.get("report").is_some());
        assert!(json.get("report_segmentation").is_some());
        assert!(json.get("approves").is_some());
        assert!(json.get("classification").is_none());
    }
}
