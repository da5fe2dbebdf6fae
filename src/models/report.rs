//! Report export request model

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Students,
    Teachers,
    Lessons,
    Payments,
}

impl ReportType {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ReportType::Students => "students",
            ReportType::Teachers => "teachers",
            ReportType::Lessons => "lessons",
            ReportType::Payments => "payments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub report_type: ReportType,
    pub format: ExportFormat,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
}

impl ExportRequest {
    pub fn validate(&self) -> Result<()> {
        if self.to < self.from {
            return Err(LinguaDeskError::Validation("report range ends before it starts".to_string()));
        }
        Ok(())
    }

    pub fn file_name(&self) -> String {
        crate::utils::helpers::export_file_name(
            self.report_type.file_prefix(),
            self.from,
            self.to,
            self.format.extension(),
        )
    }
}
