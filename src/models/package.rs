//! Lesson package (billing) model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::common::Entity;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPackage {
    pub id: i64,
    pub student_id: i64,
    pub name: String,
    pub total_lessons: u32,
    pub remaining_lessons: u32,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub purchased_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Entity for LessonPackage {
    fn id(&self) -> i64 {
        self.id
    }
}

impl LessonPackage {
    pub fn used_lessons(&self) -> u32 {
        self.total_lessons.saturating_sub(self.remaining_lessons)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_lessons == 0
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires) if expires <= now)
    }

    pub fn usage_percent(&self) -> f64 {
        if self.total_lessons == 0 {
            return 0.0;
        }
        self.used_lessons() as f64 * 100.0 / self.total_lessons as f64
    }

    pub fn price_per_lesson(&self) -> f64 {
        if self.total_lessons == 0 {
            return 0.0;
        }
        self.price / self.total_lessons as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    pub student_id: i64,
    pub name: String,
    pub total_lessons: u32,
    pub price: f64,
    pub currency: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreatePackageRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LinguaDeskError::Validation("package name is required".to_string()));
        }
        if self.total_lessons == 0 {
            return Err(LinguaDeskError::Validation("a package needs at least one lesson".to_string()));
        }
        if self.price < 0.0 {
            return Err(LinguaDeskError::Validation("price cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lessons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_lessons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl UpdatePackageRequest {
    pub fn validate(&self) -> Result<()> {
        if let (Some(total), Some(remaining)) = (self.total_lessons, self.remaining_lessons) {
            if remaining > total {
                return Err(LinguaDeskError::Validation(
                    "remaining lessons cannot exceed total lessons".to_string(),
                ));
            }
        }
        if self.total_lessons == Some(0) {
            return Err(LinguaDeskError::Validation("a package needs at least one lesson".to_string()));
        }
        Ok(())
    }
}

/// Billing overview for one student's packages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingSummary {
    pub student_id: i64,
    pub packages: usize,
    pub total_lessons: u32,
    pub remaining_lessons: u32,
    pub total_spent: f64,
    pub exhausted_packages: usize,
    pub expired_packages: usize,
}

impl BillingSummary {
    pub fn from_packages(student_id: i64, packages: &[LessonPackage], now: DateTime<Utc>) -> Self {
        let active: Vec<&LessonPackage> = packages.iter().filter(|p| p.student_id == student_id).collect();

        Self {
            student_id,
            packages: active.len(),
            total_lessons: active
                .iter()
                .fold(0u32, |acc, p| acc.saturating_add(p.total_lessons)),
            remaining_lessons: active
                .iter()
                .filter(|p| !p.is_expired(now))
                .fold(0u32, |acc, p| acc.saturating_add(p.remaining_lessons)),
            total_spent: active.iter().map(|p| p.price).sum(),
            exhausted_packages: active.iter().filter(|p| p.is_exhausted()).count(),
            expired_packages: active.iter().filter(|p| p.is_expired(now)).count(),
        }
    }

    /// A student should be offered a new package
    pub fn needs_renewal(&self) -> bool {
        self.remaining_lessons <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn package(id: i64, total: u32, remaining: u32, price: f64) -> LessonPackage {
        LessonPackage {
            id,
            student_id: 5,
            name: format!("Pack {}", id),
            total_lessons: total,
            remaining_lessons: remaining,
            price,
            currency: "EUR".to_string(),
            purchased_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn test_usage() {
        let p = package(1, 10, 4, 200.0);
        assert_eq!(p.used_lessons(), 6);
        assert!((p.usage_percent() - 60.0).abs() < f64::EPSILON);
        assert!((p.price_per_lesson() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_billing_summary_ignores_expired_remaining() {
        let now = Utc::now();
        let mut expired = package(2, 5, 3, 100.0);
        expired.expires_at = Some(now - Duration::days(1));
        let packages = vec![package(1, 10, 0, 200.0), expired];

        let summary = BillingSummary::from_packages(5, &packages, now);
        assert_eq!(summary.packages, 2);
        assert_eq!(summary.total_lessons, 15);
        assert_eq!(summary.remaining_lessons, 0);
        assert_eq!(summary.exhausted_packages, 1);
        assert_eq!(summary.expired_packages, 1);
        assert!(summary.needs_renewal());
    }

    #[test]
    fn test_billing_summary_saturates_lesson_counts() {
        let packages = vec![package(1, u32::MAX, u32::MAX, 10.0), package(2, u32::MAX, 4, 10.0)];

        let summary = BillingSummary::from_packages(5, &packages, Utc::now());
        assert_eq!(summary.total_lessons, u32::MAX);
        assert_eq!(summary.remaining_lessons, u32::MAX);
        assert!(!summary.needs_renewal());
    }

    #[test]
    fn test_update_rejects_remaining_above_total() {
        let update = UpdatePackageRequest {
            total_lessons: Some(5),
            remaining_lessons: Some(6),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
