use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Cleaned,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Cleaned => write!(f, "cleaned"),
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "in_progress" => Ok(ReportStatus::InProgress),
            "cleaned" => Ok(ReportStatus::Cleaned),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

/// Waste category enum matching database enum.
///
/// Wire representation uses the human-readable labels the dashboard shows
/// ("Household Waste", ...); the database stores snake_case labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_category", rename_all = "snake_case")]
pub enum ReportCategory {
    #[serde(rename = "Household Waste")]
    HouseholdWaste,
    #[serde(rename = "Construction Debris")]
    ConstructionDebris,
    #[serde(rename = "Hazardous/Chemical")]
    #[sqlx(rename = "hazardous_chemical")]
    HazardousChemical,
    #[serde(rename = "E-Waste")]
    #[sqlx(rename = "e_waste")]
    EWaste,
    #[serde(rename = "Organic/Green Waste")]
    OrganicGreenWaste,
    #[serde(rename = "Other")]
    Other,
}

impl ReportCategory {
    /// Parse a label coming back from the classifier. Lenient on case and
    /// surrounding whitespace; returns None for anything unrecognized so the
    /// caller can substitute the fallback value.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "household waste" | "household_waste" => Some(ReportCategory::HouseholdWaste),
            "construction debris" | "construction_debris" => {
                Some(ReportCategory::ConstructionDebris)
            }
            "hazardous/chemical" | "hazardous" | "chemical" | "hazardous_chemical" => {
                Some(ReportCategory::HazardousChemical)
            }
            "e-waste" | "e_waste" | "ewaste" => Some(ReportCategory::EWaste),
            "organic/green waste" | "organic" | "green waste" | "organic_green_waste" => {
                Some(ReportCategory::OrganicGreenWaste)
            }
            "other" => Some(ReportCategory::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportCategory::HouseholdWaste => "Household Waste",
            ReportCategory::ConstructionDebris => "Construction Debris",
            ReportCategory::HazardousChemical => "Hazardous/Chemical",
            ReportCategory::EWaste => "E-Waste",
            ReportCategory::OrganicGreenWaste => "Organic/Green Waste",
            ReportCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Dump size estimate matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_severity", rename_all = "lowercase")]
#[serde(rename_all = "PascalCase")]
pub enum ReportSeverity {
    Small,
    Medium,
    Large,
}

impl ReportSeverity {
    /// Lenient parse of a classifier label; None when unrecognized.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "small" => Some(ReportSeverity::Small),
            "medium" => Some(ReportSeverity::Medium),
            "large" => Some(ReportSeverity::Large),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSeverity::Small => write!(f, "Small"),
            ReportSeverity::Medium => write!(f, "Medium"),
            ReportSeverity::Large => write!(f, "Large"),
        }
    }
}

/// Database model for a citizen-submitted dumping report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub citizen_device_id: String,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
    pub initial_photo_url: String,
    pub category: ReportCategory,
    pub severity: ReportSeverity,
    pub status: ReportStatus,
    pub upvotes: i32,
    pub cleanup_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cleaned_at: Option<DateTime<Utc>>,
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub citizen_device_id: String,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
    pub initial_photo_url: String,
    pub category: ReportCategory,
    pub severity: ReportSeverity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "in_progress", "cleaned"] {
            assert_eq!(s.parse::<ReportStatus>().unwrap().to_string(), s);
        }
        assert!("resolved".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_category_from_label_lenient() {
        assert_eq!(
            ReportCategory::from_label("household waste"),
            Some(ReportCategory::HouseholdWaste)
        );
        assert_eq!(
            ReportCategory::from_label(" E-Waste "),
            Some(ReportCategory::EWaste)
        );
        assert_eq!(ReportCategory::from_label("garbage pile"), None);
    }

    #[test]
    fn test_severity_from_label() {
        assert_eq!(ReportSeverity::from_label("LARGE"), Some(ReportSeverity::Large));
        assert_eq!(ReportSeverity::from_label("huge"), None);
    }
}
