//! In-memory `ReportStore` double for tests. Mirrors the SQL semantics of
//! `PgReportStore` over a mutex-guarded Vec.

use async_trait::async_trait;
use chrono::{Days, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{CategoryCount, DailyCount, ReportPoint, ReportStore};
use crate::core::error::Result;
use crate::features::reports::models::{NewReport, Report, ReportStatus};

#[derive(Default)]
pub struct MemReportStore {
    reports: Mutex<Vec<Report>>,
}

impl MemReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed report, bypassing store-assigned fields.
    /// Lets tests stage rows with chosen timestamps and statuses.
    pub fn seed(&self, report: Report) {
        self.reports.lock().unwrap().push(report);
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportStore for MemReportStore {
    async fn insert(&self, new: NewReport) -> Result<Report> {
        let report = Report {
            id: Uuid::new_v4(),
            citizen_device_id: new.citizen_device_id,
            lat: new.lat,
            lng: new.lng,
            description: new.description,
            initial_photo_url: new.initial_photo_url,
            category: new.category,
            severity: new.severity,
            status: ReportStatus::Pending,
            upvotes: 0,
            cleanup_photo_url: None,
            created_at: Utc::now(),
            cleaned_at: None,
        };
        self.reports.lock().unwrap().push(report.clone());
        Ok(report)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Report>> {
        let mut all = self.reports.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_by_device(&self, device_id: &str) -> Result<Vec<Report>> {
        let mut filtered: Vec<Report> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.citizen_device_id == device_id)
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(filtered)
    }

    async fn pending_in_box(
        &self,
        lat_min: f64,
        lat_max: f64,
        lng_min: f64,
        lng_max: f64,
    ) -> Result<Vec<Report>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.status == ReportStatus::Pending
                    && r.lat >= lat_min
                    && r.lat <= lat_max
                    && r.lng >= lng_min
                    && r.lng <= lng_max
            })
            .cloned()
            .collect())
    }

    async fn add_upvote(&self, id: Uuid) -> Result<Option<Report>> {
        let mut reports = self.reports.lock().unwrap();
        Ok(reports.iter_mut().find(|r| r.id == id).map(|r| {
            r.upvotes += 1;
            r.clone()
        }))
    }

    async fn set_status(&self, id: Uuid, status: ReportStatus) -> Result<bool> {
        let mut reports = self.reports.lock().unwrap();
        Ok(reports
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| r.status = status)
            .is_some())
    }

    async fn mark_cleaned(&self, id: Uuid, photo_url: &str) -> Result<bool> {
        let mut reports = self.reports.lock().unwrap();
        Ok(reports
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| {
                r.status = ReportStatus::Cleaned;
                r.cleanup_photo_url = Some(photo_url.to_string());
                r.cleaned_at = Some(Utc::now());
            })
            .is_some())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() < before)
    }

    async fn count_total(&self) -> Result<i64> {
        Ok(self.reports.lock().unwrap().len() as i64)
    }

    async fn count_cleaned(&self) -> Result<i64> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == ReportStatus::Cleaned)
            .count() as i64)
    }

    async fn avg_cleanup_hours(&self) -> Result<Option<f64>> {
        let reports = self.reports.lock().unwrap();
        let durations: Vec<f64> = reports
            .iter()
            .filter(|r| r.status == ReportStatus::Cleaned)
            .filter_map(|r| r.cleaned_at.map(|c| (c - r.created_at)))
            .map(|d| d.num_seconds() as f64 / 3600.0)
            .collect();

        if durations.is_empty() {
            Ok(None)
        } else {
            Ok(Some(durations.iter().sum::<f64>() / durations.len() as f64))
        }
    }

    async fn reports_per_day(&self, days: i32) -> Result<Vec<DailyCount>> {
        let cutoff = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new((days as u64).saturating_sub(1)))
            .expect("valid cutoff date");

        let mut per_day = BTreeMap::new();
        for r in self.reports.lock().unwrap().iter() {
            let day = r.created_at.date_naive();
            if day >= cutoff {
                *per_day.entry(day).or_insert(0i64) += 1;
            }
        }

        Ok(per_day
            .into_iter()
            .map(|(day, count)| DailyCount { day, count })
            .collect())
    }

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>> {
        let mut counts = BTreeMap::new();
        for r in self.reports.lock().unwrap().iter() {
            counts
                .entry(r.category.label())
                .or_insert((r.category, 0i64))
                .1 += 1;
        }

        let mut grouped: Vec<CategoryCount> = counts
            .into_values()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        grouped.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(grouped)
    }

    async fn locations(&self) -> Result<Vec<ReportPoint>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| ReportPoint { lat: r.lat, lng: r.lng })
            .collect())
    }
}
