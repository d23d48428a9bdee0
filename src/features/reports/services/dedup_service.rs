use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::models::Report;
use crate::features::reports::store::ReportStore;
use crate::shared::geo::haversine_km;

/// Merge radius: submissions strictly closer than 50 m to a pending report
/// are treated as duplicate sightings of the same dump site.
pub const DEDUP_RADIUS_KM: f64 = 0.05;

/// Decides merge-vs-create for an incoming submission by scanning pending
/// reports near the candidate coordinates.
pub struct DedupService {
    store: Arc<dyn ReportStore>,
}

impl DedupService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Find the nearest pending report strictly within the merge radius.
    ///
    /// Only `pending` reports are eligible targets; a site already being
    /// worked on (or cleaned) never absorbs new duplicates. Equidistant
    /// candidates are broken by lowest id so results are reproducible.
    pub async fn find_merge_target(&self, lat: f64, lng: f64) -> Result<Option<Report>> {
        // Bounding-box prefilter before the exact distance check.
        // 1 degree of latitude is approximately 111km; longitude shrinks
        // with cos(lat), clamped away from the poles.
        let lat_delta = (DEDUP_RADIUS_KM / 111.0) * 2.0;
        let lng_delta = lat_delta / lat.to_radians().cos().abs().max(0.01);

        let candidates = self
            .store
            .pending_in_box(
                lat - lat_delta,
                lat + lat_delta,
                lng - lng_delta,
                lng + lng_delta,
            )
            .await?;

        let target = candidates
            .into_iter()
            .map(|r| (haversine_km(lat, lng, r.lat, r.lng), r))
            .filter(|(distance, _)| *distance < DEDUP_RADIUS_KM)
            .min_by(|(da, ra), (db, rb)| da.total_cmp(db).then_with(|| ra.id.cmp(&rb.id)))
            .map(|(distance, report)| {
                tracing::debug!(
                    "Merge target {} at {:.1} m from submission",
                    report.id,
                    distance * 1000.0
                );
                report
            });

        Ok(target)
    }
}
