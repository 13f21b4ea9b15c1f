use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::recommendations::domain::{
    Gender, Profile, QualificationTier, ScholarshipId, ScholarshipRecord, ScoreType, UserId,
};
use crate::recommendations::repository::{ProfileStore, ScholarshipCatalog, StoreError};
use crate::recommendations::{recommendation_router, RecommendationService, ScoringConfig};

/// The router evaluates against the wall clock, so fixtures are relative to it.
pub(super) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(super) fn days_from_today(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

pub(super) fn undergraduate(score: &str) -> Profile {
    Profile {
        qualification: QualificationTier::Undergraduate,
        institution_name: Some("PSG College of Technology".to_string()),
        score_type: ScoreType::Percentage,
        score_value: score.to_string(),
        gender: Gender::Female,
        region: "Coimbatore, Tamil Nadu".to_string(),
        year_of_completion: Some(2027),
    }
}

pub(super) fn scholarship(
    id: &str,
    eligibility: &str,
    award: f64,
    deadline: Option<NaiveDate>,
) -> ScholarshipRecord {
    ScholarshipRecord {
        id: ScholarshipId(id.to_string()),
        name: format!("{id} scholarship"),
        award_amount: award,
        deadline,
        eligibility_text: eligibility.to_string(),
        apply_link: format!("https://scholarships.example.org/{id}"),
    }
}

pub(super) fn catalog() -> Vec<ScholarshipRecord> {
    vec![
        scholarship(
            "merit-ug",
            "Undergraduate students with minimum 75% marks",
            50_000.0,
            Some(days_from_today(30)),
        ),
        scholarship(
            "pg-only",
            "Postgraduate students only",
            90_000.0,
            Some(days_from_today(20)),
        ),
        scholarship(
            "women-tn",
            "Female students domiciled in Tamil Nadu",
            25_000.0,
            Some(days_from_today(10)),
        ),
        scholarship("open-rolling", "None", 10_000.0, None),
    ]
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    profiles: Mutex<HashMap<UserId, Profile>>,
    calls: AtomicUsize,
}

impl MemoryProfiles {
    pub(super) fn with(user: &str, profile: Profile) -> Self {
        let store = Self::default();
        store
            .profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(UserId(user.to_string()), profile);
        store
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileStore for MemoryProfiles {
    fn fetch(&self, user: &UserId) -> Result<Option<Profile>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(user).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    records: Mutex<Vec<ScholarshipRecord>>,
    calls: AtomicUsize,
}

impl MemoryCatalog {
    pub(super) fn with(records: Vec<ScholarshipRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScholarshipCatalog for MemoryCatalog {
    fn list(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().expect("catalog mutex poisoned").clone())
    }
}

pub(super) struct UnavailableCatalog;

impl ScholarshipCatalog for UnavailableCatalog {
    fn list(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
        Err(StoreError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) const USER: &str = "asha@example.org";

pub(super) fn build_service(
    profile: Profile,
    records: Vec<ScholarshipRecord>,
) -> (
    RecommendationService<MemoryProfiles, MemoryCatalog>,
    Arc<MemoryProfiles>,
    Arc<MemoryCatalog>,
) {
    let profiles = Arc::new(MemoryProfiles::with(USER, profile));
    let catalog = Arc::new(MemoryCatalog::with(records));
    let service =
        RecommendationService::new(profiles.clone(), catalog.clone(), ScoringConfig::default());
    (service, profiles, catalog)
}

pub(super) fn router_with_service(
    service: RecommendationService<MemoryProfiles, MemoryCatalog>,
) -> axum::Router {
    recommendation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
