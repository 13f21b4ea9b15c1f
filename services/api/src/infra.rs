use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use scholar_match::catalog::CatalogImporter;
use scholar_match::error::AppError;
use scholar_match::recommendations::{
    Profile, ProfileStore, ScholarshipCatalog, ScholarshipRecord, StoreError, UserId,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    profiles: Arc<Mutex<BTreeMap<UserId, Profile>>>,
}

impl InMemoryProfileStore {
    pub(crate) fn insert(&self, user: UserId, profile: Profile) {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(user, profile);
    }

    pub(crate) fn len(&self) -> usize {
        self.profiles.lock().expect("profile mutex poisoned").len()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch(&self, user: &UserId) -> Result<Option<Profile>, StoreError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| StoreError::Unavailable("profile store lock poisoned".to_string()))?;
        Ok(guard.get(user).cloned())
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryCatalog {
    records: Arc<Mutex<Vec<ScholarshipRecord>>>,
}

impl InMemoryCatalog {
    pub(crate) fn new(records: Vec<ScholarshipRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl ScholarshipCatalog for InMemoryCatalog {
    fn list(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

/// Loads a `{ "<user id>": Profile, ... }` document.
pub(crate) fn load_profiles_json(path: &Path) -> Result<InMemoryProfileStore, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let documents: BTreeMap<String, Profile> = serde_json::from_reader(reader)?;

    let store = InMemoryProfileStore::default();
    for (user, profile) in documents {
        store.insert(UserId(user), profile);
    }
    info!(path = %path.display(), profiles = store.len(), "profiles loaded");
    Ok(store)
}

pub(crate) fn load_catalog_csv(path: &Path, today: NaiveDate) -> Result<InMemoryCatalog, AppError> {
    let report = CatalogImporter::from_path(path, today)?;
    info!(
        path = %path.display(),
        records = report.records.len(),
        skipped = report.skipped.len(),
        "catalog loaded"
    );
    Ok(InMemoryCatalog::new(report.records))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
