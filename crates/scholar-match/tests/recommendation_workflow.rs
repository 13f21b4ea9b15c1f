//! Integration scenarios for scholarship recommendations.
//!
//! Scenarios drive the public service facade and HTTP router with a catalog
//! imported from CSV, the same path the API service uses for seed data.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use scholar_match::catalog::CatalogImporter;
    use scholar_match::recommendations::{
        Gender, Profile, ProfileStore, QualificationTier, RecommendationService,
        ScholarshipCatalog, ScholarshipRecord, ScoreType, ScoringConfig, StoreError, UserId,
    };

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    pub(super) const LISTING: &str = "\
id,name,award,deadline,eligibility,link
merit,State Merit Scholarship,\"₹50,000 per annum\",18-11-2026,Undergraduate students with minimum 75% marks,https://a.example/merit
pg,Research Fellowship,\"₹90,000\",2026-11-08,Postgraduate students only,https://a.example/pg
tie-late,Late Tie Grant,\"₹20,000\",2026-12-20,,https://a.example/tie-late
tie-early-small,Early Small Grant,\"₹20,000\",2026-12-10,,https://a.example/tie-early-small
tie-early-large,Early Large Grant,\"₹30,000\",2026-12-10,,https://a.example/tie-early-large
closed,Expired Award,\"₹99,000\",closed,,https://a.example/closed
";

    pub(super) fn catalog() -> Vec<ScholarshipRecord> {
        import(LISTING)
    }

    pub(super) fn import(listing: &str) -> Vec<ScholarshipRecord> {
        CatalogImporter::from_reader(listing.as_bytes(), today())
            .expect("listing parses")
            .records
    }

    pub(super) fn profile(tier: QualificationTier, score: &str) -> Profile {
        Profile {
            qualification: tier,
            institution_name: None,
            score_type: ScoreType::Percentage,
            score_value: score.to_string(),
            gender: Gender::Male,
            region: "Pune, Maharashtra".to_string(),
            year_of_completion: None,
        }
    }

    #[derive(Default)]
    pub(super) struct Profiles(Mutex<HashMap<UserId, Profile>>);

    impl Profiles {
        pub(super) fn insert(&self, user: &str, profile: Profile) {
            self.0
                .lock()
                .expect("profile mutex poisoned")
                .insert(UserId(user.to_string()), profile);
        }
    }

    impl ProfileStore for Profiles {
        fn fetch(&self, user: &UserId) -> Result<Option<Profile>, StoreError> {
            Ok(self.0.lock().expect("profile mutex poisoned").get(user).cloned())
        }
    }

    pub(super) struct Catalog(pub(super) Vec<ScholarshipRecord>);

    impl ScholarshipCatalog for Catalog {
        fn list(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
            Ok(self.0.clone())
        }
    }

    pub(super) fn service(
        user: &str,
        profile: Profile,
    ) -> RecommendationService<Profiles, Catalog> {
        service_over(user, profile, catalog())
    }

    pub(super) fn service_over(
        user: &str,
        profile: Profile,
        records: Vec<ScholarshipRecord>,
    ) -> RecommendationService<Profiles, Catalog> {
        let profiles = Profiles::default();
        profiles.insert(user, profile);
        RecommendationService::new(
            Arc::new(profiles),
            Arc::new(Catalog(records)),
            ScoringConfig::default(),
        )
    }
}

use common::*;
use scholar_match::recommendations::{
    recommendation_router, QualificationTier, RecommendationError, UserId,
};
use std::sync::Arc;

#[test]
fn closed_listings_never_reach_the_catalog() {
    let ids: Vec<String> = catalog().into_iter().map(|record| record.id.0).collect();
    assert_eq!(
        ids,
        vec!["merit", "pg", "tie-late", "tie-early-small", "tie-early-large"]
    );
}

#[test]
fn near_miss_threshold_ranks_with_partial_credit() {
    let service = service("ravi@example.org", profile(QualificationTier::Undergraduate, "72"));

    let results = service
        .recommend_on(&UserId("ravi@example.org".to_string()), None, today())
        .expect("recommendations");

    let merit = results
        .iter()
        .find(|result| result.scholarship_id.0 == "merit")
        .expect("merit listed");
    assert!(merit.score > 50.0 && merit.score < 100.0);
    assert!(merit
        .unmet_criteria
        .contains(&"score threshold: 72 < 75 (partial)".to_string()));
}

#[test]
fn postgraduate_only_listing_scores_zero_for_undergraduates() {
    let service = service("ravi@example.org", profile(QualificationTier::Undergraduate, "95"));

    let results = service
        .recommend_on(&UserId("ravi@example.org".to_string()), None, today())
        .expect("recommendations");

    let last = results.last().expect("non-empty");
    assert_eq!(last.scholarship_id.0, "pg");
    assert_eq!(last.score, 0.0);
}

#[test]
fn equal_scores_break_on_nearer_deadline() {
    let service = service("ravi@example.org", profile(QualificationTier::Undergraduate, "95"));

    let results = service
        .recommend_on(&UserId("ravi@example.org".to_string()), None, today())
        .expect("recommendations");

    let tied: Vec<&str> = results
        .iter()
        .filter(|result| result.scholarship_id.0.starts_with("tie-"))
        .map(|result| result.scholarship_id.0.as_str())
        .collect();
    assert_eq!(tied, vec!["tie-early-large", "tie-early-small", "tie-late"]);
}

#[test]
fn category_and_nationality_wording_keeps_listings_open() {
    let listing = "\
id,name,award,deadline,eligibility,link
sc,Post Matric Scholarship,\"₹12,000\",2026-11-30,Students from Scheduled Castes pursuing graduation,https://a.example/sc
income,Need Based Grant,\"₹15,000\",2026-11-30,Undergraduate students from Low Income Families,https://a.example/income
national,National Merit Award,\"₹20,000\",2026-11-30,Indian students pursuing graduation in India,https://a.example/national
rural,Rural Talent Award,\"₹10,000\",2026-11-30,Students from Rural Areas with minimum 60%,https://a.example/rural
kerala,Kerala State Grant,\"₹30,000\",2026-11-30,Residents of Kerala,https://a.example/kerala
";
    let service = service_over(
        "ravi@example.org",
        profile(QualificationTier::Undergraduate, "90"),
        import(listing),
    );

    let results = service
        .recommend_on(&UserId("ravi@example.org".to_string()), None, today())
        .expect("recommendations");

    for result in &results {
        if result.scholarship_id.0 == "kerala" {
            assert_eq!(result.score, 0.0);
        } else {
            assert!(
                result.score > 0.0,
                "{} scored {}",
                result.scholarship_id,
                result.score
            );
        }
    }
    assert_eq!(results.last().map(|result| result.scholarship_id.0.as_str()), Some("kerala"));
}

#[test]
fn output_is_deterministic_for_fixed_inputs() {
    let service = service("ravi@example.org", profile(QualificationTier::Undergraduate, "80"));
    let user = UserId("ravi@example.org".to_string());

    let runs: Vec<_> = (0..5)
        .map(|_| service.recommend_on(&user, Some(3), today()).expect("run"))
        .collect();

    assert!(runs.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(runs[0].len(), 3);
}

#[test]
fn non_positive_limit_is_rejected() {
    let service = service("ravi@example.org", profile(QualificationTier::Undergraduate, "80"));

    let error = service
        .recommend_on(&UserId("ravi@example.org".to_string()), Some(0), today())
        .expect_err("zero limit");

    assert!(matches!(error, RecommendationError::InvalidLimit(_)));
}

#[tokio::test]
async fn router_reports_unknown_users() {
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    let router = recommendation_router(Arc::new(service(
        "ravi@example.org",
        profile(QualificationTier::Undergraduate, "80"),
    )));

    let response = router
        .oneshot(
            Request::get("/api/v1/recommendations?email=someone@example.org")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
