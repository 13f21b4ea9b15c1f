use crate::infra::{load_catalog_csv, load_profiles_json};
use chrono::{Local, NaiveDate};
use clap::Args;
use scholar_match::error::AppError;
use scholar_match::recommendations::{
    MatchResult, RecommendationError, RecommendationService, ScoringConfig, UserId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON document mapping user ids (e-mail) to profiles
    #[arg(long)]
    pub(crate) profiles: PathBuf,
    /// Scholarship listing CSV (name, award, deadline, eligibility, link)
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// User id to recommend for
    #[arg(long)]
    pub(crate) user: String,
    /// Maximum number of results (defaults to the configured limit)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) limit: Option<i64>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the raw results as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_recommend(args: RecommendArgs, default_limit: i64) -> Result<(), AppError> {
    let RecommendArgs {
        profiles,
        catalog,
        user,
        limit,
        today,
        json,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let profiles = load_profiles_json(&profiles)?;
    let catalog = load_catalog_csv(&catalog, today)?;

    let service = RecommendationService::new(
        Arc::new(profiles),
        Arc::new(catalog),
        ScoringConfig::default(),
    )
    .with_default_limit(default_limit)
    .map_err(RecommendationError::from)?;

    let user = UserId(user);
    let results = service.recommend_on(&user, limit, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_table(&user, today, &results));
    }
    Ok(())
}

fn render_table(user: &UserId, today: NaiveDate, results: &[MatchResult]) -> String {
    let mut out = format!("Scholarship recommendations for {user} (as of {today})\n");
    if results.is_empty() {
        out.push_str("No scholarships in the catalog.\n");
        return out;
    }

    for (index, result) in results.iter().enumerate() {
        let deadline = result
            .deadline
            .map(|date| date.to_string())
            .unwrap_or_else(|| "rolling".to_string());
        out.push_str(&format!(
            "{:>2}. {:>6.2}  {} | award {:.0} | deadline {}\n",
            index + 1,
            result.score,
            result.name,
            result.award_amount,
            deadline
        ));
        for reason in &result.matched_criteria {
            out.push_str(&format!("      + {reason}\n"));
        }
        for reason in &result.unmet_criteria {
            out.push_str(&format!("      - {reason}\n"));
        }
        for note in &result.notes {
            out.push_str(&format!("      ? {note}\n"));
        }
        if !result.apply_link.is_empty() {
            out.push_str(&format!("      apply: {}\n", result.apply_link));
        }
    }
    out
}
