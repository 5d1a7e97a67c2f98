//! Recommendation and screen-result CSV files.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::domain::portfolio::Recommendation;
use crate::domain::ScreenCandidate;
use crate::error::Result;

/// `recommendations.<YYYYMMDD>.csv` under `dir`.
#[must_use]
pub fn recommendations_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("recommendations.{}.csv", date.format("%Y%m%d")))
}

/// `recommendations.<SYMBOL>.csv` under `dir`, for one symbol's screen.
#[must_use]
pub fn screen_results_path(dir: &Path, symbol: &str) -> PathBuf {
    dir.join(format!("recommendations.{symbol}.csv"))
}

#[derive(Serialize)]
struct RecommendationRow {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Recommendation")]
    recommendation: String,
    #[serde(rename = "Expiration")]
    expiration: Option<NaiveDate>,
    #[serde(rename = "Strike")]
    strike: Option<String>,
    #[serde(rename = "Premium")]
    premium: Option<String>,
    #[serde(rename = "Volume")]
    volume: Option<u64>,
    #[serde(rename = "Annualized Return (%)")]
    annualized_return_pct: Option<String>,
    #[serde(rename = "Distance OTM (%)")]
    distance_otm_pct: Option<String>,
}

impl From<&Recommendation> for RecommendationRow {
    fn from(rec: &Recommendation) -> Self {
        Self {
            ticker: rec.ticker.clone(),
            recommendation: rec.action.to_string(),
            expiration: rec.expiration,
            strike: rec.strike.map(plain),
            premium: rec.premium.map(plain),
            volume: rec.volume,
            annualized_return_pct: rec.annualized_return_pct.map(two_places),
            distance_otm_pct: rec.distance_otm_pct.map(two_places),
        }
    }
}

#[derive(Serialize)]
struct CandidateRow {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Expiration")]
    expiration: NaiveDate,
    #[serde(rename = "Strike")]
    strike: String,
    #[serde(rename = "Last")]
    last: String,
    #[serde(rename = "Bid")]
    bid: Option<String>,
    #[serde(rename = "Ask")]
    ask: Option<String>,
    #[serde(rename = "Volume")]
    volume: Option<u64>,
    #[serde(rename = "OI")]
    open_interest: Option<u64>,
    #[serde(rename = "TimeVal$")]
    time_value: String,
    #[serde(rename = "Days")]
    days: i64,
    #[serde(rename = "Ann.TV%")]
    annualized_tv_pct: String,
    #[serde(rename = "Dist.%")]
    distance_pct: String,
}

impl From<&ScreenCandidate> for CandidateRow {
    fn from(c: &ScreenCandidate) -> Self {
        Self {
            ticker: c.symbol.clone(),
            expiration: c.expiration,
            strike: plain(c.strike),
            last: plain(c.last),
            bid: c.bid.map(plain),
            ask: c.ask.map(plain),
            volume: c.volume,
            open_interest: c.open_interest,
            time_value: two_places(c.time_value),
            days: c.days,
            annualized_tv_pct: two_places(c.annualized_tv_pct),
            distance_pct: two_places(c.distance_pct),
        }
    }
}

fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

fn two_places(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Write recommendation rows with a header line.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub fn write_recommendations(path: &Path, recommendations: &[Recommendation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for rec in recommendations {
        writer.serialize(RecommendationRow::from(rec))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = recommendations.len(), "Recommendations written");
    Ok(())
}

/// Write screened calls with a header line.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub fn write_candidates(path: &Path, candidates: &[ScreenCandidate]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for candidate in candidates {
        writer.serialize(CandidateRow::from(candidate))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = candidates.len(), "Screen results written");
    Ok(())
}
