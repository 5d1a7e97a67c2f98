//! Covered-call recommendations for a brokerage portfolio export.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use super::screen::OptionScreener;
use crate::adapter::outbound::csv::{
    latest_portfolio_file, read_positions, recommendations_path, write_recommendations,
};
use crate::domain::portfolio::{
    related_options, should_roll, Action, Coverage, CoverageState, Position, Recommendation,
};
use crate::domain::error::DomainError;
use crate::error::{Error, Result};
use crate::infrastructure::config::portfolio::PortfolioConfig;

/// Outcome of [`PortfolioFixer::run`].
#[derive(Debug, Clone)]
pub struct PortfolioReport {
    /// Export the positions were read from.
    pub source: PathBuf,
    /// Recommendations file, when anything was recommended.
    pub output: Option<PathBuf>,
    pub recommendations: Vec<Recommendation>,
}

/// Checks each stock position's call coverage and suggests trades.
pub struct PortfolioFixer {
    screener: OptionScreener,
    config: PortfolioConfig,
}

impl PortfolioFixer {
    #[must_use]
    pub fn new(screener: OptionScreener, config: PortfolioConfig) -> Self {
        Self { screener, config }
    }

    /// Read the newest export in `dir`, evaluate it and write the results
    /// to `output_dir`.
    ///
    /// # Errors
    ///
    /// Fails when no export exists, the export cannot be parsed, or the
    /// recommendations file cannot be written.
    pub async fn run(&self, dir: &Path, output_dir: &Path, today: NaiveDate) -> Result<PortfolioReport> {
        let (source, export_date) = latest_portfolio_file(dir)?;
        info!(file = %source.display(), %export_date, "Reading portfolio");
        let positions = read_positions(
            &source,
            self.config.skip_header_rows,
            self.config.skip_footer_rows,
        )?;

        let recommendations = self.evaluate(&positions, today).await;
        let output = if recommendations.is_empty() {
            info!("No recommendations");
            None
        } else {
            std::fs::create_dir_all(output_dir)?;
            let path = recommendations_path(output_dir, export_date);
            write_recommendations(&path, &recommendations)?;
            Some(path)
        };

        Ok(PortfolioReport {
            source,
            output,
            recommendations,
        })
    }

    /// Recommendations for every stock position in `positions`.
    ///
    /// A ticker whose screen fails is logged and skipped.
    pub async fn evaluate(&self, positions: &[Position], today: NaiveDate) -> Vec<Recommendation> {
        let mut out = Vec::new();
        for stock in positions.iter().filter(|p| p.is_stock()) {
            let ticker = stock.underlying();
            let options = related_options(ticker, positions);
            let coverage = Coverage::compute(stock.quantity, &options);

            match coverage.state() {
                CoverageState::Uncovered => {
                    info!(ticker, free = %coverage.free_shares, "Uncovered shares");
                    let Some(candidates) = self.candidates(ticker, today).await else {
                        continue;
                    };
                    out.extend(candidates.iter().map(|c| {
                        Recommendation::from_candidate(ticker, Action::SellCoveredCall, c)
                    }));
                }
                CoverageState::OverCovered => {
                    warn!(ticker, covered = %coverage.covered_shares, shares = %coverage.shares, "Over-covered");
                    out.extend(options.iter().map(|option| {
                        Recommendation::from_position(ticker, Action::BuyBackCall, option)
                    }));
                }
                CoverageState::Covered => {
                    let Some(candidates) = self.candidates(ticker, today).await else {
                        continue;
                    };
                    let best = candidates.first();
                    for option in &options {
                        let held = stock
                            .market_price
                            .and_then(|spot| option.annualized_time_value_pct(spot, today));
                        let rec = match best {
                            Some(best) if should_roll(best, held) => Recommendation::from_candidate(
                                ticker,
                                Action::ConsiderRolling,
                                best,
                            ),
                            _ => Recommendation::from_position(ticker, Action::RollOrHold, option),
                        };
                        out.push(rec);
                    }
                }
            }
        }
        out
    }

    async fn candidates(
        &self,
        ticker: &str,
        today: NaiveDate,
    ) -> Option<Vec<crate::domain::ScreenCandidate>> {
        match self
            .screener
            .screen(ticker, &self.config.criteria, today)
            .await
        {
            Ok(candidates) => Some(candidates),
            Err(Error::Domain(DomainError::NoQualifyingQuote)) => {
                info!(ticker, "No qualifying calls");
                Some(Vec::new())
            }
            Err(err) => {
                warn!(ticker, error = %err, "Screen failed, skipping ticker");
                None
            }
        }
    }
}
