//! Handler for the `portfolio` command.

use chrono::Local;
use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::PortfolioArgs;
use crate::adapter::inbound::cli::output::Output;
use crate::domain::portfolio::Recommendation;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::market::build_market_data;
use crate::infrastructure::factory::service::build_portfolio_fixer;

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Recommendation")]
    action: String,
    #[tabled(rename = "Expiration")]
    expiration: String,
    #[tabled(rename = "Strike")]
    strike: String,
    #[tabled(rename = "Premium")]
    premium: String,
    #[tabled(rename = "Ann. %")]
    annualized: String,
}

fn cell(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.round_dp(2).normalize().to_string())
}

impl From<&Recommendation> for RecommendationRow {
    fn from(rec: &Recommendation) -> Self {
        Self {
            ticker: rec.ticker.clone(),
            action: rec.action.to_string(),
            expiration: rec
                .expiration
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            strike: cell(rec.strike),
            premium: cell(rec.premium),
            annualized: cell(rec.annualized_return_pct),
        }
    }
}

/// Execute `portfolio`.
pub async fn execute(config: &Config, args: &PortfolioArgs, out: Output) -> Result<()> {
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.portfolio.directory.clone());
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.portfolio.output_dir.clone());

    let fixer = build_portfolio_fixer(config, build_market_data(config));
    let report = fixer
        .run(&dir, &output_dir, Local::now().date_naive())
        .await?;

    if out.is_json() {
        out.json_output(json!({
            "command": "portfolio",
            "source": report.source.display().to_string(),
            "output": report.output.as_ref().map(|p| p.display().to_string()),
            "recommendations": report.recommendations,
        }));
        return Ok(());
    }

    out.section("Portfolio");
    out.field("Export", report.source.display());
    match &report.output {
        Some(path) => {
            if !out.is_quiet() {
                let rows: Vec<RecommendationRow> = report
                    .recommendations
                    .iter()
                    .map(RecommendationRow::from)
                    .collect();
                out.lines(&Table::new(rows).to_string());
            }
            out.success(&format!("Wrote {}", path.display()));
        }
        None => out.note("Nothing to recommend"),
    }

    Ok(())
}
