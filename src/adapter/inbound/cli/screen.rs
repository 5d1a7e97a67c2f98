//! Handler for the `screen` command.

use std::path::Path;

use chrono::Local;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ScreenArgs;
use crate::adapter::inbound::cli::output::Output;
use crate::adapter::outbound::csv::{screen_results_path, write_candidates};
use crate::domain::merge::normalize_tickers;
use crate::domain::{ScreenCandidate, ScreenCriteria};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::market::build_market_data;
use crate::infrastructure::factory::service::build_screener;

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Expiration")]
    expiration: String,
    #[tabled(rename = "Strike")]
    strike: String,
    #[tabled(rename = "Last")]
    last: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Days")]
    days: i64,
    #[tabled(rename = "Ann.TV%")]
    annualized: String,
    #[tabled(rename = "Dist.%")]
    distance: String,
}

impl From<&ScreenCandidate> for CandidateRow {
    fn from(c: &ScreenCandidate) -> Self {
        Self {
            ticker: c.symbol.clone(),
            expiration: c.expiration.to_string(),
            strike: c.strike.normalize().to_string(),
            last: c.last.normalize().to_string(),
            volume: c.volume.map_or_else(|| "-".to_string(), |v| v.to_string()),
            days: c.days,
            annualized: format!("{:.2}", c.annualized_tv_pct.round_dp(2)),
            distance: format!("{:.2}", c.distance_pct.round_dp(2)),
        }
    }
}

/// Screen criteria from `[screen]` with command-line overrides applied.
fn criteria(config: &Config, args: &ScreenArgs) -> ScreenCriteria {
    let base = &config.screen;
    ScreenCriteria {
        min_volume: args.min_volume.unwrap_or(base.min_volume),
        max_expirations: args.max_expirations.unwrap_or(base.max_expirations),
        min_annual_tv_pct: args.min_annual_tv.unwrap_or(base.min_annual_tv_pct),
        max_otm_pct: args.max_otm.unwrap_or(base.max_otm_pct),
        min_days: args.min_days.unwrap_or(base.min_days),
        max_results: args.max_results.unwrap_or(base.max_results),
        ..base.clone()
    }
}

/// Execute `screen`.
pub async fn execute(config: &Config, args: &ScreenArgs, out: Output) -> Result<()> {
    let symbols = normalize_tickers(&args.symbols);
    let criteria = criteria(config, args);
    let screener = build_screener(config, build_market_data(config));
    let report = screener
        .screen_many(&symbols, &criteria, Local::now().date_naive())
        .await;

    if let Some(path) = &args.output {
        write_candidates(path, &report.candidates)?;
    }
    if args.save {
        for symbol in &symbols {
            let found: Vec<ScreenCandidate> = report
                .candidates
                .iter()
                .filter(|c| &c.symbol == symbol)
                .cloned()
                .collect();
            if !found.is_empty() {
                write_candidates(&screen_results_path(Path::new("."), symbol), &found)?;
            }
        }
    }

    if out.is_json() {
        out.json_output(json!({
            "command": "screen",
            "criteria": criteria,
            "candidates": report.candidates,
            "failures": report
                .failures
                .iter()
                .map(|(symbol, reason)| json!({ "symbol": symbol, "error": reason }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    out.section("Call Screen");
    out.field("Symbols", symbols.join(", "));
    out.field("Min ann. TV", format!("{}%", criteria.min_annual_tv_pct));

    if report.candidates.is_empty() {
        out.note("No calls met the criteria");
    } else if !out.is_quiet() {
        let rows: Vec<CandidateRow> = report.candidates.iter().map(CandidateRow::from).collect();
        out.lines(&Table::new(rows).to_string());
    }
    for (symbol, reason) in &report.failures {
        out.warning(&format!("{symbol}: {reason}"));
    }
    if let Some(path) = &args.output {
        out.success(&format!("Wrote {}", path.display()));
    }

    Ok(())
}
