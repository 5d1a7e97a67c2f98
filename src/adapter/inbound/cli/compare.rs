//! Handler for the `compare` command.

use chrono::Local;
use rust_decimal::Decimal;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::CompareArgs;
use crate::adapter::inbound::cli::output::Output;
use crate::adapter::outbound::xlsx::presentation_order;
use crate::domain::TickerRecord;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::market::build_market_data;
use crate::infrastructure::factory::service::build_comparison;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "1D %")]
    day: String,
    #[tabled(rename = "YoY %")]
    yoy: String,
    #[tabled(rename = "Call 3M %")]
    call_3m: String,
    #[tabled(rename = "Call 1Y %")]
    call_1y: String,
    #[tabled(rename = "Put 1Y %")]
    put_1y: String,
    #[tabled(rename = "Put/Call")]
    ratio: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

fn cell(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.normalize().to_string())
}

impl RecordRow {
    fn new(record: &TickerRecord) -> Self {
        Self {
            ticker: record.symbol.clone(),
            price: cell(record.current_price),
            day: cell(record.day_change_pct),
            yoy: cell(record.yoy_change_pct),
            call_3m: cell(record.call_yield_3m),
            call_1y: cell(record.call_yield_1y),
            put_1y: cell(record.put_premium_yield),
            ratio: cell(record.put_call_ratio().map(|r| r.round_dp(4))),
            updated: record.last_update_text().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute `compare`.
pub async fn execute(config: &Config, args: &CompareArgs, out: Output) -> Result<()> {
    let tickers = if args.tickers.is_empty() {
        config.comparison.tickers.clone()
    } else {
        args.tickers.clone()
    };
    let max_age_hours = args
        .max_age_hours
        .unwrap_or(config.comparison.max_age_hours);
    if max_age_hours <= 0 {
        return Err(ConfigError::InvalidValue {
            field: "max_age_hours",
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.comparison.output_dir.clone());

    let market = build_market_data(config);
    let service = build_comparison(config, market, output_dir, max_age_hours);
    let report = service.run(&tickers, Local::now().naive_local()).await?;

    let mut records = report.snapshot.records.clone();
    presentation_order(&mut records);

    if out.is_json() {
        out.json_output(json!({
            "command": "compare",
            "path": report.path.display().to_string(),
            "reused": report.reused,
            "fetched": report.fetched,
            "failed": report.failed,
            "records": records,
        }));
        return Ok(());
    }

    out.section("Comparison");
    out.field("Snapshot", report.path.display());
    out.field("Reused", report.reused.len());
    out.field("Fetched", report.fetched.len());

    if !out.is_quiet() {
        let rows: Vec<RecordRow> = records.iter().map(RecordRow::new).collect();
        out.lines(&Table::new(rows).to_string());
    }

    for record in records.iter().filter(|r| report.failed.contains(&r.symbol)) {
        if let Some(error) = &record.error {
            out.warning(&format!("{}: {error}", record.symbol));
        }
    }
    if report.failed.is_empty() {
        out.success("Snapshot saved");
    }

    Ok(())
}
