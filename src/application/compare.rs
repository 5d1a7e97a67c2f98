//! Stock comparison job.
//!
//! Loads the latest snapshot, refetches only missing or stale tickers,
//! merges, and saves the result as a new timestamped snapshot.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::price::PriceFetcher;
use crate::domain::merge::{merge, normalize_tickers, partition_by_freshness, DEFAULT_MAX_AGE_HOURS};
use crate::domain::money::percent_change;
use crate::domain::sampler::{
    closest_expiration, select_otm_call, select_otm_put, CallSample, DEFAULT_OTM_PCT, ONE_YEAR,
    SIX_MONTHS, THREE_MONTHS,
};
use crate::domain::yields::premium_yield_pct;
use crate::domain::{OptionChain, Percent, Price, Snapshot, TickerRecord};
use crate::error::Result;
use crate::port::outbound::market::MarketData;
use crate::port::outbound::store::SnapshotStore;

/// Market capitalization is reported in trillions.
const TRILLION: Decimal = dec!(1000000000000);

/// Tunables for one comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonSettings {
    pub max_age_hours: i64,
    pub otm_pct: Percent,
    /// Pause between symbols and between chain requests.
    pub pacing_ms: u64,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            otm_pct: DEFAULT_OTM_PCT,
            pacing_ms: 1000,
        }
    }
}

/// Outcome of [`StockComparison::run`].
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub snapshot: Snapshot,
    pub path: PathBuf,
    /// Tickers served from the prior snapshot.
    pub reused: Vec<String>,
    /// Tickers fetched in this run, failed ones included.
    pub fetched: Vec<String>,
    /// Tickers whose fresh record carries an error.
    pub failed: Vec<String>,
}

/// Samples for the three tenors of one symbol.
#[derive(Debug, Default)]
struct OptionSamples {
    call_3m: Option<CallSample>,
    call_6m: Option<CallSample>,
    call_1y: Option<CallSample>,
    put_1y: Option<Price>,
}

/// Builds comparison rows and persists snapshots.
pub struct StockComparison {
    market: Arc<dyn MarketData>,
    prices: PriceFetcher,
    store: Arc<dyn SnapshotStore>,
    settings: ComparisonSettings,
}

impl StockComparison {
    #[must_use]
    pub fn new(
        market: Arc<dyn MarketData>,
        prices: PriceFetcher,
        store: Arc<dyn SnapshotStore>,
        settings: ComparisonSettings,
    ) -> Self {
        Self {
            market,
            prices,
            store,
            settings,
        }
    }

    /// Refresh `tickers` against the latest snapshot and save a new one.
    ///
    /// A snapshot that cannot be read is treated as absent. Per-symbol
    /// failures end up in that symbol's `error` field.
    ///
    /// # Errors
    ///
    /// Returns an error only when the new snapshot cannot be saved.
    pub async fn run(&self, tickers: &[String], now: NaiveDateTime) -> Result<ComparisonReport> {
        let tickers = normalize_tickers(tickers);
        let existing = match self.store.latest() {
            Ok(Some(snapshot)) => snapshot.records,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "Prior snapshot unreadable, fetching everything");
                Vec::new()
            }
        };

        let freshness =
            partition_by_freshness(&tickers, &existing, now, self.settings.max_age_hours);
        info!(
            reused = freshness.fresh.len(),
            refresh = freshness.refresh.len(),
            provider = self.market.provider_name(),
            "Starting comparison"
        );

        let mut fresh = Vec::with_capacity(freshness.refresh.len());
        for (i, symbol) in freshness.refresh.iter().enumerate() {
            if i > 0 {
                self.pace().await;
            }
            let record = match self.fetch_record(symbol, now).await {
                Ok(record) => record,
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, "Fetch failed");
                    TickerRecord::failed(symbol.as_str(), err.to_string(), now)
                }
            };
            fresh.push(record);
        }

        let failed = fresh
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| r.symbol.clone())
            .collect();
        let refreshed: HashSet<String> = freshness.refresh.iter().cloned().collect();
        let snapshot = Snapshot::new(now, merge(&existing, fresh, &refreshed));
        let path = self.store.save(&snapshot)?;

        Ok(ComparisonReport {
            snapshot,
            path,
            reused: freshness.fresh,
            fetched: freshness.refresh,
            failed,
        })
    }

    /// Build a fresh record for `symbol`.
    ///
    /// A missing price is an error. Missing history only leaves the change
    /// columns empty; missing options keep the price columns and record the
    /// reason in `error`.
    ///
    /// # Errors
    ///
    /// Returns an error when no price can be obtained.
    pub async fn fetch_record(&self, symbol: &str, now: NaiveDateTime) -> Result<TickerRecord> {
        let quote = self.prices.fetch_quote(symbol).await?;
        let mut record = TickerRecord::new(symbol, now);
        let Some(spot) = quote.price else {
            return Ok(TickerRecord::failed(symbol, "quote carried no price", now));
        };

        let closes = match self.market.daily_closes(symbol).await {
            Ok(closes) => closes,
            Err(err) => {
                warn!(symbol, error = %err, "Price history unavailable");
                Vec::new()
            }
        };
        let previous_close = quote
            .previous_close
            .or_else(|| closes.len().checked_sub(2).and_then(|i| closes.get(i).copied()));

        record.current_price = Some(spot);
        record.day_change_pct = previous_close
            .and_then(|prev| percent_change(prev, spot))
            .map(|pct| pct.round_dp(2));
        record.yoy_change_pct = match (closes.first(), closes.last()) {
            (Some(first), Some(last)) if closes.len() > 1 => {
                percent_change(*first, *last).map(|pct| pct.round_dp(1))
            }
            _ => None,
        };
        record.market_cap_trillions = quote
            .market_cap
            .and_then(|cap| cap.checked_div(TRILLION))
            .map(|t| t.round_dp(3));
        record.pe_ratio = quote.trailing_pe.map(|pe| pe.round_dp(2));
        record.ex_dividend_date = quote.ex_dividend_date;
        record.dividend_yield = quote.dividend_yield;
        record.analyst_target = quote.target_mean_price;

        match self.sample_options(symbol, spot, now.date()).await {
            Ok(samples) => {
                record.call_yield_3m = samples.call_3m.map(|c| c.yield_pct);
                record.call_yield_6m = samples.call_6m.map(|c| c.yield_pct);
                record.example_strike_6m = samples.call_6m.map(|c| c.strike);
                record.call_yield_1y = samples.call_1y.map(|c| c.yield_pct);
                record.call_premium_yield = record.call_yield_1y;
                record.put_price_1y = samples.put_1y;
                record.put_premium_yield =
                    samples.put_1y.and_then(|put| premium_yield_pct(put, spot));
            }
            Err(err) => {
                warn!(symbol, error = %err, "Option data unavailable");
                record.error = Some(err.to_string());
            }
        }

        debug!(symbol, price = %spot, "Record built");
        Ok(record)
    }

    async fn sample_options(
        &self,
        symbol: &str,
        spot: Price,
        today: NaiveDate,
    ) -> Result<OptionSamples> {
        let expirations = self.market.expirations(symbol).await?;
        let otm = self.settings.otm_pct;
        let mut chains: HashMap<NaiveDate, OptionChain> = HashMap::new();
        let mut samples = OptionSamples::default();
        let mut last_failure = None;

        for (i, tenor) in [THREE_MONTHS, SIX_MONTHS, ONE_YEAR].into_iter().enumerate() {
            let expiration = closest_expiration(&expirations, tenor, today)?;
            if !chains.contains_key(&expiration) {
                if i > 0 {
                    self.pace().await;
                }
                match self.market.option_chain(symbol, expiration).await {
                    Ok(chain) => {
                        chains.insert(expiration, chain);
                    }
                    Err(err) => {
                        warn!(symbol, %expiration, tenor, error = %err, "Skipping tenor");
                        last_failure = Some(err);
                        continue;
                    }
                }
            }
            let Some(chain) = chains.get(&expiration) else {
                continue;
            };

            let call = select_otm_call(&chain.calls, spot, otm);
            match tenor {
                THREE_MONTHS => samples.call_3m = call,
                SIX_MONTHS => samples.call_6m = call,
                _ => {
                    samples.call_1y = call;
                    samples.put_1y = select_otm_put(&chain.puts, spot, otm);
                }
            }
        }
        match last_failure {
            Some(err) if chains.is_empty() => Err(err),
            _ => Ok(samples),
        }
    }

    async fn pace(&self) {
        if self.settings.pacing_ms > 0 {
            sleep(Duration::from_millis(self.settings.pacing_ms)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::price::RetryPolicy;
    use crate::domain::EquityQuote;
    use crate::testkit::domain::{at, call, chain, date, days_after, priced_record, put};
    use crate::testkit::market::FakeMarketData;
    use crate::testkit::store::MemorySnapshotStore;
    use chrono::Duration as ChronoDuration;

    fn now() -> NaiveDateTime {
        at(date(2025, 7, 23), 12, 0)
    }

    fn today() -> NaiveDate {
        now().date()
    }

    /// Spot 100: the 6% OTM call floor is 106 and the put ceiling 94.
    fn optionable(market: FakeMarketData, symbol: &str) -> FakeMarketData {
        let calls = |days| {
            let exp = days_after(today(), days);
            vec![
                call(dec!(105), dec!(5), 10, exp),
                call(dec!(110), dec!(2), 10, exp),
                call(dec!(106), dec!(4), 10, exp),
            ]
        };
        let puts = |days| {
            let exp = days_after(today(), days);
            vec![put(dec!(90), dec!(1.5), 10, exp), put(dec!(94), dec!(3), 10, exp)]
        };
        market
            .with_quote(EquityQuote {
                symbol: symbol.to_string(),
                price: Some(dec!(100)),
                previous_close: Some(dec!(98)),
                market_cap: Some(dec!(2500000000000)),
                trailing_pe: Some(dec!(30.123)),
                target_mean_price: Some(dec!(120)),
                ..EquityQuote::default()
            })
            .with_closes(symbol, vec![dec!(80), dec!(95), dec!(100)])
            .with_chain(symbol, chain(days_after(today(), 91), calls(91), puts(91)))
            .with_chain(symbol, chain(days_after(today(), 182), calls(182), puts(182)))
            .with_chain(symbol, chain(days_after(today(), 364), calls(364), puts(364)))
    }

    fn service(market: FakeMarketData, store: Arc<MemorySnapshotStore>) -> StockComparison {
        let market = Arc::new(market);
        StockComparison::new(
            market.clone(),
            PriceFetcher::new(market, RetryPolicy::immediate(3)),
            store,
            ComparisonSettings {
                pacing_ms: 0,
                ..ComparisonSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn fresh_record_carries_quote_history_and_option_samples() {
        let store = Arc::new(MemorySnapshotStore::new());
        let service = service(optionable(FakeMarketData::new(), "AAA"), store);

        let record = service.fetch_record("AAA", now()).await.unwrap();

        assert_eq!(record.current_price, Some(dec!(100)));
        assert_eq!(record.day_change_pct, Some(dec!(2.04)));
        assert_eq!(record.yoy_change_pct, Some(dec!(25.0)));
        assert_eq!(record.market_cap_trillions, Some(dec!(2.5)));
        assert_eq!(record.pe_ratio, Some(dec!(30.12)));
        assert_eq!(record.call_yield_3m, Some(dec!(4)));
        assert_eq!(record.example_strike_6m, Some(dec!(106)));
        assert_eq!(record.put_price_1y, Some(dec!(3)));
        assert_eq!(record.put_premium_yield, Some(dec!(3)));
        assert_eq!(record.call_premium_yield, Some(dec!(4)));
        assert_eq!(record.put_call_ratio(), Some(dec!(0.75)));
        assert!(record.error.is_none());
        assert_eq!(record.last_update, Some(now()));
    }

    #[tokio::test]
    async fn missing_options_keep_price_columns() {
        let market = FakeMarketData::new()
            .with_price("AAA", dec!(50))
            .with_closes("AAA", vec![dec!(40), dec!(50)]);
        let service = service(market, Arc::new(MemorySnapshotStore::new()));

        let record = service.fetch_record("AAA", now()).await.unwrap();

        assert_eq!(record.current_price, Some(dec!(50)));
        assert_eq!(record.day_change_pct, Some(dec!(25)));
        assert!(record.call_yield_3m.is_none());
        assert!(record.error.unwrap().contains("no options data"));
    }

    #[tokio::test]
    async fn history_failure_is_not_fatal() {
        let market = optionable(FakeMarketData::new(), "AAA").failing_closes("AAA");
        let service = service(market, Arc::new(MemorySnapshotStore::new()));

        let record = service.fetch_record("AAA", now()).await.unwrap();
        assert!(record.yoy_change_pct.is_none());
        assert_eq!(record.day_change_pct, Some(dec!(2.04)));
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn run_reuses_fresh_rows_and_refetches_the_rest() {
        let prior = Snapshot::new(
            now() - ChronoDuration::hours(6),
            vec![
                priced_record("AAA", dec!(90), now() - ChronoDuration::hours(1)),
                priced_record("BBB", dec!(80), now() - ChronoDuration::hours(6)),
                priced_record("ZZZ", dec!(10), now() - ChronoDuration::hours(9)),
            ],
        );
        let store = Arc::new(MemorySnapshotStore::new().with_prior(prior));
        let market = optionable(FakeMarketData::new(), "BBB").failing_quotes("CCC", 10);
        let service = service(market, store.clone());

        let tickers = ["aaa", "BBB", "CCC"].map(String::from);
        let report = service.run(&tickers, now()).await.unwrap();

        assert_eq!(report.reused, ["AAA"]);
        assert_eq!(report.fetched, ["BBB", "CCC"]);
        assert_eq!(report.failed, ["CCC"]);

        let snapshot = &store.saved()[0];
        let symbols: Vec<&str> = snapshot.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["AAA", "ZZZ", "BBB", "CCC"]);
        assert_eq!(snapshot.get("AAA").unwrap().current_price, Some(dec!(90)));
        assert_eq!(snapshot.get("BBB").unwrap().current_price, Some(dec!(100)));
        assert!(snapshot.get("CCC").unwrap().error.as_deref().unwrap().contains("3 attempts"));
    }

    #[tokio::test]
    async fn unreadable_prior_snapshot_fetches_everything() {
        let store = Arc::new(MemorySnapshotStore::new().unreadable());
        let service = service(optionable(FakeMarketData::new(), "AAA"), store.clone());

        let report = service.run(&["AAA".to_string()], now()).await.unwrap();

        assert_eq!(report.fetched, ["AAA"]);
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test]
    async fn chains_are_fetched_once_per_expiration() {
        let exp = days_after(today(), 200);
        let market = Arc::new(
            FakeMarketData::new()
                .with_price("AAA", dec!(100))
                .with_chain("AAA", chain(exp, vec![call(dec!(110), dec!(2), 1, exp)], vec![])),
        );
        let service = StockComparison::new(
            market.clone(),
            PriceFetcher::new(market.clone(), RetryPolicy::immediate(1)),
            Arc::new(MemorySnapshotStore::new()),
            ComparisonSettings {
                pacing_ms: 0,
                ..ComparisonSettings::default()
            },
        );

        let record = service.fetch_record("AAA", now()).await.unwrap();

        assert_eq!(market.chain_calls(), 1);
        assert_eq!(record.call_yield_3m, Some(dec!(2)));
        assert_eq!(record.call_yield_1y, Some(dec!(2)));
        assert!(record.put_price_1y.is_none());
    }

    #[tokio::test]
    async fn failed_chain_only_drops_its_own_tenor() {
        let market = optionable(FakeMarketData::new(), "AAA")
            .failing_chain("AAA", days_after(today(), 364));
        let service = service(market, Arc::new(MemorySnapshotStore::new()));

        let record = service.fetch_record("AAA", now()).await.unwrap();

        assert_eq!(record.call_yield_3m, Some(dec!(4)));
        assert_eq!(record.example_strike_6m, Some(dec!(106)));
        assert!(record.call_yield_1y.is_none());
        assert!(record.put_price_1y.is_none());
        assert!(record.error.is_none());
    }
}
