//! Market-data-agnostic domain logic: records, quotes, sampling, yields,
//! merging and screening.

pub mod error;
pub mod merge;
pub mod money;
pub mod portfolio;
pub mod quote;
pub mod record;
pub mod sampler;
pub mod screen;
pub mod snapshot;
pub mod yields;

pub use money::{Percent, Price};
pub use quote::{EquityQuote, OptionChain, OptionKind, OptionQuote};
pub use record::TickerRecord;
pub use screen::{ScreenCandidate, ScreenCriteria};
pub use snapshot::Snapshot;
