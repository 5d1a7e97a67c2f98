//! Infrastructure configuration modules.

pub mod comparison;
pub mod logging;
pub mod portfolio;
pub mod settings;

pub use settings::Config;
