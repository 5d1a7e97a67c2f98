//! CSV files: broker portfolio exports in, recommendations out.

pub mod portfolio;
pub mod recommendations;

pub use portfolio::{latest_portfolio_file, read_positions};
pub use recommendations::{
    recommendations_path, screen_results_path, write_candidates, write_recommendations,
};
