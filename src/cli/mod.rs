//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod detect;
mod list;
mod output;
mod score;

pub use detect::run_detect;
pub use list::{run_generate_config, run_list};
pub use output::{write_output, OutputTarget};
pub use score::{run_score, resolve_filter, ScoreConfig};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Every input was parsed and scored
    pub const SUCCESS: i32 = 0;
    /// At least one input failed to parse
    pub const PARSE_FAILED: i32 = 1;
    /// An internal error occurred
    pub const ERROR: i32 = 3;
}
