//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod flamegraph;
pub mod gecko;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use flamegraph::{build_call_trees, execute_flamegraph};
pub use gecko::{build_thread_profiles, execute_gecko};
pub use models::{FlamegraphArgs, GeckoArgs};
pub use utils::{display_categories, display_version, open_samples, validate_profile_file};
