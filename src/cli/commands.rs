//! CLI subcommand definitions

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch the current model list and cache it if pricing changed
    Fetch {
        /// Model list endpoint
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Shell command to run when a new snapshot is saved ({hash} and {prev_hash} are substituted)
        #[arg(long, value_name = "CMD")]
        on_change: Option<String>,

        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Compare two cached snapshots
    Diff {
        /// The older snapshot hash (a unique prefix is enough)
        old: String,
        /// The newer snapshot hash (a unique prefix is enough)
        new: String,
    },
    /// List cached snapshots, oldest first
    List,
}
