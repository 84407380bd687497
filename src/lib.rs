pub mod github;
pub mod registry;
pub mod run;
pub mod schema;
pub mod validate;

pub use github::{FetchError, GithubClient};
pub use registry::{Registry, RegistryEntry, RepoRef};
pub use run::{Outcome, run_full, run_newest};
pub use schema::{SchemaCheck, Violation, render_violations};
pub use validate::{EntryError, FALLBACK_BRANCHES, candidate_branches, validate_entry};
