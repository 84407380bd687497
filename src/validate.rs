// dskt-check/src/validate.rs

use thiserror::Error;
use tracing::debug;

use crate::github::{FetchError, GithubClient};
use crate::registry::{RegistryEntry, RepoRef};
use crate::schema::{SchemaCheck, Violation, render_violations};

/// Branches tried when the API doesn't tell us the default branch, in order.
pub const FALLBACK_BRANCHES: [&str; 4] = ["main", "master", "development", "dev"];

/// Everything that can sink a single registry entry. Caught at the entry
/// level and rendered as a per-entry failure marker; never crashes the run.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("unsupported repository url: {0}")]
    BadRepoUrl(String),
    #[error("dskt.json not found in repository (tried branches: {})", .attempted.join(", "))]
    ManifestNotFound { attempted: Vec<String> },
    #[error("invalid dskt.json schema:\n{}", render_violations(.violations))]
    ManifestSchemaInvalid { violations: Vec<Violation> },
    #[error("dskt.json on branch {branch} is not valid JSON: {source}")]
    ManifestParse {
        branch: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("name mismatch: dskt.json name is {found:?}, registry says {expected:?}")]
    NameMismatch { expected: String, found: String },
    #[error("transport error on branch {branch}: {source}")]
    Transport {
        branch: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Ordered branch candidates for a repository: the platform's default branch
/// first when the API yields one, then the fixed fallback list, deduplicated.
pub async fn candidate_branches(client: &GithubClient, repo: &RepoRef) -> Vec<String> {
    let mut candidates = Vec::with_capacity(FALLBACK_BRANCHES.len() + 1);
    if let Some(default) = client.default_branch(repo).await {
        debug!(%repo, %default, "default branch from API");
        candidates.push(default);
    }
    for branch in FALLBACK_BRANCHES {
        if !candidates.iter().any(|c| c == branch) {
            candidates.push(branch.to_owned());
        }
    }
    candidates
}

/// Validate one registry entry end to end: resolve a branch holding
/// `dskt.json`, schema-check the manifest, cross-check its declared name.
///
/// A 404 on one branch moves on to the next candidate. A manifest that exists
/// but is not JSON, or a transport failure, stops the loop immediately;
/// neither condition means "try another branch".
pub async fn validate_entry(
    client: &GithubClient,
    schema: &SchemaCheck,
    entry: &RegistryEntry,
) -> Result<(), EntryError> {
    let repo = RepoRef::parse(&entry.repo).map_err(|_| EntryError::BadRepoUrl(entry.repo.clone()))?;
    let candidates = candidate_branches(client, &repo).await;
    let mut attempted = Vec::with_capacity(candidates.len());
    for branch in &candidates {
        debug!(%repo, %branch, "checking branch for dskt.json");
        attempted.push(branch.clone());
        let manifest = match client.fetch_manifest(&repo, branch).await {
            Ok(manifest) => manifest,
            Err(FetchError::NotFound) => {
                debug!(%repo, %branch, "not found on this branch, trying next");
                continue;
            }
            Err(FetchError::Parse(source)) => {
                return Err(EntryError::ManifestParse { branch: branch.clone(), source });
            }
            Err(FetchError::Transport(source)) => {
                return Err(EntryError::Transport { branch: branch.clone(), source });
            }
        };

        let violations = schema.check(&manifest);
        if !violations.is_empty() {
            return Err(EntryError::ManifestSchemaInvalid { violations });
        }
        let found = manifest.get("name").and_then(|v| v.as_str()).unwrap_or_default();
        if found != entry.name {
            return Err(EntryError::NameMismatch {
                expected: entry.name.clone(),
                found: found.to_owned(),
            });
        }
        return Ok(());
    }
    Err(EntryError::ManifestNotFound { attempted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;

    #[test]
    fn not_found_error_enumerates_attempted_branches() {
        let err = EntryError::ManifestNotFound {
            attempted: vec!["trunk".into(), "main".into(), "master".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("trunk, main, master"), "{msg}");
    }

    #[test]
    fn schema_error_lists_every_violation() {
        let err = EntryError::ManifestSchemaInvalid {
            violations: vec![
                Violation { path: "".into(), message: "\"name\" is a required property".into() },
                Violation { path: "/version".into(), message: "3 is not of type \"string\"".into() },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("- \"name\" is a required property"), "{msg}");
        assert!(msg.contains("- /version: 3 is not of type \"string\""), "{msg}");
    }
}
