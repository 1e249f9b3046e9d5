//! Path and environment helpers for the CLI.

use std::path::PathBuf;

/// Get the path to the draft database
pub fn draft_db_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "agentflow", "agentflow") {
        proj_dirs.data_dir().join("drafts.db")
    } else {
        PathBuf::from(".agentflow-drafts.db")
    }
}

/// Resolve the backend base URL: explicit flag, then environment, then the
/// development default.
pub fn resolve_base_url(flag: Option<String>) -> String {
    flag.filter(|url| !url.is_empty())
        .or_else(|| {
            std::env::var(agentflow_client::BASE_URL_ENV)
                .ok()
                .filter(|url| !url.is_empty())
        })
        .unwrap_or_else(|| agentflow_client::DEFAULT_BASE_URL.to_string())
}
