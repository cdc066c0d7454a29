// Repository lifecycle: one call to create, one best-effort call to delete
// when an upload has to be rolled back.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::ui::{Notice, Reporter};

/// Create a public repository called `name`. Returns `Ok(true)` iff the
/// platform answered 201; any other status is reported and yields
/// `Ok(false)`. Only a failed request (nothing came back) is an error.
pub fn create_repository(api: &ApiClient, name: &str, reporter: &mut dyn Reporter) -> Result<bool> {
    let res = api
        .create_repo(name)
        .with_context(|| format!("Failed to send repository creation request for {}", name))?;

    if res.status == StatusCode::CREATED {
        info!(repo = name, "repository created");
        reporter.notice(Notice::RepoCreated(name.to_string()));
        Ok(true)
    } else {
        reporter.notice(Notice::RepoCreateFailed(res.detail()));
        Ok(false)
    }
}

/// Delete `owner/name`. Failures are reported and otherwise swallowed.
pub fn delete_repository(api: &ApiClient, owner: &str, name: &str, reporter: &mut dyn Reporter) {
    warn!(repo = name, "rolling back repository");
    match api.delete_repo(owner, name) {
        Ok(res) if res.status == StatusCode::NO_CONTENT => {
            reporter.notice(Notice::RepoDeleted(name.to_string()));
        }
        Ok(res) => reporter.notice(Notice::RepoDeleteFailed(res.detail())),
        Err(err) => reporter.notice(Notice::RepoDeleteFailed(format!("{:#}", anyhow::Error::from(err)))),
    }
}
