// The whole run: parse arguments, load ignore rules, create the repository,
// upload the tree, and roll back if an upload fails. Each step blocks on the
// previous one; nothing runs concurrently.

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cli::Args;
use crate::config::Config;
use crate::filter::IgnoreMatcher;
use crate::repo::{create_repository, delete_repository};
use crate::ui::{Notice, Reporter};
use crate::upload::Uploader;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Repository created and every file uploaded or ignored.
    Completed,
    /// The platform refused to create the repository; nothing was uploaded.
    CreateFailed,
    /// A file upload failed and the repository was (best effort) deleted.
    UploadFailed,
    /// Wrong number of arguments; no request was made.
    Usage,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            // Refused creation still exits 0, matching the historical
            // behavior scripts rely on.
            Outcome::Completed | Outcome::CreateFailed => 0,
            Outcome::UploadFailed | Outcome::Usage => 1,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Run the tool for a full argv (program name first).
pub fn run<I>(argv: I, config: &Config, reporter: &mut dyn Reporter) -> Result<Outcome>
where
    I: IntoIterator<Item = String>,
{
    let args = match Args::parse_argv(argv) {
        Ok(args) => args,
        Err(usage) => {
            reporter.notice(Notice::Usage(usage.to_string()));
            return Ok(Outcome::Usage);
        }
    };
    info!(?args, layout = ?config.layout, "starting upload");

    let matcher = IgnoreMatcher::load(&args.directory)?;
    let api = ApiClient::new(config.api_url.clone(), &args.token)
        .context("Failed to set up API client")?;

    if !create_repository(&api, &args.repo_name, reporter)? {
        warn!(repo = %args.repo_name, "repository was not created, skipping upload");
        return Ok(Outcome::CreateFailed);
    }

    let uploader = Uploader::new(
        &api,
        &args.account,
        &args.repo_name,
        &matcher,
        config.layout,
    );
    match uploader.upload(&args.directory, reporter) {
        Ok(_) => Ok(Outcome::Completed),
        Err(failure) => {
            warn!(%failure, "aborting run");
            delete_repository(&api, &args.account, &args.repo_name, reporter);
            Ok(Outcome::UploadFailed)
        }
    }
}
