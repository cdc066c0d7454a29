// Tree uploader: walks the local directory and creates one remote file per
// regular file that the ignore rules let through. The first failure stops
// the walk; rolling back is the caller's job.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::api::ApiClient;
use crate::config::RemoteLayout;
use crate::filter::PathFilter;
use crate::ui::{Notice, Reporter};

/// Version-control metadata directory, never uploaded.
const GIT_DIR: &str = ".git";

/// A file read from disk, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub remote_path: String,
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn read(path: &Path, remote_path: String) -> io::Result<Self> {
        let content = fs::read(path)?;
        Ok(FileEntry {
            remote_path,
            content,
        })
    }

    /// Standard base64 of the raw bytes.
    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.content)
    }
}

/// Remote path for `path`, a file somewhere under `root`.
pub fn remote_path(root: &Path, path: &Path, layout: RemoteLayout) -> String {
    match layout {
        RemoteLayout::Flat => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        RemoteLayout::Nested => path
            .strip_prefix(root)
            .unwrap_or(path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
    }
}

/// Counts for a finished upload. `ignored` counts files and pruned
/// directories alike.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub ignored: usize,
}

/// The upload that stopped the run.
#[derive(Debug, Error)]
#[error("upload of {} failed: {detail}", .path.display())]
pub struct UploadFailure {
    pub path: PathBuf,
    pub detail: String,
}

pub struct Uploader<'a> {
    api: &'a ApiClient,
    owner: &'a str,
    repo: &'a str,
    filter: &'a dyn PathFilter,
    layout: RemoteLayout,
}

impl<'a> Uploader<'a> {
    pub fn new(
        api: &'a ApiClient,
        owner: &'a str,
        repo: &'a str,
        filter: &'a dyn PathFilter,
        layout: RemoteLayout,
    ) -> Self {
        Uploader {
            api,
            owner,
            repo,
            filter,
            layout,
        }
    }

    /// Upload everything under `root`, depth first, entries in name order.
    /// Symlinks are followed; a link back into an ancestor is skipped.
    /// Directories matched by the filter are not descended into.
    pub fn upload(
        &self,
        root: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<UploadSummary, UploadFailure> {
        let mut summary = UploadSummary::default();
        let mut walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(ancestor) = err.loop_ancestor() {
                        warn!(path = ?err.path(), ancestor = %ancestor.display(), "skipping symlink loop");
                        continue;
                    }
                    if err.depth() > 0
                        && err.io_error().map_or(false, |e| e.kind() == io::ErrorKind::NotFound)
                    {
                        debug!(path = ?err.path(), "skipping dangling symlink");
                        continue;
                    }
                    let path = err.path().unwrap_or(root).to_path_buf();
                    let what = if err.depth() == 0 { "directory " } else { "" };
                    let detail = format!("cannot read {}{}: {}", what, path.display(), err);
                    return Err(self.fail(&path, detail, reporter));
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type();
            if file_type.is_dir() {
                if entry.file_name() == GIT_DIR {
                    debug!(path = %path.display(), "skipping git metadata");
                    walker.skip_current_dir();
                } else if self.filter.is_excluded(path) {
                    reporter.notice(Notice::DirIgnored(remote_path(root, path, self.layout)));
                    summary.ignored += 1;
                    walker.skip_current_dir();
                }
            } else if file_type.is_file() {
                self.upload_file(root, path, reporter, &mut summary)?;
            } else {
                debug!(path = %path.display(), "skipping special file");
            }
        }

        info!(
            uploaded = summary.uploaded,
            ignored = summary.ignored,
            "upload finished"
        );
        Ok(summary)
    }

    fn upload_file(
        &self,
        root: &Path,
        path: &Path,
        reporter: &mut dyn Reporter,
        summary: &mut UploadSummary,
    ) -> Result<(), UploadFailure> {
        let remote = remote_path(root, path, self.layout);

        if self.filter.is_excluded(path) {
            reporter.notice(Notice::FileIgnored(remote));
            summary.ignored += 1;
            return Ok(());
        }

        let entry = match FileEntry::read(path, remote) {
            Ok(entry) => entry,
            Err(err) => {
                let detail = format!("cannot read {}: {}", path.display(), err);
                return Err(self.fail(path, detail, reporter));
            }
        };

        debug!(local = %path.display(), remote = %entry.remote_path, bytes = entry.content.len(), "uploading file");
        reporter.begin(&entry.remote_path);
        match self
            .api
            .put_file(self.owner, self.repo, &entry.remote_path, &entry.encoded())
        {
            Ok(res) if res.status == StatusCode::CREATED => {
                reporter.notice(Notice::FileAdded(entry.remote_path));
                summary.uploaded += 1;
                Ok(())
            }
            Ok(res) => Err(self.fail(path, res.detail(), reporter)),
            Err(err) => Err(self.fail(path, format!("{:#}", anyhow::Error::from(err)), reporter)),
        }
    }

    fn fail(&self, path: &Path, detail: String, reporter: &mut dyn Reporter) -> UploadFailure {
        reporter.notice(Notice::FileAddFailed(detail.clone()));
        UploadFailure {
            path: path.to_path_buf(),
            detail,
        }
    }
}
