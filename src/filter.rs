// Ignore rules. The uploader only needs a yes/no answer per path, so the
// pattern engine sits behind `PathFilter`; `.gitignore` support comes from
// the `ignore` crate.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::debug;

pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Decides whether a local path is excluded from upload.
pub trait PathFilter {
    fn is_excluded(&self, path: &Path) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn is_excluded(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Rules from `<directory>/.gitignore`, rooted at `<directory>`.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
}

impl IgnoreMatcher {
    /// Load `<directory>/.gitignore`. A missing or malformed file is an
    /// error.
    pub fn load(directory: &Path) -> Result<Self> {
        let file: PathBuf = directory.join(IGNORE_FILE_NAME);
        let mut builder = GitignoreBuilder::new(directory);
        if let Some(err) = builder.add(&file) {
            return Err(err).with_context(|| format!("Failed to load {}", file.display()));
        }
        let gitignore = builder
            .build()
            .with_context(|| format!("Failed to compile {}", file.display()))?;
        debug!(path = %file.display(), rules = gitignore.num_ignores(), "loaded ignore rules");
        Ok(IgnoreMatcher { gitignore })
    }
}

impl PathFilter for IgnoreMatcher {
    fn is_excluded(&self, path: &Path) -> bool {
        // Parents count too: `build/` excludes `build/out.txt`.
        self.gitignore
            .matched_path_or_any_parents(path, path.is_dir())
            .is_ignore()
    }
}
