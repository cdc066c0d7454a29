// Environment configuration. There are no flags besides the positional
// arguments, so everything tunable is read from the environment, the same
// way the API client used to pick up its gateway URL.

use anyhow::{bail, Context, Result};
use reqwest::Url;

pub const API_URL_VAR: &str = "GITHUB_API_URL";
pub const LAYOUT_VAR: &str = "REPO_UPLOADER_LAYOUT";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// How a local file path maps onto a path inside the remote repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteLayout {
    /// Only the file name is used. Files with the same name in different
    /// subdirectories land on the same remote path.
    #[default]
    Flat,
    /// The path relative to the upload root is kept.
    Nested,
}

impl RemoteLayout {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(RemoteLayout::Flat),
            "nested" => Ok(RemoteLayout::Nested),
            other => bail!("{LAYOUT_VAR} must be `flat` or `nested`, got `{other}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: Url,
    pub layout: RemoteLayout,
}

impl Config {
    /// Read `GITHUB_API_URL` and `REPO_UPLOADER_LAYOUT` from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.into());
        let api_url = Url::parse(raw_url.trim())
            .with_context(|| format!("{API_URL_VAR} is not a valid URL: {raw_url}"))?;
        if api_url.cannot_be_a_base() {
            bail!("{API_URL_VAR} cannot be used as a base URL: {raw_url}");
        }

        let layout = match get(LAYOUT_VAR) {
            Some(value) => RemoteLayout::parse(&value)?,
            None => RemoteLayout::default(),
        };

        Ok(Config { api_url, layout })
    }

    /// Config pointing at an explicit base URL with the default layout.
    pub fn with_api_url(api_url: Url) -> Self {
        Config {
            api_url,
            layout: RemoteLayout::default(),
        }
    }
}
