// Argument parsing: the tool takes exactly four positional values and no
// flags. Nothing is validated beyond the count; a bad repository name or a
// missing directory surfaces later as an API or filesystem error.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

const DEFAULT_PROGRAM: &str = "repo-uploader";

/// The four positional arguments, in command-line order.
///
/// Help and version flags are disabled and every value may start with `-`,
/// so tokens such as `-abc` parse as plain positionals.
#[derive(Parser, Clone, PartialEq, Eq)]
#[command(name = DEFAULT_PROGRAM, disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Name of the repository to create
    #[arg(allow_hyphen_values = true)]
    pub repo_name: String,
    /// Local directory to upload
    #[arg(allow_hyphen_values = true)]
    pub directory: PathBuf,
    /// Account that owns the repository
    #[arg(allow_hyphen_values = true)]
    pub account: String,
    /// Access token sent with every request
    #[arg(allow_hyphen_values = true)]
    pub token: String,
}

// Tokens end up in logs through `{:?}`, so keep them out of Debug output.
impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("repo_name", &self.repo_name)
            .field("directory", &self.directory)
            .field("account", &self.account)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Returned when the argument count is wrong. Displays as the usage line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    program: String,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Usage: {} [repository_name] [directory_path] [github_username] [github_token]",
            self.program
        )
    }
}

impl std::error::Error for UsageError {}

impl Args {
    /// Parse a full argv (program name first), as produced by
    /// `std::env::args()`. Any clap error becomes the usage line.
    pub fn parse_argv<I>(argv: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let argv: Vec<String> = argv.into_iter().collect();
        Args::try_parse_from(&argv).map_err(|err| {
            debug!(kind = ?err.kind(), "rejected arguments");
            let program = argv
                .first()
                .and_then(|p| {
                    PathBuf::from(p)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
            UsageError { program }
        })
    }
}
