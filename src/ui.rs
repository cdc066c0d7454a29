// UI layer: everything the user sees. Notices are colour-coded lines on
// stdout; an indicatif spinner runs on stderr while a file is uploading.

use std::fmt;
use std::time::Duration;

use crossterm::style::{Color, Stylize};
use indicatif::{ProgressBar, ProgressStyle};

/// One user-facing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Usage(String),
    RepoCreated(String),
    RepoCreateFailed(String),
    FileIgnored(String),
    DirIgnored(String),
    FileAdded(String),
    FileAddFailed(String),
    RepoDeleted(String),
    RepoDeleteFailed(String),
}

impl Notice {
    /// `None` means plain, uncoloured output.
    pub fn color(&self) -> Option<Color> {
        match self {
            Notice::Usage(_) => None,
            Notice::RepoCreated(_) | Notice::FileAdded(_) => Some(Color::Green),
            Notice::FileIgnored(_) | Notice::DirIgnored(_) | Notice::RepoDeleted(_) => {
                Some(Color::Yellow)
            }
            Notice::RepoCreateFailed(_) | Notice::FileAddFailed(_) | Notice::RepoDeleteFailed(_) => {
                Some(Color::Red)
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Usage(usage) => f.write_str(usage),
            Notice::RepoCreated(name) => {
                write!(f, "Successfully created new GitHub repository: {}", name)
            }
            Notice::RepoCreateFailed(detail) => {
                write!(f, "Failed to create GitHub repository: {}", detail)
            }
            Notice::FileIgnored(name) => write!(f, "File '{}' ignored by .gitignore.", name),
            Notice::DirIgnored(name) => write!(f, "Directory '{}' ignored by .gitignore.", name),
            Notice::FileAdded(path) => {
                write!(f, "Successfully added file to GitHub repository: {}", path)
            }
            Notice::FileAddFailed(detail) => {
                write!(f, "Failed to add file to GitHub repository: {}", detail)
            }
            Notice::RepoDeleted(name) => write!(f, "Successfully deleted GitHub repository: {}", name),
            Notice::RepoDeleteFailed(detail) => {
                write!(f, "Failed to delete GitHub repository: {}", detail)
            }
        }
    }
}

/// Sink for notices. `begin` marks the start of a slow step (a file upload)
/// and is ended by the next notice.
pub trait Reporter {
    fn notice(&mut self, notice: Notice);

    fn begin(&mut self, _label: &str) {}
}

/// Collects notices in memory; handy for tests and embedding.
impl Reporter for Vec<Notice> {
    fn notice(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Prints notices to stdout with colours and shows a spinner between
/// `begin` and the following notice.
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn notice(&mut self, notice: Notice) {
        self.clear_spinner();
        match notice.color() {
            Some(color) => println!("{}", notice.to_string().with(color)),
            None => println!("{}", notice),
        }
    }

    fn begin(&mut self, label: &str) {
        self.clear_spinner();
        // `ProgressBar::new_spinner` draws to stderr and hides itself when
        // stderr is not a terminal.
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Uploading {}...", label));
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
