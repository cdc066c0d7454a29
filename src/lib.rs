// Library root
// -----------
// This crate exposes the pieces the `repo-uploader` binary is built from.
// The binary (`main.rs`) only wires configuration and the console together
// and hands control to `app::run`.
//
// Module responsibilities:
// - `cli`: positional argument parsing and the usage line.
// - `config`: environment configuration (API base URL, remote layout).
// - `api`: blocking HTTP client for the hosting platform's REST API.
// - `filter`: `.gitignore` loading behind the `PathFilter` predicate.
// - `repo`: repository creation and rollback deletion.
// - `upload`: recursive tree walk and per-file upload.
// - `ui`: colour-coded notices and the upload spinner.
// - `app`: the linear create -> upload -> rollback flow.
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod filter;
pub mod repo;
pub mod ui;
pub mod upload;
