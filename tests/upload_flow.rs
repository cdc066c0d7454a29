use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use httpmock::prelude::*;
use repo_uploader::app::{run, Outcome};
use repo_uploader::config::{Config, RemoteLayout};
use repo_uploader::ui::Notice;
use reqwest::Url;
use serde_json::json;
use tempfile::TempDir;

fn argv(dir: &Path) -> Vec<String> {
    vec![
        "repo-uploader".to_string(),
        "demo".to_string(),
        dir.display().to_string(),
        "octo".to_string(),
        "ghp_test".to_string(),
    ]
}

fn config(server: &MockServer, layout: RemoteLayout) -> Config {
    Config::from_lookup(|key| match key {
        "GITHUB_API_URL" => Some(server.base_url()),
        "REPO_UPLOADER_LAYOUT" => Some(
            match layout {
                RemoteLayout::Flat => "flat",
                RemoteLayout::Nested => "nested",
            }
            .to_string(),
        ),
        _ => None,
    })
    .unwrap()
}

#[test]
fn gitignore_rules_decide_what_is_uploaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".gitignore"), ".gitignore\nb.txt\ntarget/\n").unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("b.txt"), "beta").unwrap();
    fs::create_dir(dir.path().join("target")).unwrap();
    fs::write(dir.path().join("target").join("app.bin"), [0u8, 1, 2]).unwrap();

    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/user/repos")
            .header("authorization", "token ghp_test")
            .json_body(json!({"name": "demo", "private": false}));
        then.status(201).json_body(json!({"name": "demo"}));
    });
    let a = server.mock(|when, then| {
        when.method(PUT)
            .path("/repos/octo/demo/contents/a.txt")
            .header("authorization", "token ghp_test")
            .json_body(json!({"message": "add a.txt", "content": STANDARD.encode("alpha")}));
        then.status(201).json_body(json!({}));
    });
    let b = server.mock(|when, then| {
        when.method(PUT).path("/repos/octo/demo/contents/b.txt");
        then.status(201).json_body(json!({}));
    });

    let mut notices: Vec<Notice> = Vec::new();
    let outcome = run(argv(dir.path()), &config(&server, RemoteLayout::Flat), &mut notices).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(outcome.code(), 0);
    create.assert_calls(1);
    a.assert_calls(1);
    b.assert_calls(0);
    assert_eq!(
        notices,
        vec![
            Notice::RepoCreated("demo".into()),
            Notice::FileIgnored(".gitignore".into()),
            Notice::FileAdded("a.txt".into()),
            Notice::FileIgnored("b.txt".into()),
            Notice::DirIgnored("target".into()),
        ]
    );
}

#[test]
fn binary_files_survive_the_trip() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".gitignore"), "").unwrap();
    fs::create_dir(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img").join("logo.png"), &bytes).unwrap();

    let encoded = STANDARD.encode(&bytes);
    assert_eq!(STANDARD.decode(&encoded).unwrap(), bytes);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/user/repos");
        then.status(201).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/repos/octo/demo/contents/.gitignore");
        then.status(201).json_body(json!({}));
    });
    let logo = server.mock(|when, then| {
        when.method(PUT)
            .path("/repos/octo/demo/contents/img/logo.png")
            .json_body(json!({"message": "add img/logo.png", "content": encoded}));
        then.status(201).json_body(json!({}));
    });

    let mut notices: Vec<Notice> = Vec::new();
    let outcome = run(argv(dir.path()), &config(&server, RemoteLayout::Nested), &mut notices).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    logo.assert_calls(1);
}

#[test]
fn failing_upload_deletes_the_repository_and_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".gitignore"), ".gitignore\n").unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("c.txt"), "c").unwrap();
    fs::write(dir.path().join("e.txt"), "e").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/user/repos");
        then.status(201).json_body(json!({}));
    });
    let a = server.mock(|when, then| {
        when.method(PUT).path("/repos/octo/demo/contents/a.txt");
        then.status(201).json_body(json!({}));
    });
    let c = server.mock(|when, then| {
        when.method(PUT).path("/repos/octo/demo/contents/c.txt");
        then.status(422).json_body(json!({"message": "Invalid request"}));
    });
    let e = server.mock(|when, then| {
        when.method(PUT).path("/repos/octo/demo/contents/e.txt");
        then.status(201).json_body(json!({}));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/repos/octo/demo");
        then.status(204);
    });

    let mut notices: Vec<Notice> = Vec::new();
    let outcome = run(argv(dir.path()), &config(&server, RemoteLayout::Flat), &mut notices).unwrap();

    assert_eq!(outcome, Outcome::UploadFailed);
    assert_eq!(outcome.code(), 1);
    a.assert_calls(1);
    c.assert_calls(1);
    e.assert_calls(0);
    delete.assert_calls(1);
    assert_eq!(
        &notices[notices.len() - 2..],
        &[
            Notice::FileAddFailed("Invalid request".into()),
            Notice::RepoDeleted("demo".into()),
        ]
    );
}

#[test]
fn usage_is_printed_for_wrong_arity() {
    let mut notices: Vec<Notice> = Vec::new();
    let config = Config::with_api_url(Url::parse("http://127.0.0.1:9").unwrap());
    let outcome = run(vec!["repo-uploader".to_string()], &config, &mut notices).unwrap();

    assert_eq!(outcome, Outcome::Usage);
    assert_eq!(
        notices,
        vec![Notice::Usage(
            "Usage: repo-uploader [repository_name] [directory_path] [github_username] [github_token]"
                .into()
        )]
    );
}
