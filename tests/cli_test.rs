//! CLI integration tests for the contentful-codefirst binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("contentful-codefirst"));
    cmd.env_remove("CONTENTFUL_SPACE_ID")
        .env_remove("CONTENTFUL_MANAGEMENT_TOKEN")
        .env_remove("CONTENTFUL_ENVIRONMENT")
        .env_remove("RUST_LOG");
    cmd
}

// Helper to create a temp manifest file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const MANIFEST: &str = r#"{
    "types": [
        {
            "ident": "BlogPost",
            "contentType": { "id": "blogPost", "name": "Blog post", "displayField": "title", "order": 2 },
            "members": [
                {
                    "name": "Title",
                    "dataType": "string",
                    "field": { "id": "title", "required": true },
                    "validations": [{ "type": "size", "min": 1, "max": 80 }],
                    "appearance": { "type": "extension", "extensionId": "singleLine" }
                },
                {
                    "name": "Tags",
                    "dataType": { "list": "string" },
                    "field": { "id": "tags" },
                    "validations": [{ "type": "inValues", "values": ["rust", "cms"] }]
                },
                { "name": "Author", "dataType": { "model": { "name": "Author", "contentType": true } } },
                { "name": "Draft", "dataType": "bool", "ignored": true }
            ]
        },
        {
            "ident": "Author",
            "contentType": { "id": "author" },
            "members": [{ "name": "name", "dataType": "string" }]
        },
        { "ident": "Helper", "members": [] }
    ]
}"#;

mod scan_command {
    use super::*;

    #[test]
    fn lists_annotated_types() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        cmd()
            .args(["scan", manifest.to_str().unwrap()])
            .assert()
            .success()
            .stdout("BlogPost\nAuthor\n");
    }

    #[test]
    fn empty_manifest_prints_nothing() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", r#"{"types": []}"#);

        cmd()
            .args(["scan", manifest.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}

mod compile_command {
    use super::*;

    #[test]
    fn compiles_in_order() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        let output = cmd()
            .args(["compile", manifest.to_str().unwrap()])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let compiled = value.as_array().unwrap();
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[0]["contentType"]["sys"]["id"], "author");
        assert_eq!(compiled[1]["contentType"]["sys"]["id"], "blogPost");

        let fields = compiled[1]["contentType"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0]["type"], "Text");
        assert_eq!(fields[0]["validations"][0]["size"]["max"], 80);
        assert_eq!(fields[1]["type"], "Array");
        assert_eq!(fields[1]["items"]["type"], "Symbol");
        assert_eq!(fields[1]["items"]["validations"][0]["in"][1], "cms");
        assert_eq!(fields[2]["type"], "Link");
        assert_eq!(fields[2]["linkType"], "Entry");

        assert_eq!(compiled[1]["editorControls"][0]["fieldId"], "title");
        assert_eq!(compiled[1]["editorControls"][0]["widgetId"], "singleLine");
    }

    #[test]
    fn compile_with_pretty() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        cmd()
            .args(["compile", manifest.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("[\n"));
    }

    #[test]
    fn compile_with_output_file() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);
        let output = dir.path().join("output.json");

        cmd()
            .args([
                "compile",
                manifest.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""editorControls""#));
    }

    #[test]
    fn output_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);
        let output = dir.path().join("missing").join("output.json");

        cmd()
            .args([
                "compile",
                manifest.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Error writing to"));
    }
}

mod sync_command {
    use super::*;

    #[test]
    fn syncs_new_types_and_skips_existing() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/spaces/space1/environments/master/content_types")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"total": 1, "items": [{"sys": {"id": "author", "version": 3}, "name": "Author"}]}"#,
            )
            .create();
        let upsert = server
            .mock("PUT", "/spaces/space1/environments/master/content_types/blogPost")
            .match_header("authorization", "Bearer secret")
            .with_status(201)
            .with_body(r#"{"sys": {"id": "blogPost", "version": 1}, "name": "Blog post"}"#)
            .create();
        let editor = server
            .mock(
                "GET",
                "/spaces/space1/environments/master/content_types/blogPost/editor_interface",
            )
            .with_status(200)
            .with_body(r#"{"sys": {"version": 1}, "controls": [{"fieldId": "title"}]}"#)
            .create();
        let editor_update = server
            .mock(
                "PUT",
                "/spaces/space1/environments/master/content_types/blogPost/editor_interface",
            )
            .match_header("x-contentful-version", "1")
            .with_status(200)
            .with_body(r#"{"sys": {"version": 2}, "controls": []}"#)
            .create();

        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        cmd()
            .env("CONTENTFUL_MANAGEMENT_TOKEN", "secret")
            .args([
                "sync",
                manifest.to_str().unwrap(),
                "--space-id",
                "space1",
                "--environment",
                "master",
                "--base-url",
                &server.url(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""id":"blogPost""#))
            .stdout(predicate::str::contains(r#""id":"author""#).not());

        upsert.assert();
        editor.assert();
        editor_update.assert();
    }

    #[test]
    fn conflict_exits_with_code_1() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/spaces/space1/content_types")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total": 1, "items": [{"sys": {"id": "author", "version": 3}, "name": "Author"}]}"#)
            .create();
        server
            .mock("PUT", "/spaces/space1/content_types/author")
            .with_status(409)
            .create();

        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        cmd()
            .args([
                "sync",
                manifest.to_str().unwrap(),
                "--space-id",
                "space1",
                "--token",
                "secret",
                "--base-url",
                &server.url(),
                "--force-update",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("version conflict"));
    }

    #[test]
    fn unreachable_service_exits_with_code_3() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        cmd()
            .args([
                "sync",
                manifest.to_str().unwrap(),
                "--space-id",
                "space1",
                "--token",
                "secret",
                "--base-url",
                "http://127.0.0.1:1",
            ])
            .assert()
            .code(3);
    }

    #[test]
    fn missing_token() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", MANIFEST);

        cmd()
            .args(["sync", manifest.to_str().unwrap(), "--space-id", "space1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--token"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["compile", "/nonexistent/models.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("scope not found"));
    }

    #[test]
    fn invalid_json_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(&dir, "models.json", "not json");

        cmd()
            .args(["scan", manifest.to_str().unwrap()])
            .assert()
            .code(2);
    }

    #[test]
    fn unknown_validation_type() {
        let dir = TempDir::new().unwrap();
        let manifest = write_temp_file(
            &dir,
            "models.json",
            r#"{"types": [{"ident": "T", "contentType": {}, "members": [
                {"name": "a", "dataType": "string", "validations": [{"type": "checksum"}]}
            ]}]}"#,
        );

        cmd()
            .args(["compile", manifest.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid scope manifest"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("compile"))
            .stdout(predicate::str::contains("sync"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("contentful-codefirst"));
    }

    #[test]
    fn missing_subcommand() {
        cmd().assert().failure();
    }
}
