//! Integration tests for the RecFinder CLI

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use tokio::net::TcpListener;

const CSV_HEADER: &str = "Course_ID,Location ID,Section,Activity Title,Course Title,Days of The Week,From To,Start Hour,Start Min,End Hour,End Min,Min Age,Max Age,Program Category,Activity URL,Status / Information";

fn recfinder(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_recfinder"))
        .arg("--config")
        .arg(config_dir.join("missing.toml"))
        .args(args)
        .env_remove("RECFINDER_API_URL")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute recfinder")
}

fn registered_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{CSV_HEADER}").unwrap();
    writeln!(
        file,
        "101,12,Swim - Ultra Swim 1-9,Ultra Swim,Ultra Swim 3,Sat,Jan 11 to Mar 15,9,0,9,45,6,12,Swim,https://example.org/u3,Waitlist"
    )
    .unwrap();
    writeln!(
        file,
        "102,12,Arts - Dance,Dance,Hip Hop,Tue,Jan 14 to Mar 18,18,30,19,30,13,18,Arts,,"
    )
    .unwrap();
    writeln!(file, "103,12,,,Mystery Course,Wed").unwrap();
    file
}

/// Centre 44 with swim lessons for kids and dance for teens
async fn serve_centre() -> String {
    let programs = json!({
        "dropin": [
            {"course_title": "Badminton Drop-in", "activity": "Badminton", "day_of_week": "Monday", "start_time": "18:00:00", "end_time": "19:00:00", "age_min": 19},
            {"course_title": "Preschool Gym", "activity": "Gym", "day_of_week": "Monday", "age_min": 2, "age_max": 5}
        ],
        "registered": [
            {"id": 1, "course_title": "Ultra Swim 3", "section": "Swim - Ultra Swim 1-9", "min_age": 6, "max_age": 12},
            {"id": 3, "course_title": "Hip Hop", "section": "Arts - Dance", "min_age": 13, "max_age": 18}
        ]
    });
    let app = Router::new()
        .route(
            "/api/centres/{id}",
            get(|| async { Json(json!({"id": 44, "name": "Regent Park CC"})) }),
        )
        .route(
            "/api/centres/{id}/programs",
            get(move || {
                let programs = programs.clone();
                async move { Json(programs) }
            }),
        )
        .route(
            "/api/centres/{id}/facilities",
            get(|| async { Json(json!([])) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[test]
fn test_cli_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let output = recfinder(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Find Toronto recreation programs and centres"));
    for command in ["centres", "centre", "search", "nearby", "csv", "map"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_csv_command_lists_registered_programs() {
    let dir = TempDir::new().unwrap();
    let csv = registered_csv();
    let output = recfinder(dir.path(), &["csv", csv.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ultra Swim 3"));
    assert!(stdout.contains("Hip Hop"));
    assert!(stdout.contains("Mystery Course"));
    assert!(stdout.contains("Days: Sat | From–To: Jan 11 to Mar 15 | Ages: 6-12 | Status: Waitlist"));
}

#[test]
fn test_csv_command_filters_by_category_and_age() {
    let dir = TempDir::new().unwrap();
    let csv = registered_csv();
    let path = csv.path().to_str().unwrap();

    let output = recfinder(dir.path(), &["csv", path, "--category", "swim"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ultra Swim 3"));
    assert!(!stdout.contains("Hip Hop"));
    assert!(!stdout.contains("Mystery Course"));

    let output = recfinder(dir.path(), &["csv", path, "--age", "senior"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Ultra Swim 3"));
    assert!(stdout.contains("Mystery Course"));
}

#[test]
fn test_section_requires_category() {
    let dir = TempDir::new().unwrap();
    let csv = registered_csv();
    let output = recfinder(
        dir.path(),
        &["csv", csv.path().to_str().unwrap(), "--section", "Arts - Dance"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_unknown_age_bracket_is_rejected() {
    let dir = TempDir::new().unwrap();
    let csv = registered_csv();
    let output = recfinder(
        dir.path(),
        &["csv", csv.path().to_str().unwrap(), "--age", "toddler"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown age bracket 'toddler'"));
}

#[test]
fn test_unreachable_backend_reports_friendly_error() {
    let dir = TempDir::new().unwrap();
    let output = recfinder(dir.path(), &["--api-url", "http://127.0.0.1:1", "wards"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to reach the recreation API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_centre_menus_follow_age_filter() {
    let base_url = serve_centre().await;
    let dir = TempDir::new().unwrap();

    let run = |age: Option<&'static str>| {
        let base_url = base_url.clone();
        let config_dir = dir.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            let mut args = vec!["--api-url", base_url.as_str(), "centre", "44"];
            if let Some(age) = age {
                args.extend(["--age", age]);
            }
            recfinder(&config_dir, &args)
        })
    };

    let everyone = run(None).await.unwrap();
    assert!(everyone.status.success());
    let stdout = String::from_utf8_lossy(&everyone.stdout);
    assert!(stdout.contains("Categories: Arts, Swim"));
    assert!(stdout.contains("Sports: Badminton, Gym"));

    let young = run(Some("young")).await.unwrap();
    assert!(young.status.success());
    let stdout = String::from_utf8_lossy(&young.stdout);
    assert!(stdout.contains("Categories: Swim\n"));
    assert!(!stdout.contains("Arts"));
    assert!(!stdout.contains("Hip Hop"));
    assert!(stdout.contains("Sports: Gym\n"));
}
