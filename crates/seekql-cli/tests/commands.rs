//! Commands run in-process against dataset files.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use seekql_cli::{run, Cli};
use serde_json::{json, Value};

fn fixture() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/books.yaml")
        .display()
        .to_string()
}

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["seekql"];
    argv.extend_from_slice(args);
    run(&Cli::try_parse_from(argv)?)
}

fn run_json(args: &[&str]) -> Value {
    let out = run_args(args).unwrap();
    serde_json::from_str(&out).unwrap()
}

fn result_ids(out: &Value) -> Vec<i64> {
    out["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn query_filters_and_orders() {
    let path = fixture();
    let out = run_json(&[
        "query",
        &path,
        "--model",
        "core.book",
        "published = true",
        "--order",
        "-rating",
        "--limit",
        "2",
    ]);
    assert_eq!(out["count"], json!(3));
    assert_eq!(result_ids(&out), vec![1, 4]);
    assert_eq!(out["results"][0]["name"], json!("Dune"));
    assert!(out.get("warning").is_none());
}

#[test]
fn query_through_relation() {
    let path = fixture();
    let out = run_json(&[
        "query",
        &path,
        "-m",
        "core.book",
        r#"author.username = "tema" and not genre = "Mystery""#,
    ]);
    assert_eq!(result_ids(&out), vec![1]);
}

#[test]
fn empty_query_lists_everything() {
    let path = fixture();
    let out = run_json(&["query", &path, "-m", "core.book"]);
    assert_eq!(out["count"], json!(4));
}

#[test]
fn invalid_query_warns_unless_strict() {
    let path = fixture();
    let out = run_json(&["query", &path, "-m", "core.book", "rating > \"x\""]);
    assert_eq!(out["count"], json!(0));
    assert!(out["warning"].as_str().unwrap().contains("rating"));

    let err = run_args(&["query", &path, "-m", "core.book", "isbn = 1", "--strict"]).unwrap_err();
    assert!(format!("{err:#}").contains("isbn"));
}

#[test]
fn unknown_order_field_is_an_error() {
    let path = fixture();
    assert!(run_args(&["query", &path, "-m", "core.book", "--order", "isbn"]).is_err());
}

#[test]
fn explain_shows_pushed_down_negation() {
    let path = fixture();
    let out = run_json(&[
        "explain",
        &path,
        "-m",
        "core.book",
        r#"not (genre = "Drama" or published = true)"#,
    ]);
    assert_eq!(
        out["predicate"],
        json!(r#"(not genre = "Drama" and not published = true)"#)
    );
    assert_eq!(out["tree"]["and"][0]["condition"]["negated"], json!(true));
}

#[test]
fn describe_with_options() {
    let path = fixture();
    let out = run_json(&["describe", &path, "-m", "core.book", "--options"]);
    assert_eq!(out["current_model"], json!("core.book"));
    let name = &out["models"]["core.book"]["name"];
    assert_eq!(name["options"], json!(["Dune", "Emma"]));
    assert_eq!(name["has_more_options"], json!(true));
    assert_eq!(name["next_options_page_number"], json!(2));
    assert_eq!(
        out["models"]["core.book"]["author"]["relation"],
        json!("auth.user")
    );
}

#[test]
fn describe_everything_as_yaml() {
    let path = fixture();
    let out = run_args(&["describe", &path, "--format", "yaml"]).unwrap();
    assert!(out.starts_with("models:"));
    assert!(out.contains("auth.user:"));
}

#[test]
fn suggest_pages() {
    let path = fixture();
    let out = run_json(&["suggest", &path, "core.book", "name", "--page", "2"]);
    assert_eq!(out["options"], json!(["Rebecca", "Walden"]));
    assert_eq!(out["has_more_options"], json!(false));

    let out = run_json(&["suggest", &path, "core.book", "genre"]);
    assert_eq!(
        out["options"],
        json!(["Biography", "Comedy", "Drama", "Mystery"])
    );

    assert!(run_args(&["suggest", &path, "core.book", "isbn"]).is_err());
}

#[test]
fn json_dataset_from_temp_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let dataset = json!({
        "config": {"membership": "enumerable_only"},
        "models": [{
            "name": "task",
            "fields": [
                {"name": "title", "type": "text"},
                {"name": "priority", "type": "integer"}
            ]
        }],
        "records": {
            "task": [
                {"title": "Write docs", "priority": 3},
                {"title": "Fix bug", "priority": 5}
            ]
        }
    });
    write!(file, "{dataset}").unwrap();
    let path = file.path().display().to_string();

    let out = run_json(&["query", &path, "-m", "task", "priority >= 4"]);
    assert_eq!(out["results"][0]["title"], json!("Fix bug"));
    assert_eq!(out["results"][0]["id"], json!(2));

    let out = run_json(&["query", &path, "-m", "task", "priority in [3, 5]"]);
    assert!(out["warning"]
        .as_str()
        .unwrap()
        .contains("operator 'in' is not supported"));
}

#[test]
fn broken_dataset_reports_the_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "models: [").unwrap();
    let path = file.path().display().to_string();
    let err = run_args(&["describe", &path]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid YAML dataset"));
}
