//! End-to-end tests for the suite runner
//!
//! These tests drive the executor through the public library API with:
//! 1. Suites written to a temporary directory
//! 2. An in-memory job runner standing in for the remote service
//! 3. Assertions on the returned results and the files left on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use test_runner::apify::DatasetItem;
use test_runner::report;
use test_runner::testing::{ActorSettings, OutputDir, SuiteLoader};
use test_runner::{Error, JobRunner, Result, RunInfo, RunStatus, SuiteExecutor, TestStatus};

/// Job runner that answers every submission with a fixed dataset
struct FakeRunner {
    items: Vec<Value>,
    status: RunStatus,
    submissions: Mutex<Vec<(Vec<String>, ActorSettings)>>,
}

impl FakeRunner {
    fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            status: RunStatus::Succeeded,
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }
}

#[async_trait]
impl JobRunner for FakeRunner {
    async fn submit(&self, urls: &[String], settings: &ActorSettings) -> Result<RunInfo> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push((urls.to_vec(), settings.clone()));
        Ok(RunInfo {
            run_id: format!("run-{}", submissions.len()),
            dataset_id: format!("ds-{}", submissions.len()),
            status: self.status,
        })
    }

    async fn fetch_results(&self, _dataset_id: &str) -> Result<Vec<DatasetItem>> {
        Ok(self.items.iter().cloned().map(DatasetItem::from).collect())
    }
}

/// Job runner whose runs never produce a dataset
struct NoDatasetRunner;

#[async_trait]
impl JobRunner for NoDatasetRunner {
    async fn submit(&self, _urls: &[String], _settings: &ActorSettings) -> Result<RunInfo> {
        Err(Error::NoDataset {
            run_id: "run-x".to_string(),
        })
    }

    async fn fetch_results(&self, _dataset_id: &str) -> Result<Vec<DatasetItem>> {
        panic!("fetch_results must not be called without a dataset");
    }
}

/// Test context with suite and output directories
struct TestContext {
    _temp: tempfile::TempDir,
    suites_dir: PathBuf,
    output_dir: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let suites_dir = temp.path().join("test-suites");
        let output_dir = temp.path().join("test-suites-output");
        fs::create_dir_all(&suites_dir).expect("Failed to create suites dir");

        Self {
            _temp: temp,
            suites_dir,
            output_dir,
        }
    }

    fn add_suite(&self, slug: &str, settings: Value, urls: Value) {
        let dir = self.suites_dir.join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("description.md"), format!("{slug} suite\n\nDetails.")).unwrap();
        fs::write(dir.join("settings.json"), settings.to_string()).unwrap();
        fs::write(dir.join("urls.json"), urls.to_string()).unwrap();
    }

    fn executor(&self, runner: Arc<dyn JobRunner>) -> SuiteExecutor {
        SuiteExecutor::new(
            SuiteLoader::new(&self.suites_dir),
            OutputDir::new(&self.output_dir),
            runner,
        )
    }

    fn case_file(&self, suite: &str, case: &str, file: &str) -> PathBuf {
        self.output_dir.join(suite).join(case).join(file)
    }

    fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn add_blog_posts(&self) {
        self.add_suite(
            "blog-posts",
            json!({ "exportText": true }),
            json!([{ "slug": "p1", "url": "https://a.test/x" }]),
        );
    }
}

#[tokio::test]
async fn test_trailing_slash_record_is_success() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();
    let runner = Arc::new(FakeRunner::new(vec![json!({ "loadedUrl": "https://a.test/x/" })]));

    let result = ctx.executor(runner.clone()).run_one("blog-posts").await.unwrap();

    let p1 = result.get("p1").unwrap();
    assert_eq!(p1.status, TestStatus::Success);
    assert_eq!(p1.error_message, None);
    assert_eq!(result.run_id, "run-1");
    assert_eq!(result.dataset_id, "ds-1");

    let item_path = ctx.case_file("blog-posts", "p1", "dataset-item.json");
    assert!(item_path.exists());
    assert_eq!(p1.dataset_item_path.as_deref(), Some(item_path.as_path()));
    assert_eq!(ctx.read_json(&item_path)["loadedUrl"], "https://a.test/x/");

    let written = ctx.read_json(&ctx.case_file("blog-posts", "p1", "result.json"));
    assert_eq!(written["status"], "success");
    assert!(written["errorMessage"].is_null());

    // Settings and seed URLs reach the runner unchanged
    let submissions = runner.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, vec!["https://a.test/x".to_string()]);
    assert_eq!(submissions[0].1.options.export_text, Some(true));
}

#[tokio::test]
async fn test_empty_dataset_is_error() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();

    let result = ctx
        .executor(Arc::new(FakeRunner::new(Vec::new())))
        .run_one("blog-posts")
        .await
        .unwrap();

    let p1 = result.get("p1").unwrap();
    assert_eq!(p1.status, TestStatus::Error);
    assert_eq!(p1.error_message.as_deref(), Some("No dataset item found for URL"));
    assert_eq!(p1.dataset_item_path, None);

    assert!(ctx.case_file("blog-posts", "p1", "result.json").exists());
    assert!(!ctx.case_file("blog-posts", "p1", "dataset-item.json").exists());
}

#[tokio::test]
async fn test_flagged_record_is_error_with_message() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();
    let runner = FakeRunner::new(vec![json!({
        "loadedUrl": "https://a.test/x",
        "#error": true,
        "#errorMessage": "timeout"
    })]);

    let result = ctx.executor(Arc::new(runner)).run_one("blog-posts").await.unwrap();

    let p1 = result.get("p1").unwrap();
    assert_eq!(p1.status, TestStatus::Error);
    assert_eq!(p1.error_message.as_deref(), Some("timeout"));

    // Errored items are still persisted
    let item = ctx.read_json(&ctx.case_file("blog-posts", "p1", "dataset-item.json"));
    assert_eq!(item["#error"], true);
    assert_eq!(item["#errorMessage"], "timeout");
}

#[tokio::test]
async fn test_odd_record_stays_per_case() {
    let ctx = TestContext::new();
    ctx.add_suite(
        "odd",
        json!({}),
        json!([
            { "slug": "good", "url": "https://a.test/ok" },
            { "slug": "odd", "url": "https://a.test/odd" }
        ]),
    );
    let odd_record = json!({
        "loadedUrl": "https://a.test/odd",
        "rawHtml": { "hash": "abc" },
        "metadata": { "title": "T", "image": "https://a.test/og.png" },
        "#error": "yes"
    });
    let runner = FakeRunner::new(vec![
        json!({ "loadedUrl": "https://a.test/ok" }),
        odd_record.clone(),
        json!(["not", "a", "record"]),
    ]);

    let result = ctx.executor(Arc::new(runner)).run_one("odd").await.unwrap();

    assert_eq!(result.get("good").unwrap().status, TestStatus::Success);
    let odd = result.get("odd").unwrap();
    assert_eq!(odd.status, TestStatus::Error);
    assert_eq!(odd.error_message.as_deref(), Some("Unknown error"));

    let persisted = ctx.read_json(&ctx.case_file("odd", "odd", "dataset-item.json"));
    assert_eq!(persisted, odd_record);
}

#[tokio::test]
async fn test_every_case_persisted_in_order() {
    let ctx = TestContext::new();
    ctx.add_suite(
        "mixed",
        json!({}),
        json!([
            { "slug": "ok", "url": "https://a.test/ok" },
            { "slug": "missing", "url": "https://a.test/missing" },
            { "slug": "query", "url": "https://a.test/ok?x=1" },
            { "slug": "flagged", "url": "https://a.test/flagged/" }
        ]),
    );
    let runner = FakeRunner::new(vec![
        json!({ "loadedUrl": "https://a.test/ok", "httpStatus": 200 }),
        json!({ "loadedUrl": "https://a.test/flagged", "#error": true }),
    ])
    .with_status(RunStatus::TimedOut);

    let result = ctx.executor(Arc::new(runner)).run_one("mixed").await.unwrap();

    let slugs: Vec<&str> = result.results.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(slugs, vec!["ok", "missing", "query", "flagged"]);

    assert_eq!(result.get("ok").unwrap().status, TestStatus::Success);
    assert_eq!(result.get("missing").unwrap().status, TestStatus::Error);
    assert_eq!(
        result.get("query").unwrap().error_message.as_deref(),
        Some("No dataset item found for URL")
    );
    assert_eq!(
        result.get("flagged").unwrap().error_message.as_deref(),
        Some("Unknown error")
    );
    assert_eq!(result.passed() + result.failed(), result.total());

    for (slug, test_result) in &result.results {
        assert!(ctx.case_file("mixed", slug, "result.json").exists());
        let has_item = test_result.dataset_item_path.is_some();
        assert_eq!(ctx.case_file("mixed", slug, "dataset-item.json").exists(), has_item);
    }
}

#[tokio::test]
async fn test_empty_suite_yields_empty_results_and_report() {
    let ctx = TestContext::new();
    ctx.add_suite("empty", json!({}), json!([]));
    let executor = ctx.executor(Arc::new(FakeRunner::new(Vec::new())));

    let result = executor.run_one("empty").await.unwrap();
    assert!(result.results.is_empty());

    let results = vec![result];
    let report_path = report::generate(&results, executor.output()).unwrap();
    let content = fs::read_to_string(report_path).unwrap();
    assert!(content.contains("- **Total test cases:** 0"));
    assert!(!content.contains("| empty |"));
}

#[tokio::test]
async fn test_run_all_in_listing_order_and_resets_output() {
    let ctx = TestContext::new();
    ctx.add_suite("zeta", json!({}), json!([{ "slug": "z1", "url": "https://z.test/" }]));
    ctx.add_suite("alpha", json!({}), json!([{ "slug": "a1", "url": "https://a.test/" }]));

    fs::create_dir_all(&ctx.output_dir).unwrap();
    let stale = ctx.output_dir.join("stale").join("result.json");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "{}").unwrap();

    let runner = Arc::new(FakeRunner::new(vec![json!({ "loadedUrl": "https://a.test" })]));
    let results = ctx.executor(runner.clone()).run_all().await.unwrap();

    let order: Vec<&str> = results.iter().map(|r| r.suite_slug.as_str()).collect();
    assert_eq!(order, vec!["alpha", "zeta"]);
    assert_eq!(results[0].get("a1").unwrap().status, TestStatus::Success);
    assert_eq!(results[1].get("z1").unwrap().status, TestStatus::Error);
    assert_eq!(runner.submissions.lock().unwrap().len(), 2);
    assert!(!stale.exists());

    let summary = report::ReportSummary::from_results(&results);
    assert_eq!((summary.total, summary.passed, summary.failed), (2, 1, 1));
}

#[tokio::test]
async fn test_missing_suite_aborts_before_submission() {
    let ctx = TestContext::new();
    let runner = Arc::new(FakeRunner::new(Vec::new()));

    let err = ctx.executor(runner.clone()).run_one("nope").await.unwrap_err();

    assert!(matches!(err, Error::SuiteNotFound { .. }));
    assert!(runner.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_suite_aborts_run_all() {
    let ctx = TestContext::new();
    ctx.add_suite("alpha", json!({}), json!([{ "slug": "a1", "url": "https://a.test/" }]));
    let broken = ctx.suites_dir.join("beta");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("description.md"), "Broken").unwrap();
    fs::write(broken.join("settings.json"), "{ not json").unwrap();
    fs::write(broken.join("urls.json"), "[]").unwrap();

    let err = ctx
        .executor(Arc::new(FakeRunner::new(Vec::new())))
        .run_all()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse { .. }));
}

#[tokio::test]
async fn test_remote_without_dataset_is_fatal() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();

    let err = ctx
        .executor(Arc::new(NoDatasetRunner))
        .run_one("blog-posts")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoDataset { .. }));
    assert!(!ctx.case_file("blog-posts", "p1", "result.json").exists());
}

/// Run the compiled binary with an isolated configuration and no API token
fn run_binary(ctx: &TestContext, args: &[&str]) -> std::process::Output {
    let config = ctx.suites_dir.parent().unwrap().join("runner.toml");
    fs::write(&config, "").unwrap();

    std::process::Command::new(env!("CARGO_BIN_EXE_test-runner"))
        .args(args)
        .arg("--config")
        .arg(&config)
        .arg("--suites-dir")
        .arg(&ctx.suites_dir)
        .arg("--output-dir")
        .arg(&ctx.output_dir)
        .env_remove("APIFY_TOKEN")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run test-runner binary")
}

#[test]
fn test_cli_requires_suite_or_all() {
    let ctx = TestContext::new();
    let output = run_binary(&ctx, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Must specify --suite <slug> or --all"));
}

#[test]
fn test_cli_dry_run_needs_no_token() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();

    let output = run_binary(&ctx, &["--suite", "blog-posts", "--dry-run"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("blog-posts"));
    assert!(stdout.contains("Description: blog-posts suite"));
    assert!(stdout.contains("- p1: https://a.test/x"));
    assert!(!ctx.output_dir.exists());
}

#[test]
fn test_cli_dry_run_lists_all_suites() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();
    ctx.add_suite("docs", json!({}), json!([]));

    let output = run_binary(&ctx, &["--dry-run"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available Test Suites (2):"));
    assert!(stdout.contains("Test cases: 1"));
    assert!(stdout.contains("Test cases: 0"));
}

#[test]
fn test_cli_missing_token_is_fatal() {
    let ctx = TestContext::new();
    ctx.add_blog_posts();

    let output = run_binary(&ctx, &["--all"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("APIFY_TOKEN environment variable is not set"));
    // Nothing is touched before the credential check
    assert!(!ctx.output_dir.exists());
}
