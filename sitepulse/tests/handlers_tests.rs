use sitepulse::handlers::*;
use sitepulse_core::report::ReportFormat;
use sitepulse_core::targets::DEFAULT_TARGETS;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com");
    assert_eq!(result, Some("http://example.com".to_string()));
}

#[test]
fn test_parse_url_line_host_and_port() {
    let result = parse_url_line("localhost:8080");
    assert_eq!(result, Some("http://localhost:8080".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    assert_eq!(parse_url_line("not a valid url!!!"), None);
    assert_eq!(parse_url_line("ftp://files.example.com"), None);
}

#[test]
fn test_expand_path_plain() {
    assert_eq!(
        expand_path("out/results.csv"),
        std::path::PathBuf::from("out/results.csv")
    );
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/results.csv");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with("results.csv"));
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.com")?;
    writeln!(temp_file, "httpbin.org")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "# comment")?;
    writeln!(temp_file, "  https://api.example.com  ")?;

    let urls = load_urls_from_file(temp_file.path())?;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://example.com");
    assert_eq!(urls[1], "http://httpbin.org");
    assert_eq!(urls[2], "https://api.example.com");

    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();

    let result = load_urls_from_file(temp_file.path());

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No valid URLs"));
}

#[test]
fn test_load_urls_from_file_missing() {
    let dir = TempDir::new().unwrap();
    let result = load_urls_from_file(&dir.path().join("absent.txt"));

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read hosts file")
    );
}

#[test]
fn test_load_urls_from_source_urls() {
    let urls = vec![
        "https://example.com".to_string(),
        "https://example.org/about".to_string(),
    ];
    let result = load_urls_from_source(&urls, None).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0], "https://example.com");
    assert_eq!(result[1], "https://example.org/about");
}

#[test]
fn test_load_urls_from_source_defaults() {
    let result = load_urls_from_source(&[], None).unwrap();
    assert_eq!(result.len(), DEFAULT_TARGETS.len());
    assert_eq!(result[2], "https://www.python.org");
}

#[tokio::test]
async fn test_run_fetch_writes_csv_record() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><title>Home</title></html>"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.csv");
    let settings = FetchSettings {
        urls: vec![
            format!("{}/home", mock_server.uri()),
            "http://127.0.0.1:1/".to_string(),
            format!("{}/gone", mock_server.uri()),
        ],
        output: output.clone(),
        format: ReportFormat::Csv,
        show_table: true,
        quiet: true,
    };

    let outcome = run_fetch(settings).await.unwrap();
    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.failure_count(), 1);

    let written = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "url,title,status,time");
    assert!(lines[1].starts_with(&format!("{}/home,Home,200,", mock_server.uri())));
    assert_eq!(lines[2], "http://127.0.0.1:1/,N/A,500,0.00s");
    assert!(lines[3].starts_with(&format!("{}/gone,No title found,410,", mock_server.uri())));
    assert!(lines[1].ends_with('s'));
}

#[tokio::test]
async fn test_run_fetch_writes_json_record() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Any</title>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.json");
    let settings = FetchSettings {
        urls: vec![mock_server.uri()],
        output: output.clone(),
        format: ReportFormat::Json,
        show_table: false,
        quiet: true,
    };

    run_fetch(settings).await.unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"generator\": \"sitepulse\""));
    assert!(written.contains("\"title\": \"Any\""));
}

#[tokio::test]
async fn test_run_fetch_unwritable_output_fails() {
    let dir = TempDir::new().unwrap();
    let settings = FetchSettings {
        urls: vec!["http://127.0.0.1:1/".to_string()],
        output: dir.path().join("missing").join("results.csv"),
        format: ReportFormat::Csv,
        show_table: false,
        quiet: true,
    };

    let result = run_fetch(settings).await;
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to save results")
    );
}
