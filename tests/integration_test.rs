use playbill_report::clients::{AnalysisClient, AnalysisSettings};
use playbill_report::config::Config;
use playbill_report::logger;
use playbill_report::models::list_json_files;
use playbill_report::services::report_writer::{plan_sheets, summary_rows};
use playbill_report::{run_batch, App, ReportWriter, WriteOutcome, YearLabel};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;

fn write_document(dir: &Path, name: &str, show: &str, dates: &str, roles: &[(&str, &str, Option<&str>)]) {
    let entries: Vec<_> = roles
        .iter()
        .map(|(role, artist, other)| {
            let mut obj = json!({
                "ROLE": { "valueString": role },
                "ARTIST": { "valueString": artist }
            });
            if let Some(other) = other {
                obj["OTHER"] = json!({ "valueString": other });
            }
            json!({ "valueObject": obj })
        })
        .collect();

    let document = json!({
        "id": name,
        "status": "Succeeded",
        "result": {
            "analyzerId": "playbill",
            "contents": [{
                "markdown": "...",
                "fields": {
                    "SHOW": { "type": "string", "valueString": show },
                    "DATES": { "type": "string", "valueString": dates },
                    "ROLES": { "type": "array", "valueArray": entries }
                }
            }]
        }
    });

    fs::write(dir.join(name), serde_json::to_string_pretty(&document).unwrap()).unwrap();
}

#[test]
fn test_batch_with_one_unparseable_file() {
    logger::init();
    let dir = tempfile::tempdir().unwrap();
    write_document(dir.path(), "carmen_result.json", "Carmen", "1985-86", &[
        ("Carmen", "Stefania Toczyska", None),
        ("Don José", "Jacque Trussel", Some("Seattle debut")),
    ]);
    fs::write(dir.path().join("broken_result.json"), "{\"result\": [").unwrap();
    write_document(dir.path(), "manon_result.json", "Manon Lescaut", "TBD", &[
        ("Manon", "Judith Blegen", None),
        ("", "Nobody", None),
    ]);

    let files = list_json_files(dir.path()).unwrap();
    assert_eq!(files.len(), 3);

    let outcome = run_batch(&files);

    assert_eq!(outcome.processed.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].path.ends_with("broken_result.json"));
    assert_eq!(outcome.aggregate.total_records(), 3);

    let names: Vec<_> = plan_sheets(&outcome.aggregate).into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Unknown_Year", "Year_1985"]);

    let summary = summary_rows(&outcome.aggregate);
    assert_eq!(summary[1].shows, "Carmen");
    assert_eq!(summary[1].total_roles, 2);

    let output = dir.path().join("by_year.xlsx");
    let written = ReportWriter::new().write(&outcome.aggregate, &output).unwrap();
    assert!(matches!(written, WriteOutcome::Written { sheets: 3, rows: 3, .. }));
    assert!(output.exists());
}

#[test]
fn test_batch_order_does_not_change_buckets() {
    let dir = tempfile::tempdir().unwrap();
    write_document(dir.path(), "d1.json", "Tosca", "1990", &[("Tosca", "A", None), ("Scarpia", "B", None)]);
    write_document(dir.path(), "d2.json", "Aida", "1990", &[("Aida", "C", None)]);

    let d1 = dir.path().join("d1.json");
    let d2 = dir.path().join("d2.json");

    let forward = run_batch(&[d1.clone(), d2.clone()]).aggregate;
    let backward = run_batch(&[d2, d1]).aggregate;

    let roles = |aggregate: &playbill_report::AggregateResult| {
        let mut roles: Vec<_> = aggregate.buckets[&YearLabel::Year(1990)]
            .iter()
            .map(|r| (r.role.clone(), r.source_file.clone()))
            .collect();
        roles.sort();
        roles
    };

    assert_eq!(roles(&forward), roles(&backward));
}

#[tokio::test]
async fn test_app_converts_and_archives_results() {
    logger::init();
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("curesults");
    fs::create_dir(&results).unwrap();
    write_document(&results, "aida_result.json", "Aida", "March 12, 1995", &[("Aida", "Leontyne Price", None)]);
    fs::write(results.join("bad_result.json"), "not json").unwrap();
    write_document(&results, "blank_result.json", "Untitled", "1990", &[("", "Nobody", None)]);

    let config = Config {
        results_folder: results.to_string_lossy().to_string(),
        playbills_folder: dir.path().join("playbills").to_string_lossy().to_string(),
        output_file: dir.path().join("report.xlsx").to_string_lossy().to_string(),
        output_log_file: dir.path().join("output.txt").to_string_lossy().to_string(),
        warn_file: dir.path().join("warn.txt").to_string_lossy().to_string(),
        ..Config::default()
    };

    let stats = App::initialize(config).await.unwrap().run().await.unwrap();

    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.empty, 1);
    assert_eq!(stats.total, 3);
    assert!(dir.path().join("report.xlsx").exists());
    assert!(!results.join("aida_result.json").exists());
    assert!(results.join("bad_result.json").exists());
    assert_eq!(fs::read_dir(results.join("processed")).unwrap().count(), 1);
    assert!(results.join("blank_result.json").exists());
    let warnings = fs::read_to_string(dir.path().join("warn.txt")).unwrap();
    assert!(warnings.contains("bad_result.json"));
    assert!(!warnings.contains("blank_result.json"));
}

#[tokio::test]
#[ignore] // 需要真实的分析服务：cargo test -- --ignored
async fn test_analyze_single_playbill() {
    logger::init();
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let client = AnalysisClient::new(&AnalysisSettings::from_config(&config)).expect("创建客户端失败");

    let playbill = std::env::var("TEST_PLAYBILL").expect("请设置 TEST_PLAYBILL");
    let result = client
        .analyze(&config.cu_analyzer_id, &playbill, Duration::from_secs(600), Duration::from_secs(2))
        .await
        .expect("分析失败");

    assert!(result.get("result").is_some());
}
