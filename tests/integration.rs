//! Integration tests for xfoil_bridge against a stub solver.

#![cfg(unix)]

mod common;

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use xfoil_bridge::{
    AirfoilSource, AnalysisRequest, CoordinateFile, Command, DialogueState, Driver, Error,
    SolverProcess, XfoilClient,
};

use common::{naca_request, read_log, stub_builder, stub_config, STUB_COLUMNS, STUB_ROWS};

#[tokio::test]
async fn full_query_matches_reference() {
    let client = XfoilClient::with_config(stub_config("normal"));
    let polar = client.query(&naca_request()).await.expect("query succeeds");

    assert_eq!(polar.columns, STUB_COLUMNS);
    assert_eq!(polar.len(), STUB_ROWS.len());
    for (row, expected) in polar.table.iter().zip(STUB_ROWS.iter()) {
        assert_eq!(row.as_slice(), expected.as_slice());
    }
    assert_eq!(polar.meta("Re"), Some(2.0e6));
    assert_eq!(polar.meta("Mach"), Some(0.6));
    assert_eq!(polar.meta("Ncrit"), Some(9.0));
    assert_eq!(polar.meta("xtrf_top"), Some(1.0));
    assert_eq!(polar.meta("xtrf_bottom"), Some(1.0));
    assert_eq!(polar.first("CD"), Some(0.00683));
}

#[tokio::test]
async fn commands_arrive_in_dialogue_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("commands.log");
    let config = stub_builder("normal")
        .env("XFOIL_STUB_LOG", log.display().to_string())
        .build()
        .unwrap();

    let request = AnalysisRequest::cl(AirfoilSource::file("foil.dat"), 0.5, 1e6);
    XfoilClient::with_config(config)
        .query(&request)
        .await
        .unwrap();

    // The stub may be killed before it reads the final blank line.
    let log = read_log(&log);
    let end = log.iter().position(|l| l == "ENDD").expect("sentinel was sent");
    assert_eq!(
        &log[..=end],
        [
            "NORM",
            "LOAD foil.dat",
            "",
            "PLOP",
            "G",
            "",
            "OPER",
            "VISC 1000000",
            "PACC",
            "",
            "",
            "CL 0.500",
            "PLIS",
            "ENDD",
        ]
    );
}

#[tokio::test]
async fn coordinate_file_query() {
    let points = [(1.0, 0.0), (0.5, 0.06), (0.0, 0.0), (0.5, -0.04), (1.0, 0.0)];
    let file = CoordinateFile::create(&points).unwrap();
    let request = AnalysisRequest::alpha(file.source(), 0.0, 2e6);

    let polar = XfoilClient::with_config(stub_config("normal"))
        .query(&request)
        .await
        .unwrap();
    assert_eq!(polar.len(), 3);
}

#[tokio::test]
async fn custom_sentinel_is_detected() {
    let config = stub_builder("normal").sentinel("XB_DONE_42").build().unwrap();
    let polar = XfoilClient::with_config(config)
        .query(&naca_request())
        .await
        .unwrap();
    assert_eq!(polar.len(), 3);
}

#[tokio::test]
async fn zero_rows_is_distinct_from_parse_failure() {
    let empty = XfoilClient::with_config(stub_config("empty"))
        .query(&naca_request())
        .await
        .expect("no converged points is still a result");
    assert!(empty.is_empty());
    assert_eq!(empty.columns, STUB_COLUMNS);
    assert_eq!(empty.first("CD"), None);

    let garbled = XfoilClient::with_config(stub_config("garbled"))
        .query(&naca_request())
        .await
        .unwrap_err();
    match garbled {
        Error::Parse { message, .. } => assert_eq!(message, "no data divider"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn silent_solver_stalls_within_deadline() {
    let deadline = Duration::from_millis(300);
    let config = stub_builder("silent").deadline(deadline).build().unwrap();
    let mut driver = Driver::spawn(&config).unwrap();

    let started = Instant::now();
    let err = driver.run_query(&naca_request()).await.unwrap_err();
    assert!(matches!(err, Error::Stall(d) if d == deadline), "{err:?}");
    assert!(err.is_retryable());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(driver.process().is_terminated());
    assert_eq!(driver.state(), DialogueState::Draining);
}

#[tokio::test]
async fn dying_solver_is_reported() {
    let mut driver = Driver::spawn(&stub_config("die")).unwrap();
    let err = driver.run_query(&naca_request()).await.unwrap_err();
    assert!(matches!(err, Error::ProcessDied { .. }), "{err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn failures_become_no_result() {
    let client = XfoilClient::with_config(stub_config("die"));
    assert!(client.query_or_none(&naca_request()).await.is_none());

    let client = XfoilClient::with_config(stub_config("normal"));
    let score = client
        .query_or_none(&naca_request())
        .await
        .and_then(|polar| polar.first("CD"));
    assert_eq!(score, Some(0.00683));
}

#[tokio::test]
async fn terminate_twice_is_safe() {
    let mut process = SolverProcess::spawn(&stub_config("normal")).unwrap();
    process.terminate();
    process.terminate();
    assert!(!process.is_alive());
    process.wait().await.unwrap();
    process.terminate();
}

#[tokio::test]
async fn send_then_terminate_is_process_died() {
    let config = stub_builder("silent")
        .deadline(Duration::from_secs(5))
        .build()
        .unwrap();
    let mut driver = Driver::spawn(&config).unwrap();
    driver.process().send(&Command::line("OPER")).await.unwrap();
    driver.terminate();

    let started = Instant::now();
    let err = driver.drain().await.unwrap_err();
    assert!(matches!(err, Error::ProcessDied { .. }), "{err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));

    let err = driver.process().send(&Command::line("PLIS")).await.unwrap_err();
    assert!(matches!(err, Error::ProcessDied { .. }));
}

#[tokio::test]
async fn missing_solver_is_spawn_error() {
    let client = XfoilClient::builder()
        .solver_path("/nonexistent/bin/xfoil")
        .build()
        .unwrap();
    let err = client.query(&naca_request()).await.unwrap_err();
    assert!(err.is_spawn_error(), "{err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_handles_do_not_cross_talk() {
    let dir = tempfile::tempdir().unwrap();
    let file_a = dir.path().join("alpha.dat");
    let file_b = dir.path().join("beta.dat");

    let run = |path: std::path::PathBuf| {
        tokio::spawn(async move {
            let mut driver = Driver::spawn(&stub_config("normal")).unwrap();
            let request = AnalysisRequest::alpha(AirfoilSource::file(path), 1.0, 1e6);
            driver.run_query_raw(&request).await.unwrap()
        })
    };

    let (a, b) = tokio::join!(run(file_a), run(file_b));
    let (a, b) = (a.unwrap(), b.unwrap());

    let names = |lines: &[String], needle: &str| lines.iter().any(|l| l.contains(needle));
    assert!(names(&a, "alpha.dat"));
    assert!(!names(&a, "beta.dat"));
    assert!(names(&b, "beta.dat"));
    assert!(!names(&b, "alpha.dat"));
}
