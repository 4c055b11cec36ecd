use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hiresim::parallel::WorkerPool;
use hiresim::sweep::{
    default_scenarios, run_sweep, run_sweep_parallel, write_records_csv, SweepParams, SweepReport,
};
use hiresim::{CompensationCurve, Settings};

fn small_settings() -> Settings {
    Settings {
        max_candidates_to_consider: 30,
        ..Settings::default()
    }
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("hiresim-{name}-{stamp}.csv"))
}

#[test]
fn parallel_sweep_matches_sequential_sweep() {
    let settings = small_settings();
    let curve = CompensationCurve::from_settings(&settings);
    let scenarios = default_scenarios(6);
    let params = SweepParams {
        seed: 2024,
        ..SweepParams::default()
    };

    let sequential = run_sweep(&scenarios, &params, &settings, &curve).expect("sweep runs");
    let parallel = run_sweep_parallel(&scenarios, &params, &settings, &curve, &WorkerPool::with_workers(3))
        .expect("sweep runs");

    assert_eq!(sequential, parallel);
    for result in &sequential {
        let runs: Vec<usize> = result.records.iter().map(|r| r.run).collect();
        assert_eq!(runs, (0..6).collect::<Vec<_>>());
    }
}

#[test]
fn records_respect_search_limits() {
    let settings = small_settings();
    let curve = CompensationCurve::from_settings(&settings);
    let results = run_sweep(&default_scenarios(5), &SweepParams::default(), &settings, &curve)
        .expect("sweep runs");

    for result in &results {
        assert_eq!(result.summary.runs, 5);
        for record in &result.records {
            assert!(record.candidates_screened <= 30);
            assert!(record.candidates_screened >= 1);
            if record.hired {
                assert!(record.final_score >= 85.0);
                assert!(record.total_time > 0.0);
            } else {
                assert_eq!(record.true_skill, 0);
                assert_eq!(record.total_time, 0.0);
            }
        }
    }
}

#[test]
fn different_seeds_give_different_sweeps() {
    let settings = small_settings();
    let curve = CompensationCurve::from_settings(&settings);
    let scenarios = default_scenarios(8);
    let a = run_sweep(&scenarios, &SweepParams { seed: 1, ..SweepParams::default() }, &settings, &curve)
        .expect("sweep runs");
    let b = run_sweep(&scenarios, &SweepParams { seed: 2, ..SweepParams::default() }, &settings, &curve)
        .expect("sweep runs");
    assert_ne!(a, b);
}

#[test]
fn csv_export_round_trips_through_a_file() {
    let settings = small_settings();
    let curve = CompensationCurve::from_settings(&settings);
    let results = run_sweep(&default_scenarios(3), &SweepParams::default(), &settings, &curve)
        .expect("sweep runs");

    let path = unique_temp_path("sweep");
    let file = fs::File::create(&path).expect("temp file should be created");
    write_records_csv(file, &results).expect("csv should be written");

    let mut reader = csv::Reader::from_path(&path).expect("csv should be readable");
    let headers = reader.headers().expect("header row").clone();
    assert_eq!(headers.get(0), Some("scenario"));
    assert_eq!(headers.len(), 8);
    assert_eq!(reader.records().count(), 12);

    let _ = fs::remove_file(path);
}

#[test]
fn report_serializes_with_timestamp_and_summaries() {
    let settings = small_settings();
    let curve = CompensationCurve::from_settings(&settings);
    let params = SweepParams::default();
    let results = run_sweep(&default_scenarios(2), &params, &settings, &curve).expect("sweep runs");

    let report = SweepReport::new(params, &curve, &results);
    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["summaries"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["summaries"][2]["elimination"], "aggregate");
    assert!(json["generated_at"].as_str().is_some_and(|s| s.ends_with('Z')));
    assert_eq!(json["target_compensation"], curve.make_offer(85, 0.0));
}

#[test]
fn self_selected_sweep_screens_no_one_when_nobody_applies() {
    let settings = small_settings();
    let curve = CompensationCurve::from_settings(&settings);
    let params = SweepParams {
        self_selection_tolerance: Some(-2.0),
        ..SweepParams::default()
    };
    let results = run_sweep(&default_scenarios(2), &params, &settings, &curve).expect("sweep runs");
    for result in &results {
        assert!(result
            .records
            .iter()
            .all(|r| !r.hired && r.candidates_screened == 0));
    }
}
