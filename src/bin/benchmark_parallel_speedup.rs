//! Run the reference sweep once sequentially and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup

use std::time::Instant;

use hiresim::parallel::WorkerPool;
use hiresim::sweep::{default_scenarios, run_sweep, run_sweep_parallel, SweepParams};
use hiresim::{CompensationCurve, Settings};

fn main() {
    let runs = 40;
    let settings = Settings {
        max_candidates_to_consider: 300,
        ..Settings::default()
    };
    let curve = CompensationCurve::from_settings(&settings);
    let scenarios = default_scenarios(runs);
    let params = SweepParams {
        seed: 12345,
        ..SweepParams::default()
    };

    println!(
        "Sweep: {} scenarios × {} runs (max {} candidates per run)",
        scenarios.len(),
        runs,
        settings.max_candidates_to_consider
    );
    println!();

    let total_runs = (scenarios.len() * runs) as f64;

    let t0 = Instant::now();
    let results_seq = match run_sweep(&scenarios, &params, &settings, &curve) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("sequential sweep failed: {err}");
            std::process::exit(1);
        }
    };
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!("Sequential:  {:.2} ms  ({:.1} runs/s)", seq_ms, total_runs / elapsed_seq.as_secs_f64());

    let t0 = Instant::now();
    let results_par = match run_sweep_parallel(&scenarios, &params, &settings, &curve, &WorkerPool::default()) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("parallel sweep failed: {err}");
            std::process::exit(1);
        }
    };
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!("Parallel:    {:.2} ms  ({:.1} runs/s)", par_ms, total_runs / elapsed_par.as_secs_f64());

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    assert_eq!(results_seq.len(), results_par.len());
    for (a, b) in results_seq.iter().zip(results_par.iter()) {
        assert_eq!(a.records, b.records, "scenario {} records mismatch", a.scenario.name);
    }
    println!("(Results match sequential vs parallel)");
}
