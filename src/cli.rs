use std::fmt::Display;
use std::fs::File;
use std::io;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::compensation::CompensationCurve;
use crate::config::{Settings, CONFIG_PATH_ENV};
use crate::error::{HiresimError, PipelineError};
use crate::interview::{EliminationPolicy, InterviewPipeline, InterviewStep};
use crate::model::{derive_seed, entropy_seed, Engineer, PerceptionParams, SimRng};
use crate::parallel::WorkerPool;
use crate::search::{
    find_suitable_candidate, SearchCriteria, SearchOutcome, DEFAULT_SELF_SELECTION_TOLERANCE,
};
use crate::sweep::{
    default_scenarios, run_sweep_with_progress, write_records_csv, SweepParams, SweepReport,
    DEFAULT_RUNS,
};

pub const DEMO_TARGET_SCORE: f64 = 70.0;
/// The demo will pay at most 10% below the market rate for the target score.
pub const DEMO_DISCOUNT: f64 = -0.1;
/// Offers are made 5% above the perceived compensation.
pub const OFFER_ADJUSTMENT: f64 = 0.05;

const USAGE: &str =
    "usage: hiresim <demo|search|sweep|offer|validate-config> [--self-select[=tolerance]]";
const VALUE_FLAGS: &[&str] = &["--csv", "--workers"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Demo,
    Search,
    Sweep,
    Offer,
    ValidateConfig,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("demo") => Some(Command::Demo),
        Some("search") => Some(Command::Search),
        Some("sweep") => Some(Command::Sweep),
        Some("offer") => Some(Command::Offer),
        Some("validate-config") => Some(Command::ValidateConfig),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let handler: fn(&[String], &Settings, &CompensationCurve) -> i32 = match command {
        Command::ValidateConfig => return handle_validate_config(args),
        Command::Demo => handle_demo,
        Command::Search => handle_search,
        Command::Sweep => handle_sweep,
        Command::Offer => |args, _, curve| handle_offer(args, curve),
    };

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("settings error: {err}");
            return 1;
        }
    };
    let curve = CompensationCurve::from_settings(&settings);
    handler(args, &settings, &curve)
}

/// Settings from `HIRESIM_CONFIG` (if set) with `HIRESIM_*` overrides on top.
pub fn load_settings() -> Result<Settings, HiresimError> {
    let settings = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Settings::load(path.trim())?.with_process_env()?,
        _ => Settings::from_env()?,
    };
    Ok(settings)
}

/// The reference panel: four fixed interviewers staffed over three steps.
pub fn reference_pipeline<R: Rng + ?Sized>(
    settings: &Settings,
    rng: &mut R,
) -> Result<InterviewPipeline, PipelineError> {
    let mut interviewer = |skill: i32, noise: f64, bias: f64| {
        let params = PerceptionParams::with_eval(skill, noise, bias, rng);
        Engineer::new(params, settings, rng)
    };
    let first = interviewer(80, 10.0, -5.0);
    let second = interviewer(75, 12.0, 2.0);
    let third = interviewer(85, 8.0, 0.0);
    let fourth = interviewer(70, 15.0, 3.0);

    InterviewPipeline::new(vec![
        InterviewStep::new(0.25, vec![first.clone()], settings)?,
        InterviewStep::new(0.5, vec![second.clone(), third.clone()], settings)?,
        InterviewStep::new(1.5, vec![first, second, third, fourth], settings)?,
    ])
}

#[derive(Debug, Clone, Serialize)]
pub struct HireReport {
    pub seed: u64,
    pub target_score: f64,
    pub target_compensation: f64,
    pub elimination: EliminationPolicy,
    /// Present when applicants self-selected against the target.
    pub self_selection_tolerance: Option<f64>,
    pub candidates_screened: usize,
    pub hire: Option<HireDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HireDetails {
    pub true_skill: i32,
    pub self_perceived_skill: i32,
    pub interview_time: f64,
    pub final_score: f64,
    pub true_compensation: f64,
    pub perceived_compensation: f64,
    pub offer: f64,
}

impl HireReport {
    fn new(seed: u64, criteria: &SearchCriteria, outcome: &SearchOutcome, curve: &CompensationCurve) -> Self {
        let hire = outcome.candidate.as_ref().map(|candidate| HireDetails {
            true_skill: candidate.true_skill(),
            self_perceived_skill: candidate.self_perceived_skill(),
            interview_time: outcome.elapsed_time,
            final_score: outcome.final_score,
            true_compensation: curve.map_skill_to_compensation(candidate.true_skill()),
            perceived_compensation: curve.make_offer_for_mean(outcome.final_score, 0.0),
            offer: curve.make_offer_for_mean(outcome.final_score, OFFER_ADJUSTMENT),
        });
        Self {
            seed,
            target_score: criteria.target_score,
            target_compensation: criteria.target_compensation,
            elimination: criteria.elimination,
            self_selection_tolerance: criteria.self_selection.map(|filter| filter.tolerance),
            candidates_screened: outcome.candidates_screened,
            hire,
        }
    }

    fn print_table(&self) {
        match &self.hire {
            Some(hire) => {
                println!("Suitable candidate found!");
                println!("Candidate's true skill: {}", hire.true_skill);
                println!("Interview time: {:.2} hours", hire.interview_time);
                println!("Final score: {:.2}", hire.final_score);
                println!("True compensation: ${:.2}", hire.true_compensation);
                println!("Perceived compensation: ${:.2}", hire.perceived_compensation);
                println!("Offer made: ${:.2}", hire.offer);
            }
            None => println!("No suitable candidate found."),
        }
        println!("Candidates screened: {}", self.candidates_screened);
        println!("Seed: {}", self.seed);
    }
}

fn run_reference_search(
    criteria: &SearchCriteria,
    settings: &Settings,
    curve: &CompensationCurve,
    seed: u64,
) -> Result<HireReport, PipelineError> {
    let mut panel_rng = SimRng::new(derive_seed(seed, "panel", 0));
    let pipeline = reference_pipeline(settings, &mut panel_rng)?;
    let outcome = find_suitable_candidate(&pipeline, criteria, settings, curve, seed);
    Ok(HireReport::new(seed, criteria, &outcome, curve))
}

fn handle_demo(args: &[String], settings: &Settings, curve: &CompensationCurve) -> i32 {
    let positional = positional_args(args);
    let seed = parse_seed(positional.first().copied());
    let criteria = with_self_selection(
        SearchCriteria::new(DEMO_TARGET_SCORE, DEMO_DISCOUNT, EliminationPolicy::Aggregate, curve),
        args,
    );
    emit_hire_report(run_reference_search(&criteria, settings, curve, seed), has_flag(args, "--table"))
}

fn handle_search(args: &[String], settings: &Settings, curve: &CompensationCurve) -> i32 {
    let positional = positional_args(args);
    let target = parse_arg(positional.first().copied(), "target", DEMO_TARGET_SCORE);
    let discount = parse_arg(positional.get(1).copied(), "discount", DEMO_DISCOUNT);
    let elimination = match positional.get(2).copied() {
        Some(raw) => match raw.parse::<EliminationPolicy>() {
            Ok(policy) => policy,
            Err(err) => {
                eprintln!("{err}");
                return 2;
            }
        },
        None => EliminationPolicy::Aggregate,
    };
    let seed = parse_seed(positional.get(3).copied());
    let criteria = with_self_selection(SearchCriteria::new(target, discount, elimination, curve), args);
    emit_hire_report(run_reference_search(&criteria, settings, curve, seed), has_flag(args, "--table"))
}

fn emit_hire_report(report: Result<HireReport, PipelineError>, as_table: bool) -> i32 {
    let report = match report {
        Ok(report) => report,
        Err(err) => {
            eprintln!("pipeline error: {err}");
            return 1;
        }
    };
    if as_table {
        report.print_table();
        return 0;
    }
    print_json(&report)
}

fn handle_sweep(args: &[String], settings: &Settings, curve: &CompensationCurve) -> i32 {
    let positional = positional_args(args);
    let params = SweepParams {
        target_score: parse_arg(positional.first().copied(), "target", SweepParams::default().target_score),
        adjustment: parse_arg(positional.get(1).copied(), "adjustment", 0.0),
        seed: parse_seed(positional.get(3).copied()),
        self_selection_tolerance: self_selection_tolerance(args),
    };
    let runs = parse_arg(positional.get(2).copied(), "runs", DEFAULT_RUNS);
    let workers = parse_arg(flag_value(args, "--workers"), "workers", 0usize);
    let scenarios = default_scenarios(runs);

    let results = match run_sweep_with_progress(
        &scenarios,
        &params,
        settings,
        curve,
        &WorkerPool::with_workers(workers),
        |scenario, done, total| debug!(scenario, done, total, "sweep progress"),
    ) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("sweep failed: {err}");
            return 1;
        }
    };

    if let Some(path) = flag_value(args, "--csv") {
        let written = File::create(path)
            .map_err(HiresimError::from)
            .and_then(|file| write_records_csv(io::BufWriter::new(file), &results));
        if let Err(err) = written {
            eprintln!("failed to write '{path}': {err}");
            return 1;
        }
    }

    print_json(&SweepReport::new(params, curve, &results))
}

#[derive(Debug, Serialize)]
struct OfferReport {
    score: i32,
    adjustment: f64,
    compensation: f64,
    offer: f64,
}

fn handle_offer(args: &[String], curve: &CompensationCurve) -> i32 {
    let positional = positional_args(args);
    let Some(raw_score) = positional.first() else {
        eprintln!("usage: hiresim offer <score> [adjustment]");
        return 2;
    };
    let Ok(score) = raw_score.parse::<i32>() else {
        eprintln!("invalid score '{raw_score}'");
        return 2;
    };
    let adjustment = parse_arg(positional.get(1).copied(), "adjustment", 0.0);
    print_json(&OfferReport {
        score,
        adjustment,
        compensation: curve.map_skill_to_compensation(score),
        offer: curve.make_offer(score, adjustment),
    })
}

fn handle_validate_config(args: &[String]) -> i32 {
    let Some(path) = positional_args(args).first().copied() else {
        eprintln!("usage: hiresim validate-config <path-to-settings.{{yaml,json}}>");
        return 2;
    };
    match Settings::load(path) {
        Ok(_) => {
            println!("settings valid: {path}");
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            1
        }
    }
}

/// Arguments after the command, skipping `--flags` and the values of flags that take one.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut positional = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            positional.push(arg.as_str());
        }
    }
    positional
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

/// `--self-select` uses the default tolerance, `--self-select=<tolerance>` sets one.
fn self_selection_tolerance(args: &[String]) -> Option<f64> {
    args.iter().find_map(|arg| {
        let rest = arg.strip_prefix("--self-select")?;
        if rest.is_empty() {
            return Some(DEFAULT_SELF_SELECTION_TOLERANCE);
        }
        let raw = rest.strip_prefix('=')?;
        Some(parse_arg(
            Some(raw),
            "self-select tolerance",
            DEFAULT_SELF_SELECTION_TOLERANCE,
        ))
    })
}

fn with_self_selection(criteria: SearchCriteria, args: &[String]) -> SearchCriteria {
    match self_selection_tolerance(args) {
        Some(tolerance) => criteria.with_self_selection(tolerance),
        None => criteria,
    }
}

fn parse_arg<T>(raw: Option<&str>, name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_seed(raw: Option<&str>) -> u64 {
    match raw {
        Some(_) => parse_arg(raw, "seed", 7),
        None => entropy_seed(),
    }
}
