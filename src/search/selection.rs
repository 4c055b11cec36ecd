//! Candidate search: screen candidates one at a time until one clears both the
//! skill bar and the compensation bar, or the draw budget runs out.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::compensation::CompensationCurve;
use crate::config::Settings;
use crate::interview::{EliminationPolicy, InterviewPipeline};
use crate::model::{derive_seed, Engineer, SimRng};
use crate::search::candidates::{CandidateStream, SelfSelection};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchCriteria {
    /// Minimum final interview score.
    pub target_score: f64,
    /// Maximum perceived compensation.
    pub target_compensation: f64,
    pub elimination: EliminationPolicy,
    /// Draw cap; `None` uses `Settings::max_candidates_to_consider`.
    pub max_draws: Option<usize>,
    /// When set, only engineers who think they match the target apply.
    pub self_selection: Option<SelfSelection>,
}

impl SearchCriteria {
    /// Criteria whose compensation ceiling is the offer for `target_score` adjusted by
    /// `discount` (e.g. `-0.1` for 10% below market).
    pub fn new(
        target_score: f64,
        discount: f64,
        elimination: EliminationPolicy,
        curve: &CompensationCurve,
    ) -> Self {
        Self {
            target_score,
            target_compensation: curve.make_offer_for_mean(target_score, discount),
            elimination,
            max_draws: None,
            self_selection: None,
        }
    }

    pub fn with_max_draws(mut self, max_draws: usize) -> Self {
        self.max_draws = Some(max_draws);
        self
    }

    /// Self-select applicants against this criteria's target score.
    pub fn with_self_selection(mut self, tolerance: f64) -> Self {
        self.self_selection = Some(SelfSelection {
            target_score: self.target_score,
            tolerance,
        });
        self
    }
}

/// Result of a search. `candidate` is `None` when the draw budget ran out; in that
/// case `elapsed_time` and `final_score` are 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub candidate: Option<Engineer>,
    pub elapsed_time: f64,
    pub final_score: f64,
    pub candidates_screened: usize,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        self.candidate.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CandidateSearch<'a> {
    pipeline: &'a InterviewPipeline,
    settings: &'a Settings,
    curve: &'a CompensationCurve,
}

impl<'a> CandidateSearch<'a> {
    pub fn new(
        pipeline: &'a InterviewPipeline,
        settings: &'a Settings,
        curve: &'a CompensationCurve,
    ) -> Self {
        Self {
            pipeline,
            settings,
            curve,
        }
    }

    /// Pull candidates in order and accept the first that passes. At most
    /// `max_draws` candidates are screened; an ended stream also ends the search.
    pub fn run<I, R>(&self, criteria: &SearchCriteria, candidates: I, rng: &mut R) -> SearchOutcome
    where
        I: IntoIterator<Item = Engineer>,
        R: Rng + ?Sized,
    {
        let max_draws = criteria
            .max_draws
            .unwrap_or(self.settings.max_candidates_to_consider);
        let mut screened = 0usize;

        for candidate in candidates.into_iter().take(max_draws) {
            screened += 1;
            let outcome = self.pipeline.run(
                criteria.target_score,
                criteria.elimination,
                &candidate,
                self.settings,
                rng,
            );
            let final_score = outcome.final_score();
            let perceived_compensation = self.curve.make_offer_for_mean(final_score, 0.0);
            debug!(
                screened,
                true_skill = candidate.true_skill(),
                final_score,
                perceived_compensation,
                steps_run = outcome.steps_run(),
                "candidate screened"
            );

            if final_score >= criteria.target_score
                && perceived_compensation <= criteria.target_compensation
            {
                info!(
                    screened,
                    final_score,
                    elapsed_time = outcome.elapsed_time,
                    "suitable candidate found"
                );
                return SearchOutcome {
                    candidate: Some(candidate),
                    elapsed_time: outcome.elapsed_time,
                    final_score,
                    candidates_screened: screened,
                };
            }
        }

        info!(screened, max_draws, "no suitable candidate found");
        SearchOutcome {
            candidate: None,
            elapsed_time: 0.0,
            final_score: 0.0,
            candidates_screened: screened,
        }
    }
}

/// Search a fresh population, self-selected when `criteria.self_selection` is set.
/// Candidate draws and interview noise come from two independent streams derived from
/// `seed`, so the same seed reproduces the search.
pub fn find_suitable_candidate(
    pipeline: &InterviewPipeline,
    criteria: &SearchCriteria,
    settings: &Settings,
    curve: &CompensationCurve,
    seed: u64,
) -> SearchOutcome {
    let mut candidates = CandidateStream::new(settings, SimRng::new(derive_seed(seed, "candidates", 0)));
    if let Some(filter) = criteria.self_selection {
        candidates = candidates.with_self_selection(filter);
    }
    let mut interview_rng = SimRng::new(derive_seed(seed, "interviews", 0));
    CandidateSearch::new(pipeline, settings, curve).run(criteria, candidates, &mut interview_rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::InterviewStep;
    use crate::model::PerceptionParams;

    fn noiseless_pipeline(settings: &Settings) -> InterviewPipeline {
        let mut rng = SimRng::new(0);
        let interviewer = Engineer::new(PerceptionParams::new(50, 0.0, 0.0, 0.0, 0.0), settings, &mut rng);
        InterviewPipeline::new(vec![
            InterviewStep::new(1.0, vec![interviewer], settings).expect("valid step"),
        ])
        .expect("valid pipeline")
    }

    fn engineer(true_skill: i32, settings: &Settings) -> Engineer {
        let mut rng = SimRng::new(0);
        Engineer::new(PerceptionParams::new(true_skill, 0.0, 0.0, 0.0, 0.0), settings, &mut rng)
    }

    #[test]
    fn accepts_first_candidate_clearing_both_bars() {
        let settings = Settings::default();
        let curve = CompensationCurve::from_settings(&settings);
        let pipeline = noiseless_pipeline(&settings);
        let criteria = SearchCriteria {
            target_score: 70.0,
            target_compensation: curve.make_offer(80, 0.0),
            elimination: EliminationPolicy::Immediate,
            max_draws: None,
            self_selection: None,
        };
        let pool = vec![
            engineer(40, &settings),
            engineer(95, &settings),
            engineer(75, &settings),
            engineer(78, &settings),
        ];

        let outcome = CandidateSearch::new(&pipeline, &settings, &curve).run(
            &criteria,
            pool,
            &mut SimRng::new(1),
        );
        // 40 fails the skill bar, 95 is too expensive, 75 passes.
        assert_eq!(outcome.candidates_screened, 3);
        assert_eq!(outcome.final_score, 75.0);
        assert_eq!(outcome.elapsed_time, 1.0);
        assert_eq!(outcome.candidate.map(|c| c.true_skill()), Some(75));
    }

    #[test]
    fn exhausted_search_reports_draws_consumed() {
        let settings = Settings::default();
        let curve = CompensationCurve::from_settings(&settings);
        let pipeline = noiseless_pipeline(&settings);
        let criteria = SearchCriteria::new(70.0, 0.0, EliminationPolicy::Aggregate, &curve)
            .with_max_draws(5);
        let pool = vec![engineer(10, &settings), engineer(20, &settings)];

        let outcome = CandidateSearch::new(&pipeline, &settings, &curve).run(
            &criteria,
            pool,
            &mut SimRng::new(1),
        );
        assert!(!outcome.is_found());
        assert_eq!(outcome.candidates_screened, 2);
        assert_eq!(outcome.elapsed_time, 0.0);
        assert_eq!(outcome.final_score, 0.0);
    }

    #[test]
    fn self_selection_targets_the_criteria_score() {
        let curve = CompensationCurve::default();
        let criteria = SearchCriteria::new(80.0, 0.0, EliminationPolicy::Immediate, &curve)
            .with_self_selection(0.2);
        assert_eq!(
            criteria.self_selection,
            Some(SelfSelection {
                target_score: 80.0,
                tolerance: 0.2
            })
        );
    }

    #[test]
    fn criteria_derive_target_compensation_from_discount() {
        let curve = CompensationCurve::default();
        let criteria = SearchCriteria::new(70.0, -0.1, EliminationPolicy::Aggregate, &curve);
        assert_eq!(criteria.target_compensation, curve.make_offer(70, -0.1));
    }
}
