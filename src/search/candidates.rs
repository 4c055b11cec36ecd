//! Lazy, unbounded stream of freshly drawn candidates.

use std::iter::FusedIterator;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::model::Engineer;

/// Default relative band for [`SelfSelection`].
pub const DEFAULT_SELF_SELECTION_TOLERANCE: f64 = 0.15;
/// Consecutive filtered-out draws after which a self-selecting stream gives up.
pub const DEFAULT_MAX_REJECTIONS: usize = 10_000;

/// Only engineers who believe they fit the role apply: their self-perceived skill must
/// lie within `tolerance` of their own reading of the target score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelfSelection {
    pub target_score: f64,
    pub tolerance: f64,
}

impl SelfSelection {
    pub fn new(target_score: f64) -> Self {
        Self {
            target_score,
            tolerance: DEFAULT_SELF_SELECTION_TOLERANCE,
        }
    }

    fn applies<R: Rng + ?Sized>(&self, engineer: &Engineer, settings: &Settings, rng: &mut R) -> bool {
        let perceived_target = f64::from(engineer.estimate_value(
            self.target_score,
            settings.default_self_assessment_time,
            settings,
            rng,
        ));
        let lower = perceived_target * (1.0 - self.tolerance);
        let upper = perceived_target * (1.0 + self.tolerance);
        let own = f64::from(engineer.self_perceived_skill());
        lower <= own && own <= upper
    }
}

/// Infinite population of i.i.d. engineers. Owns its random stream so it can be
/// pulled from while the interview side uses another.
///
/// Without self-selection the stream never ends. With it, the stream ends after
/// `max_rejections` consecutive draws decline to apply.
#[derive(Debug, Clone)]
pub struct CandidateStream<'s, R> {
    settings: &'s Settings,
    rng: R,
    self_selection: Option<SelfSelection>,
    max_rejections: usize,
    drawn: usize,
    exhausted: bool,
}

impl<'s, R: Rng> CandidateStream<'s, R> {
    pub fn new(settings: &'s Settings, rng: R) -> Self {
        Self {
            settings,
            rng,
            self_selection: None,
            max_rejections: DEFAULT_MAX_REJECTIONS,
            drawn: 0,
            exhausted: false,
        }
    }

    pub fn with_self_selection(mut self, filter: SelfSelection) -> Self {
        self.self_selection = Some(filter);
        self
    }

    pub fn with_max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections;
        self
    }

    /// Engineers generated so far, including ones that declined to apply.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl<R: Rng> Iterator for CandidateStream<'_, R> {
    type Item = Engineer;

    fn next(&mut self) -> Option<Engineer> {
        if self.exhausted {
            return None;
        }
        let Some(filter) = self.self_selection else {
            self.drawn += 1;
            return Some(Engineer::random(self.settings, &mut self.rng));
        };

        for _ in 0..=self.max_rejections {
            self.drawn += 1;
            let engineer = Engineer::random(self.settings, &mut self.rng);
            if filter.applies(&engineer, self.settings, &mut self.rng) {
                return Some(engineer);
            }
        }
        debug!(
            max_rejections = self.max_rejections,
            target_score = filter.target_score,
            "no engineer self-selected, candidate stream ended"
        );
        self.exhausted = true;
        None
    }
}

impl<R: Rng> FusedIterator for CandidateStream<'_, R> {}
