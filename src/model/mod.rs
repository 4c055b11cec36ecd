pub mod engineer;
pub mod perception;
pub mod rng;

pub use engineer::{random_bias, random_noise_scale, random_skill_score, Engineer};
pub use perception::{
    clamp_score, estimate_skill, sample_normal, PerceptionParams, SCORE_MAX, SCORE_MIN,
};
pub use rng::{derive_seed, entropy_seed, SimRng};
