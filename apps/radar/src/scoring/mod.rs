// Scoring: skill matches + ordered bonus rules → 0–100 fit score and reason.

pub mod rules;
pub mod scorer;

pub use scorer::score_and_rank;
