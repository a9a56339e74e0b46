pub mod conceptual;
pub mod config;
pub mod criterion;
pub mod difficulty;
pub mod engine;
pub mod mathematical;
pub mod options;
pub mod range;
pub mod types;
pub mod validation;

pub use config::*;
pub use criterion::{Criterion, CriterionResult};
pub use engine::{confidence_for, score, Evaluation, Scorer};
pub use mathematical::MathFault;
pub use range::RangeOp;
pub use types::*;
pub use validation::validate_scoring;
