pub mod expr;
pub mod extract;
pub mod validate;
pub mod verify;

pub use expr::{parse, check_statement, EvalError, Expr, ExprError};
pub use extract::{extract, extract_equations, Extraction};
pub use validate::{is_valid_expression, validity_ratio};
pub use verify::{verify, Verification};
