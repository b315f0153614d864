pub mod expression;
pub mod reachability;
pub mod search;
pub mod validator;

pub use expression::{Expr, ExpressionError, Op};
pub use reachability::{can_reach, reachable_values};
pub use search::{Solution, Solver, SolverValue, DEFAULT_VALUE_LIMIT};
pub use validator::{validate, ValidationError};

/// Absolute tolerance for comparing computed values
pub const TOLERANCE: f64 = 1e-4;

/// Divisors smaller than this are never tried by the search
pub const DIVISOR_EPSILON: f64 = 1e-4;

#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}
