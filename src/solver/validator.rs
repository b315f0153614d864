use crate::solver::expression::{Expr, ExpressionError};
use crate::solver::{approx_eq, TOLERANCE};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid expression: {0}")]
    InvalidExpression(#[from] ExpressionError),
    #[error("result {result} does not equal target {target}")]
    WrongResult { result: f64, target: f64 },
    #[error("required cards not used (missing values: {})", format_values(.0))]
    MissingRequiredCards(Vec<f64>),
    #[error("values not available in hand: {}", format_values(.0))]
    UnknownValue(Vec<f64>),
}

pub(crate) fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove and report the first entry of `pool` within tolerance of `value`
fn take_match(pool: &mut Vec<f64>, value: f64) -> bool {
    match pool.iter().position(|&p| approx_eq(p, value)) {
        Some(idx) => {
            pool.remove(idx);
            true
        }
        None => false,
    }
}

/// Check a player's expression against the use-all rule.
///
/// `required` must each appear once among the literals; any further literal
/// must come from what is left of `available` once the required values are
/// taken out of it. Returns the evaluated result.
pub fn validate(expression: &str, required: &[f64], available: &[f64], target: f64) -> Result<f64, ValidationError> {
    let expr = Expr::parse(expression)?;
    let result = expr.eval()?;

    if (result - target).abs() > TOLERANCE {
        return Err(ValidationError::WrongResult { result, target });
    }

    let mut unused = expr.literals();
    let missing: Vec<f64> = required
        .iter()
        .copied()
        .filter(|&req| !take_match(&mut unused, req))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredCards(missing));
    }

    let mut pool = available.to_vec();
    for &req in required {
        take_match(&mut pool, req);
    }
    let unknown: Vec<f64> = unused
        .into_iter()
        .filter(|&lit| !take_match(&mut pool, lit))
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownValue(unknown));
    }

    Ok(result)
}
