use crate::session::SessionId;
use crate::solver::validator::format_values;
use crate::solver::{ExpressionError, ValidationError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Zone an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Hand,
    EnemyRow,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Hand => write!(f, "hand"),
            Zone::EnemyRow => write!(f, "enemy row"),
        }
    }
}

/// Everything an engine operation can refuse. A failed operation leaves the
/// session untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("Index {index} is out of range for the {zone} ({len} cards)")]
    InvalidIndex { zone: Zone, index: usize, len: usize },
    #[error("No expression over the hand reaches {target}")]
    NoSolutionFound { target: u32 },
    #[error("Invalid expression: {0}")]
    InvalidExpression(ExpressionError),
    #[error("Result {result} does not equal target {target}")]
    WrongResult { result: f64, target: f64 },
    #[error("Required cards not used (missing values: {})", format_values(.0))]
    MissingRequiredCards(Vec<f64>),
    #[error("Values not available in hand: {}", format_values(.0))]
    UnknownValue(Vec<f64>),
    #[error("Card at hand index {index} is the anchor and cannot be discarded")]
    NotDiscardable { index: usize },
    #[error("Cannot {action} while {phase}")]
    IllegalStateTransition {
        action: &'static str,
        phase: crate::game::Phase,
    },
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Tag reported to adapters alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    SessionNotFound,
    InvalidIndex,
    NoSolutionFound,
    InvalidExpression,
    WrongResult,
    MissingRequiredCards,
    UnknownValue,
    NotDiscardable,
    IllegalStateTransition,
    InvalidLayout,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::SessionNotFound(_) => ErrorKind::SessionNotFound,
            GameError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            GameError::NoSolutionFound { .. } => ErrorKind::NoSolutionFound,
            GameError::InvalidExpression(_) => ErrorKind::InvalidExpression,
            GameError::WrongResult { .. } => ErrorKind::WrongResult,
            GameError::MissingRequiredCards(_) => ErrorKind::MissingRequiredCards,
            GameError::UnknownValue(_) => ErrorKind::UnknownValue,
            GameError::NotDiscardable { .. } => ErrorKind::NotDiscardable,
            GameError::IllegalStateTransition { .. } => ErrorKind::IllegalStateTransition,
            GameError::InvalidLayout(_) => ErrorKind::InvalidLayout,
        }
    }
}

impl From<ValidationError> for GameError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidExpression(e) => GameError::InvalidExpression(e),
            ValidationError::WrongResult { result, target } => GameError::WrongResult { result, target },
            ValidationError::MissingRequiredCards(v) => GameError::MissingRequiredCards(v),
            ValidationError::UnknownValue(v) => GameError::UnknownValue(v),
        }
    }
}

impl From<ExpressionError> for GameError {
    fn from(err: ExpressionError) -> Self {
        GameError::InvalidExpression(err)
    }
}
