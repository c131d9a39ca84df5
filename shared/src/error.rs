use thiserror::Error;

/// Domain-level error shared by the scheduler and the validator. Neither
/// binary panics or throws across its CLI boundary; every failure mode that
/// can be attributed to bad input collapses into one of these variants and
/// is reported through the process's output contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("infeasible: {0}")]
    Infeasible(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
