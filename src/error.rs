use std::backtrace::Backtrace;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Specific reasons a CSP or a solver configuration can be rejected.
///
/// Kept separate from [`Error`] so a caller can match on the cause without
/// wading through backtrace plumbing.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("constraint scope references variable {0} which is not declared in the CSP")]
    UnknownScopeVariable(String),

    #[error("variable {0} has an empty original domain")]
    EmptyDomain(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
