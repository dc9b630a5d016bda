use thiserror::Error;

/// Top-level error type for the csgkit kernel.
#[derive(Debug, Error)]
pub enum CsgError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Exists(#[from] ExistsError),
}

/// Errors related to invalid primitive parameters.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{parameter} = {value} must be positive")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate surface: {0}")]
    Degenerate(String),
}

/// Errors related to malformed rule text.
///
/// Every variant carries the offending fragment so the caller can identify
/// which composed piece of a rule string was bad.
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("unbalanced parentheses in \"{0}\"")]
    UnbalancedParentheses(String),

    #[error("unexpected token \"{0}\"")]
    UnexpectedToken(String),

    #[error("surface reference 0 is not allowed in \"{0}\"")]
    ZeroReference(String),

    #[error("empty operand in \"{0}\"")]
    EmptyOperand(String),
}

/// Errors related to use of an unregistered identifier.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("unknown surface {0}")]
    UnknownSurface(u64),

    #[error("unknown cell {0}")]
    UnknownCell(u64),

    #[error("unknown identifier block \"{0}\"")]
    UnknownBlock(String),
}

/// Errors related to conflicting duplicate registration.
#[derive(Debug, Error)]
pub enum ExistsError {
    #[error("surface {0} is already registered")]
    SurfaceTaken(u64),

    #[error("cell {0} is already registered")]
    CellTaken(u64),

    #[error(
        "block \"{key}\" is already registered with capacity {registered}, requested {requested}"
    )]
    BlockConflict {
        key: String,
        registered: u64,
        requested: u64,
    },

    #[error("block \"{key}\" exhausted its reserved range of {capacity} ids")]
    BlockExhausted { key: String, capacity: u64 },
}

/// Convenience type alias for results using [`CsgError`].
pub type Result<T> = std::result::Result<T, CsgError>;
