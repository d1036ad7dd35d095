//! Error taxonomy surfaced by the core.

/// Errors `reconstruct` can fail with. `reconstruct` is transactional: either
/// it returns `Ok((Mesh, Diagnostics))` or one of these; no partial mutation
/// is visible to the caller.
#[derive(thiserror::Error, Debug)]
pub enum PolyfitError {
    /// Fewer than 1 segment, a segment with < 3 points, a non-unit plane
    /// normal, or weights that do not sum to 1.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The geometry kernel reports an unrecoverable condition (e.g. all
    /// supporting planes parallel and coincident).
    #[error("geometry kernel failure: {0}")]
    GeometryFailure(String),
    /// The solver backend could not be constructed or invoked at all.
    #[error("solver backend unavailable: {0}")]
    SolverUnavailable(String),
    /// The solver backend ran but reported a hard error (not merely a time
    /// limit or gap).
    #[error("solver error: {0}")]
    SolverError(String),
}

pub type Result<T> = std::result::Result<T, PolyfitError>;
