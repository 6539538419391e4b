use thiserror::Error;

/// Top-level error type for Voronoi construction and clipping.
#[derive(Debug, Error)]
pub enum VoronoiError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("invalid box: left={left}, bottom={bottom}, right={right}, top={top}")]
    InvalidBox {
        left: f64,
        bottom: f64,
        right: f64,
        top: f64,
    },
}

/// Errors related to the half-edge structure of a diagram.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("boundary of face {site} does not close within {steps} steps")]
    CycleNotClosed { site: usize, steps: usize },

    #[error("{count} edge(s) crossed the clipping box an unexpected number of times")]
    UnexpectedIntersections { count: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to diagram operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`VoronoiError`].
pub type Result<T, E = VoronoiError> = std::result::Result<T, E>;
