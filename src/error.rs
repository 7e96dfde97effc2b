use thiserror::Error;

/// Top-level error type for the navmesh optimizer.
#[derive(Debug, Error)]
pub enum NavoptError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Record(#[from] serde_json::Error),

    /// Raised at a cancellation checkpoint. [`crate::operations::Bake`] turns
    /// this into [`crate::operations::BakeOutcome::Canceled`].
    #[error("bake canceled")]
    Canceled,
}

impl NavoptError {
    /// Returns `true` if this is the cooperative cancellation signal.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Precondition violations in caller-supplied data or parameters.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("index count {len} is not a multiple of 3")]
    IndexCountNotTriangles { len: usize },

    #[error("index {index} at position {position} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        index: i64,
        position: usize,
        vertex_count: usize,
    },

    #[error("vertex array is empty but a seed point was supplied")]
    EmptyVertices,

    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("seed point has a non-finite coordinate")]
    NonFiniteSeed,

    #[error("coordinate columns differ in length: x = {x}, y = {y}, z = {z}")]
    ColumnLengthMismatch { x: usize, y: usize, z: usize },

    #[error("{tags} triangle tags supplied for {triangles} triangles")]
    TagCountMismatch { tags: usize, triangles: usize },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParams {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

/// Convenience type alias for results using [`NavoptError`].
pub type Result<T> = std::result::Result<T, NavoptError>;
