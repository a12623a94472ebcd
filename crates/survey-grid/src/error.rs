//! Error type for survey-grid operations.
//!
//! ## Rust Lesson #10: Result<T, E> instead of exceptions
//!
//! JS throws and hopes someone catches. Rust returns `Result<T, E>`, and
//! the `?` operator passes an `Err` up to the caller. `thiserror` writes
//! the `Display` and `From` impls for us from the attributes below.

/// Everything that can go wrong editing or exporting a survey polygon.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// Removing another vertex would leave fewer than three.
    #[error("a survey polygon needs at least {min} vertices", min = crate::geometry::MIN_RING_VERTICES)]
    MinimumVertices,

    /// The ring is too small for the requested edit.
    #[error("polygon has only {len} vertices")]
    TooFewVertices { len: usize },

    #[error("vertex index {index} out of range for {len} vertices")]
    VertexIndexOutOfRange { index: usize, len: usize },

    /// The KML writer could not write to its sink.
    #[error("KML writer error: {0}")]
    Xml(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
