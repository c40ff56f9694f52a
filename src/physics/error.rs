//! Error types for body and joint construction.

use core::fmt;

/// Reasons a factory call on the physics world can refuse to build a body.
///
/// None of these are fatal: callers treat the feature as absent and carry on.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Width, height or radius is zero, negative or not finite.
    InvalidDimension,
    /// Position (or a derived simulation position) is not finite.
    InvalidPosition,
    /// A point in a chain or polygon is not finite.
    InvalidVertex { index: usize },
    /// Too few points survived minimum-separation filtering.
    InsufficientVertices { required: usize, found: usize },
    /// The shape backend rejected the geometry (e.g. collinear hull).
    DegenerateShape,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidDimension => write!(f, "dimensions must be positive and finite"),
            BuildError::InvalidPosition => write!(f, "position must be finite"),
            BuildError::InvalidVertex { index } => write!(f, "vertex {} is not finite", index),
            BuildError::InsufficientVertices { required, found } => write!(
                f,
                "need at least {} vertices after filtering, found {}",
                required, found
            ),
            BuildError::DegenerateShape => write!(f, "shape is degenerate"),
        }
    }
}

impl std::error::Error for BuildError {}
