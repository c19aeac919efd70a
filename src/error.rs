//! Scene error types.
//!
//! Geometry import and configuration validation return these instead of
//! panicking, so one malformed glyph never takes the whole scene down.

use std::fmt;

/// Top-level error enum for the glyph scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// SVG path data could not be parsed.
    PathParse {
        /// Identifier of the offending outline.
        id: String,
        /// Parser message.
        message: String,
    },

    /// An outline has too few distinct points to enclose any area.
    DegenerateOutline {
        /// Identifier of the offending outline.
        id: String,
        /// Distinct points left after sampling.
        vertex_count: usize,
    },

    /// The decomposer produced no usable convex piece.
    Decomposition {
        /// Identifier of the offending outline.
        id: String,
        /// Human-readable description of what went wrong.
        reason: String,
    },

    /// A colour string is not a valid hex colour.
    InvalidColor {
        /// The rejected string.
        value: String,
    },

    /// A configuration value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the value (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::PathParse { id, message } => {
                write!(f, "outline '{}': invalid path data: {}", id, message)
            }
            SceneError::DegenerateOutline { id, vertex_count } => write!(
                f,
                "outline '{}': only {} distinct points (need at least 3)",
                id, vertex_count
            ),
            SceneError::Decomposition { id, reason } => {
                write!(f, "outline '{}': decomposition failed: {}", id, reason)
            }
            SceneError::InvalidColor { value } => write!(f, "invalid colour '{}'", value),
            SceneError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SceneError {}

/// Convenience alias: a `Result` using `SceneError` as the error type.
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_outline() {
        let err = SceneError::DegenerateOutline {
            id: "matter-path".into(),
            vertex_count: 2,
        };
        let text = err.to_string();
        assert!(text.contains("matter-path"), "got: {text}");
        assert!(text.contains('2'), "got: {text}");
    }
}
