//! Parameter value storage types.

use core::fmt;

/// An externally reported parameter value.
///
/// This is the typed form of what crosses the service boundary as text.
/// Categorical (and discrete-choice) values keep the literal choice string.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A floating-point parameter value.
    Float(f64),
    /// An integer parameter value.
    Int(i64),
    /// A categorical parameter value, stored as the choice string.
    Categorical(String),
}

impl fmt::Display for ParamValue {
    /// Floats use the shortest text that round-trips, without exponent;
    /// integers use plain base-10 text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Categorical(v) => f.write_str(v),
        }
    }
}
