//! Conversion between internal (sampler) and external (caller) values.
//!
//! Samplers only ever see `f64`. Ranges map to themselves (integers are
//! widened), categorical values map to their 0-based position in the
//! declared choice list.

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamValue;

/// Parse the textual form of an external value for `distribution`.
///
/// # Errors
///
/// Returns `Error::MalformedNumericLiteral` when a range value does not parse
/// and `Error::InvalidCategoricalAssignment` when a categorical value is not
/// a declared choice.
pub fn parse_external(name: &str, distribution: &Distribution, text: &str) -> Result<ParamValue> {
    match distribution {
        Distribution::Continuous(_) | Distribution::SteppedContinuous(_) => text
            .parse::<f64>()
            .map(ParamValue::Float)
            .map_err(|e| Error::malformed_number(format!("value of '{name}'"), text, e)),
        Distribution::Int(_) | Distribution::SteppedInt(_) => text
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|e| Error::malformed_number(format!("value of '{name}'"), text, e)),
        Distribution::Categorical(d) => {
            if d.choices.iter().any(|c| c == text) {
                Ok(ParamValue::Categorical(text.to_owned()))
            } else {
                Err(Error::InvalidCategoricalAssignment {
                    value: text.to_owned(),
                    choices: d.choices.clone(),
                })
            }
        }
    }
}

/// Encode an external value into its internal representation.
///
/// # Errors
///
/// Returns `Error::InvalidCategoricalAssignment` when a categorical value is
/// not a declared choice, and `Error::Internal` when the value kind does not
/// match the distribution kind.
#[allow(clippy::cast_precision_loss)]
pub fn encode(distribution: &Distribution, value: &ParamValue) -> Result<f64> {
    match (distribution, value) {
        (
            Distribution::Continuous(_) | Distribution::SteppedContinuous(_),
            ParamValue::Float(v),
        ) => Ok(*v),
        (Distribution::Int(_) | Distribution::SteppedInt(_), ParamValue::Int(v)) => Ok(*v as f64),
        (Distribution::Categorical(d), ParamValue::Categorical(v)) => d
            .choices
            .iter()
            .position(|c| c == v)
            .map(|i| i as f64)
            .ok_or_else(|| Error::InvalidCategoricalAssignment {
                value: v.clone(),
                choices: d.choices.clone(),
            }),
        _ => Err(Error::Internal(
            "parameter value kind does not match its distribution",
        )),
    }
}

/// Decode an internal value back into the external representation.
///
/// Integers are rounded to the nearest whole number; categorical values
/// are looked up by index.
///
/// # Errors
///
/// Returns `Error::CategoricalIndexOutOfRange` when a categorical index has
/// no matching choice, and `Error::Internal` for non-finite range values.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn decode(distribution: &Distribution, internal: f64) -> Result<ParamValue> {
    if !internal.is_finite() {
        return Err(Error::Internal("sampler produced a non-finite value"));
    }
    match distribution {
        Distribution::Continuous(_) | Distribution::SteppedContinuous(_) => {
            Ok(ParamValue::Float(internal))
        }
        Distribution::Int(_) | Distribution::SteppedInt(_) => {
            Ok(ParamValue::Int(internal.round() as i64))
        }
        Distribution::Categorical(d) => {
            let index = internal.round();
            if index < 0.0 || index >= d.choices.len() as f64 {
                return Err(Error::CategoricalIndexOutOfRange {
                    index: internal,
                    n_choices: d.choices.len(),
                });
            }
            Ok(ParamValue::Categorical(d.choices[index as usize].clone()))
        }
    }
}

/// Parse and encode in one step, returning `(internal, external)`.
///
/// # Errors
///
/// See [`parse_external`].
pub fn to_internal_repr(
    name: &str,
    distribution: &Distribution,
    text: &str,
) -> Result<(f64, ParamValue)> {
    let external = parse_external(name, distribution, text)?;
    let internal = encode(distribution, &external)?;
    Ok((internal, external))
}
