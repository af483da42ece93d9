use crate::api::{ParameterSpec, ParameterType};
use crate::distribution::{Distribution, SearchSpace};
use crate::error::{Error, Result};

/// Build the search space from parameter specs, keeping declaration order.
///
/// Discrete parameters become categorical distributions over their literal
/// value list. A repeated name replaces the earlier entry.
///
/// # Errors
///
/// Returns `Error::UnsupportedParameterType` for an unknown kind and
/// `Error::MalformedNumericLiteral` when a bound or step does not parse.
pub fn build_search_space(parameters: &[ParameterSpec]) -> Result<SearchSpace> {
    let mut space = SearchSpace::new();
    for p in parameters {
        space.insert(p.name.clone(), to_distribution(p)?);
    }
    Ok(space)
}

fn to_distribution(p: &ParameterSpec) -> Result<Distribution> {
    let fs = &p.feasible_space;
    match p.parameter_type {
        ParameterType::Double => {
            let high = parse::<f64>(&p.name, "max", &fs.max)?;
            let low = parse::<f64>(&p.name, "min", &fs.min)?;
            if fs.step.is_empty() {
                Ok(Distribution::continuous(low, high))
            } else {
                let step = parse::<f64>(&p.name, "step", &fs.step)?;
                Ok(Distribution::stepped_continuous(low, high, step))
            }
        }
        ParameterType::Int => {
            let high = parse::<i64>(&p.name, "max", &fs.max)?;
            let low = parse::<i64>(&p.name, "min", &fs.min)?;
            if fs.step.is_empty() {
                Ok(Distribution::int(low, high))
            } else {
                let step = parse::<i64>(&p.name, "step", &fs.step)?;
                Ok(Distribution::stepped_int(low, high, step))
            }
        }
        ParameterType::Categorical | ParameterType::Discrete => {
            Ok(Distribution::categorical(fs.list.iter().cloned()))
        }
        ParameterType::UnknownType => Err(Error::UnsupportedParameterType {
            name: p.name.clone(),
            kind: format!("{:?}", p.parameter_type),
        }),
    }
}

fn parse<T>(name: &str, field: &str, text: &str) -> Result<T>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| Error::malformed_number(format!("{field} of '{name}'"), text, e))
}
