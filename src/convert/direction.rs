use crate::api::ObjectiveType;
use crate::error::{Error, Result};
use crate::types::Direction;

/// Map an objective type onto an optimization direction.
///
/// # Errors
///
/// Returns `Error::UnsupportedObjectiveType` for anything other than
/// minimize or maximize.
pub fn to_direction(objective_type: ObjectiveType) -> Result<Direction> {
    match objective_type {
        ObjectiveType::Minimize => Ok(Direction::Minimize),
        ObjectiveType::Maximize => Ok(Direction::Maximize),
        ObjectiveType::Unknown => Err(Error::UnsupportedObjectiveType(format!(
            "{objective_type:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(
            to_direction(ObjectiveType::Minimize).unwrap(),
            Direction::Minimize
        );
        assert_eq!(
            to_direction(ObjectiveType::Maximize).unwrap(),
            Direction::Maximize
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = to_direction(ObjectiveType::Unknown).unwrap_err();
        assert!(matches!(err, Error::UnsupportedObjectiveType(_)));
        assert_eq!(err.code(), "UnsupportedObjectiveType");
    }
}
