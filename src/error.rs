use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid parameter: {name} = {value} ({expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("action {action} is out of range for {num_actions} actions")]
    ActionOutOfRange { action: usize, num_actions: usize },

    #[error("cannot select an action from an empty value vector")]
    EmptyValues,

    #[error("agent used before being initialized and reset")]
    NotInitialized,

    #[error("no agent registered in slot {slot} ({agents} agents)")]
    UnknownAgent { slot: usize, agents: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::InvalidParameter`] when `value` is negative (or NaN).
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            expected: "expected >= 0",
        })
    }
}

pub(crate) fn check_action(action: usize, num_actions: usize) -> Result<usize> {
    if action < num_actions {
        Ok(action)
    } else {
        Err(Error::ActionOutOfRange {
            action,
            num_actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_are_rejected() {
        assert_eq!(non_negative("alpha", 0.0), Ok(0.0));
        assert!(matches!(
            non_negative("alpha", -0.1),
            Err(Error::InvalidParameter { name: "alpha", .. })
        ));
        assert!(non_negative("gamma", f64::NAN).is_err());
    }

    #[test]
    fn action_range_is_half_open() {
        assert_eq!(check_action(2, 3), Ok(2));
        assert_eq!(
            check_action(3, 3),
            Err(Error::ActionOutOfRange {
                action: 3,
                num_actions: 3
            })
        );
    }
}
