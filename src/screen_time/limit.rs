use std::{fmt::Display, ops::Deref, str::FromStr};

use thiserror::Error;

/// Used when neither the server nor the config provide a limit.
pub const DEFAULT_LIMIT_HOURS: f64 = 7.;

#[derive(Debug, Error, PartialEq)]
pub enum LimitError {
    #[error("Screen time limit must be a non-negative number of hours, got {0}")]
    Invalid(f64),
    #[error("Can't parse {0:?} into a number of hours")]
    Unparsable(String),
}

/// Daily screen-time threshold in hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Limit(f64);

impl Limit {
    pub fn new(hours: f64) -> Result<Self, LimitError> {
        if hours < 0. || !hours.is_finite() {
            return Err(LimitError::Invalid(hours));
        }
        Ok(Self(hours))
    }

    /// A zero limit can't be compared against.
    pub fn is_set(&self) -> bool {
        self.0 > 0.
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT_HOURS)
    }
}

impl Deref for Limit {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.0)
    }
}

impl FromStr for Limit {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches('h');
        let v = s
            .parse::<f64>()
            .map_err(|_| LimitError::Unparsable(s.to_string()))?;
        Limit::new(v)
    }
}

#[cfg(test)]
mod tests {
    use super::{Limit, LimitError};

    #[test]
    fn parses_hours() {
        assert_eq!(*"6.5".parse::<Limit>().unwrap(), 6.5);
        assert_eq!(*"3h".parse::<Limit>().unwrap(), 3.);
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert_eq!("-2".parse::<Limit>(), Err(LimitError::Invalid(-2.)));
        assert!(matches!("lots".parse::<Limit>(), Err(LimitError::Unparsable(_))));
        assert!(Limit::new(f64::INFINITY).is_err());
    }

    #[test]
    fn zero_is_valid_but_not_set() {
        let limit = Limit::new(0.).unwrap();
        assert!(!limit.is_set());
        assert!(Limit::default().is_set());
    }
}
