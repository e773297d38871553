use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

impl Percentage {
    /// [None] for negative or non-finite values.
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. || !value.is_finite() {
            None
        } else {
            Some(Percentage(value))
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// How far `value` is from `reference`, relative to `reference`. Returns [None] when the reference
/// can't be divided by.
pub fn deviation_percentage(value: f64, reference: f64) -> Option<Percentage> {
    if reference <= 0. || !reference.is_finite() {
        return None;
    }
    Percentage::new_opt((value - reference).abs() / reference * 100.)
}
