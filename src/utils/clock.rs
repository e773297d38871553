use chrono::{Local, NaiveDate, NaiveDateTime};

/// Represents an entity responsible for providing dates across application. Period selection and
/// date validation go through it so tests can pin "today".
pub trait Clock: Sync + Send + 'static {
    /// Current local wall-clock time.
    fn time(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.time().date()
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn time(&self) -> NaiveDateTime {
        self.0
    }
}
