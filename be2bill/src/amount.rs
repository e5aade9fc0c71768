//! Payment amounts.
//!
//! An [`Amount`] is either a [`SingleAmount`] charged immediately or a
//! [`FragmentedAmount`], a schedule of dated partial charges (N-time payment).
//! All values are expressed in cents.
//!
//! Operations that only accept immediate amounts take a [`SingleAmount`]
//! directly. When the amount kind is only known at runtime, convert with
//! [`SingleAmount::try_from`], which fails with
//! [`Be2billError::UnsupportedAmount`] for schedules.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;

use crate::{
    constants::param,
    error::{Be2billError, Result},
    params::{Params, Value},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Amount in cents, charged immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SingleAmount(pub i64);

impl SingleAmount {
    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SingleAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SingleAmount {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<SingleAmount> for Value {
    fn from(amount: SingleAmount) -> Self {
        Self::Integer(amount.0)
    }
}

/// Payment schedule: amounts in cents keyed by charge date.
///
/// Dates are unique; the schedule is rendered in chronological order as
/// `YYYY-MM-DD` keys.
///
/// # Examples
///
/// ```
/// use be2bill::amount::FragmentedAmount;
/// use chrono::NaiveDate;
///
/// let schedule = FragmentedAmount::new()
///     .with(NaiveDate::from_ymd_opt(2010, 5, 14).unwrap(), 15235)
///     .with(NaiveDate::from_ymd_opt(2012, 6, 4).unwrap(), 14723);
///
/// assert_eq!(schedule.len(), 2);
/// assert_eq!(schedule.total(), Some(29958));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentedAmount(BTreeMap<NaiveDate, i64>);

impl FragmentedAmount {
    /// Creates an empty schedule.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a dated charge and returns the schedule.
    #[must_use]
    pub fn with(mut self, date: NaiveDate, cents: i64) -> Self {
        self.insert(date, cents);
        self
    }

    /// Sets the charge for `date`, returning the previous amount for that date.
    pub fn insert(&mut self, date: NaiveDate, cents: i64) -> Option<i64> {
        self.0.insert(date, cents)
    }

    /// Builds a schedule from `YYYY-MM-DD` date strings.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::InvalidAmount`] if a date does not parse or
    /// appears twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::amount::FragmentedAmount;
    ///
    /// let schedule = FragmentedAmount::from_iso_dates([("2010-10-21", 2100), ("2010-11-21", 1120)])?;
    /// assert_eq!(schedule.total(), Some(3220));
    ///
    /// assert!(FragmentedAmount::from_iso_dates([("21/10/2010", 2100)]).is_err());
    /// # Ok::<(), be2bill::Be2billError>(())
    /// ```
    pub fn from_iso_dates<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut schedule = Self::new();
        for (raw_date, cents) in entries {
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
                Be2billError::InvalidAmount(format!("invalid schedule date '{raw_date}': {e}"))
            })?;
            if schedule.insert(date, cents).is_some() {
                return Err(Be2billError::InvalidAmount(format!(
                    "schedule date '{raw_date}' appears twice"
                )));
            }
        }
        Ok(schedule)
    }

    /// Number of scheduled charges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all scheduled charges, in cents.
    ///
    /// Returns `None` if the sum does not fit in an `i64`.
    #[must_use]
    pub fn total(&self) -> Option<i64> {
        self.0.values().try_fold(0_i64, |sum, &cents| sum.checked_add(cents))
    }

    /// Iterates over the charges in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &i64)> {
        self.0.iter()
    }

    /// Nested parameter map of `YYYY-MM-DD` keys to cents.
    #[must_use]
    pub fn to_params(&self) -> Params {
        self.0
            .iter()
            .map(|(date, cents)| (date.format(DATE_FORMAT).to_string(), *cents))
            .collect()
    }
}

impl FromIterator<(NaiveDate, i64)> for FragmentedAmount {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A payment amount: immediate or scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    /// One charge, due immediately.
    Single(SingleAmount),
    /// Several dated charges.
    Fragmented(FragmentedAmount),
}

impl Amount {
    /// Returns `true` for immediate amounts.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Parameter name carrying this amount: `AMOUNT` or `AMOUNTS`.
    #[must_use]
    pub const fn parameter_name(&self) -> &'static str {
        match self {
            Self::Single(_) => param::AMOUNT,
            Self::Fragmented(_) => param::AMOUNTS,
        }
    }

    /// Parameter value carrying this amount.
    ///
    /// A single amount hashes and encodes exactly like its decimal string;
    /// a schedule like the equivalent nested map of date strings.
    #[must_use]
    pub fn to_parameter_value(&self) -> Value {
        match self {
            Self::Single(amount) => Value::from(*amount),
            Self::Fragmented(schedule) => Value::Nested(schedule.to_params()),
        }
    }

    /// Writes the amount into `params` under [`Amount::parameter_name`].
    pub(crate) fn apply_to(&self, params: &mut Params) {
        params.insert(self.parameter_name(), self.to_parameter_value());
    }
}

impl From<SingleAmount> for Amount {
    fn from(amount: SingleAmount) -> Self {
        Self::Single(amount)
    }
}

impl From<FragmentedAmount> for Amount {
    fn from(schedule: FragmentedAmount) -> Self {
        Self::Fragmented(schedule)
    }
}

impl TryFrom<Amount> for SingleAmount {
    type Error = Be2billError;

    fn try_from(amount: Amount) -> Result<Self> {
        match amount {
            Amount::Single(single) => Ok(single),
            Amount::Fragmented(schedule) => Err(Be2billError::UnsupportedAmount(format!(
                "expected a single immediate amount, got a schedule of {} charges",
                schedule.len()
            ))),
        }
    }
}
