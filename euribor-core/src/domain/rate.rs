//! Published rates and the per-month series they are grouped into.

use super::period::YearMonth;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateParseError {
    #[error("empty rate")]
    Empty,

    #[error("not a decimal rate: '{0}'")]
    NotDecimal(String),
}

/// A published decimal rate.
///
/// Keeps the text exactly as published (trimmed, `%` stripped) next to its
/// exact decimal value. Equality is on the text, since the text is what
/// lands in the file tree.
#[derive(Debug, Clone)]
pub struct Rate {
    text: String,
    value: Decimal,
}

impl Rate {
    pub fn parse(raw: &str) -> Result<Self, RateParseError> {
        let text = raw.trim().trim_end_matches('%').trim_end();
        if text.is_empty() {
            return Err(RateParseError::Empty);
        }
        let value =
            Decimal::from_str(text).map_err(|_| RateParseError::NotDecimal(raw.to_string()))?;
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Decimal {
        self.value
    }
}

impl PartialEq for Rate {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Rate {}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One calendar day and its rate, if one was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRate {
    pub day: u32,
    pub value: Option<Rate>,
}

impl DailyRate {
    /// Zero-padded day key (`"01"`..`"31"`).
    pub fn key(&self) -> String {
        format!("{:02}", self.day)
    }
}

/// Every calendar day of one month, ascending, exactly `days_in_month` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRates {
    period: YearMonth,
    days: Vec<DailyRate>,
}

impl MonthRates {
    /// A month with no published rates.
    pub fn empty(period: YearMonth) -> Self {
        let days = (1..=period.days_in_month())
            .map(|day| DailyRate { day, value: None })
            .collect();
        Self { period, days }
    }

    /// Build from per-day slots; `slots[0]` is day 1.
    ///
    /// Slots beyond the month are dropped and missing trailing slots are
    /// absent, so the result always covers the whole calendar month.
    pub fn from_slots(period: YearMonth, slots: Vec<Option<Rate>>) -> Self {
        let mut month = Self::empty(period);
        for (daily, value) in month.days.iter_mut().zip(slots) {
            daily.value = value;
        }
        month
    }

    pub fn period(&self) -> YearMonth {
        self.period
    }

    pub fn days(&self) -> &[DailyRate] {
        &self.days
    }

    pub fn get(&self, day: u32) -> Option<&Rate> {
        let index = usize::try_from(day.checked_sub(1)?).ok()?;
        self.days.get(index)?.value.as_ref()
    }

    /// Rates that were actually published, in day order.
    pub fn present(&self) -> impl Iterator<Item = &Rate> + '_ {
        self.days.iter().filter_map(|d| d.value.as_ref())
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }
}

/// Arithmetic mean of a month's published rates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyAverage {
    pub period: YearMonth,
    pub value: Option<Rate>,
}
