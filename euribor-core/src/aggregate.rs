//! Monthly averaging.
//!
//! The mean is taken over published days only: absent days neither count as
//! zero nor enlarge the divisor. Arithmetic is exact decimal; the result is
//! rounded to `PUBLISHED_SCALE` places with midpoint-away-from-zero, which is
//! round-half-up on the magnitude and keeps negative rates symmetric.

use crate::domain::{MonthRates, MonthlyAverage, Rate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of published averages (matches upstream daily fixings).
pub const PUBLISHED_SCALE: u32 = 3;

/// Average of a month's published rates; absent when nothing was published.
pub fn average(rates: &MonthRates) -> MonthlyAverage {
    MonthlyAverage {
        period: rates.period(),
        value: mean(rates.present().map(Rate::value)).map(Rate::from_decimal),
    }
}

/// Rounded arithmetic mean, or `None` for an empty input.
///
/// Always rendered with exactly `PUBLISHED_SCALE` fractional digits.
pub fn mean(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }

    let mut rounded = (sum / Decimal::from(count))
        .round_dp_with_strategy(PUBLISHED_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PUBLISHED_SCALE);
    // -0.000 would publish as a different string than 0.000
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Some(rounded)
}
