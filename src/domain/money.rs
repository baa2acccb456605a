use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A signed monetary value.
///
/// This is a wrapper around `rust_decimal::Decimal` so that amounts, shares and
/// balances never go through binary floating point. Serialized as a decimal
/// string to keep stored documents lossless.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Digits left of the decimal point, ignoring sign. Zero for `|x| < 1`.
    pub fn integer_digits(&self) -> u32 {
        let mantissa = self.0.mantissa().unsigned_abs();
        if mantissa == 0 {
            return 0;
        }
        (mantissa.ilog10() + 1).saturating_sub(self.0.scale())
    }

    /// Decimal places actually used, after dropping trailing zeros.
    pub fn fraction_digits(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Splits into `parts` equal shares truncated to `scale` decimal places.
    ///
    /// Returns `(share, residual)` with `share * parts + residual == self`
    /// exactly. `parts` must be non-zero.
    pub fn split(self, parts: usize, scale: u32) -> (Self, Self) {
        debug_assert!(parts > 0);
        let count = Decimal::from(parts);
        let share = (self.0 / count).round_dp_with_strategy(scale, RoundingStrategy::ToZero);
        let residual = self.0 - share * count;
        (Self(share), Self(residual))
    }

    /// Rounds to `scale` decimal places, midpoint away from zero.
    ///
    /// Only meant for presentation; the engine never rounds its accumulators.
    pub fn round_dp(&self, scale: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Significant digits a `Decimal` holds without rounding.
pub const DECIMAL_DIGITS: u32 = 28;

/// Decimal places kept for shares under [`SplitRule::Precise`], as long as
/// the trip total leaves room for them.
pub const PRECISE_SCALE: u32 = 16;

/// How a single expense amount is divided into equal shares.
///
/// Shares are truncated toward zero and the payer absorbs the residual, so
/// every share and total stays an exact decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitRule {
    /// Shares carried to [`PRECISE_SCALE`] decimal places, or fewer for very
    /// large trips.
    #[default]
    Precise,
    /// Shares truncated to the given number of decimal places, e.g.
    /// `MinorUnits(2)` for cents.
    MinorUnits(u32),
}

impl SplitRule {
    pub fn scale(&self) -> u32 {
        match self {
            SplitRule::Precise => PRECISE_SCALE,
            SplitRule::MinorUnits(scale) => *scale,
        }
    }

    /// Share scale for a trip whose amounts add up to `total`.
    ///
    /// Every accumulator is bounded by `total`, so capping integer plus
    /// fraction digits at [`DECIMAL_DIGITS`] keeps all sums exact.
    pub fn scale_for(&self, total: Money) -> u32 {
        self.scale()
            .min(DECIMAL_DIGITS.saturating_sub(total.integer_digits()))
    }
}
