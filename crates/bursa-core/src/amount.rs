//! Amount type: a signed decimal quantity paired with a commodity.
//!
//! The ledger language keeps the sign apart from the magnitude because not
//! every context requires one: ledger transactions are written with an
//! explicit `+` or `-`, while budget allocations may omit the sign
//! entirely. [`Amount::signed_value`] folds the two back together.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::intern::InternedStr;
use crate::span::Span;

/// The sign written in front of an amount, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    /// An explicit `+`.
    Positive,
    /// An explicit `-`.
    Negative,
    /// No sign was written.
    Unspecified,
}

impl Sign {
    /// Check whether a sign was written at all.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "+"),
            Self::Negative => write!(f, "-"),
            Self::Unspecified => Ok(()),
        }
    }
}

/// A parsed amount: sign, non-negative magnitude, and resolved commodity.
///
/// The commodity is the canonical code after alias resolution: an amount
/// written `+5 $` under `alias: $ = USD` carries commodity `USD`.
///
/// # Examples
///
/// ```
/// use bursa_core::{Amount, Position, Sign, Span};
/// use rust_decimal_macros::dec;
///
/// let span = Span::new(Position::new(1, 3), Position::new(1, 8));
/// let amount = Amount::new(Sign::Negative, dec!(6.5), "AAPL", span);
/// assert_eq!(amount.signed_value(), dec!(-6.5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// The written sign.
    pub sign: Sign,
    /// The magnitude; always non-negative.
    pub value: Decimal,
    /// The canonical commodity code, post alias resolution.
    pub commodity: InternedStr,
    /// Source range of the whole amount lexeme.
    pub span: Span,
}

impl Amount {
    /// Create a new amount.
    #[must_use]
    pub fn new(sign: Sign, value: Decimal, commodity: impl Into<InternedStr>, span: Span) -> Self {
        Self {
            sign,
            value,
            commodity: commodity.into(),
            span,
        }
    }

    /// The magnitude with the sign applied.
    ///
    /// An unspecified sign reads as positive.
    #[must_use]
    pub fn signed_value(&self) -> Decimal {
        match self.sign {
            Sign::Negative => -self.value,
            Sign::Positive | Sign::Unspecified => self.value,
        }
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.sign, self.value, self.commodity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;
    use rust_decimal_macros::dec;

    fn span() -> Span {
        Span::new(Position::new(1, 1), Position::new(1, 5))
    }

    #[test]
    fn test_signed_value() {
        let pos = Amount::new(Sign::Positive, dec!(5000), "USD", span());
        let neg = Amount::new(Sign::Negative, dec!(100), "USD", span());
        let unspecified = Amount::new(Sign::Unspecified, dec!(500), "USD", span());

        assert_eq!(pos.signed_value(), dec!(5000));
        assert_eq!(neg.signed_value(), dec!(-100));
        assert_eq!(unspecified.signed_value(), dec!(500));
    }

    #[test]
    fn test_sign_is_explicit() {
        assert!(Sign::Positive.is_explicit());
        assert!(Sign::Negative.is_explicit());
        assert!(!Sign::Unspecified.is_explicit());
    }

    #[test]
    fn test_display() {
        let amount = Amount::new(Sign::Negative, dec!(1000), "USD", span());
        assert_eq!(format!("{amount}"), "-1000 USD");

        let bare = Amount::new(Sign::Unspecified, dec!(500), "MYR", span());
        assert_eq!(format!("{bare}"), "500 MYR");
    }

    #[test]
    fn test_is_zero() {
        let zero = Amount::new(Sign::Unspecified, dec!(0), "USD", span());
        assert!(zero.is_zero());
    }
}
