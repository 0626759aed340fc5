use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::EngineError;

/// Same-day ordering key represented as **half steps**.
///
/// Entries created on the same calendar date are ordered by this key. Whole
/// values (`1`, `2`, `3`, …) are assigned to regular entries; the half slot
/// between a whole value and the next (`1.5`, `2.5`, …) is reserved for the
/// tax entry paired with the principal at the whole value, so the pair stays
/// adjacent no matter how many other entries share the date.
///
/// The value is stored as an `i64` counting half steps to keep the engine
/// free of floating point; it serializes as the decimal number callers
/// expect (`3` or `3.5`).
///
/// # Examples
///
/// ```rust
/// use engine::DaySequence;
///
/// let first = DaySequence::ZERO.next_whole();
/// assert_eq!(first.to_string(), "1");
/// assert_eq!(first.tax_slot().to_string(), "1.5");
/// assert_eq!(first.tax_slot().next_whole().to_string(), "2");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DaySequence(i64);

impl DaySequence {
    pub const ZERO: DaySequence = DaySequence(0);

    /// Creates a sequence from a raw half-step count (storage form).
    #[must_use]
    pub const fn from_raw(half_steps: i64) -> Self {
        Self(half_steps)
    }

    /// Creates a sequence at a whole slot.
    #[must_use]
    pub const fn from_whole(value: i64) -> Self {
        Self(value * 2)
    }

    /// Returns the raw half-step count (storage form).
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Returns the next whole slot after this one.
    ///
    /// Defined for both whole and tax slots: `3 -> 4` and `3.5 -> 4`.
    #[must_use]
    pub const fn next_whole(self) -> Self {
        Self((self.0.div_euclid(2) + 1) * 2)
    }

    /// Returns the tax slot immediately after this whole slot.
    #[must_use]
    pub const fn tax_slot(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns `true` if the sequence sits on a tax (half) slot.
    #[must_use]
    pub const fn is_tax_slot(self) -> bool {
        self.0 % 2 != 0
    }

    /// Returns the sequence as the decimal number used on the wire.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl fmt::Display for DaySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tax_slot() {
            write!(f, "{}.5", self.0.div_euclid(2))
        } else {
            write!(f, "{}", self.0 / 2)
        }
    }
}

impl Serialize for DaySequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for DaySequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        DaySequence::try_from(value).map_err(de::Error::custom)
    }
}

impl TryFrom<f64> for DaySequence {
    type Error = EngineError;

    /// Converts a decimal sequence into half steps.
    ///
    /// Rejects anything that is not a multiple of `0.5` (`3.25` has no slot).
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let scaled = value * 2.0;
        if !scaled.is_finite() || scaled.fract() != 0.0 {
            return Err(EngineError::Validation(format!(
                "invalid sequence value: {value}"
            )));
        }
        Ok(Self(scaled as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_whole_and_tax_slots() {
        assert_eq!(DaySequence::from_whole(1).to_string(), "1");
        assert_eq!(DaySequence::from_whole(3).tax_slot().to_string(), "3.5");
        assert_eq!(DaySequence::ZERO.to_string(), "0");
    }

    #[test]
    fn next_whole_skips_tax_slots() {
        let seq = DaySequence::from_whole(2);
        assert_eq!(seq.next_whole(), DaySequence::from_whole(3));
        assert_eq!(seq.tax_slot().next_whole(), DaySequence::from_whole(3));
    }

    #[test]
    fn tax_slot_is_half_step_after_principal() {
        let seq = DaySequence::from_whole(4);
        assert_eq!(seq.tax_slot().as_f64(), seq.as_f64() + 0.5);
        assert!(seq.tax_slot().is_tax_slot());
        assert!(!seq.is_tax_slot());
    }

    #[test]
    fn try_from_accepts_half_steps_only() {
        assert_eq!(
            DaySequence::try_from(3.5).unwrap(),
            DaySequence::from_whole(3).tax_slot()
        );
        assert_eq!(DaySequence::try_from(4.0).unwrap(), DaySequence::from_whole(4));
        assert!(DaySequence::try_from(3.25).is_err());
        assert!(DaySequence::try_from(f64::NAN).is_err());
    }
}
