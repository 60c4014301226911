//! Mixed-radix packing of per-dimension bin indices into one state index

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::StateIndex};

/// Uniform-base positional encoding, digit 0 least significant.
///
/// `encode(&[d0, d1, ..]) = d0 + d1 * base + d2 * base^2 + ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedRadix {
    base: usize,
    digits: usize,
    capacity: usize,
}

impl MixedRadix {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `base < 2`, `digits == 0`,
    /// or `base^digits` does not fit in a `usize`.
    pub fn new(base: usize, digits: usize) -> Result<Self> {
        if base < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("radix base must be at least 2, got {base}"),
            });
        }
        if digits == 0 {
            return Err(Error::InvalidConfiguration {
                message: "at least one observation dimension is required".to_string(),
            });
        }
        let capacity = u32::try_from(digits)
            .ok()
            .and_then(|exp| base.checked_pow(exp))
            .ok_or_else(|| Error::InvalidConfiguration {
                message: format!("state space {base}^{digits} overflows usize"),
            })?;

        Ok(Self {
            base,
            digits,
            capacity,
        })
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Number of distinct encodable values, `base^digits`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pack digits (least significant first). Callers guarantee
    /// `digits.len() == self.digits()` and every digit `< base`.
    pub fn encode(&self, digits: &[usize]) -> StateIndex {
        debug_assert_eq!(digits.len(), self.digits);
        debug_assert!(digits.iter().all(|&d| d < self.base));
        digits
            .iter()
            .rev()
            .fold(0, |acc, &digit| acc * self.base + digit)
    }

    /// Unpack a value into its digits by repeated division.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] if `value >= capacity()`.
    pub fn decode(&self, value: StateIndex) -> Result<Vec<usize>> {
        if value >= self.capacity {
            return Err(Error::StateOutOfRange {
                state: value,
                n_states: self.capacity,
            });
        }
        let mut rest = value;
        let digits = (0..self.digits)
            .map(|_| {
                let digit = rest % self.base;
                rest /= self.base;
                digit
            })
            .collect();
        Ok(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_dimension_zero_is_least_significant() {
        let radix = MixedRadix::new(10, 4).unwrap();
        assert_eq!(radix.encode(&[1, 2, 3, 4]), 4321);
        assert_eq!(radix.decode(4321).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_capacity() {
        assert_eq!(MixedRadix::new(10, 4).unwrap().capacity(), 10_000);
        assert_eq!(MixedRadix::new(6, 1).unwrap().capacity(), 6);
    }

    #[test]
    fn test_every_value_round_trips() {
        let radix = MixedRadix::new(3, 3).unwrap();
        for value in 0..radix.capacity() {
            let digits = radix.decode(value).unwrap();
            assert!(digits.iter().all(|&d| d < 3));
            assert_eq!(radix.encode(&digits), value);
        }
    }

    #[test]
    fn test_decode_out_of_range() {
        let radix = MixedRadix::new(4, 2).unwrap();
        assert!(matches!(
            radix.decode(16),
            Err(Error::StateOutOfRange {
                state: 16,
                n_states: 16
            })
        ));
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(MixedRadix::new(1, 3).is_err());
        assert!(MixedRadix::new(10, 0).is_err());
        assert!(MixedRadix::new(usize::MAX, 2).is_err());
    }
}
