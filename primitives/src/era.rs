///////////////////////////////////////////////////////////////////////////////
//
//  Copyright 2018-2026 Robonomics Network <research@robonomics.network>
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
//
///////////////////////////////////////////////////////////////////////////////
//! Transaction validity window.

use parity_scale_codec::{Decode, Encode, EncodeLike, Error, Input, Output};

/// Longest mortal period, in blocks.
pub const MAX_PERIOD: u64 = 1 << 16;

/// Shortest mortal period, in blocks.
pub const MIN_PERIOD: u64 = 4;

/// An era to describe the longevity of a transaction.
///
/// `Mortal(period, phase)` is valid for `period` blocks starting at the first
/// block whose number modulo `period` equals `phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Era {
    /// The transaction is valid forever.
    #[default]
    Immortal,
    /// Period and phase of the validity window.
    Mortal(u64, u64),
}

impl Era {
    /// Mortal era covering `period` blocks from `current`.
    ///
    /// The period is rounded up to a power of two within
    /// [`MIN_PERIOD`]..=[`MAX_PERIOD`] and the phase is quantized so the pair
    /// fits the two byte encoding.
    pub fn mortal(period: u64, current: u64) -> Self {
        let period = period
            .checked_next_power_of_two()
            .unwrap_or(MAX_PERIOD)
            .clamp(MIN_PERIOD, MAX_PERIOD);
        let phase = current % period;
        let quantize_factor = (period >> 12).max(1);
        let quantized_phase = phase / quantize_factor * quantize_factor;

        Era::Mortal(period, quantized_phase)
    }

    /// `true` for [`Era::Immortal`].
    pub fn is_immortal(&self) -> bool {
        matches!(self, Era::Immortal)
    }

    /// Whether the era survives an encode and decode unchanged.
    ///
    /// Holds for everything [`Era::mortal`] builds. A hand-built
    /// `Mortal(period, phase)` also needs a power of two period within
    /// [`MIN_PERIOD`]..=[`MAX_PERIOD`] and a phase below the period that is a
    /// multiple of the quantize factor.
    pub fn is_canonical(&self) -> bool {
        match *self {
            Era::Immortal => true,
            Era::Mortal(period, phase) => {
                let quantize_factor = (period >> 12).max(1);
                period.is_power_of_two()
                    && (MIN_PERIOD..=MAX_PERIOD).contains(&period)
                    && phase < period
                    && phase % quantize_factor == 0
            }
        }
    }

    /// First block at which a transaction built at `current` is valid.
    pub fn birth(&self, current: u64) -> u64 {
        match *self {
            Era::Immortal => 0,
            Era::Mortal(period, phase) => (current.max(phase) - phase) / period * period + phase,
        }
    }

    /// First block at which a transaction built at `current` is no longer valid.
    pub fn death(&self, current: u64) -> u64 {
        match *self {
            Era::Immortal => u64::MAX,
            Era::Mortal(period, _) => self.birth(current).saturating_add(period),
        }
    }
}

impl Encode for Era {
    fn size_hint(&self) -> usize {
        match self {
            Era::Immortal => 1,
            Era::Mortal(..) => 2,
        }
    }

    fn encode_to<T: Output + ?Sized>(&self, output: &mut T) {
        match *self {
            Era::Immortal => output.push_byte(0),
            Era::Mortal(period, phase) => {
                let quantize_factor = (period >> 12).max(1);
                let low = (period.trailing_zeros().saturating_sub(1)).clamp(1, 15) as u16;
                let high = ((phase / quantize_factor) << 4) as u16;
                (low | high).encode_to(output);
            }
        }
    }
}

impl EncodeLike for Era {}

impl Decode for Era {
    fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
        let first = input.read_byte()?;
        if first == 0 {
            return Ok(Era::Immortal);
        }
        let encoded = first as u64 + ((input.read_byte()? as u64) << 8);
        let period = 2u64 << (encoded % (1 << 4));
        let quantize_factor = (period >> 12).max(1);
        let phase = (encoded >> 4) * quantize_factor;
        if period >= MIN_PERIOD && phase < period {
            Ok(Era::Mortal(period, phase))
        } else {
            Err("Invalid period and phase".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_exact, CodecError};

    #[test]
    fn test_immortal_encoding() {
        assert_eq!(Era::Immortal.encode(), vec![0]);
        assert_eq!(decode_exact::<Era>(&[0]), Ok(Era::Immortal));
        assert!(Era::default().is_immortal());
    }

    #[test]
    fn test_mortal_small_period() {
        let era = Era::mortal(64, 42);
        assert_eq!(era, Era::Mortal(64, 42));
        assert_eq!(era.encode(), vec![0xa5, 0x02]);
        assert_eq!(decode_exact::<Era>(&[0xa5, 0x02]), Ok(era));
        assert_eq!(era.birth(42), 42);
        assert_eq!(era.death(42), 106);
        // Later blocks inside the window map back to the same birth.
        assert_eq!(era.birth(100), 42);
        assert_eq!(era.birth(106), 106);
    }

    #[test]
    fn test_mortal_quantized_phase() {
        let era = Era::mortal(32768, 20_000);
        assert_eq!(era, Era::Mortal(32768, 20_000));
        assert_eq!(era.encode(), vec![78, 156]);
        assert_eq!(decode_exact::<Era>(&[78, 156]), Ok(era));

        // Phase is rounded down to the quantize factor of 8.
        assert_eq!(Era::mortal(32768, 20_005), Era::Mortal(32768, 20_000));
    }

    #[test]
    fn test_period_rounding_and_clamping() {
        assert_eq!(Era::mortal(100, 0), Era::Mortal(128, 0));
        assert_eq!(Era::mortal(1, 3), Era::Mortal(4, 3));
        assert_eq!(Era::mortal(1 << 20, 5), Era::Mortal(MAX_PERIOD, 0));
        assert_eq!(Era::mortal(u64::MAX, 5), Era::Mortal(MAX_PERIOD, 0));
    }

    #[test]
    fn test_encoding_is_stable() {
        let era = Era::mortal(256, 1234);
        assert_eq!(era.encode(), era.encode());
        assert_eq!(Era::mortal(256, 1234), era);
    }

    #[test]
    fn test_canonical_eras() {
        assert!(Era::Immortal.is_canonical());
        assert!(Era::mortal(64, 42).is_canonical());
        assert!(Era::mortal(u64::MAX, u64::MAX).is_canonical());
        assert!(Era::Mortal(32768, 20_000).is_canonical());

        // Each of these encodes to bytes that decode to a different era.
        assert!(!Era::Mortal(100, 5).is_canonical());
        assert!(!Era::Mortal(64, 64).is_canonical());
        assert!(!Era::Mortal(2, 0).is_canonical());
        assert!(!Era::Mortal(1 << 17, 0).is_canonical());
        assert!(!Era::Mortal(32768, 20_005).is_canonical());
        let bytes = Era::Mortal(64, 100).encode();
        assert_ne!(decode_exact::<Era>(&bytes), Ok(Era::Mortal(64, 100)));
    }

    #[test]
    fn test_invalid_encodings() {
        // Period 2 is below the minimum.
        assert!(matches!(
            decode_exact::<Era>(&[0x10, 0x00]),
            Err(CodecError::Malformed { .. })
        ));
        assert!(matches!(
            decode_exact::<Era>(&[0x05]),
            Err(CodecError::Truncated { .. })
        ));
        assert_eq!(
            decode_exact::<Era>(&[0xa5, 0x02, 0x00]),
            Err(CodecError::TrailingBytes(1))
        );
    }
}
