//! Version gates for the vISA binary format.
//!
//! All version-conditional behavior lives here so that the readers never
//! compare `(major, minor)` pairs themselves.

use crate::error::{DecodeError, Result};
use crate::isa::EMask;

/// A `(major, minor)` vISA version pair, ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version byte from the container header.
    pub major: u8,
    /// Minor version byte from the container header.
    pub minor: u8,
}

impl Version {
    /// Builds a version pair, rejecting majors this decoder cannot handle.
    pub fn new(major: u8, minor: u8) -> Result<Version> {
        if major < 3 {
            return Err(DecodeError::UnsupportedVersion { major, minor });
        }
        Ok(Version { major, minor })
    }

    const fn at_least(self, major: u8, minor: u8) -> bool {
        self.major > major || (self.major == major && self.minor >= minor)
    }

    /// Variable/string indices widen from 2 to 4 bytes at 3.4.
    pub fn wide_indices(self) -> bool {
        self.at_least(3, 4)
    }

    /// The kernel input count widens from 1 to 4 bytes at 3.5.
    pub fn wide_input_count(self) -> bool {
        self.at_least(3, 5)
    }

    /// Routine names in the container header carry a 1-byte length before
    /// 3.7 and a 2-byte length from 3.7 on.
    pub fn wide_name_length(self) -> bool {
        self.at_least(3, 7)
    }

    /// WAIT carries an explicit mask operand from 3.1 on.
    pub fn wait_has_mask(self) -> bool {
        self.at_least(3, 1)
    }

    /// gather4_typed / scatter4_typed switched layouts at 3.2.
    pub fn typed_gather4_new_layout(self) -> bool {
        self.at_least(3, 2)
    }

    /// The sampler address-offset immediate became a full vector operand at 3.4.
    pub fn aoffimmi_is_vector(self) -> bool {
        self.at_least(3, 4)
    }

    /// raw_sends gained its ffid byte after 3.5 (strictly greater).
    pub fn raw_sends_has_ffid(self) -> bool {
        self.major > 3 || (self.major == 3 && self.minor > 5)
    }

    /// sample_3d and friends gained a paired-surface operand at 3.8.
    pub fn has_paired_surface(self) -> bool {
        self.at_least(3, 8)
    }

    /// The 3D-sampler sub-opcode widened from 1 to 2 bytes at major 4.
    pub fn wide_sampler_sub_opcode(self) -> bool {
        self.major >= 4
    }

    /// Maps an execution-mask nibble to [`EMask`].
    ///
    /// Version 3.0 used a legacy encoding in which 8 meant "no mask" and the
    /// remaining values were a permutation of the quarter controls; every
    /// later version stores the [`EMask`] value directly.
    pub fn decode_emask(self, raw: u8, offset: usize) -> Result<EMask> {
        if self.major == 3 && self.minor == 0 {
            let mask = match raw {
                0 => EMask::M1,
                1 => EMask::M2,
                2 => EMask::M3,
                3 => EMask::M4,
                4 => EMask::M5,
                5 => EMask::M6,
                6 => EMask::M7,
                7 => EMask::M8,
                8 => EMask::M1Nm,
                9 => EMask::M1,
                _ => {
                    return Err(DecodeError::InvalidEncoding {
                        what: "3.0 execution mask",
                        value: u32::from(raw),
                        offset,
                    })
                }
            };
            Ok(mask)
        } else {
            EMask::from_u8(raw, offset)
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
