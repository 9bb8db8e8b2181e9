// MaxIO
// Copyright 2026 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Building blocks for per-chip register maps.

use crate::{Error, Result};
use std::fmt;

/// A register in a chip's register map.
///
/// Implementations are expected to be fieldless enums whose discriminants are the register
/// indices, with `ALL` listing every variant.  `ALL` is the only source of truth to validate raw
/// indices coming from outside the crate.
pub trait Register: Copy + Eq + fmt::Debug + 'static {
    /// All registers of the chip in index order.
    const ALL: &'static [Self];

    /// Returns the index of the register as sent in the control byte.
    fn index(self) -> u8;

    /// Looks up the register with the given `index`.
    fn from_index(index: u8) -> Result<Self> {
        Self::ALL.iter().copied().find(|r| r.index() == index).ok_or(Error::InvalidRegister(index))
    }
}

/// Defines a bitmask newtype over a register value with a set of named bits.
///
/// The generated type supports the usual bitwise operators and conversions from and into `u8`.
#[macro_export]
macro_rules! bitmask {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$bit_meta:meta])*
                const $bit:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
        pub struct $name(pub u8);

        impl $name {
            $(
                $(#[$bit_meta])*
                pub const $bit: $name = $name($value);
            )*

            /// Returns a value with no bits set.
            pub const fn empty() -> Self {
                $name(0)
            }

            /// Returns the raw register value.
            pub const fn bits(self) -> u8 {
                self.0
            }

            /// Returns true if no bits are set.
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Returns true if all bits in `other` are set in `self`.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Returns true if any bit in `other` is set in `self`.
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                $name(self.0 | rhs.0)
            }
        }

        impl ::std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl ::std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                $name(self.0 & rhs.0)
            }
        }

        impl ::std::ops::Not for $name {
            type Output = Self;

            fn not(self) -> Self {
                $name(!self.0)
            }
        }

        impl ::std::convert::From<u8> for $name {
            fn from(bits: u8) -> Self {
                $name(bits)
            }
        }

        impl ::std::convert::From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.0
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({:#010b})", stringify!($name), self.0)
            }
        }
    };
}
