/*
 * primeshare: Shamir threshold secret sharing over prime fields
 * Copyright (C) 2024 The primeshare Authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

#![forbid(unsafe_code)]

//! An implementation of [Shamir's threshold secret sharing scheme][sss] over
//! a prime field `Z_p`.
//!
//! A secret `s` (with `0 <= s < p`) is split into `n` [`Share`]s such that any
//! `k` of them recover `s` exactly, while any `k-1` of them reveal nothing
//! about it.
//!
//! ```
//! use num_bigint::BigUint;
//! use primeshare_core::Scheme;
//!
//! let scheme = Scheme::with_prime(3, 5, BigUint::from(97u32)).unwrap();
//! let shares = scheme.split_secret(&BigUint::from(42u32)).unwrap();
//! let secret = scheme.reconstruct_secret(&shares[2..]).unwrap();
//! assert_eq!(secret, BigUint::from(42u32));
//! ```
//!
//! ## Security ##
//! **This implementation is not constant time.** Coefficients are generated
//! with the operating system CSPRNG unless the caller provides their own
//! generator, which must also be cryptographically secure.
//!
//! [sss]: https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use]
extern crate quickcheck_macros;

/// Prime field arithmetic and the polynomial engine.
#[cfg(not(feature = "donotuse_expose_internal_modules"))]
mod shamir;

// Expose the module so we can benchmark it with criterion. This feature is only enabled as a
// dev-dependency.
#[cfg(feature = "donotuse_expose_internal_modules")]
pub mod shamir;

mod scheme;
mod share;

pub use scheme::{Error, Scheme, DEFAULT_PRIME};
pub use share::Share;

/// Default multibase encoding used for the text form of a [`Share`].
pub const SHARE_MULTIBASE: multibase::Base = multibase::Base::Base32Z;
