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

//! This module implements the arithmetic underneath the secret sharing scheme:
//! modular arithmetic in `Z_p` for a prime `p` held as a big integer, and
//! random polynomials over that field (Horner evaluation and Lagrange
//! interpolation).
//!
//! Field elements are plain [`BigUint`](num_bigint::BigUint) residues and every
//! operation takes the modulus explicitly, since `p` is only known at runtime.

pub mod field;
pub mod polynomial;
pub mod prime;

pub use polynomial::{Point, Polynomial};

use num_bigint::BigUint;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("division error: {0} has no inverse modulo the field prime")]
    NonInvertible(BigUint),
}
