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

use crate::{shamir::Point, Error};

use nom::{bytes::complete::take, IResult};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Piece of a secret which has been split with [Shamir Secret Sharing][sss].
///
/// A share is a point `(x, y)` on the dealer's secret polynomial. Shares
/// issued by [`Scheme::split_secret`](crate::Scheme::split_secret) have
/// `x` in `1..=n`. Two shares with the same `x` cannot be used together for
/// reconstruction.
///
/// [sss]: https://en.wikipedia.org/wiki/Shamir%27s_Secret_Sharing
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub(crate) x: BigUint,
    pub(crate) y: BigUint,
}

impl Share {
    pub fn new<X: Into<BigUint>, Y: Into<BigUint>>(x: X, y: Y) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// The x-coordinate (evaluation point) of this share.
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// The y-coordinate (polynomial value) of this share.
    pub fn y(&self) -> &BigUint {
        &self.y
    }

    pub(crate) fn to_point(&self) -> Point {
        (self.x.clone(), self.y.clone())
    }

    /// Number of bytes used for *each* coordinate of a share in the wire
    /// format, for a field of the given prime.
    pub fn wire_width(prime: &BigUint) -> usize {
        ((prime.bits() + 7) / 8) as usize
    }

    /// Encode the share as `x || y`, both big-endian and zero-padded to
    /// exactly [`Share::wire_width`] bytes.
    pub fn to_wire(&self, prime: &BigUint) -> Result<Vec<u8>, Error> {
        if &self.x >= prime || &self.y >= prime {
            return Err(Error::InvalidShare(
                "share coordinates must be smaller than the field prime",
            ));
        }

        let width = Self::wire_width(prime);
        let mut bytes = Vec::with_capacity(2 * width);
        for v in [&self.x, &self.y] {
            let v = v.to_bytes_be();
            bytes.resize(bytes.len() + width - v.len(), 0);
            bytes.extend_from_slice(&v);
        }
        Ok(bytes)
    }

    /// Convert a share to a multibase string (the text form handed out to
    /// share holders).
    pub fn to_wire_multibase(&self, base: multibase::Base, prime: &BigUint) -> Result<String, Error> {
        Ok(multibase::encode(base, self.to_wire(prime)?))
    }

    /// Parse one share from the front of `input`, returning the remaining
    /// bytes.
    ///
    /// Only the layout is checked here. Whether the coordinates are valid field
    /// elements is checked when the share is used by a [`Scheme`](crate::Scheme).
    pub fn from_wire_partial<'a>(input: &'a [u8], prime: &BigUint) -> Result<(&'a [u8], Self), Error> {
        fn parse(input: &[u8], width: usize) -> IResult<&[u8], Share> {
            let (input, x) = take(width)(input)?;
            let (input, y) = take(width)(input)?;

            Ok((
                input,
                Share {
                    x: BigUint::from_bytes_be(x),
                    y: BigUint::from_bytes_be(y),
                },
            ))
        }

        parse(input, Self::wire_width(prime)).map_err(|err| Error::ShareDecode(err.to_string()))
    }

    pub fn from_wire<B: AsRef<[u8]>>(input: B, prime: &BigUint) -> Result<Self, Error> {
        match Self::from_wire_partial(input.as_ref(), prime)? {
            ([], share) => Ok(share),
            _ => Err(Error::ShareDecode(
                "trailing bytes left after deserialisation".into(),
            )),
        }
    }

    /// Parse a multibase-encoded share.
    pub fn from_wire_multibase<S: AsRef<str>>(input: S, prime: &BigUint) -> Result<Self, Error> {
        let (_, data) = multibase::decode(input.as_ref().trim())
            .map_err(|err| Error::ShareDecode(err.to_string()))?;
        Self::from_wire(data, prime)
    }
}
