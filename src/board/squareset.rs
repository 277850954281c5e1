/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign},
};

use super::Square;

/// An unordered set of [`Square`]s, stored as one bit per square.
///
/// Bit `n` is the square with row-major index `n`, so bit 0 is `a8` and bit 63 is `h1`.
/// Move generation returns one of these; iteration yields squares in row-major order,
/// but the order carries no meaning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct SquareSet(u64);

impl SquareSet {
    /// A set containing no squares.
    pub const EMPTY: Self = Self(0);

    /// A set containing every square.
    pub const FULL: Self = Self(u64::MAX);

    /// Constructs a new, empty [`SquareSet`].
    #[inline(always)]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Constructs a [`SquareSet`] holding only `square`.
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Adds `square` to the set. Returns `true` if it was not already present.
    #[inline(always)]
    pub fn insert(&mut self, square: Square) -> bool {
        let fresh = !self.contains(square);
        self.0 |= Self::from_square(square).0;
        fresh
    }

    /// Removes `square` from the set. Returns `true` if it was present.
    #[inline(always)]
    pub fn remove(&mut self, square: Square) -> bool {
        let present = self.contains(square);
        self.0 &= !Self::from_square(square).0;
        present
    }

    /// Returns `true` if `square` is in the set.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Square, SquareSet};
    /// let e4 = Square::from_uci("e4").unwrap();
    /// let set = SquareSet::from_square(e4);
    /// assert!(set.contains(e4));
    /// assert!(!set.contains(Square::from_uci("e5").unwrap()));
    /// ```
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1 << square.index()) != 0
    }

    /// Number of squares in the set.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the set holds no squares.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Removes every square from the set.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Removes and returns the square with the lowest index, if any.
    #[inline(always)]
    pub fn pop_first(&mut self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }

        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(Square::from_index_unchecked(index))
    }

    /// An iterator over the squares in this set.
    #[inline(always)]
    pub const fn iter(&self) -> SquareSetIter {
        SquareSetIter { set: *self }
    }
}

impl From<Square> for SquareSet {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |set, sq| set | sq)
    }
}

impl Extend<Square> for SquareSet {
    fn extend<T: IntoIterator<Item = Square>>(&mut self, iter: T) {
        for square in iter {
            self.insert(square);
        }
    }
}

impl<T: Into<SquareSet>> BitOr<T> for SquareSet {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: T) -> Self::Output {
        Self(self.0 | rhs.into().0)
    }
}

impl<T: Into<SquareSet>> BitOrAssign<T> for SquareSet {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: T) {
        self.0 |= rhs.into().0;
    }
}

impl<T: Into<SquareSet>> BitAnd<T> for SquareSet {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: T) -> Self::Output {
        Self(self.0 & rhs.into().0)
    }
}

impl<T: Into<SquareSet>> BitAndAssign<T> for SquareSet {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: T) {
        self.0 &= rhs.into().0;
    }
}

/// An iterator over all squares in a [`SquareSet`].
///
/// See [`SquareSet::iter`].
pub struct SquareSetIter {
    set: SquareSet,
}

impl Iterator for SquareSetIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.set.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.set.len();
        (size, Some(size))
    }
}

impl ExactSizeIterator for SquareSetIter {}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        SquareSetIter { set: self }
    }
}

impl IntoIterator for &SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        SquareSetIter { set: *self }
    }
}

impl fmt::Display for SquareSet {
    /// Lists the squares in the set as comma-separated coordinates, or `(none)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }

        let squares = self.iter().map(|sq| sq.to_uci()).collect::<Vec<_>>();
        write!(f, "{}", squares.join(", "))
    }
}

impl fmt::Debug for SquareSet {
    /// Draws the set as an `8x8` grid, `X` for members.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for row in 0..Square::SIDE {
            board += &format!("{}| ", Square::SIDE - row);

            for col in 0..Square::SIDE {
                let square = Square::new_unchecked(row, col);
                let occupant = if self.contains(square) { 'X' } else { '.' };

                board += &format!("{occupant} ");
            }
            board += "\n";
        }
        board += " +";
        for _ in 0..Square::SIDE {
            board += "--";
        }
        board += "\n   a b c d e f g h ";

        write!(f, "{board}")
    }
}
