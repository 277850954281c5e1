/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

/// Represents a single square on an `8x8` chess board, as a `(row, col)` pair.
///
/// Rows are counted from the top of the board as seen by White:
/// ```text
/// 0| a8 b8 c8 d8 e8 f8 g8 h8   <- Black's back rank
/// 1| a7 b7 c7 d7 e7 f7 g7 h7
/// 2| a6 b6 c6 d6 e6 f6 g6 h6
/// 3| a5 b5 c5 d5 e5 f5 g5 h5
/// 4| a4 b4 c4 d4 e4 f4 g4 h4
/// 5| a3 b3 c3 d3 e3 f3 g3 h3
/// 6| a2 b2 c2 d2 e2 f2 g2 h2
/// 7| a1 b1 c1 d1 e1 f1 g1 h1   <- White's back rank
///  +------------------------
///    0  1  2  3  4  5  6  7
/// ```
///
/// So `rank = 8 - row` and `file = 'a' + col`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Number of rows (and columns) on the board.
    pub const SIDE: u8 = 8;

    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a new [`Square`] at `(row, col)`, or `None` if either coordinate is out of bounds.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Square;
    /// assert!(Square::new(6, 4).is_some());
    /// assert!(Square::new(8, 0).is_none());
    /// ```
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < Self::SIDE && col < Self::SIDE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Creates a new [`Square`] at `(row, col)` without bounds checking.
    ///
    /// # Panics
    /// If `row` or `col` is not in `[0, 8)` and debug assertions are enabled.
    #[inline(always)]
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(
            row < Self::SIDE && col < Self::SIDE,
            "Row and column must be between [0,8)"
        );
        Self { row, col }
    }

    /// Creates a new [`Square`] from its row-major index, in `[0, 64)`.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Square;
    /// let e2 = Square::from_index(52).unwrap();
    /// assert_eq!(e2.to_string(), "e2");
    /// ```
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= Self::COUNT {
            bail!(
                "Invalid index for Square: Must be between [0, {}). Got {index}",
                Self::COUNT
            );
        }
        Ok(Self::from_index_unchecked(index))
    }

    /// Creates a new [`Square`] from its row-major index, without error checking.
    #[inline(always)]
    pub const fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < Self::COUNT, "Index must be between [0,64)");
        Self {
            row: (index / Self::SIDE as usize) as u8,
            col: (index % Self::SIDE as usize) as u8,
        }
    }

    /// Returns an iterator over all squares, in row-major order starting at `a8`.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap().to_string(), "a8");
    /// assert_eq!(iter.last().unwrap().to_string(), "h1");
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT).map(Self::from_index_unchecked)
    }

    /// The row of this [`Square`], in `[0, 8)`.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// The column of this [`Square`], in `[0, 8)`.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Row-major index of this [`Square`], in `[0, 64)`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.row as usize * Self::SIDE as usize + self.col as usize
    }

    /// Attempt to offset this [`Square`] by the row and column deltas.
    ///
    /// If the result would leave the board, `None` is returned.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Square;
    /// let e2 = Square::new(6, 4).unwrap();
    /// assert_eq!(e2.offset(-2, 0), Square::new(4, 4));
    /// assert_eq!(e2.offset(2, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, row_delta: i8, col_delta: i8) -> Option<Self> {
        let row = self.row as i8 + row_delta;
        let col = self.col as i8 + col_delta;

        if row < 0 || col < 0 {
            return None;
        }

        Self::new(row as u8, col as u8)
    }

    /// Returns `true` if this [`Square`] is on row 0 or row 7.
    #[inline(always)]
    pub const fn is_back_rank(&self) -> bool {
        self.row == 0 || self.row == Self::SIDE - 1
    }

    /// The file letter of this [`Square`], `'a'..='h'`.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }

    /// The rank digit of this [`Square`], `'1'..='8'`.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }

    /// Creates a [`Square`] from algebraic coordinates such as `"e2"`.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Square;
    /// let e2 = Square::from_uci("e2").unwrap();
    /// assert_eq!((e2.row(), e2.col()), (6, 4));
    ///
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}")
        }

        let file = bytes[0].to_ascii_lowercase();
        if !(b'a'..=b'h').contains(&file) {
            bail!(
                "Invalid file for Square: Must be between [a, h]. Got {:?}",
                bytes[0] as char
            );
        }

        let rank = bytes[1];
        if !(b'1'..=b'8').contains(&rank) {
            bail!(
                "Invalid rank for Square: Must be between [1, 8]. Got {:?}",
                rank as char
            );
        }

        Ok(Self::new_unchecked(b'8' - rank, file - b'a'))
    }

    /// Converts this [`Square`] to algebraic coordinates.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Square;
    /// assert_eq!(Square::new(7, 0).unwrap().to_uci(), "a1");
    /// ```
    #[inline(always)]
    pub fn to_uci(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Accepts algebraic coordinates (`"e2"`) or a `row,col` pair (`"6,4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((row, col)) = s.split_once(',') else {
            return Self::from_uci(s.trim());
        };

        let row = row.trim().parse::<u8>()?;
        let col = col.trim().parse::<u8>()?;
        match Self::new(row, col) {
            Some(square) => Ok(square),
            None => bail!("Invalid Square coordinates: Must be between [0,8). Got ({row}, {col})"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;
    /// Wrapper from [`Square::from_str`].
    #[inline(always)]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = anyhow::Error;
    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        match Self::new(row, col) {
            Some(square) => Ok(square),
            None => bail!("Invalid Square coordinates: Must be between [0,8). Got ({row}, {col})"),
        }
    }
}

impl<T> Index<Square> for [[T; 8]; 8] {
    type Output = T;
    /// A [`Square`] can be used to index into a 2D array of 8x8 elements, row first.
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.row as usize][index.col as usize]
    }
}

impl<T> IndexMut<Square> for [[T; 8]; 8] {
    /// A [`Square`] can be used to mutably index into a 2D array of 8x8 elements, row first.
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.row as usize][index.col as usize]
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_uci`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Square {
    /// Displays algebraic coordinates alongside the `(row, col)` pair.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.to_uci(), self.row, self.col)
    }
}
