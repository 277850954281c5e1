/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut, Neg},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::Square;

/// Represents the color of a player or piece.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns this [`Color`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The row delta a Pawn of this [`Color`] advances by.
    ///
    /// White pawns walk toward row 0, Black pawns toward row 7.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Color;
    /// assert_eq!(Color::White.pawn_direction(), -1);
    /// assert_eq!(Color::Black.pawn_direction(), 1);
    /// ```
    #[inline(always)]
    pub const fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Returns this [`Color`] as a `usize`, `0` for White and `1` for Black.
    ///
    /// Useful for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a [`Color`] from a `char`; `w` or `b`, case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Color;
    /// assert_eq!(Color::from_uci('b').unwrap(), Color::Black);
    /// assert!(Color::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color}"),
        }
    }

    /// Creates a [`Color`] based on ASCII case, uppercase being White.
    #[inline(always)]
    pub const fn from_case(c: char) -> Self {
        if c.is_ascii_lowercase() {
            Self::Black
        } else {
            Self::White
        }
    }

    /// Converts this [`Color`] to a char, `w` or `b`.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    ///
    /// # Example
    /// ```
    /// # use kingfall::Color;
    /// assert_eq!(Color::White.name(), "white");
    /// ```
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    /// Negating [`Color::White`] yields [`Color::Black`] and vice versa.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    ///
    /// In the order: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Returns this [`PieceKind`] as a `usize`, in `[0, 5]`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a new [`PieceKind`] from a character; `pnbrqk`, case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use kingfall::PieceKind;
    /// assert_eq!(PieceKind::from_uci('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind}."),
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Converts this [`PieceKind`] to a lowercase character.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

/// A chess piece standing on the board.
///
/// Besides its [`Color`] and [`PieceKind`], a piece remembers the [`Square`] it stands on
/// and whether it has moved yet. The [`Board`](crate::Board) keeps the stored square in sync
/// with the cell that holds the piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
    square: Square,
    has_moved: bool,
}

impl Piece {
    /// Creates a new, unmoved [`Piece`] on `square`.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Color, Piece, PieceKind, Square};
    /// let e1 = Square::from_uci("e1").unwrap();
    /// let king = Piece::new(Color::White, PieceKind::King, e1);
    /// assert_eq!(king.to_string(), "K");
    /// assert!(!king.has_moved());
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind, square: Square) -> Self {
        Self {
            color,
            kind,
            square,
            has_moved: false,
        }
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The [`Square`] this [`Piece`] stands on.
    #[inline(always)]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Returns `true` once this [`Piece`] has made a move.
    #[inline(always)]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Returns `true` if this [`Piece`] is a Pawn.
    #[inline(always)]
    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Returns `true` if this [`Piece`] is a King.
    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// The row delta this piece advances by, if it is a Pawn.
    #[inline(always)]
    pub const fn pawn_direction(&self) -> i8 {
        self.color.pawn_direction()
    }

    /// Fetches the [`Color`] and [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn parts(&self) -> (Color, PieceKind) {
        (self.color, self.kind)
    }

    /// Records this [`Piece`] as standing on `square`, without touching `has_moved`.
    ///
    /// Only the [`Board`](crate::Board) calls this, when the piece is placed in a cell.
    #[inline(always)]
    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    /// Relocates this [`Piece`] to `square` and marks it as moved.
    #[inline(always)]
    pub fn relocate(&mut self, square: Square) {
        self.square = square;
        self.has_moved = true;
    }

    /// Returns a brand new Queen of this piece's color on its square.
    ///
    /// The original piece is not modified; promotion discards it.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Color, Piece, PieceKind, Square};
    /// let a8 = Square::from_uci("a8").unwrap();
    /// let pawn = Piece::new(Color::White, PieceKind::Pawn, a8);
    /// let queen = pawn.promoted();
    /// assert_eq!(queen.parts(), (Color::White, PieceKind::Queen));
    /// assert_eq!(queen.square(), a8);
    /// ```
    #[inline(always)]
    pub const fn promoted(&self) -> Self {
        Self::new(self.color, PieceKind::Queen, self.square)
    }

    /// Converts this [`Piece`] to a character: uppercase for White, lowercase for Black.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        if self.color.is_white() {
            self.kind.to_uci().to_ascii_uppercase()
        } else {
            self.kind.to_uci()
        }
    }

    /// Fetches a human-readable name for this [`Piece`].
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Color, Piece, PieceKind, Square};
    /// let d8 = Square::from_uci("d8").unwrap();
    /// assert_eq!(Piece::new(Color::Black, PieceKind::Queen, d8).name(), "black queen");
    /// ```
    #[inline(always)]
    pub fn name(&self) -> String {
        format!("{} {}", self.color.name(), self.kind.name())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.name(), self.square)?;
        if self.has_moved {
            write!(f, " (moved)")?;
        }
        Ok(())
    }
}

macro_rules! impl_common_traits {
    ($type:ty) => {
        impl<T> Index<$type> for [T; <$type>::COUNT] {
            type Output = T;
            #[inline(always)]
            fn index(&self, index: $type) -> &Self::Output {
                &self[index.index()]
            }
        }

        impl<T> IndexMut<$type> for [T; <$type>::COUNT] {
            #[inline(always)]
            fn index_mut(&mut self, index: $type) -> &mut Self::Output {
                &mut self[index.index()]
            }
        }

        impl FromStr for $type {
            type Err = anyhow::Error;
            /// Accepts the single-character form, or the full human-readable name.
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                if let Some(found) = Self::all()
                    .into_iter()
                    .find(|v| v.name().eq_ignore_ascii_case(s))
                {
                    return Ok(found);
                }

                if s.len() != 1 {
                    bail!(
                        "Invalid str for {}: Must be a str of len 1 or a full name. Got {s:?}",
                        stringify!($type)
                    );
                }

                Self::from_uci(s.as_bytes()[0] as char)
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "\"{}\" ({})", self.name(), self.index())
            }
        }
    };
}

impl_common_traits!(PieceKind);
impl_common_traits!(Color);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("white".parse::<Color>().unwrap(), Color::White);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
        assert_eq!("w".parse::<Color>().unwrap(), Color::White);
        assert!("grey".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("knight".parse::<PieceKind>().unwrap(), PieceKind::Knight);
        assert_eq!("N".parse::<PieceKind>().unwrap(), PieceKind::Knight);
        assert!("x".parse::<PieceKind>().is_err());
    }

    #[test]
    fn test_relocate_marks_moved() {
        let e2 = Square::from_uci("e2").unwrap();
        let e4 = Square::from_uci("e4").unwrap();

        let mut pawn = Piece::new(Color::White, PieceKind::Pawn, e2);
        assert!(!pawn.has_moved());

        pawn.relocate(e4);
        assert_eq!(pawn.square(), e4);
        assert!(pawn.has_moved());
    }

    #[test]
    fn test_promotion_is_a_fresh_queen() {
        let h1 = Square::from_uci("h1").unwrap();
        let mut pawn = Piece::new(Color::Black, PieceKind::Pawn, h1);
        pawn.relocate(h1);

        let queen = pawn.promoted();
        assert_eq!(queen.parts(), (Color::Black, PieceKind::Queen));
        assert_eq!(queen.square(), h1);
        assert!(!queen.has_moved());
    }

    #[test]
    fn test_piece_chars() {
        let a1 = Square::from_uci("a1").unwrap();
        assert_eq!(Piece::new(Color::White, PieceKind::Rook, a1).to_string(), "R");
        assert_eq!(Piece::new(Color::Black, PieceKind::Knight, a1).to_string(), "n");
    }

    #[test]
    fn test_color_indexing() {
        let mut counts = [0; Color::COUNT];
        counts[Color::Black] += 1;
        assert_eq!(counts, [0, 1]);
    }
}
