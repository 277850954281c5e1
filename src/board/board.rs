/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{Color, Piece, PieceKind, Square};

/// Piece placements of the standard starting position, Black on top.
pub const STARTPOS_PLACEMENTS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Back-rank layout, from column 0 to column 7.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An `8x8` grid where every cell holds at most one [`Piece`].
///
/// The board owns its pieces. It has no notion of whose turn it is or which moves are
/// allowed; see [`Game`](crate::Game) for that. Writing a piece into a cell always rewrites
/// the piece's stored [`Square`], so the two never disagree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; Square::SIDE as usize]; Square::SIDE as usize],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use kingfall::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_placements(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            cells: [[None; Square::SIDE as usize]; Square::SIDE as usize],
        }
    }

    /// Creates a [`Board`] set up in the standard starting position.
    ///
    /// Black's pieces occupy rows 0 and 1, White's occupy rows 6 and 7.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Board, STARTPOS_PLACEMENTS};
    /// assert_eq!(Board::standard().to_placements(), STARTPOS_PLACEMENTS);
    /// ```
    pub fn standard() -> Self {
        let mut board = Self::new();

        for col in 0..Square::SIDE {
            let kind = BACK_RANK[col as usize];
            board.spawn(Color::Black, kind, Square::new_unchecked(0, col));
            board.spawn(Color::Black, PieceKind::Pawn, Square::new_unchecked(1, col));
            board.spawn(Color::White, PieceKind::Pawn, Square::new_unchecked(6, col));
            board.spawn(Color::White, kind, Square::new_unchecked(7, col));
        }

        board
    }

    /// Constructs a [`Board`] from the piece-placement field of a FEN string.
    ///
    /// Only the placements are read; anything after the first space is ignored.
    /// Pawns that are not on their starting row are considered to have moved already.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Board, Square};
    /// let board = Board::from_placements("4k3/8/8/8/8/8/8/4K2R").unwrap();
    /// let h1 = Square::from_uci("h1").unwrap();
    /// assert_eq!(board.piece_at(h1).unwrap().to_string(), "R");
    /// ```
    pub fn from_placements(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        let placements = fen.split_ascii_whitespace().next().unwrap_or_default();

        // Check if the placements string is the correct length
        if placements.matches('/').count() != 7 {
            bail!("Placements must describe all 8 ranks. Got {placements:?}");
        }

        for (row, rank) in placements.split('/').enumerate() {
            let row = row as u8;
            let mut col = 0;

            for piece_char in rank.chars() {
                if let Some(empty) = piece_char.to_digit(10) {
                    // At most 8 + 9, so `col` cannot overflow before this check
                    col += empty as u8;
                    if col > Square::SIDE {
                        bail!("Rank {} of placements {placements:?} overflows 8 files", 8 - row);
                    }
                    continue;
                }

                let kind = PieceKind::from_uci(piece_char).with_context(|| {
                    format!("Placements must contain piece chars or digits. Got {piece_char:?}")
                })?;

                let Some(square) = Square::new(row, col) else {
                    bail!("Rank {} of placements {placements:?} overflows 8 files", 8 - row);
                };

                let mut piece = Piece::new(Color::from_case(piece_char), kind, square);
                if piece.is_pawn() && row != Self::pawn_start_row(piece.color()) {
                    piece.relocate(square);
                }
                board.place(square, Some(piece));

                col += 1;
            }

            if col != Square::SIDE {
                bail!(
                    "Rank {} of placements {placements:?} covers {col} files instead of 8",
                    8 - row
                );
            }
        }

        Ok(board)
    }

    /// Generates the piece-placement field of a FEN string for this [`Board`].
    pub fn to_placements(&self) -> String {
        let mut placements = String::with_capacity(64);

        for (row, cells) in self.cells.iter().enumerate() {
            let mut empty = 0;

            for cell in cells {
                if let Some(piece) = cell {
                    if empty != 0 {
                        placements += &empty.to_string();
                        empty = 0;
                    }
                    placements.push(piece.to_uci());
                } else {
                    empty += 1;
                }
            }

            if empty != 0 {
                placements += &empty.to_string();
            }

            if row != Square::SIDE as usize - 1 {
                placements.push('/');
            }
        }

        placements
    }

    /// The row that pawns of `color` start on.
    #[inline(always)]
    pub const fn pawn_start_row(color: Color) -> u8 {
        match color {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Fetches the [`Piece`] on `square`, if there is one.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.cells[square].as_ref()
    }

    /// Fetches the [`Color`] of the piece on `square`, if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(Piece::color)
    }

    /// Returns `true` if no piece stands on `square`.
    #[inline(always)]
    pub fn is_empty_at(&self, square: Square) -> bool {
        self.cells[square].is_none()
    }

    /// Writes `piece` (or nothing) into the cell at `square`, returning the previous occupant.
    ///
    /// No rules are checked here. The placed piece's stored square is updated to `square`.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Board, Color, Piece, PieceKind, Square};
    /// let mut board = Board::new();
    /// let a1 = Square::from_uci("a1").unwrap();
    /// let b2 = Square::from_uci("b2").unwrap();
    ///
    /// let rook = Piece::new(Color::White, PieceKind::Rook, a1);
    /// assert!(board.place(b2, Some(rook)).is_none());
    /// assert_eq!(board.piece_at(b2).unwrap().square(), b2);
    /// ```
    #[inline(always)]
    pub fn place(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let piece = piece.map(|mut piece| {
            piece.set_square(square);
            piece
        });

        std::mem::replace(&mut self.cells[square], piece)
    }

    /// Removes and returns the piece on `square`, if any.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.cells[square].take()
    }

    /// Places a new, unmoved piece on `square`, replacing any occupant.
    #[inline(always)]
    fn spawn(&mut self, color: Color, kind: PieceKind, square: Square) {
        self.place(square, Some(Piece::new(color, kind, square)));
    }

    /// An iterator over every piece on the board, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten().flatten()
    }

    /// An iterator over every piece of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |piece| piece.color() == color)
    }

    /// Finds the square of the first King of `color`, scanning in row-major order.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|piece| piece.is_king())
            .map(Piece::square)
    }
}

impl Default for Board {
    #[inline(always)]
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    /// Wrapper for [`Board::from_placements`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_placements(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(198);

        for row in 0..Square::SIDE {
            board += &format!("{}| ", Square::SIDE - row);

            for col in 0..Square::SIDE {
                let occupant = match self.piece_at(Square::new_unchecked(row, col)) {
                    Some(piece) => piece.to_uci(),
                    None => '.',
                };

                board += &format!("{occupant} ");
            }

            board += "\n"
        }
        board += " +";
        for _ in 0..Square::SIDE {
            board += "--";
        }
        board += "\n   a b c d e f g h ";

        write!(f, "{board}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_placements())
    }
}
