/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Board, Color, Piece, PieceKind, Square, SquareSet};

/// Deltas for the movement of the Queen, as `(row, col)` offsets.
const QUEEN_DELTAS: [(i8, i8); 8] = [
    /* Rook */
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    /* Bishop */
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Deltas for the movement of the Rook.
const ROOK_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[0],
    QUEEN_DELTAS[1],
    QUEEN_DELTAS[2],
    QUEEN_DELTAS[3],
];

/// Deltas for the movement of the Bishop.
const BISHOP_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[4],
    QUEEN_DELTAS[5],
    QUEEN_DELTAS[6],
    QUEEN_DELTAS[7],
];

/// Deltas for the movement of the Knight.
const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Deltas for the movement of the King; one step in every direction.
const KING_DELTAS: [(i8, i8); 8] = QUEEN_DELTAS;

/// Computes every pseudo-legal destination of `piece` on `board`.
///
/// Pseudo-legal means the movement pattern and occupancy rules are honored, but nothing
/// stops a move that leaves the mover's own King attacked. No castling and no en passant.
///
/// The generator reads `piece`'s own color and square, so `piece` does not have to be on
/// `board` at all; this is how hypothetical pieces are probed.
///
/// # Example
/// ```
/// # use kingfall::{generate_moves, Board, Square};
/// let board = Board::standard();
/// let g1 = Square::from_uci("g1").unwrap();
/// let knight = board.piece_at(g1).unwrap();
///
/// let moves = generate_moves(knight, &board);
/// assert_eq!(moves.to_string(), "f3, h3");
/// ```
pub fn generate_moves(piece: &Piece, board: &Board) -> SquareSet {
    let (color, square) = (piece.color(), piece.square());

    match piece.kind() {
        PieceKind::Pawn => pawn_moves(color, square, piece.has_moved(), board),
        PieceKind::Knight => leaper_moves(color, square, &KNIGHT_DELTAS, board),
        PieceKind::Bishop => diagonal_slides(color, square, board),
        PieceKind::Rook => orthogonal_slides(color, square, board),
        PieceKind::Queen => {
            orthogonal_slides(color, square, board) | diagonal_slides(color, square, board)
        }
        PieceKind::King => leaper_moves(color, square, &KING_DELTAS, board),
    }
}

/// Squares a Rook of `color` on `square` could slide to.
#[inline(always)]
pub fn orthogonal_slides(color: Color, square: Square, board: &Board) -> SquareSet {
    slider_moves(color, square, &ROOK_DELTAS, board)
}

/// Squares a Bishop of `color` on `square` could slide to.
#[inline(always)]
pub fn diagonal_slides(color: Color, square: Square, board: &Board) -> SquareSet {
    slider_moves(color, square, &BISHOP_DELTAS, board)
}

/// Pushes, the double push from an unmoved pawn, and diagonal captures.
fn pawn_moves(color: Color, square: Square, has_moved: bool, board: &Board) -> SquareSet {
    let mut moves = SquareSet::new();
    let forward = color.pawn_direction();

    if let Some(single) = square.offset(forward, 0) {
        if board.is_empty_at(single) {
            moves.insert(single);

            // Double push needs both squares free; `offset` keeps it on the board
            if !has_moved {
                if let Some(double) = square.offset(forward * 2, 0) {
                    if board.is_empty_at(double) {
                        moves.insert(double);
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        let Some(target) = square.offset(forward, side) else {
            continue;
        };

        if board.color_at(target) == Some(color.opponent()) {
            moves.insert(target);
        }
    }

    moves
}

/// Walks each ray one step at a time until it leaves the board or hits a piece.
///
/// An enemy piece ends the ray and is included; a friendly piece ends the ray and is not.
fn slider_moves(color: Color, square: Square, deltas: &[(i8, i8)], board: &Board) -> SquareSet {
    let mut moves = SquareSet::new();

    for &(dr, dc) in deltas {
        let mut ray = square;

        while let Some(shifted) = ray.offset(dr, dc) {
            match board.color_at(shifted) {
                None => {
                    moves.insert(shifted);
                }
                Some(occupant) => {
                    if occupant != color {
                        moves.insert(shifted);
                    }
                    break;
                }
            }

            ray = shifted;
        }
    }

    moves
}

/// Tests each offset once; keeps in-bounds squares that are empty or hold an enemy.
fn leaper_moves(color: Color, square: Square, deltas: &[(i8, i8)], board: &Board) -> SquareSet {
    deltas
        .iter()
        .filter_map(|&(dr, dc)| square.offset(dr, dc))
        .filter(|&target| board.color_at(target) != Some(color))
        .collect()
}
