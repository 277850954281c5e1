/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::{generate_moves, Board, Color, Piece, Square, SquareSet};

/// What happened to the game after a call to [`Game::click`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Click {
    /// A friendly piece was selected (or re-selected).
    Selected,

    /// The selected piece moved to the clicked square.
    Moved,

    /// Neither a move nor a selection applied. Any previous selection is kept.
    Refused,

    /// The game is over, so the click was not looked at.
    Ignored,
}

/// Summary of the most recently applied move, for presentation purposes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct MoveReport {
    /// Where the piece came from.
    pub from: Square,

    /// Where the piece landed.
    pub to: Square,

    /// The piece as it stands on `to` after the move (a Queen, if it was promoted).
    pub piece: Piece,

    /// The enemy piece removed from `to`, if any.
    pub captured: Option<Piece>,

    /// Whether a Pawn was replaced by a Queen on this move.
    pub promoted: bool,
}

/// A game of capture-the-king chess.
///
/// Owns the [`Board`] and tracks whose turn it is, the currently selected piece and its
/// cached moves, and whether a King has fallen. The rules are deliberately simpler than
/// real chess: moving into check is allowed, there is no castling or en passant, and the
/// game only ends when a King is captured.
///
/// A selection goes through two states: nothing selected, where [`Game::select`] picks a
/// piece of the side to move, and a piece selected, where [`Game::move_to`] plays one of its
/// cached moves. Refused calls return `false` and leave the game untouched.
///
/// # Example
/// ```
/// # use kingfall::{Game, Square};
/// let mut game = Game::new();
/// let e2 = Square::from_uci("e2").unwrap();
/// let e4 = Square::from_uci("e4").unwrap();
///
/// assert!(game.select(e2));
/// assert!(game.move_to(e4));
/// assert!(game.board().piece_at(e4).unwrap().has_moved());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Game {
    /// Every piece in play.
    board: Board,

    /// The side allowed to select and move.
    turn: Color,

    /// Square of the selected piece, always one of `turn`'s pieces.
    selected: Option<Square>,

    /// Moves of the selected piece, computed when it was selected.
    valid_moves: SquareSet,

    /// Set once a King has been captured.
    game_over: bool,

    /// The side that captured a King.
    winner: Option<Color>,

    /// Where each side's King stands, or `None` once it has been captured.
    kings: [Option<Square>; Color::COUNT],

    /// The move most recently applied.
    last_move: Option<MoveReport>,
}

impl Game {
    /// Creates a new [`Game`] in the standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a new [`Game`] from an arbitrary [`Board`] and side to move.
    ///
    /// King squares are located by scanning the board once. A side with no King is allowed
    /// and is simply never in check.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let kings = Color::all().map(|color| board.find_king(color));

        Self {
            board,
            turn,
            selected: None,
            valid_moves: SquareSet::EMPTY,
            game_over: false,
            winner: None,
            kings,
            last_move: None,
        }
    }

    /// Creates a new [`Game`] from the piece-placement field of a FEN string.
    pub fn from_placements(placements: &str, turn: Color) -> Result<Self> {
        Ok(Self::from_board(Board::from_placements(placements)?, turn))
    }

    /// Creates a new [`Game`] from FEN piece placements followed by an optional side to move.
    ///
    /// Remaining FEN fields (castling, en passant, counters) are ignored since the rules do
    /// not use them.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Color, Game};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
    /// assert_eq!(game.turn(), Color::Black);
    ///
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
    /// assert_eq!(game.turn(), Color::White);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut fields = fen.split_ascii_whitespace();

        let Some(placements) = fields.next() else {
            bail!("FEN string must contain piece placements. Got {fen:?}");
        };
        let turn = match fields.next() {
            Some(side) => side.parse()?,
            None => Color::White,
        };

        Self::from_placements(placements, turn)
    }

    /// Generates the placements and side to move of this game, FEN style.
    pub fn to_fen(&self) -> String {
        format!("{} {}", self.board.to_placements(), self.turn.to_uci())
    }

    /// Throws away the current game and starts over from the standard position.
    pub fn reset(&mut self) {
        *self = Self::new();
        info!("new game started");
    }

    /// The board and every piece on it.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side allowed to select and move.
    #[inline(always)]
    pub const fn turn(&self) -> Color {
        self.turn
    }

    /// Square of the selected piece, if any.
    #[inline(always)]
    pub const fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// The selected piece itself, if any.
    #[inline(always)]
    pub fn selected_piece(&self) -> Option<&Piece> {
        self.selected.and_then(|square| self.board.piece_at(square))
    }

    /// Moves of the selected piece. Empty when nothing is selected.
    #[inline(always)]
    pub const fn valid_moves(&self) -> SquareSet {
        self.valid_moves
    }

    /// Returns `true` once a King has been captured.
    #[inline(always)]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// The side that captured a King, if one has.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Where `color`'s King stands, or `None` if it has been captured.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color]
    }

    /// Summary of the last applied move, if any move has been applied.
    #[inline(always)]
    pub const fn last_move(&self) -> Option<&MoveReport> {
        self.last_move.as_ref()
    }

    /// Selects the piece on `square`, caching its moves.
    ///
    /// Succeeds only if `square` holds a piece of the side to move. A new selection
    /// replaces any previous one. On refusal nothing changes.
    pub fn select(&mut self, square: Square) -> bool {
        let Some(piece) = self.board.piece_at(square) else {
            debug!(%square, "selection refused: square is empty");
            return false;
        };

        if piece.color() != self.turn {
            debug!(%square, turn = %self.turn, "selection refused: piece belongs to the opponent");
            return false;
        }

        self.valid_moves = generate_moves(piece, &self.board);
        self.selected = Some(square);
        debug!(%square, moves = %self.valid_moves, "selected {}", piece.name());

        true
    }

    /// Moves the selected piece to `to`.
    ///
    /// Succeeds only if a piece is selected and `to` is among its cached moves. On success:
    /// any enemy on `to` is captured (capturing a King ends the game in favor of the mover),
    /// the piece is relocated and marked as moved, a Pawn reaching row 0 or row 7 becomes a
    /// Queen, the turn passes to the opponent, and the selection is cleared.
    ///
    /// Nothing stops a side from playing on after the game is over; see [`Game::click`] for
    /// the entry point that does.
    pub fn move_to(&mut self, to: Square) -> bool {
        let Some(from) = self.selected else {
            debug!(%to, "move refused: nothing is selected");
            return false;
        };

        if !self.valid_moves.contains(to) {
            debug!(%from, %to, "move refused: not a valid destination");
            return false;
        }

        let Some(mut piece) = self.board.take(from) else {
            // `selected` must always track an occupied square
            warn!(%from, %to, "move refused: selected square is empty");
            return false;
        };

        let captured = self.board.take(to);
        if let Some(victim) = captured {
            info!(%to, "{} captures {}", piece.name(), victim.name());

            if victim.is_king() {
                self.kings[victim.color()] = None;
                self.game_over = true;
                self.winner = Some(self.turn);
                info!(winner = %self.turn, "king captured, game over");
            }
        }

        piece.relocate(to);
        if piece.is_king() {
            self.kings[piece.color()] = Some(to);
        }

        let promoted = piece.is_pawn() && to.is_back_rank();
        if promoted {
            piece = piece.promoted();
            info!(%to, "{} promoted", piece.name());
        }

        self.board.place(to, Some(piece));
        info!(%from, %to, "{} moved", piece.name());

        self.last_move = Some(MoveReport {
            from,
            to,
            piece,
            captured,
            promoted,
        });
        self.turn = self.turn.opponent();
        self.selected = None;
        self.valid_moves.clear();

        true
    }

    /// Handles a click on `square` the way a board front-end would.
    ///
    /// Once the game is over every click is ignored. With a piece selected, a move to
    /// `square` is tried first; if that is refused, `square` is treated as a new selection.
    /// Without a selection, `square` is selected.
    ///
    /// # Example
    /// ```
    /// # use kingfall::{Click, Game, Square};
    /// let mut game = Game::new();
    /// let sq = |s| Square::from_uci(s).unwrap();
    ///
    /// assert_eq!(game.click(sq("g1")), Click::Selected);
    /// assert_eq!(game.click(sq("b1")), Click::Selected); // Re-selects the other knight
    /// assert_eq!(game.click(sq("c3")), Click::Moved);
    /// assert_eq!(game.click(sq("c3")), Click::Refused); // Not Black's piece
    /// ```
    pub fn click(&mut self, square: Square) -> Click {
        if self.game_over {
            debug!(%square, "click ignored: game is over");
            return Click::Ignored;
        }

        if self.selected.is_some() && self.move_to(square) {
            return Click::Moved;
        }

        if self.select(square) {
            Click::Selected
        } else {
            Click::Refused
        }
    }

    /// Returns `true` if any piece of `color`'s opponent could move onto `color`'s King.
    ///
    /// This is a query only; the rules never forbid leaving a King attacked. A side whose
    /// King has been captured is not in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        !self.checkers(color).is_empty()
    }

    /// Squares of every enemy piece that attacks `color`'s King.
    pub fn checkers(&self, color: Color) -> SquareSet {
        let Some(king) = self.kings[color] else {
            return SquareSet::EMPTY;
        };

        self.board
            .pieces_of(color.opponent())
            .filter(|piece| generate_moves(piece, &self.board).contains(king))
            .map(Piece::square)
            .collect()
    }

    /// Moves of the piece on `square`, regardless of whose turn it is.
    ///
    /// Returns `None` if `square` is empty.
    pub fn moves_from(&self, square: Square) -> Option<SquareSet> {
        self.board
            .piece_at(square)
            .map(|piece| generate_moves(piece, &self.board))
    }
}

impl Default for Game {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_fen`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_dash = |value: Option<String>| value.unwrap_or_else(|| String::from("-"));

        for row in 0..Square::SIDE {
            write!(f, "{}|", Square::SIDE - row)?;
            for col in 0..Square::SIDE {
                let square = Square::new_unchecked(row, col);
                let piece_char = self.board.piece_at(square).map(|p| p.to_uci()).unwrap_or('.');

                // Marks the selected piece and its destinations
                let marker = if self.selected == Some(square) {
                    '['
                } else if self.valid_moves.contains(square) {
                    '*'
                } else {
                    ' '
                };
                write!(f, "{marker}{piece_char}")?;
            }

            match row {
                0 => write!(f, "       FEN: {}", self.to_fen())?,
                1 => write!(f, "      Turn: {}", self.turn)?,
                2 => write!(
                    f,
                    "  Selected: {}",
                    or_dash(self.selected.map(|s| s.to_string()))
                )?,
                3 => write!(f, "     Moves: {}", self.valid_moves)?,
                4 => {
                    let checked = Color::all()
                        .into_iter()
                        .filter(|&color| self.is_in_check(color))
                        .map(|color| color.name())
                        .collect::<Vec<_>>();
                    let checked = (!checked.is_empty()).then(|| checked.join(", "));
                    write!(f, "   Checked: {}", or_dash(checked))?;
                }
                5 => write!(
                    f,
                    "    Winner: {}",
                    or_dash(self.winner.map(|c| c.to_string()))
                )?,
                _ => {}
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in 0..Square::SIDE {
            write!(f, "--")?;
        }
        write!(f, "\n   a b c d e f g h")?;

        Ok(())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("fen", &self.to_fen())
            .field("selected", &self.selected)
            .field("valid_moves", &self.valid_moves.to_string())
            .field("game_over", &self.game_over)
            .field("winner", &self.winner)
            .field("kings", &self.kings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn sq(s: &str) -> Square {
        Square::from_uci(s).unwrap()
    }

    fn play(game: &mut Game, from: &str, to: &str) {
        assert!(game.select(sq(from)), "failed to select {from}");
        assert!(game.move_to(sq(to)), "failed to move {from} to {to}");
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.selected(), None);
        assert!(game.valid_moves().is_empty());
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);
        assert_eq!(game.king_square(Color::White), Some(sq("e1")));
        assert_eq!(game.king_square(Color::Black), Some(sq("e8")));
        assert!(game.last_move().is_none());
    }

    #[test]
    fn test_select_refusals_change_nothing() {
        let mut game = Game::new();
        let before = game.clone();

        assert!(!game.select(sq("e4")), "empty square");
        assert!(!game.select(sq("e7")), "opponent's piece");
        assert_eq!(game, before);
    }

    #[test]
    fn test_select_caches_moves() {
        let mut game = Game::new();
        assert!(game.select(sq("b1")));
        assert_eq!(game.selected(), Some(sq("b1")));
        assert_eq!(game.valid_moves().len(), 2);
        assert!(game.valid_moves().contains(sq("a3")));
        assert!(game.valid_moves().contains(sq("c3")));

        // Re-selection replaces the cache
        assert!(game.select(sq("e2")));
        assert_eq!(game.selected(), Some(sq("e2")));
        assert!(game.valid_moves().contains(sq("e4")));
        assert!(!game.valid_moves().contains(sq("c3")));
    }

    #[test]
    fn test_move_refusals_change_nothing() {
        let mut game = Game::new();
        assert!(!game.move_to(sq("e4")), "nothing selected");

        assert!(game.select(sq("e2")));
        let before = game.clone();
        assert!(!game.move_to(sq("e5")), "not a valid destination");
        assert!(!game.move_to(sq("d3")), "not a valid destination");
        assert_eq!(game, before);
    }

    #[test]
    fn test_move_passes_turn_and_clears_selection() {
        let mut game = Game::new();
        play(&mut game, "e2", "e4");

        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.selected(), None);
        assert!(game.valid_moves().is_empty());
        assert!(game.board().is_empty_at(sq("e2")));

        let pawn = game.board().piece_at(sq("e4")).unwrap();
        assert_eq!(pawn.square(), sq("e4"));
        assert!(pawn.has_moved());

        let report = game.last_move().unwrap();
        assert_eq!((report.from, report.to), (sq("e2"), sq("e4")));
        assert!(report.captured.is_none());
        assert!(!report.promoted);

        // White may not move again
        assert!(!game.select(sq("d2")));
    }

    #[test]
    fn test_capture_removes_piece() {
        let mut game = Game::new();
        play(&mut game, "e2", "e4");
        play(&mut game, "d7", "d5");
        play(&mut game, "e4", "d5");

        assert_eq!(game.board().pieces_of(Color::Black).count(), 15);
        let report = game.last_move().unwrap();
        assert_eq!(
            report.captured.map(|p| p.parts()),
            Some((Color::Black, PieceKind::Pawn))
        );
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_king_capture_ends_game() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w").unwrap();
        play(&mut game, "h1", "h8");
        assert!(game.is_in_check(Color::Black));

        // Black stays on the attacked rank; the rules allow it
        play(&mut game, "e8", "d8");
        assert!(game.is_in_check(Color::Black));
        assert!(!game.is_game_over());

        play(&mut game, "h8", "d8");
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Color::White));
        assert_eq!(game.king_square(Color::Black), None);
        assert!(!game.is_in_check(Color::Black));

        let report = game.last_move().unwrap();
        assert_eq!(
            report.captured.map(|p| p.parts()),
            Some((Color::Black, PieceKind::King))
        );
    }

    #[test]
    fn test_engine_keeps_accepting_moves_after_game_over() {
        let mut game = Game::from_fen("4k3/4R3/8/8/8/8/p7/4K3 w").unwrap();
        play(&mut game, "e7", "e8");
        assert!(game.is_game_over());
        assert_eq!(game.turn(), Color::Black);

        // Black has no King, yet the engine itself does not refuse further play
        play(&mut game, "a2", "a1");
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.winner(), Some(Color::White));
    }

    #[test]
    fn test_click_is_ignored_after_game_over() {
        let mut game = Game::from_fen("4k3/4R3/8/8/8/8/p7/4K3 w").unwrap();
        play(&mut game, "e7", "e8");

        let before = game.clone();
        assert_eq!(game.click(sq("a2")), Click::Ignored);
        assert_eq!(game, before);
    }

    #[test]
    fn test_click_falls_back_to_selection() {
        let mut game = Game::new();
        assert_eq!(game.click(sq("e7")), Click::Refused);
        assert_eq!(game.click(sq("e2")), Click::Selected);

        // Invalid target that is also not selectable: selection is kept
        assert_eq!(game.click(sq("e5")), Click::Refused);
        assert_eq!(game.selected(), Some(sq("e2")));

        assert_eq!(game.click(sq("d2")), Click::Selected);
        assert_eq!(game.click(sq("d4")), Click::Moved);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn test_promotion_replaces_pawn_with_queen() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/7p/4K3 w").unwrap();
        play(&mut game, "a7", "a8");

        let queen = game.board().piece_at(sq("a8")).unwrap();
        assert_eq!(queen.parts(), (Color::White, PieceKind::Queen));
        assert!(game.last_move().unwrap().promoted);

        // Black promotes on row 7
        play(&mut game, "h2", "h1");
        let queen = game.board().piece_at(sq("h1")).unwrap();
        assert_eq!(queen.parts(), (Color::Black, PieceKind::Queen));

        // Subsequent moves from a8 are Queen moves
        assert!(game.select(sq("a8")));
        assert!(game.valid_moves().contains(sq("h1")));
        assert!(game.valid_moves().contains(sq("a1")));
    }

    #[test]
    fn test_king_square_follows_king() {
        let mut game = Game::new();
        play(&mut game, "e2", "e4");
        play(&mut game, "e7", "e5");
        play(&mut game, "e1", "e2");
        assert_eq!(game.king_square(Color::White), Some(sq("e2")));
        play(&mut game, "e8", "e7");
        assert_eq!(game.king_square(Color::Black), Some(sq("e7")));
    }

    #[test]
    fn test_checkers() {
        let game = Game::from_fen("4k3/8/8/1B6/8/8/8/4R2K b").unwrap();
        let checkers = game.checkers(Color::Black);
        assert_eq!(checkers.len(), 2);
        assert!(checkers.contains(sq("b5")));
        assert!(checkers.contains(sq("e1")));
        assert!(!game.is_in_check(Color::White));
    }

    #[test]
    fn test_fen_round_trip() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b";
        assert_eq!(Game::from_fen(fen).unwrap().to_fen(), fen);
        assert!(Game::from_fen("").is_err());
        assert!(Game::from_fen("8/8/8/8/8/8/8/8 x").is_err());
    }

    #[test]
    fn test_move_from_vacated_selection_is_refused() {
        let mut game = Game::new();
        assert!(game.select(sq("e2")));

        // Empty the selected square behind the game's back
        game.board.take(sq("e2"));
        let before = game.clone();

        assert!(!game.move_to(sq("e4")));
        assert_eq!(game, before);
        assert!(game.last_move().is_none());
    }

    #[test]
    fn test_reset() {
        let mut game = Game::new();
        play(&mut game, "g1", "f3");
        game.reset();
        assert_eq!(game, Game::new());
    }
}
