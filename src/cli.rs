/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::{Board, Color, Game, Square};

/// Play capture-the-king chess in the terminal.
///
/// Squares are given as coordinates (`e2`) or as `row,col` pairs (`6,4`), row 0 being
/// Black's back rank. Set `RUST_LOG=debug` to trace every selection and move.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Start from these FEN piece placements instead of the standard position.
    #[arg(short, long)]
    pub placements: Option<Board>,

    /// The side to move first.
    #[arg(short, long, default_value = "w")]
    pub turn: Color,

    /// If set, the board is not printed after every applied move.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// The game to start with, built from `--placements` and `--turn`.
    pub fn game(&self) -> Game {
        let board = self.placements.unwrap_or_default();
        Game::from_board(board, self.turn)
    }
}

/// A line command sent to the [`Shell`](crate::Shell).
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND> [ARGS]")
)]
pub enum GameCommand {
    /// Click on a square: move the selected piece there if possible, otherwise select what stands there.
    #[command(alias = "c")]
    Click { square: Square },

    /// Select the piece on a square. It must belong to the side to move.
    #[command(alias = "s")]
    Select { square: Square },

    /// Move the selected piece to a square.
    #[command(alias = "m")]
    Move { square: Square },

    /// Shows the moves of the selected piece, or of the piece on a specific square.
    Moves { square: Option<Square> },

    /// Report whether a side's King is attacked. Both sides are reported if none is given.
    Check { color: Option<Color> },

    /// Print a visual representation of the current game.
    #[command(alias = "d")]
    Display,

    /// Print whose turn it is, the selection, and whether the game is over.
    Status,

    /// Print the piece placements and side to move, FEN style.
    Fen,

    /// Start a new game from the standard position.
    #[command(alias = "newgame")]
    New,

    /// Quit the program.
    #[command(alias = "quit")]
    Exit,
}

impl FromStr for GameCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`GameCommand`] from a whitespace-separated line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
