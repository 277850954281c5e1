/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Squares, pieces and the board that holds them.
mod board;

/// Command-line arguments and line commands for the terminal front-end.
mod cli;

/// Turn tracking, selection, move application and termination.
mod game;

/// Pseudo-legal move generation for every piece kind.
mod movegen;

/// The interactive terminal loop.
mod shell;

pub use board::*;
pub use cli::*;
pub use game::*;
pub use movegen::*;
pub use shell::*;
