/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The `8x8` grid of pieces.
#[allow(clippy::module_inception)]
mod board;

/// Colors, piece kinds and pieces.
mod piece;

/// Board coordinates.
mod square;

/// Sets of squares, used for move lists.
mod squareset;

pub use board::*;
pub use piece::*;
pub use square::*;
pub use squareset::*;
