/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io::{self, BufRead, BufReader, Write},
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{Click, Color, Game, GameCommand, Square};

/// A terminal front-end for a [`Game`].
///
/// Commands are read from `stdin` on a separate thread and sent over a channel, so every
/// call into the [`Game`] happens on the thread that called [`Shell::run`], in the order the
/// commands were typed.
#[derive(Debug)]
pub struct Shell {
    /// The game being played.
    game: Game,

    /// One half of a channel, responsible for sending commands to the shell to execute.
    sender: Sender<GameCommand>,

    /// One half of a channel, responsible for receiving commands for the shell to execute.
    receiver: Receiver<GameCommand>,

    /// If set, the board is not printed after every applied move.
    quiet: bool,
}

impl Shell {
    /// Constructs a new [`Shell`] around `game`, to be executed with [`Shell::run`].
    pub fn new(game: Game, quiet: bool) -> Self {
        let (sender, receiver) = channel();

        Self {
            game,
            sender,
            receiver,
            quiet,
        }
    }

    /// The game being played.
    #[inline(always)]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Sends a [`GameCommand`] to the shell to be executed.
    pub fn send_command(&self, command: GameCommand) -> Result<()> {
        self.sender
            .send(command)
            .context("Failed to send command to the shell")
    }

    /// Execute the main event loop for the shell.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands
    /// until an [`GameCommand::Exit`] arrives.
    pub fn run(&mut self) -> Result<()> {
        spawn_input_handler(BufReader::new(io::stdin()), self.sender.clone());

        let mut stdout = io::stdout();
        if !self.quiet {
            writeln!(stdout, "{}", self.game)?;
        }

        while let Ok(command) = self.receiver.recv() {
            let keep_going = self.execute(command, &mut stdout)?;
            stdout.flush().context("Failed to flush stdout")?;

            if !keep_going {
                break;
            }
        }

        Ok(())
    }

    /// Executes a single command, writing any response to `out`.
    ///
    /// Returns `false` once the shell should stop.
    pub fn execute(&mut self, command: GameCommand, out: &mut impl Write) -> Result<bool> {
        match command {
            GameCommand::Click { square } => match self.game.click(square) {
                Click::Moved => self.report_move(out)?,
                Click::Selected => self.report_selection(out)?,
                Click::Refused => writeln!(out, "Nothing to select or move to on {square}")?,
                Click::Ignored => self.report_game_over(out)?,
            },

            GameCommand::Select { square } => {
                if self.game.is_game_over() {
                    self.report_game_over(out)?;
                } else if self.game.select(square) {
                    self.report_selection(out)?;
                } else {
                    let reason = if self.game.board().is_empty_at(square) {
                        String::from("the square is empty")
                    } else {
                        format!("it is {}'s turn", self.game.turn())
                    };
                    writeln!(out, "Cannot select {square}: {reason}")?;
                }
            }

            GameCommand::Move { square } => {
                if self.game.is_game_over() {
                    self.report_game_over(out)?;
                } else if self.game.move_to(square) {
                    self.report_move(out)?;
                } else if let Some(piece) = self.game.selected_piece() {
                    writeln!(
                        out,
                        "The {} on {} cannot move to {square}",
                        piece.name(),
                        piece.square()
                    )?;
                } else {
                    writeln!(out, "Nothing is selected")?;
                }
            }

            GameCommand::Moves { square } => {
                let moves = match square {
                    Some(square) => self.game.moves_from(square),
                    None => self.game.selected().map(|_| self.game.valid_moves()),
                };

                match moves {
                    Some(moves) => writeln!(out, "{moves}")?,
                    None => writeln!(out, "No piece to show moves for")?,
                }
            }

            GameCommand::Check { color } => {
                let colors = match color {
                    Some(color) => vec![color],
                    None => Color::all().to_vec(),
                };

                for color in colors {
                    let checkers = self.game.checkers(color);
                    if checkers.is_empty() {
                        writeln!(out, "{color}: not in check")?;
                    } else {
                        writeln!(out, "{color}: in check by {checkers}")?;
                    }
                }
            }

            GameCommand::Display => writeln!(out, "{}", self.game)?,

            GameCommand::Status => self.report_status(out)?,

            GameCommand::Fen => writeln!(out, "{}", self.game.to_fen())?,

            GameCommand::New => {
                self.game.reset();
                if !self.quiet {
                    writeln!(out, "{}", self.game)?;
                }
            }

            GameCommand::Exit => return Ok(false),
        }

        Ok(true)
    }

    fn report_selection(&self, out: &mut impl Write) -> Result<()> {
        if let Some(piece) = self.game.selected_piece() {
            writeln!(
                out,
                "Selected the {} on {}. Moves: {}",
                piece.name(),
                piece.square(),
                self.game.valid_moves()
            )?;
        }
        Ok(())
    }

    /// Describes the last applied move, then any capture, promotion, check or King capture.
    fn report_move(&self, out: &mut impl Write) -> Result<()> {
        let Some(report) = self.game.last_move() else {
            return Ok(());
        };

        let mover = if report.promoted {
            format!("{} pawn", report.piece.color())
        } else {
            report.piece.name()
        };
        write!(out, "{mover} {} -> {}", report.from, report.to)?;

        if let Some(victim) = report.captured {
            write!(out, ", capturing the {}", victim.name())?;
        }
        if report.promoted {
            write!(out, ", promoting to a queen")?;
        }
        writeln!(out)?;

        let turn = self.game.turn();
        if let Some(winner) = self.game.winner() {
            writeln!(out, "Game over: {winner} captured the {} king", -winner)?;
        } else if self.game.is_in_check(turn) {
            writeln!(out, "{turn} is in check")?;
        }

        if !self.quiet {
            writeln!(out, "{}", self.game)?;
        }

        Ok(())
    }

    fn report_game_over(&self, out: &mut impl Write) -> Result<()> {
        let winner = self.game.winner().map(|c| c.to_string());
        writeln!(
            out,
            "The game is over ({} won). Type `new` to play again",
            winner.as_deref().unwrap_or("nobody")
        )?;
        Ok(())
    }

    fn report_status(&self, out: &mut impl Write) -> Result<()> {
        let or_dash = |square: Option<Square>| square.map_or(String::from("-"), |s| s.to_string());

        writeln!(out, "turn: {}", self.game.turn())?;
        writeln!(out, "selected: {}", or_dash(self.game.selected()))?;
        for color in Color::all() {
            writeln!(out, "{color} king: {}", or_dash(self.game.king_square(color)))?;
        }
        match self.game.winner() {
            Some(winner) => writeln!(out, "game over: {winner} won")?,
            None => writeln!(out, "game over: no")?,
        }

        Ok(())
    }
}

/// Spawns a thread that reads commands from `input` and sends them to the shell.
///
/// If reading fails, the error is reported and [`GameCommand::Exit`] is sent so the command
/// loop does not wait forever on a reader that is gone.
fn spawn_input_handler<R>(input: R, sender: Sender<GameCommand>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        if let Err(err) = input_handler(input, &sender) {
            eprintln!("Input handler thread stopping after fatal error: {err:#}");

            // Fails only if the shell is already gone
            let _ = sender.send(GameCommand::Exit);
        }
    })
}

/// Loop endlessly to read lines from `input` and send them to the shell.
fn input_handler(mut input: impl BufRead, sender: &Sender<GameCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        buffer.clear();
        let bytes = input
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(GameCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            return Ok(());
        }

        let buf = buffer.trim();
        if buf.is_empty() {
            continue;
        }

        match GameCommand::try_parse_from(buf.split_ascii_whitespace()) {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to the shell")?,

            // An invalid command is not fatal; print the usage and keep reading
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs each line through a quiet shell and returns everything it printed.
    fn run_lines(shell: &mut Shell, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            let command = line.parse::<GameCommand>().unwrap();
            shell.execute(command, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_click_moves_and_reports() {
        let mut shell = Shell::new(Game::new(), true);
        let out = run_lines(&mut shell, &["c e2", "c e4"]);

        assert!(out.contains("Selected the white pawn on e2. Moves: e4, e3"));
        assert!(out.contains("white pawn e2 -> e4"));
        assert_eq!(shell.game().turn(), Color::Black);
    }

    #[test]
    fn test_select_refusal_reasons() {
        let mut shell = Shell::new(Game::new(), true);
        let out = run_lines(&mut shell, &["select e4", "select e7"]);

        assert!(out.contains("Cannot select e4: the square is empty"));
        assert!(out.contains("Cannot select e7: it is white's turn"));
        assert_eq!(shell.game().selected(), None);
    }

    #[test]
    fn test_move_refusals() {
        let mut shell = Shell::new(Game::new(), true);
        let out = run_lines(&mut shell, &["move e4", "s e2", "m e5"]);

        assert!(out.contains("Nothing is selected"));
        assert!(out.contains("The white pawn on e2 cannot move to e5"));
        assert_eq!(shell.game().turn(), Color::White);
    }

    #[test]
    fn test_capture_check_and_game_over() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w").unwrap();
        let mut shell = Shell::new(game, true);

        let out = run_lines(&mut shell, &["s h1", "m h8"]);
        assert!(out.contains("black is in check"));

        let out = run_lines(&mut shell, &["s e8", "m d8", "s h8", "m d8"]);
        assert!(out.contains("capturing the black king"));
        assert!(out.contains("Game over: white captured the black king"));

        let before = shell.game().clone();
        let out = run_lines(&mut shell, &["c d8", "s e1", "m e2"]);
        assert_eq!(out.matches("The game is over (white won)").count(), 3);
        assert_eq!(shell.game(), &before);
    }

    #[test]
    fn test_promotion_report() {
        let game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w").unwrap();
        let mut shell = Shell::new(game, true);

        let out = run_lines(&mut shell, &["c a7", "c a8"]);
        assert!(out.contains("white pawn a7 -> a8, promoting to a queen"));
    }

    #[test]
    fn test_queries() {
        let mut shell = Shell::new(Game::new(), true);

        let out = run_lines(&mut shell, &["moves", "moves g8", "moves e4"]);
        assert_eq!(
            out,
            "No piece to show moves for\nf6, h6\nNo piece to show moves for\n"
        );

        let out = run_lines(&mut shell, &["check", "check black"]);
        assert_eq!(
            out,
            "white: not in check\nblack: not in check\nblack: not in check\n"
        );

        let out = run_lines(&mut shell, &["fen"]);
        assert_eq!(
            out,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w\n"
        );

        let out = run_lines(&mut shell, &["status"]);
        assert!(out.contains("turn: white"));
        assert!(out.contains("black king: e8"));
        assert!(out.contains("game over: no"));
    }

    #[test]
    fn test_new_and_exit() {
        let mut shell = Shell::new(Game::new(), true);
        run_lines(&mut shell, &["c g1", "c f3", "new"]);
        assert_eq!(shell.game(), &Game::new());

        let mut out = Vec::new();
        assert!(!shell.execute(GameCommand::Exit, &mut out).unwrap());
        assert!(shell.execute(GameCommand::Fen, &mut out).unwrap());
    }

    #[test]
    fn test_unreadable_input_stops_the_shell() {
        let shell = Shell::new(Game::new(), true);
        let input = io::Cursor::new(b"d\n\xff\xfe\nfen\n".to_vec());

        spawn_input_handler(input, shell.sender.clone())
            .join()
            .unwrap();

        // Lines after the bad one are never read
        let received = shell.receiver.try_iter().collect::<Vec<_>>();
        assert_eq!(received, [GameCommand::Display, GameCommand::Exit]);
    }

    #[test]
    fn test_end_of_input_stops_the_shell() {
        let shell = Shell::new(Game::new(), true);
        let input = io::Cursor::new(b"s e2\n\n  \nbogus\nm e4\n".to_vec());

        spawn_input_handler(input, shell.sender.clone())
            .join()
            .unwrap();

        let e2 = Square::from_uci("e2").unwrap();
        let e4 = Square::from_uci("e4").unwrap();
        let received = shell.receiver.try_iter().collect::<Vec<_>>();
        assert_eq!(
            received,
            [
                GameCommand::Select { square: e2 },
                GameCommand::Move { square: e4 },
                GameCommand::Exit
            ]
        );
    }

    #[test]
    fn test_send_command_reaches_receiver() {
        let shell = Shell::new(Game::new(), true);
        shell.send_command(GameCommand::Display).unwrap();
        assert_eq!(shell.receiver.try_recv().unwrap(), GameCommand::Display);
    }
}
