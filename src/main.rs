/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::{error::ErrorKind, Parser};
use kingfall::{Cli, Shell};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    // Diagnostics go to stderr so they never interleave with the board on stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,

        // Edge case: `--help` and `--version` are both "error" cases according to Clap
        Err(e)
            if matches!(e.kind(), ErrorKind::DisplayHelp)
                || matches!(e.kind(), ErrorKind::DisplayVersion) =>
        {
            println!("{e}");
            return;
        }

        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let mut shell = Shell::new(cli.game(), cli.quiet);
    if let Err(e) = shell.run() {
        eprintln!("{} encountered an error: {e}", env!("CARGO_PKG_NAME"));
    }
}
