/*
 * This file is a part of treed, a concurrent in-memory directory tree engine.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

macro_rules! fatal {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit(0x01);
    }}
}

mod cli;
mod command;
mod error;
mod repl;

use clap::Parser;
use cli::Cli;
use command::Command;
use error::CliResult;
use treed::Tree;

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => fatal!("treesh: {e}"),
    }
}

fn run() -> CliResult<()> {
    let args = Cli::parse();
    let tree = Tree::new();

    match args.expressions {
        Some(expressions) => {
            for expression in expressions {
                match Command::parse(&expression)? {
                    Some(cmd) => {
                        cmd.run(&tree);
                    }
                    None => {}
                }
            }
            Ok(())
        }
        None => repl::start(&tree),
    }
}
