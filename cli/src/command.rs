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

//! Parses one line of shell input into a [`Command`] and runs it against a
//! [`Tree`]. This is glue only: there's no wire protocol here, so a
//! "command" is just a verb plus its path arguments.

use crate::error::{CliError, CliResult};
use libsky::util::terminal::write_error;
use treed::Tree;

const TXT_HELP: &str = "\
commands:
  list <path>             list the immediate children of <path>
  create <path>            create a new, empty directory at <path>
  remove <path>            remove the empty directory at <path>
  move <source> <target>  move the subtree at <source> to <target>
  help                     show this message
  quit                     exit the shell

paths are /-separated, start and end with '/', and components are
lower-case ascii letters, e.g. /home/user/";

pub enum Command {
    List(String),
    Create(String),
    Remove(String),
    Move(String, String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> CliResult<Option<Self>> {
        let mut words = line.split_whitespace();
        let verb = match words.next() {
            Some(verb) => verb,
            None => return Ok(None),
        };
        let cmd = match verb {
            "list" | "ls" => Command::List(next_arg(&mut words, "path")?),
            "create" | "mkdir" => Command::Create(next_arg(&mut words, "path")?),
            "remove" | "rm" | "rmdir" => Command::Remove(next_arg(&mut words, "path")?),
            "move" | "mv" => {
                let source = next_arg(&mut words, "source")?;
                let target = next_arg(&mut words, "target")?;
                Command::Move(source, target)
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CliError::ArgsErr(format!("unknown command `{other}`"))),
        };
        Ok(Some(cmd))
    }

    /// Runs the command against `tree`, printing its output. Returns `false`
    /// when the shell should exit.
    pub fn run(self, tree: &Tree) -> bool {
        match self {
            Command::List(path) => match tree.list(&path) {
                Ok(listing) if listing.is_empty() => {}
                Ok(listing) => println!("{listing}"),
                Err(e) => report(e),
            },
            Command::Create(path) => {
                if let Err(e) = tree.create(&path) {
                    report(e);
                }
            }
            Command::Remove(path) => {
                if let Err(e) = tree.remove(&path) {
                    report(e);
                }
            }
            Command::Move(source, target) => {
                if let Err(e) = tree.move_path(&source, &target) {
                    report(e);
                }
            }
            Command::Help => println!("{TXT_HELP}"),
            Command::Quit => return false,
        }
        true
    }
}

fn report(e: treed::TreeError) {
    let _ = write_error(format_args!("error: {e}\n"));
}

fn next_arg(words: &mut std::str::SplitWhitespace<'_>, what: &str) -> CliResult<String> {
    words
        .next()
        .map(str::to_owned)
        .ok_or_else(|| CliError::ArgsErr(format!("missing {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list() {
        match Command::parse("list /a/").unwrap().unwrap() {
            Command::List(p) => assert_eq!(p, "/a/"),
            _ => panic!("expected List"),
        }
    }

    #[test]
    fn parses_move_with_two_args() {
        match Command::parse("move /a/ /b/").unwrap().unwrap() {
            Command::Move(s, t) => {
                assert_eq!(s, "/a/");
                assert_eq!(t, "/b/");
            }
            _ => panic!("expected Move"),
        }
    }

    #[test]
    fn blank_line_is_none() {
        assert!(Command::parse("   ").unwrap().is_none());
    }

    #[test]
    fn unknown_verb_is_an_error() {
        assert!(Command::parse("frobnicate /a/").is_err());
    }

    #[test]
    fn missing_argument_is_an_error() {
        assert!(Command::parse("create").is_err());
        assert!(Command::parse("move /a/").is_err());
    }
}
