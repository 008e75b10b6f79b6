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

use crate::command::Command;
use crate::error::CliResult;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use treed::Tree;

const HISTORY_FILE: &str = ".treesh_history";
const PROMPT: &str = "treesh> ";

pub fn start(tree: &Tree) -> CliResult<()> {
    let mut editor = DefaultEditor::new()?;
    editor.set_auto_add_history(true);
    let _ = editor.load_history(HISTORY_FILE);

    println!("treed shell. type `help` for a list of commands, `quit` to exit.");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let keep_going = match Command::parse(&line) {
                    Ok(Some(cmd)) => cmd.run(tree),
                    Ok(None) => true,
                    Err(e) => {
                        eprintln!("error: {e}");
                        true
                    }
                };
                if !keep_going {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    let _ = editor.save_history(HISTORY_FILE);
    Ok(())
}
