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

use clap::{ArgAction, Parser};

const HELP_TEMPLATE: &str = r#"
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"#;

#[derive(Parser)]
#[command(author, version, about, long_about = None, disable_help_flag = true, help_template = HELP_TEMPLATE)]
pub struct Cli {
    #[arg(
        short = 'e',
        long = "eval",
        help = "Run one or more commands without starting the shell",
        value_name = "COMMAND",
        num_args = 0..
    )]
    pub expressions: Option<Vec<String>>,

    #[arg(long, help = "Print help information", action = ArgAction::Help)]
    pub help: Option<bool>,
}
