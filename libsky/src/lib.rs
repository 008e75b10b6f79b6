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

//! Shared utilities for the `treed` workspace
//!
//! This contains the path-parsing helpers and terminal I/O helpers which are
//! shared by both the `cli` and the `server` crates.

pub mod path;
pub mod util;

pub use path::{components, is_valid, parent_of, split_first, MAX_COMPONENT, MAX_PATH};

/// Version string shared by the binaries for `--version` output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
