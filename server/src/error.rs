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

use std::fmt;

pub type TreeResult<T> = Result<T, TreeError>;

/// The error taxonomy for all `Tree` operations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum TreeError {
    /// A supplied path failed syntactic validation
    Inval,
    /// `remove`/`move` applied to the root as the source
    Busy,
    /// A component along the resolved path is absent
    NotFound,
    /// `create` target already exists; `move` target already exists or its
    /// directory chain includes the source
    Exists,
    /// `remove` target has at least one child
    NotEmpty,
    /// `move` target lies strictly under `move` source
    Cycle,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inval => write!(f, "invalid path"),
            Self::Busy => write!(f, "the root directory cannot be removed or moved"),
            Self::NotFound => write!(f, "no such directory"),
            Self::Exists => write!(f, "directory already exists"),
            Self::NotEmpty => write!(f, "directory is not empty"),
            Self::Cycle => write!(f, "cannot move a directory into its own subtree"),
        }
    }
}

impl std::error::Error for TreeError {}
