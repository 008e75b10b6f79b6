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

//! # treed
//!
//! `treed` is the synchronization core of a concurrent, in-memory,
//! hierarchical directory tree. There are several modules within this
//! crate; see the modules for their respective documentation.
//!
//! The two modules that matter most are [`rwlock`], the reader-preference
//! reader-writer lock with explicit turn handoff, and [`tree`], the
//! hand-over-hand locked tree built on top of it.

pub mod config;
pub mod error;
pub mod node;
pub mod rwlock;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use tree::Tree;
