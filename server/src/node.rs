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

//! The tree node.
//!
//! A node owns its children through `Arc` (so a subtree detached mid-`move`
//! stays alive and can be re-attached) and reaches its parent through a
//! `Weak` behind its own small [`Mutex`], since `move` is the one operation
//! that rebinds a node's parent after construction. A node's name and child
//! map live together behind one [`RwLock`](crate::rwlock::RwLock), since both
//! only ever change together under a single write lock on the node itself.

use crate::rwlock::RwLock;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

pub(crate) struct Inner {
    pub(crate) name: String,
    pub(crate) children: HashMap<String, Arc<Node>>,
}

/// A single directory in the tree.
pub struct Node {
    pub(crate) lock: RwLock<Inner>,
    pub(crate) parent: Mutex<Weak<Node>>,
}

impl Node {
    /// Builds the unnamed root node, with no parent.
    pub(crate) fn new_root() -> Arc<Node> {
        Arc::new(Node {
            lock: RwLock::new(Inner {
                name: String::new(),
                children: HashMap::new(),
            }),
            parent: Mutex::new(Weak::new()),
        })
    }

    /// Builds a new, empty child node under `parent`.
    pub(crate) fn new_child(name: String, parent: &Arc<Node>) -> Arc<Node> {
        Arc::new(Node {
            lock: RwLock::new(Inner {
                name,
                children: HashMap::new(),
            }),
            parent: Mutex::new(Arc::downgrade(parent)),
        })
    }
}
