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

//! The concurrent, in-memory directory tree.
//!
//! Every descent is hand-over-hand: the read lock on a child is taken before
//! the read lock on its parent is released, so no thread ever observes a
//! structural change partway between two levels. Critically, the ancestor
//! read locks are not just acquired in passing — they are *held* for as long
//! as the pivot node (the one this operation will mutate) is being written
//! to, and only released, leaf-to-root, once that write is complete. This is
//! what actually serializes a `create`/`remove`/`move_path` against any
//! operation that would otherwise detach an ancestor out from under it; see
//! [`with_locked_path`]. `move_path` first classifies `source` and `target`
//! by comparing path components (never by byte-prefix: `/a/` must not match
//! `/ab/`), descends hand-over-hand to their lowest common ancestor and
//! write-locks it, then continues down each of the two disjoint branches
//! without further ancestor protection, since the LCA's write lock already
//! dominates its whole subtree.

use crate::error::{TreeError, TreeResult};
use crate::node::{Inner, Node};
use log::trace;
use std::sync::Arc;

/// A concurrent, in-memory hierarchical directory tree.
pub struct Tree {
    root: Arc<Node>,
}

impl Tree {
    /// Builds a new tree containing only the root directory `/`.
    pub fn new() -> Self {
        Self {
            root: Node::new_root(),
        }
    }

    /// Lists the immediate children of `path`, lexicographically sorted and
    /// newline-joined. The root directory is listed as `/`.
    pub fn list(&self, path: &str) -> TreeResult<String> {
        if !libsky::is_valid(path) {
            return Err(TreeError::Inval);
        }
        let components = libsky::components(path);
        with_locked_path(&self.root, &components, |node| {
            // copy names out under the read lock, then format after releasing it
            let guard = node.lock.read();
            let mut names: Vec<String> = guard.children.keys().cloned().collect();
            drop(guard);
            names.sort_unstable();
            Ok(names.join("\n"))
        })
    }

    /// Creates the directory named by `path`. The parent must already exist.
    pub fn create(&self, path: &str) -> TreeResult<()> {
        trace!("create {path}");
        if !libsky::is_valid(path) {
            return Err(TreeError::Inval);
        }
        // creating "/" itself always fails: it already exists
        let (parent_path, name) = libsky::parent_of(path).ok_or(TreeError::Exists)?;
        let parent_components = libsky::components(&parent_path);
        with_locked_path(&self.root, &parent_components, |parent| {
            let mut pg = parent.lock.write();
            if pg.children.contains_key(&name) {
                return Err(TreeError::Exists);
            }
            let child = Node::new_child(name.clone(), parent);
            pg.children.insert(name, child);
            Ok(())
        })
    }

    /// Removes the empty directory named by `path`. The root cannot be
    /// removed.
    pub fn remove(&self, path: &str) -> TreeResult<()> {
        trace!("remove {path}");
        if !libsky::is_valid(path) {
            return Err(TreeError::Inval);
        }
        if path == "/" {
            return Err(TreeError::Busy);
        }
        let (parent_path, name) = libsky::parent_of(path).expect("path != \"/\"");
        let parent_components = libsky::components(&parent_path);
        with_locked_path(&self.root, &parent_components, |parent| {
            let mut pg = parent.lock.write();
            let child = pg.children.get(&name).cloned().ok_or(TreeError::NotFound)?;
            {
                let cg = child.lock.read();
                if !cg.children.is_empty() {
                    return Err(TreeError::NotEmpty);
                }
            }
            pg.children.remove(&name);
            Ok(())
        })
    }

    /// Moves the subtree rooted at `source` so that it is named and located
    /// at `target`. `source` and `target` are compared component-wise: moving
    /// a directory into its own subtree is a cycle, and a target that is an
    /// ancestor of the source already exists (once source's own existence is
    /// established — an absent source is `NotFound`, not `Exists`). Moving a
    /// path onto itself is a no-op if the path exists.
    pub fn move_path(&self, source: &str, target: &str) -> TreeResult<()> {
        trace!("move {source} -> {target}");
        if !libsky::is_valid(source) || !libsky::is_valid(target) {
            return Err(TreeError::Inval);
        }
        if source == "/" {
            return Err(TreeError::Busy);
        }

        let source_components = libsky::components(source);
        let target_components = libsky::components(target);

        if is_prefix(&source_components, &target_components) {
            if source_components.len() == target_components.len() {
                // source == target: a no-op if the node exists, NotFound
                // otherwise. Resolving the full path under its ancestors'
                // held read locks *is* the existence check: a missing
                // component surfaces as NotFound from within the descent.
                return with_locked_path(&self.root, &source_components, |_| Ok(()));
            }
            // target lies beneath source: moving source into its own
            // subtree. Purely structural, independent of what currently
            // exists at target.
            return Err(TreeError::Cycle);
        }
        if is_prefix(&target_components, &source_components) {
            // target is a strict ancestor of source. It exists iff source
            // does (every ancestor of a reachable node is reachable too), so
            // check source first rather than assuming Exists.
            return match with_locked_path(&self.root, &source_components, |_| Ok(())) {
                Ok(()) => Err(TreeError::Exists),
                Err(e) => Err(e),
            };
        }

        let lca_len = source_components
            .iter()
            .zip(target_components.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let source_name = source_components[source_components.len() - 1].to_owned();
        let target_name = target_components[target_components.len() - 1].to_owned();
        let source_parent_is_lca = lca_len == source_components.len() - 1;
        let target_parent_is_lca = lca_len == target_components.len() - 1;

        with_locked_path(&self.root, &source_components[..lca_len], |lca| {
            let mut lca_guard = lca.lock.write();

            if source_parent_is_lca && target_parent_is_lca {
                // both source and target live directly under the LCA: a
                // rename among siblings. Only the LCA's own lock is needed.
                if !lca_guard.children.contains_key(&source_name) {
                    return Err(TreeError::NotFound);
                }
                if lca_guard.children.contains_key(&target_name) {
                    return Err(TreeError::Exists);
                }
                let moved = lca_guard
                    .children
                    .remove(&source_name)
                    .expect("checked above");
                moved.lock.write().name = target_name.clone();
                lca_guard.children.insert(target_name, moved);
                return Ok(());
            }

            // below this point source_parent and target_parent cannot be
            // the same node (if they were, the common-prefix count above
            // would have included their shared path and both flags above
            // would be true), so mutating both at once never double-borrows
            // one node's Inner. Reaching either one requires passing
            // through the LCA, whose write lock is held for this entire
            // closure, so they cannot be contended by anyone else either.
            if source_parent_is_lca {
                let target_parent = locate_components(
                    lca,
                    &target_components[lca_len..target_components.len() - 1],
                )?;
                let mut target_guard = target_parent.lock.write();
                return relocate(
                    &mut lca_guard,
                    &mut target_guard,
                    &source_name,
                    target_name,
                    &target_parent,
                );
            }
            if target_parent_is_lca {
                let source_parent = locate_components(
                    lca,
                    &source_components[lca_len..source_components.len() - 1],
                )?;
                let mut source_guard = source_parent.lock.write();
                return relocate(
                    &mut source_guard,
                    &mut lca_guard,
                    &source_name,
                    target_name,
                    lca,
                );
            }

            let target_parent = locate_components(
                lca,
                &target_components[lca_len..target_components.len() - 1],
            )?;
            let source_parent = locate_components(
                lca,
                &source_components[lca_len..source_components.len() - 1],
            )?;
            let mut source_guard = source_parent.lock.write();
            let mut target_guard = target_parent.lock.write();
            relocate(
                &mut source_guard,
                &mut target_guard,
                &source_name,
                target_name,
                &target_parent,
            )
        })
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// `true` if every component of `a` matches the corresponding component of
/// `b`, i.e. `a` names an ancestor of, or is equal to, the path named by `b`.
fn is_prefix(a: &[&str], b: &[&str]) -> bool {
    a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Removes `source_name` from `from` and inserts it into `to` under
/// `target_name`, rebinding its parent link to `new_parent`. `from` and `to`
/// must be distinct nodes' `Inner`s.
fn relocate(
    from: &mut Inner,
    to: &mut Inner,
    source_name: &str,
    target_name: String,
    new_parent: &Arc<Node>,
) -> TreeResult<()> {
    if !from.children.contains_key(source_name) {
        return Err(TreeError::NotFound);
    }
    if to.children.contains_key(&target_name) {
        return Err(TreeError::Exists);
    }
    let moved = from.children.remove(source_name).expect("checked above");
    moved.lock.write().name = target_name.clone();
    *moved.parent.lock() = Arc::downgrade(new_parent);
    to.children.insert(target_name, moved);
    Ok(())
}

/// Hand-over-hand read-lock descent from `start` along `components`, holding
/// every ancestor's read lock for the entire duration of `f`, then releasing
/// them leaf-to-root as the recursion unwinds. The node named by the last
/// component (the pivot `f` is meant to mutate, or read for `list`) is handed
/// to `f` **unlocked** — `f` takes whatever lock it needs there itself, since
/// the pivot is never read-locked by this function, only ever its ancestors.
///
/// This is the hold that actually matters: a reader or writer descending
/// toward the pivot cannot observe it being detached from the tree midway,
/// because detaching it requires a write lock on one of these held
/// ancestors, which blocks until `f` returns and the chain unwinds.
fn with_locked_path<R>(
    node: &Arc<Node>,
    components: &[&str],
    f: impl FnOnce(&Arc<Node>) -> TreeResult<R>,
) -> TreeResult<R> {
    match components.split_first() {
        None => f(node),
        Some((name, rest)) => {
            let guard = node.lock.read();
            let child = guard
                .children
                .get(*name)
                .cloned()
                .ok_or(TreeError::NotFound)?;
            let result = with_locked_path(&child, rest, f);
            drop(guard);
            result
        }
    }
}

/// Hand-over-hand read-lock descent from `start` along `components`,
/// returning the reached node with no lock held. Used only to walk *below*
/// an already write-locked pivot (e.g. the LCA in `move_path`), where no
/// further ancestor protection is needed: the pivot's write lock already
/// excludes every other operation from its whole subtree.
fn locate_components(start: &Arc<Node>, components: &[&str]) -> TreeResult<Arc<Node>> {
    let mut current = Arc::clone(start);
    let mut current_guard = current.lock.read();
    for name in components {
        let child = current_guard
            .children
            .get(*name)
            .cloned()
            .ok_or(TreeError::NotFound)?;
        let child_guard = child.lock.read();
        drop(current_guard);
        current_guard = child_guard;
        current = child;
    }
    drop(current_guard);
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_starts_empty() {
        let tree = Tree::new();
        assert_eq!(tree.list("/").unwrap(), "");
    }

    #[test]
    fn create_then_list_is_sorted() {
        let tree = Tree::new();
        tree.create("/b/").unwrap();
        tree.create("/a/").unwrap();
        assert_eq!(tree.list("/").unwrap(), "a\nb");
    }

    #[test]
    fn create_rejects_invalid_path() {
        let tree = Tree::new();
        assert_eq!(tree.create("nope").unwrap_err(), TreeError::Inval);
    }

    #[test]
    fn create_duplicate_is_exists() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        assert_eq!(tree.create("/a/").unwrap_err(), TreeError::Exists);
    }

    #[test]
    fn create_under_missing_parent_is_not_found() {
        let tree = Tree::new();
        assert_eq!(tree.create("/a/b/").unwrap_err(), TreeError::NotFound);
    }

    #[test]
    fn remove_root_is_busy() {
        let tree = Tree::new();
        assert_eq!(tree.remove("/").unwrap_err(), TreeError::Busy);
    }

    #[test]
    fn remove_missing_is_not_found() {
        let tree = Tree::new();
        assert_eq!(tree.remove("/a/").unwrap_err(), TreeError::NotFound);
    }

    #[test]
    fn remove_nonempty_is_not_empty() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.create("/a/b/").unwrap();
        assert_eq!(tree.remove("/a/").unwrap_err(), TreeError::NotEmpty);
    }

    #[test]
    fn remove_empty_succeeds() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.remove("/a/").unwrap();
        assert_eq!(tree.list("/").unwrap(), "");
    }

    #[test]
    fn move_renames_in_place() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.move_path("/a/", "/b/").unwrap();
        assert_eq!(tree.list("/").unwrap(), "b");
    }

    #[test]
    fn move_across_disjoint_parents() {
        let tree = Tree::new();
        tree.create("/x/").unwrap();
        tree.create("/y/").unwrap();
        tree.create("/x/a/").unwrap();
        tree.move_path("/x/a/", "/y/a/").unwrap();
        assert_eq!(tree.list("/x/").unwrap(), "");
        assert_eq!(tree.list("/y/").unwrap(), "a");
    }

    #[test]
    fn move_preserves_subtree_contents() {
        let tree = Tree::new();
        tree.create("/x/").unwrap();
        tree.create("/x/a/").unwrap();
        tree.create("/x/a/c/").unwrap();
        tree.create("/y/").unwrap();
        tree.move_path("/x/a/", "/y/a/").unwrap();
        assert_eq!(tree.list("/y/a/").unwrap(), "c");
    }

    #[test]
    fn move_root_is_busy() {
        let tree = Tree::new();
        assert_eq!(tree.move_path("/", "/a/").unwrap_err(), TreeError::Busy);
    }

    #[test]
    fn move_into_own_subtree_is_cycle() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.create("/a/b/").unwrap();
        assert_eq!(
            tree.move_path("/a/", "/a/b/c/").unwrap_err(),
            TreeError::Cycle
        );
    }

    #[test]
    fn move_onto_itself_is_a_noop() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.move_path("/a/", "/a/").unwrap();
        assert_eq!(tree.list("/").unwrap(), "a");
    }

    #[test]
    fn move_onto_itself_missing_is_not_found() {
        let tree = Tree::new();
        assert_eq!(
            tree.move_path("/a/", "/a/").unwrap_err(),
            TreeError::NotFound
        );
    }

    #[test]
    fn move_onto_own_ancestor_is_exists() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.create("/a/b/").unwrap();
        assert_eq!(
            tree.move_path("/a/b/", "/a/").unwrap_err(),
            TreeError::Exists
        );
    }

    #[test]
    fn move_onto_own_ancestor_with_missing_source_is_not_found() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        // /a/b/ was never created: target ("/a/") strictly contains source
        // ("/a/b/"), but source itself doesn't exist, so this must not be
        // reported as Exists.
        assert_eq!(
            tree.move_path("/a/b/", "/a/").unwrap_err(),
            TreeError::NotFound
        );
    }

    #[test]
    fn move_onto_existing_target_is_exists() {
        let tree = Tree::new();
        tree.create("/a/").unwrap();
        tree.create("/b/").unwrap();
        assert_eq!(tree.move_path("/a/", "/b/").unwrap_err(), TreeError::Exists);
        // the failed move must not have detached source
        assert_eq!(tree.list("/").unwrap(), "a\nb");
    }

    #[test]
    fn move_missing_source_is_not_found() {
        let tree = Tree::new();
        assert_eq!(
            tree.move_path("/a/", "/b/").unwrap_err(),
            TreeError::NotFound
        );
    }
}
