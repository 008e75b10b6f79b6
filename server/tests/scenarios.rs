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

//! Integration tests for the seven testable scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use treed::{Tree, TreeError};

#[test]
fn scenario_empty_tree_has_only_root() {
    let tree = Tree::new();
    assert_eq!(tree.list("/").unwrap(), "");
    assert_eq!(tree.list("/a/").unwrap_err(), TreeError::NotFound);
}

#[test]
fn scenario_create_is_visible_to_list() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(tree.list("/").unwrap(), "a");
    assert_eq!(tree.list("/a/").unwrap(), "b");
}

#[test]
fn scenario_remove_requires_empty_directory() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(tree.remove("/a/").unwrap_err(), TreeError::NotEmpty);
    tree.remove("/a/b/").unwrap();
    tree.remove("/a/").unwrap();
    assert_eq!(tree.list("/").unwrap(), "");
}

#[test]
fn scenario_move_relocates_a_subtree_intact() {
    let tree = Tree::new();
    tree.create("/src/").unwrap();
    tree.create("/src/child/").unwrap();
    tree.create("/src/child/grandchild/").unwrap();
    tree.create("/dst/").unwrap();

    tree.move_path("/src/child/", "/dst/child/").unwrap();

    assert_eq!(tree.list("/src/").unwrap(), "");
    assert_eq!(tree.list("/dst/").unwrap(), "child");
    assert_eq!(tree.list("/dst/child/").unwrap(), "grandchild");
}

#[test]
fn scenario_move_rejects_cycles_and_leaves_tree_untouched() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    tree.create("/a/b/c/").unwrap();

    assert_eq!(
        tree.move_path("/a/", "/a/b/a/").unwrap_err(),
        TreeError::Cycle
    );
    // nothing should have moved
    assert_eq!(tree.list("/").unwrap(), "a");
    assert_eq!(tree.list("/a/").unwrap(), "b");
    assert_eq!(tree.list("/a/b/").unwrap(), "c");
}

#[test]
fn scenario_failed_move_does_not_detach_the_source() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/x/").unwrap();
    tree.create("/b/").unwrap();
    tree.create("/b/x/").unwrap();

    // /b/x/ already exists, so the move must fail without touching /a/x/
    assert_eq!(
        tree.move_path("/a/x/", "/b/x/").unwrap_err(),
        TreeError::Exists
    );
    assert_eq!(tree.list("/a/").unwrap(), "x");
    assert_eq!(tree.list("/b/").unwrap(), "x");
}

#[test]
fn scenario_concurrent_create_and_list_under_stress() {
    // many threads create distinct siblings under one directory while a
    // reader thread repeatedly lists it; nothing should panic or deadlock
    // and the final listing must contain exactly every created name.
    const WRITERS: usize = 16;
    const READERS: usize = 4;

    let tree = Arc::new(Tree::new());
    tree.create("/work/").unwrap();

    let barrier = Arc::new(Barrier::new(WRITERS + READERS));
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let reads_done = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();

    for id in 0..WRITERS {
        let tree = Arc::clone(&tree);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            tree.create(&format!("/work/n{id}/")).unwrap();
        }));
    }

    for _ in 0..READERS {
        let tree = Arc::clone(&tree);
        let barrier = Arc::clone(&barrier);
        let stop = Arc::clone(&stop);
        let reads_done = Arc::clone(&reads_done);
        handles.push(thread::spawn(move || {
            barrier.wait();
            while !stop.load(Ordering::SeqCst) {
                let _ = tree.list("/work/").unwrap();
                reads_done.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    // give readers a head start running concurrently with the writers
    thread::sleep(std::time::Duration::from_millis(20));
    stop.store(true, Ordering::SeqCst);

    for h in handles {
        h.join().unwrap();
    }

    let mut expected: Vec<String> = (0..WRITERS).map(|id| format!("n{id}")).collect();
    expected.sort();
    let listing = tree.list("/work/").unwrap();
    let mut got: Vec<String> = listing.split('\n').map(str::to_owned).collect();
    got.sort();
    assert_eq!(got, expected);
    assert!(reads_done.load(Ordering::SeqCst) > 0);
}
