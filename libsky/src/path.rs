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

//! Path syntax and decomposition.
//!
//! A path is a sequence of `/`-separated components. A component is one to
//! [`MAX_COMPONENT`] lower-case ASCII letters. A valid path begins and ends
//! with `/`; the root path is exactly `/`. These helpers are intentionally
//! free functions with no knowledge of the tree: validity and decomposition
//! are a pure string concern.

/// Maximum length, in bytes, of a single path component.
pub const MAX_COMPONENT: usize = 255;
/// Maximum length, in bytes, of an entire path.
pub const MAX_PATH: usize = 4096;

/// Returns `true` if every component of `path` is 1..=[`MAX_COMPONENT`]
/// lower-case ASCII letters, `path` starts and ends with `/`, and the total
/// length does not exceed [`MAX_PATH`].
pub fn is_valid(path: &str) -> bool {
    if path.len() > MAX_PATH {
        return false;
    }
    if !path.starts_with('/') || !path.ends_with('/') {
        return false;
    }
    if path == "/" {
        return true;
    }
    // strip the leading and trailing '/' and split the rest on '/'
    let inner = &path[1..path.len() - 1];
    inner.split('/').all(is_valid_component)
}

fn is_valid_component(component: &str) -> bool {
    !component.is_empty()
        && component.len() <= MAX_COMPONENT
        && component.bytes().all(|b| b.is_ascii_lowercase())
}

/// Splits off the first path component.
///
/// Returns `None` when `path` is `/` (no components left). Otherwise returns
/// `(first_component, remainder)` where `remainder` is itself a valid path
/// (always starts and ends with `/`), so this can be called repeatedly to
/// walk a path component-by-component from root toward leaf.
///
/// The caller is expected to have already validated `path` with
/// [`is_valid`]; this function does not re-validate.
pub fn split_first(path: &str) -> Option<(&str, &str)> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return None;
    }
    let end = rest.find('/').expect("valid path has a trailing '/'");
    let (first, after) = rest.split_at(end);
    // `after` still has its leading '/'; that's the start of the remainder
    Some((first, after))
}

/// Splits a path into its ordered sequence of components.
///
/// `"/"` decomposes to an empty slice. Callers that already hold a validated
/// path (see [`is_valid`]) can rely on every returned component being
/// non-empty.
pub fn components(path: &str) -> Vec<&str> {
    match path {
        "/" => Vec::new(),
        path => path.trim_matches('/').split('/').collect(),
    }
}

/// Splits a path into its parent path and final component.
///
/// Returns `None` when `path` is `/` (the root has no parent). Otherwise
/// returns `(parent_path, last_component)`.
pub fn parent_of(path: &str) -> Option<(String, String)> {
    if path == "/" {
        return None;
    }
    let trimmed = &path[..path.len() - 1]; // drop trailing '/'
    let split_at = trimmed.rfind('/').unwrap();
    let parent_path = &trimmed[..=split_at];
    let last_component = &trimmed[split_at + 1..];
    Some((parent_path.to_owned(), last_component.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_valid() {
        assert!(is_valid("/"));
    }

    #[test]
    fn rejects_missing_slashes() {
        assert!(!is_valid(""));
        assert!(!is_valid("a"));
        assert!(!is_valid("/a"));
        assert!(!is_valid("a/"));
    }

    #[test]
    fn rejects_bad_components() {
        assert!(!is_valid("//"));
        assert!(!is_valid("/A/"));
        assert!(!is_valid("/a1/"));
        assert!(!is_valid("/a-b/"));
        assert!(!is_valid("/a//b/"));
    }

    #[test]
    fn accepts_nested_paths() {
        assert!(is_valid("/a/b/c/"));
    }

    #[test]
    fn split_first_walks_root_to_leaf() {
        let mut remainder = "/a/bb/ccc/";
        let mut out = vec![];
        while let Some((first, rest)) = split_first(remainder) {
            out.push(first.to_owned());
            remainder = rest;
        }
        assert_eq!(out, vec!["a", "bb", "ccc"]);
        assert_eq!(split_first("/"), None);
    }

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(parent_of("/"), None);
    }

    #[test]
    fn parent_of_splits_last_component() {
        assert_eq!(parent_of("/a/"), Some(("/".to_owned(), "a".to_owned())));
        assert_eq!(
            parent_of("/a/b/"),
            Some(("/a/".to_owned(), "b".to_owned()))
        );
    }

    #[test]
    fn components_splits_every_segment() {
        assert!(components("/").is_empty());
        assert_eq!(components("/a/bb/ccc/"), vec!["a", "bb", "ccc"]);
    }

    #[test]
    fn prefix_is_component_wise_not_byte_wise() {
        // /a/ must not be treated as a byte-prefix of /ab/
        let (c1, _) = split_first("/a/").unwrap();
        let (c2, _) = split_first("/ab/").unwrap();
        assert_ne!(c1, c2);
    }
}
