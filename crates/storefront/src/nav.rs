//! Route-active matching for navigation entries.
//!
//! Page shells highlight the navigation entry that corresponds to the
//! current location. Matching is done on path *segments*, so `/shop` is
//! active on `/shop/tea` but not on `/shopping`.

use serde::Serialize;

/// Split a path into its non-empty segments, ignoring query and fragment.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// Whether a navigation entry pointing at `target_href` is active while the
/// client is at `current_path`.
///
/// - `exact`: active iff both paths have the same segments.
/// - target `/`: active only at the root.
/// - otherwise: active iff the target's segments prefix the current path's.
///
/// Trailing slashes and repeated separators are insignificant.
#[must_use]
pub fn is_active(current_path: &str, target_href: &str, exact: bool) -> bool {
    let mut current = segments(current_path);
    let mut target = segments(target_href).peekable();

    if target.peek().is_none() {
        return current.next().is_none();
    }

    for expected in target {
        if current.next() != Some(expected) {
            return false;
        }
    }

    !exact || current.next().is_none()
}

/// A navigation entry rendered by a page shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    /// Only active on the exact path, not its descendants.
    pub exact: bool,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            exact: false,
        }
    }

    #[must_use]
    pub const fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Whether this entry is active at `current_path`.
    #[must_use]
    pub fn is_active(&self, current_path: &str) -> bool {
        is_active(current_path, &self.href, self.exact)
    }
}
