//! Keeps model-supplied paths under the sandbox root
//!
//! This is a prefix rewrite, not a security boundary: `..` segments are left
//! alone, so a path like `../etc/passwd` resolves outside the root.

use std::path::{Path, PathBuf};

/// Default sandbox directory, relative to the process working directory
pub const DEFAULT_ROOT: &str = "workspace";

/// The fixed base directory all tool paths live under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    root: PathBuf,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rewrite `path` so it sits under the sandbox root.
    ///
    /// Paths that already start with the root are returned unchanged;
    /// everything else has leading slashes stripped and is joined onto it.
    pub fn normalize(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.starts_with(&self.root) {
            return candidate.to_path_buf();
        }
        self.root.join(path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_is_rooted() {
        let sandbox = Sandbox::default();
        assert_eq!(sandbox.normalize("app.js"), PathBuf::from("workspace/app.js"));
        assert_eq!(sandbox.normalize("src/lib.rs"), PathBuf::from("workspace/src/lib.rs"));
    }

    #[test]
    fn test_leading_slash_stripped() {
        let sandbox = Sandbox::default();
        assert_eq!(sandbox.normalize("/app.js"), PathBuf::from("workspace/app.js"));
        assert_eq!(sandbox.normalize("//a/b"), PathBuf::from("workspace/a/b"));
    }

    #[test]
    fn test_already_rooted_unchanged() {
        let sandbox = Sandbox::default();
        assert_eq!(sandbox.normalize("workspace/app.js"), PathBuf::from("workspace/app.js"));
        assert_eq!(sandbox.normalize("workspace"), PathBuf::from("workspace"));
    }

    #[test]
    fn test_absolute_root() {
        let sandbox = Sandbox::new("/tmp/agent/workspace");
        assert_eq!(
            sandbox.normalize("/tmp/agent/workspace/x.txt"),
            PathBuf::from("/tmp/agent/workspace/x.txt")
        );
        assert_eq!(
            sandbox.normalize("/etc/passwd"),
            PathBuf::from("/tmp/agent/workspace/etc/passwd")
        );
    }

    #[test]
    fn test_root_prefix_is_component_wise() {
        // "workspace2" is a sibling, not a child, of "workspace"
        let sandbox = Sandbox::default();
        assert_eq!(sandbox.normalize("workspace2/a"), PathBuf::from("workspace/workspace2/a"));
    }

    #[test]
    fn test_parent_segments_not_rejected() {
        let sandbox = Sandbox::default();
        assert_eq!(sandbox.normalize("../outside.txt"), PathBuf::from("workspace/../outside.txt"));
    }
}
