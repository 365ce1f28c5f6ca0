//! Iterator over satisfying paths in a BDD.
//!
//! Each path is a conjunction of DIMACS-style literals that makes the
//! function true; variables skipped along the path are don't-cares, so a
//! path can stand for many minterms. The number of paths can be
//! exponential in the diagram size.
//!
//! # Example
//!
//! ```
//! use ananke_dd::manager::Dd;
//!
//! let dd = Dd::new(2);
//! let x = dd.ith_var(1);
//! let y = dd.ith_var(2);
//!
//! // f = x XOR y (true when exactly one holds)
//! let f = dd.apply_xor(x, y);
//!
//! let paths: Vec<_> = dd.paths(f).collect();
//! assert_eq!(paths.len(), 2);
//! ```

use crate::manager::Dd;
use crate::reference::Ref;

impl Dd {
    /// Iterates over all paths from `f` to the TRUE terminal, each as a
    /// vector of DIMACS-style literals.
    ///
    /// The constant TRUE has exactly one path (the empty one); the constant
    /// FALSE has none.
    pub fn paths(&self, f: Ref) -> BddPaths<'_> {
        BddPaths {
            dd: self,
            stack: vec![(f, Vec::new())],
        }
    }

    /// Iterates over all paths to the FALSE terminal; equivalent to
    /// `paths(-f)` but explicit about intent.
    pub fn paths_to_false(&self, f: Ref) -> BddPaths<'_> {
        self.paths(-f)
    }
}

/// Iterator over satisfying paths, created by [`Dd::paths`].
pub struct BddPaths<'a> {
    dd: &'a Dd,
    stack: Vec<(Ref, Vec<i32>)>,
}

impl Iterator for BddPaths<'_> {
    type Item = Vec<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, path)) = self.stack.pop() {
            if self.dd.is_zero(node) {
                continue;
            }
            if self.dd.is_one(node) {
                return Some(path);
            }

            let v = self.dd.variable(node.index()).id() as i32;

            let mut path_high = path.clone();
            path_high.push(v);
            self.stack.push((self.dd.high_node(node), path_high));

            let mut path_low = path;
            path_low.push(-v);
            self.stack.push((self.dd.low_node(node), path_low));
        }
        None
    }
}
