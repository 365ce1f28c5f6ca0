//! Structural and counting queries over any diagram flavor.
//!
//! These walk the shared store through node indices, so they work uniformly
//! on BDD, ADD and ZDD roots. Counting uses per-call memo tables keyed by
//! handle; exact counts are `BigUint`, minterm counts are doubles and may
//! round or saturate to `+∞` for very wide cubes.

use hashbrown::{HashMap, HashSet};

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::manager::Dd;
use crate::reference::Ref;

impl Dd {
    /// All node indices reachable from the given roots (terminals
    /// included), each exactly once, in visit order.
    pub fn descendants(&self, roots: impl IntoIterator<Item = Ref>) -> Vec<u32> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<u32> = roots.into_iter().map(|r| r.index()).collect();

        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            order.push(index);
            let node = self.node(index);
            if !node.is_terminal() {
                stack.push(node.low.index());
                stack.push(node.high.index());
            }
        }
        order
    }

    /// Number of internal nodes reachable from `f`; terminals are not
    /// counted, and shared nodes count once.
    pub fn count_nodes(&self, f: Ref) -> usize {
        self.descendants([f])
            .into_iter()
            .filter(|&index| !self.node(index).is_terminal())
            .count()
    }

    /// The support of `f`: the variables its function actually depends on,
    /// sorted by ID.
    pub fn support(&self, f: Ref) -> Vec<u32> {
        let mut vars: Vec<u32> = self
            .descendants([f])
            .into_iter()
            .filter_map(|index| {
                let node = self.node(index);
                if node.is_terminal() {
                    None
                } else {
                    Some(node.variable.id())
                }
            })
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Number of paths from `f` to the TRUE terminal, exactly.
    ///
    /// Distinct paths may assign the same minterms (a path says nothing
    /// about skipped variables); see [`count_minterms`](Dd::count_minterms)
    /// for the semantic count.
    pub fn count_paths(&self, f: Ref) -> BigUint {
        let mut memo = HashMap::new();
        self.count_paths_rec(f, &mut memo)
    }

    fn count_paths_rec(&self, f: Ref, memo: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(f) {
            return BigUint::zero();
        }
        if self.is_one(f) {
            return BigUint::one();
        }
        if let Some(paths) = memo.get(&f) {
            return paths.clone();
        }

        let paths =
            self.count_paths_rec(self.low_node(f), memo) + self.count_paths_rec(self.high_node(f), memo);

        memo.insert(f, paths.clone());
        paths
    }

    /// Number of minterms of a BDD over a cube of `n_vars` variables: the
    /// fraction of the `2^n` assignments on which `f` holds.
    pub fn count_minterms(&self, f: Ref, n_vars: u32) -> f64 {
        let mut memo = HashMap::new();
        self.minterm_fraction(f, &mut memo) * 2f64.powi(n_vars as i32)
    }

    /// Fraction of all assignments satisfying `f`. Levels skipped along an
    /// edge need no correction: a fraction is width-independent.
    fn minterm_fraction(&self, f: Ref, memo: &mut HashMap<Ref, f64>) -> f64 {
        if self.is_zero(f) {
            return 0.0;
        }
        if self.is_one(f) {
            return 1.0;
        }
        if let Some(&fraction) = memo.get(&f) {
            return fraction;
        }

        let fraction = 0.5 * self.minterm_fraction(self.low_node(f), memo)
            + 0.5 * self.minterm_fraction(self.high_node(f), memo);

        memo.insert(f, fraction);
        fraction
    }
}
