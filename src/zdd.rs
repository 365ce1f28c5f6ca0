//! The ZDD kernel: families of sparse sets under zero-suppression.
//!
//! ZDDs reinterpret the shared terminals: `zero()` is the empty family and
//! `one()` is `{∅}`, the family containing only the empty set. A node's low
//! branch holds the sets without its variable, the high branch the sets
//! with it; nodes whose high branch is the empty family are suppressed, so
//! a variable skipped along an edge is implicitly absent.
//!
//! No complement edges: apart from the shared `zero()` handle, every ZDD
//! handle is regular.

use hashbrown::HashMap;
use log::debug;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::cache::{Op, OpKey};
use crate::manager::Dd;
use crate::reference::Ref;
use crate::types::Level;

impl Dd {
    /// The empty family: no sets at all.
    pub fn zdd_empty(&self) -> Ref {
        self.zero()
    }

    /// The base family `{∅}`: exactly the empty set.
    pub fn zdd_base(&self) -> Ref {
        self.one()
    }

    /// The family containing exactly one set: `{{vars}}`.
    ///
    /// # Panics
    ///
    /// Panics if any variable is outside `1..=num_vars()`.
    pub fn zdd_singleton(&self, vars: &[u32]) -> Ref {
        let mut levels: Vec<Level> = vars.iter().map(|&v| self.level_of(self.check_var(v))).collect();
        levels.sort();
        levels.dedup();

        // Fold bottom-up: deepest level first.
        let mut current = self.one();
        for &level in levels.iter().rev() {
            current = self.zdd_mk_node(level, self.zero(), current);
        }
        current
    }

    /// The power set `2^{vars}`: every subset of the given variables.
    pub fn zdd_powerset(&self, vars: &[u32]) -> Ref {
        let mut levels: Vec<Level> = vars.iter().map(|&v| self.level_of(self.check_var(v))).collect();
        levels.sort();
        levels.dedup();

        let mut current = self.one();
        for &level in levels.iter().rev() {
            current = self.zdd_mk_node(level, current, current);
        }
        current
    }

    /// Both ZDD cofactors of `f` at `level`: `(low, high)`. A handle whose
    /// node sits strictly below `level` has skipped the variable, which is
    /// implicitly absent: the high cofactor is the empty family.
    fn zdd_top_cofactors(&self, f: Ref, level: Level) -> (Ref, Ref) {
        if self.node_level(f) == level {
            let node = self.node(f.index());
            (node.low, node.high)
        } else {
            (f, self.zero())
        }
    }

    /// Union of two families: sets in either.
    pub fn zdd_union(&self, f: Ref, g: Ref) -> Ref {
        debug!("zdd_union(f = {}, g = {})", f, g);

        if self.is_zero(f) {
            return g;
        }
        if self.is_zero(g) || f == g {
            return f;
        }

        let key = OpKey::commutative(Op::ZddUnion, f, g);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let top = self.node_level(f).min(self.node_level(g));
        let (e_f, t_f) = self.zdd_top_cofactors(f, top);
        let (e_g, t_g) = self.zdd_top_cofactors(g, top);

        let low = self.zdd_union(e_f, e_g);
        let high = self.zdd_union(t_f, t_g);
        let res = self.zdd_mk_node(top, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Intersection of two families: sets in both.
    pub fn zdd_intersection(&self, f: Ref, g: Ref) -> Ref {
        debug!("zdd_intersection(f = {}, g = {})", f, g);

        if self.is_zero(f) || self.is_zero(g) {
            return self.zero();
        }
        if f == g {
            return f;
        }

        let key = OpKey::commutative(Op::ZddIntersect, f, g);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let top = self.node_level(f).min(self.node_level(g));
        let (e_f, t_f) = self.zdd_top_cofactors(f, top);
        let (e_g, t_g) = self.zdd_top_cofactors(g, top);

        let low = self.zdd_intersection(e_f, e_g);
        let high = self.zdd_intersection(t_f, t_g);
        let res = self.zdd_mk_node(top, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Difference of two families: sets in `f` but not in `g`.
    pub fn zdd_difference(&self, f: Ref, g: Ref) -> Ref {
        debug!("zdd_difference(f = {}, g = {})", f, g);

        if self.is_zero(f) || f == g {
            return self.zero();
        }
        if self.is_zero(g) {
            return f;
        }

        let key = OpKey::binary(Op::ZddDiff, f, g);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let top = self.node_level(f).min(self.node_level(g));
        let (e_f, t_f) = self.zdd_top_cofactors(f, top);
        let (e_g, t_g) = self.zdd_top_cofactors(g, top);

        let low = self.zdd_difference(e_f, e_g);
        let high = self.zdd_difference(t_f, t_g);
        let res = self.zdd_mk_node(top, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Join (product) of two families: `{S ∪ T | S ∈ F, T ∈ G}`.
    pub fn zdd_join(&self, f: Ref, g: Ref) -> Ref {
        if self.is_zero(f) || self.is_zero(g) {
            return self.zero();
        }
        if self.is_one(f) {
            return g;
        }
        if self.is_one(g) {
            return f;
        }

        let key = OpKey::commutative(Op::ZddJoin, f, g);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let f_level = self.node_level(f);
        let g_level = self.node_level(g);
        let top = f_level.min(g_level);

        let res = if f_level == g_level {
            let f_node = self.node(f.index());
            let g_node = self.node(g.index());

            // The top variable joins in when either side carries it.
            let low = self.zdd_join(f_node.low, g_node.low);
            let hi_lo = self.zdd_join(f_node.high, g_node.low);
            let lo_hi = self.zdd_join(f_node.low, g_node.high);
            let hi_hi = self.zdd_join(f_node.high, g_node.high);
            let high = self.zdd_union(hi_lo, self.zdd_union(lo_hi, hi_hi));

            self.zdd_mk_node(top, low, high)
        } else {
            // Only one operand branches at the top level.
            let (upper, other) = if f_level < g_level { (f, g) } else { (g, f) };
            let node = self.node(upper.index());
            let low = self.zdd_join(node.low, other);
            let high = self.zdd_join(node.high, other);
            self.zdd_mk_node(top, low, high)
        };

        self.cache_insert(key, res);
        res
    }

    /// The sets of `f` that omit variable `i`, unchanged.
    ///
    /// A variable above `f`'s support is absent from every set, so the
    /// whole family qualifies.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside `1..=num_vars()`.
    pub fn zdd_subset0(&self, f: Ref, i: u32) -> Ref {
        let var = self.check_var(i);
        self.zdd_subset0_rec(f, self.level_of(var))
    }

    fn zdd_subset0_rec(&self, f: Ref, level: Level) -> Ref {
        let f_level = self.node_level(f);
        if f_level > level {
            return f;
        }
        let node = self.node(f.index());
        if f_level == level {
            return node.low;
        }

        let key = OpKey::with_word(Op::ZddSubset0, f, level.index() as u64);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let low = self.zdd_subset0_rec(node.low, level);
        let high = self.zdd_subset0_rec(node.high, level);
        let res = self.zdd_mk_node(f_level, low, high);

        self.cache_insert(key, res);
        res
    }

    /// The sets of `f` that contain variable `i`, each with `i` removed.
    ///
    /// A variable above `f`'s support is in no set: the result is empty.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside `1..=num_vars()`.
    pub fn zdd_subset1(&self, f: Ref, i: u32) -> Ref {
        let var = self.check_var(i);
        self.zdd_subset1_rec(f, self.level_of(var))
    }

    fn zdd_subset1_rec(&self, f: Ref, level: Level) -> Ref {
        let f_level = self.node_level(f);
        if f_level > level {
            return self.zero();
        }
        let node = self.node(f.index());
        if f_level == level {
            return node.high;
        }

        let key = OpKey::with_word(Op::ZddSubset1, f, level.index() as u64);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let low = self.zdd_subset1_rec(node.low, level);
        let high = self.zdd_subset1_rec(node.high, level);
        let res = self.zdd_mk_node(f_level, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Toggles membership of variable `i` in every set of `f`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside `1..=num_vars()`.
    pub fn zdd_change(&self, f: Ref, i: u32) -> Ref {
        let var = self.check_var(i);
        self.zdd_change_rec(f, self.level_of(var))
    }

    fn zdd_change_rec(&self, f: Ref, level: Level) -> Ref {
        if self.is_zero(f) {
            return self.zero();
        }
        let f_level = self.node_level(f);
        if f_level > level {
            // The variable was absent everywhere; now it is present
            // everywhere.
            return self.zdd_mk_node(level, self.zero(), f);
        }
        let node = self.node(f.index());
        if f_level == level {
            return self.zdd_mk_node(level, node.high, node.low);
        }

        let key = OpKey::with_word(Op::ZddChange, f, level.index() as u64);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let low = self.zdd_change_rec(node.low, level);
        let high = self.zdd_change_rec(node.high, level);
        let res = self.zdd_mk_node(f_level, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Number of sets in the family, exactly.
    pub fn zdd_count(&self, f: Ref) -> BigUint {
        let mut memo = HashMap::new();
        self.zdd_count_rec(f, &mut memo)
    }

    fn zdd_count_rec(&self, f: Ref, memo: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(f) {
            return BigUint::zero();
        }
        if self.is_one(f) {
            return BigUint::one();
        }
        if let Some(count) = memo.get(&f) {
            return count.clone();
        }

        let node = self.node(f.index());
        let count = self.zdd_count_rec(node.low, memo) + self.zdd_count_rec(node.high, memo);

        memo.insert(f, count.clone());
        count
    }

    /// Builds the family containing exactly the given sets.
    pub fn zdd_from_sets(&self, sets: &[Vec<u32>]) -> Ref {
        let mut result = self.zero();
        for set in sets {
            let single = self.zdd_singleton(set);
            result = self.zdd_union(result, single);
        }
        result
    }

    /// Iterates over the sets of the family, each as a sorted `Vec<u32>` of
    /// variable IDs. Enumeration follows the else child before the then
    /// child at every node.
    ///
    /// The number of sets can be exponential in the diagram size.
    pub fn zdd_to_sets(&self, f: Ref) -> ZddSets<'_> {
        ZddSets {
            dd: self,
            stack: vec![(f, Vec::new())],
        }
    }
}

/// Iterator over the sets represented by a ZDD.
///
/// Created by [`Dd::zdd_to_sets`].
pub struct ZddSets<'a> {
    dd: &'a Dd,
    stack: Vec<(Ref, Vec<u32>)>,
}

impl Iterator for ZddSets<'_> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, chosen)) = self.stack.pop() {
            if self.dd.is_zero(node) {
                continue;
            }
            if self.dd.is_one(node) {
                return Some(chosen);
            }

            let record = self.dd.node(node.index());
            let var = record.variable.id();

            // Push the high branch first so the low (variable absent)
            // branch is explored first.
            let mut with_var = chosen.clone();
            with_var.push(var);
            self.stack.push((record.high, with_var));
            self.stack.push((record.low, chosen));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut sets: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
        for s in sets.iter_mut() {
            s.sort_unstable();
        }
        sets.sort();
        sets
    }

    #[test]
    fn test_terminal_families() {
        let dd = Dd::new(4);
        assert_eq!(dd.zdd_count(dd.zdd_empty()), BigUint::zero());
        assert_eq!(dd.zdd_count(dd.zdd_base()), BigUint::one());
        assert_eq!(dd.zdd_to_sets(dd.zdd_empty()).count(), 0);
        assert_eq!(dd.zdd_to_sets(dd.zdd_base()).collect::<Vec<_>>(), vec![Vec::<u32>::new()]);
    }

    #[test]
    fn test_singleton() {
        let dd = Dd::new(4);
        let s = dd.zdd_singleton(&[1, 3]);
        assert_eq!(dd.zdd_count(s), BigUint::one());
        assert_eq!(sorted(dd.zdd_to_sets(s).collect()), vec![vec![1, 3]]);

        // The empty singleton is the base family.
        assert_eq!(dd.zdd_singleton(&[]), dd.zdd_base());
        // Input order does not matter.
        assert_eq!(dd.zdd_singleton(&[3, 1]), s);
    }

    #[test]
    fn test_union_laws() {
        let dd = Dd::new(4);
        let f = dd.zdd_from_sets(&[vec![1, 2], vec![3]]);
        let g = dd.zdd_from_sets(&[vec![2], vec![3]]);

        assert_eq!(dd.zdd_union(f, g), dd.zdd_union(g, f));
        assert_eq!(dd.zdd_union(f, dd.zdd_empty()), f);
        assert_eq!(dd.zdd_union(f, f), f);

        let h = dd.zdd_singleton(&[4]);
        let a = dd.zdd_union(dd.zdd_union(f, g), h);
        let b = dd.zdd_union(f, dd.zdd_union(g, h));
        assert_eq!(a, b);

        assert_eq!(dd.zdd_count(dd.zdd_union(f, g)), BigUint::from(3u32));
    }

    #[test]
    fn test_intersection_and_difference() {
        let dd = Dd::new(4);
        let f = dd.zdd_from_sets(&[vec![1, 2], vec![2, 3], vec![1, 3], vec![4]]);
        let g = dd.zdd_from_sets(&[vec![1, 2], vec![1, 3], vec![1, 4]]);

        let inter = dd.zdd_intersection(f, g);
        assert_eq!(dd.zdd_count(inter), BigUint::from(2u32));
        assert_eq!(sorted(dd.zdd_to_sets(inter).collect()), vec![vec![1, 2], vec![1, 3]]);

        assert_eq!(dd.zdd_intersection(f, dd.zdd_empty()), dd.zdd_empty());
        assert_eq!(dd.zdd_difference(f, f), dd.zdd_empty());
        assert_eq!(dd.zdd_difference(f, dd.zdd_empty()), f);

        let diff = dd.zdd_difference(f, g);
        assert_eq!(dd.zdd_count(diff), BigUint::from(2u32));
        assert_eq!(sorted(dd.zdd_to_sets(diff).collect()), vec![vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_subset_operations() {
        let dd = Dd::new(4);
        let f = dd.zdd_from_sets(&[vec![1, 2], vec![2, 3], vec![1, 3], vec![4]]);

        // Sets containing 1, with 1 removed: {2}, {3}.
        let s1 = dd.zdd_subset1(f, 1);
        assert_eq!(dd.zdd_count(s1), BigUint::from(2u32));
        assert_eq!(sorted(dd.zdd_to_sets(s1).collect()), vec![vec![2], vec![3]]);

        // Sets omitting 1: {2,3}, {4}.
        let s0 = dd.zdd_subset0(f, 1);
        assert_eq!(sorted(dd.zdd_to_sets(s0).collect()), vec![vec![2, 3], vec![4]]);

        // Above-the-support semantics: the family below never mentions 1.
        let below = dd.zdd_from_sets(&[vec![3], vec![4]]);
        assert_eq!(dd.zdd_subset1(below, 1), dd.zdd_empty());
        assert_eq!(dd.zdd_subset0(below, 1), below);
    }

    #[test]
    fn test_change() {
        let dd = Dd::new(4);

        // change({∅}, v) = {{v}} and back.
        let base = dd.zdd_base();
        let v2 = dd.zdd_change(base, 2);
        assert_eq!(v2, dd.zdd_singleton(&[2]));
        assert_eq!(dd.zdd_change(v2, 2), base);

        // Toggling 1 in {{1,2},{3}} gives {{2},{1,3}}.
        let f = dd.zdd_from_sets(&[vec![1, 2], vec![3]]);
        let g = dd.zdd_change(f, 1);
        assert_eq!(sorted(dd.zdd_to_sets(g).collect()), vec![vec![1, 3], vec![2]]);
        // An involution.
        assert_eq!(dd.zdd_change(g, 1), f);
    }

    #[test]
    fn test_join() {
        let dd = Dd::new(4);
        let s1 = dd.zdd_singleton(&[1]);
        let s2 = dd.zdd_singleton(&[2]);

        // {{1}} ⊗ {{2}} = {{1,2}}.
        let joined = dd.zdd_join(s1, s2);
        assert_eq!(joined, dd.zdd_singleton(&[1, 2]));

        // {∅} is the unit, ∅ absorbs.
        assert_eq!(dd.zdd_join(s1, dd.zdd_base()), s1);
        assert_eq!(dd.zdd_join(s1, dd.zdd_empty()), dd.zdd_empty());

        // {{1},{2}} ⊗ {{3},{1}} = {{1,3},{1},{1,2},{2,3}}.
        let f = dd.zdd_from_sets(&[vec![1], vec![2]]);
        let g = dd.zdd_from_sets(&[vec![3], vec![1]]);
        let fg = dd.zdd_join(f, g);
        assert_eq!(dd.zdd_join(f, g), dd.zdd_join(g, f));
        assert_eq!(
            sorted(dd.zdd_to_sets(fg).collect()),
            vec![vec![1], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
    }

    #[test]
    fn test_powerset() {
        let dd = Dd::new(4);
        let ps = dd.zdd_powerset(&[1, 2, 3]);
        assert_eq!(dd.zdd_count(ps), BigUint::from(8u32));

        // Every singleton family is a subset of the power set.
        let s = dd.zdd_singleton(&[1, 3]);
        assert_eq!(dd.zdd_intersection(ps, s), s);
    }

    #[test]
    fn test_from_sets_to_sets_round_trip() {
        let dd = Dd::new(4);
        let input = vec![vec![1, 2], vec![2, 3], vec![1, 3], vec![4], vec![]];
        let f = dd.zdd_from_sets(&input);
        assert_eq!(dd.zdd_count(f), BigUint::from(5u32));

        let back = sorted(dd.zdd_to_sets(f).collect());
        assert_eq!(back, sorted(input));
    }

    #[test]
    fn test_count_subadditive() {
        let dd = Dd::new(4);
        let f = dd.zdd_from_sets(&[vec![1], vec![2], vec![1, 2]]);
        let g = dd.zdd_from_sets(&[vec![2], vec![3]]);
        let u = dd.zdd_union(f, g);
        assert!(dd.zdd_count(u) <= dd.zdd_count(f) + dd.zdd_count(g));
    }

    #[test]
    fn test_duplicate_input_sets_collapse() {
        let dd = Dd::new(4);
        let f = dd.zdd_from_sets(&[vec![1, 2], vec![1, 2], vec![2, 1]]);
        assert_eq!(dd.zdd_count(f), BigUint::one());
    }
}
