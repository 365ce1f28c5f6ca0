//! The BDD kernel: ITE and its relatives over complement edges.
//!
//! All operations are methods on [`Dd`] and recurse through the shared
//! store. Negation is free (`-f` flips the complement bit); every other
//! connective is a cached recursion over the top level of its operands.

use log::debug;

use crate::cache::{Op, OpKey};
use crate::manager::Dd;
use crate::reference::Ref;
use crate::types::Level;

impl Dd {
    /// Negation: O(1), no allocation, no cache.
    #[inline]
    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    /// If-then-else:
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use ananke_dd::manager::Dd;
    ///
    /// let dd = Dd::new(3);
    /// let x = dd.ith_var(1);
    /// let y = dd.ith_var(2);
    /// let z = dd.ith_var(3);
    /// let f = dd.apply_ite(x, y, z);
    /// let by_hand = {
    ///     let x_and_y = dd.apply_and(x, y);
    ///     let not_x_and_z = dd.apply_and(-x, z);
    ///     dd.apply_or(x_and_y, not_x_and_z)
    /// };
    /// assert_eq!(f, by_hand);
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // Standard triples:
        //   ite(F,F,H)  => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F)  => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one(), h);
        }
        if g == -f {
            return self.apply_ite(f, self.zero(), h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero());
        }
        if h == -f {
            return self.apply_ite(f, g, self.one());
        }

        // Normalization for cache hits:
        //   ite(~F,G,H) => ite(F,H,G)
        //   ite(F,~G,H) => ~ite(F,G,~H)
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_complemented() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }
        let mut n = false;
        if g.is_complemented() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::ternary(Op::Ite, f, g, h);
        if let Some(res) = self.cache_get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        let top = self
            .node_level(f)
            .min(self.node_level(g))
            .min(self.node_level(h));
        debug_assert!(!top.is_terminal());

        let (f0, f1) = self.top_cofactors(f, top);
        let (g0, g1) = self.top_cofactors(g, top);
        let (h0, h1) = self.top_cofactors(h, top);

        let low = self.apply_ite(f0, g0, h0);
        let high = self.apply_ite(f1, g1, h1);
        let res = self.mk_node(top, low, high);

        self.cache_insert(key, res);
        if n {
            -res
        } else {
            res
        }
    }

    /// Conjunction.
    pub fn apply_and(&self, f: Ref, g: Ref) -> Ref {
        if self.is_zero(f) || self.is_zero(g) {
            return self.zero();
        }
        if self.is_one(f) {
            return g;
        }
        if self.is_one(g) {
            return f;
        }
        if f == g {
            return f;
        }
        if f == -g {
            return self.zero();
        }

        let key = OpKey::commutative(Op::And, f, g);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let top = self.node_level(f).min(self.node_level(g));
        let (f0, f1) = self.top_cofactors(f, top);
        let (g0, g1) = self.top_cofactors(g, top);

        let low = self.apply_and(f0, g0);
        let high = self.apply_and(f1, g1);
        let res = self.mk_node(top, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Disjunction.
    pub fn apply_or(&self, f: Ref, g: Ref) -> Ref {
        if self.is_one(f) || self.is_one(g) {
            return self.one();
        }
        if self.is_zero(f) {
            return g;
        }
        if self.is_zero(g) {
            return f;
        }
        if f == g {
            return f;
        }
        if f == -g {
            return self.one();
        }

        let key = OpKey::commutative(Op::Or, f, g);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let top = self.node_level(f).min(self.node_level(g));
        let (f0, f1) = self.top_cofactors(f, top);
        let (g0, g1) = self.top_cofactors(g, top);

        let low = self.apply_or(f0, g0);
        let high = self.apply_or(f1, g1);
        let res = self.mk_node(top, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Exclusive or. Complement bits are stripped off both operands first
    /// (`xor(~f, g) = ~xor(f, g)`), so the cache only ever sees regular
    /// pairs.
    pub fn apply_xor(&self, f: Ref, g: Ref) -> Ref {
        if self.is_zero(f) {
            return g;
        }
        if self.is_zero(g) {
            return f;
        }
        if self.is_one(f) {
            return -g;
        }
        if self.is_one(g) {
            return -f;
        }
        if f == g {
            return self.zero();
        }
        if f == -g {
            return self.one();
        }

        let (mut f, mut g) = (f, g);
        let mut n = false;
        if f.is_complemented() {
            n = !n;
            f = -f;
        }
        if g.is_complemented() {
            n = !n;
            g = -g;
        }

        let key = OpKey::commutative(Op::Xor, f, g);
        if let Some(res) = self.cache_get(&key) {
            return if n { -res } else { res };
        }

        let top = self.node_level(f).min(self.node_level(g));
        let (f0, f1) = self.top_cofactors(f, top);
        let (g0, g1) = self.top_cofactors(g, top);

        let low = self.apply_xor(f0, g0);
        let high = self.apply_xor(f1, g1);
        let res = self.mk_node(top, low, high);

        self.cache_insert(key, res);
        if n {
            -res
        } else {
            res
        }
    }

    /// Equivalence (XNOR), as the ITE instance `ite(f, g, ¬g)`.
    pub fn apply_eq(&self, f: Ref, g: Ref) -> Ref {
        self.apply_ite(f, g, -g)
    }

    /// Restricts variable `i` to a constant: `f | x_i = value`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside `1..=num_vars()`.
    pub fn restrict(&self, f: Ref, i: u32, value: bool) -> Ref {
        let var = self.check_var(i);
        self.restrict_rec(f, self.level_of(var), value)
    }

    fn restrict_rec(&self, f: Ref, level: Level, value: bool) -> Ref {
        let f_level = self.node_level(f);
        // Terminal, or the variable sits above f's support: nothing to do.
        if f_level > level {
            return f;
        }
        if f_level == level {
            let (f0, f1) = self.top_cofactors(f, level);
            return if value { f1 } else { f0 };
        }

        let key = OpKey::with_word(Op::Restrict, f, ((level.index() as u64) << 1) | value as u64);
        if let Some(res) = self.cache_get(&key) {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, f_level);
        let low = self.restrict_rec(f0, level, value);
        let high = self.restrict_rec(f1, level, value);
        let res = self.mk_node(f_level, low, high);

        self.cache_insert(key, res);
        res
    }

    /// Cofactors `f` by a cube of DIMACS-style literals: `[1, -3]` means
    /// `x1 = true, x3 = false`.
    ///
    /// # Panics
    ///
    /// Panics on a zero literal or an out-of-range variable.
    pub fn cofactor_cube(&self, f: Ref, cube: &[i32]) -> Ref {
        cube.iter().fold(f, |acc, &lit| {
            assert_ne!(lit, 0, "literal must not be zero");
            self.restrict(acc, lit.unsigned_abs(), lit > 0)
        })
    }

    /// Existential quantification over a set of variables:
    /// `∃v. f = f|v=0 ∨ f|v=1`, iterated.
    pub fn exists(&self, f: Ref, vars: &[u32]) -> Ref {
        vars.iter().fold(f, |acc, &v| {
            let low = self.restrict(acc, v, false);
            let high = self.restrict(acc, v, true);
            self.apply_or(low, high)
        })
    }

    /// Universal quantification: `∀v. f = f|v=0 ∧ f|v=1`, iterated.
    pub fn forall(&self, f: Ref, vars: &[u32]) -> Ref {
        vars.iter().fold(f, |acc, &v| {
            let low = self.restrict(acc, v, false);
            let high = self.restrict(acc, v, true);
            self.apply_and(low, high)
        })
    }

    /// Finds one satisfying assignment as DIMACS-style literals, or `None`
    /// for the constant FALSE. Variables skipped by the chosen path are
    /// left out (don't-cares).
    pub fn one_sat(&self, f: Ref) -> Option<Vec<i32>> {
        self.one_sat_rec(f, vec![])
    }

    fn one_sat_rec(&self, f: Ref, path: Vec<i32>) -> Option<Vec<i32>> {
        if self.is_zero(f) {
            return None;
        }
        if self.is_one(f) {
            return Some(path);
        }

        let v = self.variable(f.index()).id() as i32;

        let mut path_high = path.clone();
        path_high.push(v);
        if let Some(res) = self.one_sat_rec(self.high_node(f), path_high) {
            return Some(res);
        }

        let mut path_low = path;
        path_low.push(-v);
        self.one_sat_rec(self.low_node(f), path_low)
    }

    /// Compact textual dump: `handle:(var, high, low)`, terminals as `(0)`
    /// and `(1)`. Intended for tests and debugging.
    pub fn to_bracket_string(&self, f: Ref) -> String {
        if self.is_zero(f) {
            return format!("{}:(0)", f);
        }
        if self.is_one(f) {
            return format!("{}:(1)", f);
        }

        format!(
            "{}:({}, {}, {})",
            f,
            self.variable(f.index()),
            self.to_bracket_string(self.high_node(f)),
            self.to_bracket_string(self.low_node(f)),
        )
    }
}
