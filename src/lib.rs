//! # ananke-dd: shared-store decision diagrams in Rust
//!
//! **`ananke-dd`** is a manager-centric library for three flavors of
//! reduced, ordered decision diagrams over one node store:
//!
//! - **BDDs** with complement edges, for Boolean functions;
//! - **ADDs**, whose terminals carry `f64` values;
//! - **ZDDs**, for families of sparse sets.
//!
//! One [`Dd`][crate::manager::Dd] manager owns the node arena, a
//! hash-consing unique table per level of the variable ordering, and a
//! single direct-mapped operation cache. Because all three kernels allocate
//! through the same tables, structurally equal functions share one node no
//! matter which kernel built them, and an ADD threshold result is a BDD
//! you can feed straight back into the Boolean connectives.
//!
//! ## Key properties
//!
//! - **Canonical**: for a fixed ordering, equal functions compare equal as
//!   handles (`==`), which makes equivalence and tautology checks O(1).
//! - **Cheap negation**: BDD handles carry a complement bit, so `-f` costs
//!   nothing and allocates nothing.
//! - **Explicit roots**: clients pin what they keep with
//!   [`acquire`][crate::manager::Dd::acquire] /
//!   [`release`][crate::manager::Dd::release]; the mark-and-sweep collector
//!   reclaims everything else on [`gc`][crate::manager::Dd::gc].
//!
//! ## Basic usage
//!
//! ```rust
//! use ananke_dd::manager::Dd;
//!
//! // A manager for variables 1..=4.
//! let dd = Dd::new(4);
//!
//! // Boolean: f = x1 AND (NOT x2).
//! let x1 = dd.ith_var(1);
//! let x2 = dd.ith_var(2);
//! let f = dd.apply_and(x1, -x2);
//! assert!(!dd.is_zero(f));
//! assert_eq!(dd.count_minterms(f, 4), 4.0);
//!
//! // Arithmetic: h = x1 + 2 * x2, thresholded back into a BDD.
//! let h = {
//!     let a = dd.add_ith_var(1);
//!     let b = dd.add_scalar_multiply(dd.add_ith_var(2), 2.0);
//!     dd.add_plus(a, b)
//! };
//! assert_eq!(dd.add_eval(h, &[1, 2]), 3.0);
//! assert_eq!(dd.add_threshold(h, 2.0), x2);
//!
//! // Sets: the family {{1,2},{3}}.
//! let fam = dd.zdd_from_sets(&[vec![1, 2], vec![3]]);
//! assert_eq!(dd.zdd_count(fam), 2u32.into());
//! ```
//!
//! ## Core components
//!
//! - **[`manager`]**: the [`Dd`][crate::manager::Dd] manager: store,
//!   unique tables, cache, ordering, roots and the collector.
//! - **[`bdd`]**, **[`add`]**, **[`zdd`]**: the three kernels.
//! - **[`analysis`]**: node, path and minterm counting.
//! - **[`dot`]**: Graphviz export.

pub mod add;
pub mod analysis;
pub mod bdd;
pub mod cache;
pub mod dot;
pub mod manager;
pub mod node;
pub mod paths;
pub mod reference;
pub mod subtable;
pub mod types;
pub mod utils;
pub mod zdd;
