//! Memoised reachability over subsets.
//!
//! `reachable_values` returns every value a binary expression tree using each
//! input exactly once can produce. It applies the same operators and the same
//! small-divisor rule as the ordered search, and evaluates each tree the same
//! way, so "target is reachable here" holds exactly when the search would
//! find it. The work is bounded by the number of distinct intermediate values
//! rather than by the number of orderings.

use crate::solver::expression::Op;
use crate::solver::{approx_eq, DIVISOR_EPSILON};
use std::collections::HashSet;

/// Every value producible from the whole multiset. Empty input yields nothing.
pub fn reachable_values(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let full = (1usize << n) - 1;
    let mut memo: Vec<Vec<f64>> = vec![Vec::new(); full + 1];

    for mask in 1..=full {
        if mask.count_ones() == 1 {
            memo[mask] = vec![values[mask.trailing_zeros() as usize]];
            continue;
        }

        let mut seen: HashSet<u64> = HashSet::new();
        let mut out = Vec::new();
        // Every ordered split (left, right) of the mask into two non-empty parts
        let mut left = (mask - 1) & mask;
        while left > 0 {
            let right = mask ^ left;
            for &a in &memo[left] {
                for &b in &memo[right] {
                    for op in Op::ALL {
                        if op == Op::Div && b.abs() < DIVISOR_EPSILON {
                            continue;
                        }
                        let v = op.apply(a, b);
                        if seen.insert(v.to_bits()) {
                            out.push(v);
                        }
                    }
                }
            }
            left = (left - 1) & mask;
        }
        memo[mask] = out;
    }

    memo.swap_remove(full)
}

/// Whether some tree over all of `values` lands within tolerance of `target`
pub fn can_reach(values: &[f64], target: f64) -> bool {
    reachable_values(values)
        .iter()
        .any(|&v| approx_eq(v, target))
}
