use crate::card::CardId;
use crate::solver::expression::{Expr, Op};
use crate::solver::reachability::can_reach;
use crate::solver::{approx_eq, DIVISOR_EPSILON};
use serde::Serialize;
use tracing::{debug, warn};

/// Largest value multiset the solver will search by default
pub const DEFAULT_VALUE_LIMIT: usize = 6;

/// One input to the solver: a numeric value and the slot it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverValue {
    pub value: f64,
    pub id: CardId,
}

impl SolverValue {
    pub fn new(value: f64, id: CardId) -> Self {
        SolverValue { value, id }
    }
}

/// A proof that the target is reachable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub expression: String,
    pub result: f64,
    /// Whether the exempt value was needed
    pub used_exempt: bool,
}

/// Exhaustive arithmetic solver.
///
/// Every non-exempt value must be used exactly once; the exempt value is
/// optional. Without it is tried first, so a solution that can leave the
/// exempt value out always does.
#[derive(Debug, Clone)]
pub struct Solver {
    value_limit: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(DEFAULT_VALUE_LIMIT)
    }
}

impl Solver {
    pub fn new(value_limit: usize) -> Self {
        Solver { value_limit }
    }

    pub fn value_limit(&self) -> usize {
        self.value_limit
    }

    pub fn solve(&self, values: &[SolverValue], target: f64, exempt: Option<CardId>) -> Option<Solution> {
        if values.len() > self.value_limit {
            warn!(
                count = values.len(),
                limit = self.value_limit,
                "solver input exceeds value limit, refusing to search"
            );
            return None;
        }

        let is_exempt = |v: &SolverValue| exempt == Some(v.id);
        let has_exempt = values.iter().any(is_exempt);

        let mandatory: Vec<f64> = values
            .iter()
            .filter(|v| !is_exempt(v))
            .map(|v| v.value)
            .collect();

        if let Some((expr, result)) = search_case(&mandatory, target) {
            return Some(Solution {
                expression: expr.to_string(),
                result,
                used_exempt: false,
            });
        }

        if has_exempt {
            let all: Vec<f64> = values.iter().map(|v| v.value).collect();
            if let Some((expr, result)) = search_case(&all, target) {
                return Some(Solution {
                    expression: expr.to_string(),
                    result,
                    used_exempt: true,
                });
            }
        }

        debug!(goal = target, count = values.len(), "no solution");
        None
    }
}

fn search_case(values: &[f64], target: f64) -> Option<(Expr, f64)> {
    if !can_reach(values, target) {
        return None;
    }
    first_solution(values, target)
}

/// First success of the ordered search: orderings in index-lexicographic
/// order, then leftmost adjacent pair, then operator order.
pub fn first_solution(values: &[f64], target: f64) -> Option<(Expr, f64)> {
    match values.len() {
        0 => None,
        1 if approx_eq(values[0], target) => Some((Expr::Number(values[0]), values[0])),
        1 => None,
        n => {
            let mut search = Search {
                values,
                target,
                used: vec![false; n],
                order: Vec::with_capacity(n),
                arena: Vec::with_capacity(4 * n),
            };
            let (root, result) = search.permute()?;
            Some((search.build(root), result))
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf(f64),
    Binary { op: Op, lhs: usize, rhs: usize },
}

#[derive(Debug, Clone, Copy)]
struct Term {
    value: f64,
    node: usize,
}

struct Search<'a> {
    values: &'a [f64],
    target: f64,
    used: Vec<bool>,
    order: Vec<f64>,
    arena: Vec<Node>,
}

impl Search<'_> {
    fn permute(&mut self) -> Option<(usize, f64)> {
        if self.order.len() == self.values.len() {
            self.arena.clear();
            let mut terms = Vec::with_capacity(self.order.len());
            for &value in &self.order {
                terms.push(Term { value, node: self.arena.len() });
                self.arena.push(Node::Leaf(value));
            }
            return self.collapse(&terms);
        }

        // Equal values at the same depth produce identical sequences, so only
        // the first of them is explored.
        let mut tried: Vec<u64> = Vec::with_capacity(self.values.len());
        for i in 0..self.values.len() {
            let value = self.values[i];
            if self.used[i] || tried.contains(&value.to_bits()) {
                continue;
            }
            tried.push(value.to_bits());

            self.used[i] = true;
            self.order.push(value);
            let found = self.permute();
            self.order.pop();
            self.used[i] = false;

            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn collapse(&mut self, terms: &[Term]) -> Option<(usize, f64)> {
        if terms.len() == 1 {
            let only = terms[0];
            return approx_eq(only.value, self.target).then_some((only.node, only.value));
        }

        for i in 0..terms.len() - 1 {
            let (a, b) = (terms[i], terms[i + 1]);
            for op in Op::ALL {
                if op == Op::Div && b.value.abs() < DIVISOR_EPSILON {
                    continue;
                }
                let mark = self.arena.len();
                self.arena.push(Node::Binary { op, lhs: a.node, rhs: b.node });

                let mut next = Vec::with_capacity(terms.len() - 1);
                next.extend_from_slice(&terms[..i]);
                next.push(Term { value: op.apply(a.value, b.value), node: mark });
                next.extend_from_slice(&terms[i + 2..]);

                if let Some(found) = self.collapse(&next) {
                    return Some(found);
                }
                self.arena.truncate(mark);
            }
        }
        None
    }

    fn build(&self, node: usize) -> Expr {
        match self.arena[node] {
            Node::Leaf(v) => Expr::Number(v),
            Node::Binary { op, lhs, rhs } => Expr::binary(op, self.build(lhs), self.build(rhs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::reachability::reachable_values;
    use proptest::prelude::*;

    const ANCHOR: CardId = CardId(12);

    fn hand(non_anchor: &[f64], anchor: f64) -> Vec<SolverValue> {
        let mut out = vec![SolverValue::new(anchor, ANCHOR)];
        for (i, &v) in non_anchor.iter().enumerate() {
            out.push(SolverValue::new(v, CardId(20 + i as u8)));
        }
        out
    }

    fn bag_eq(mut a: Vec<f64>, mut b: Vec<f64>) -> bool {
        a.sort_by(|x, y| x.partial_cmp(y).unwrap());
        b.sort_by(|x, y| x.partial_cmp(y).unwrap());
        a.len() == b.len() && a.iter().zip(&b).all(|(x, y)| approx_eq(*x, *y))
    }

    #[test]
    fn test_solves_without_anchor_when_possible() {
        let solution = Solver::default().solve(&hand(&[5.0, 3.0, 2.0], 13.0), 10.0, Some(ANCHOR)).unwrap();
        assert_eq!(solution.expression, "((5 + 3) + 2)");
        assert_eq!(solution.result, 10.0);
        assert!(!solution.used_exempt);
    }

    #[test]
    fn test_falls_back_to_using_anchor() {
        let solution = Solver::default().solve(&hand(&[5.0, 3.0], 13.0), 21.0, Some(ANCHOR)).unwrap();
        assert!(solution.used_exempt);
        assert_eq!(solution.result, 21.0);
        let literals = Expr::parse(&solution.expression).unwrap().literals();
        assert!(bag_eq(literals, vec![5.0, 3.0, 13.0]));
    }

    #[test]
    fn test_unreachable_target() {
        assert_eq!(Solver::default().solve(&hand(&[5.0, 3.0], 13.0), 100.0, Some(ANCHOR)), None);
    }

    #[test]
    fn test_single_value_must_equal_target() {
        let solver = Solver::default();
        let only_anchor = hand(&[], 13.0);
        assert!(solver.solve(&only_anchor, 13.0, Some(ANCHOR)).unwrap().used_exempt);
        assert_eq!(first_solution(&[4.0], 5.0), None);
        assert_eq!(first_solution(&[4.0], 4.0).map(|(e, _)| e.to_string()), Some("4".to_string()));
    }

    #[test]
    fn test_operator_order_is_add_sub_mul_div() {
        // 4 + 2 is tried before 4 * 2 ... and 4 - 2 before 4 / 2
        let (expr, _) = first_solution(&[4.0, 2.0], 2.0).unwrap();
        assert_eq!(expr.to_string(), "(4 - 2)");
        let (expr, _) = first_solution(&[4.0, 2.0], 0.5).unwrap();
        assert_eq!(expr.to_string(), "(2 / 4)");
    }

    #[test]
    fn test_division_needed() {
        let (expr, result) = first_solution(&[3.0, 3.0, 8.0, 8.0], 24.0).unwrap();
        assert!(approx_eq(result, 24.0));
        assert!(approx_eq(Expr::parse(&expr.to_string()).unwrap().eval().unwrap(), 24.0));
    }

    #[test]
    fn test_value_limit() {
        let solver = Solver::new(3);
        let values = hand(&[1.0, 1.0, 1.0], 13.0);
        assert_eq!(solver.solve(&values, 3.0, Some(ANCHOR)), None);
        assert!(Solver::new(4).solve(&values, 3.0, Some(ANCHOR)).is_some());
    }

    #[test]
    fn test_duplicate_ids_are_distinct_slots() {
        // Two cards worth 13: only the anchor slot is optional
        let values = vec![SolverValue::new(13.0, ANCHOR), SolverValue::new(13.0, CardId(25))];
        let solution = Solver::default().solve(&values, 13.0, Some(ANCHOR)).unwrap();
        assert!(!solution.used_exempt);
        assert_eq!(solution.expression, "13");
    }

    /// Independent reference: repeatedly combine any ordered pair
    fn reference_reachable(values: &[f64], target: f64) -> bool {
        if values.len() == 1 {
            return approx_eq(values[0], target);
        }
        for i in 0..values.len() {
            for j in 0..values.len() {
                if i == j {
                    continue;
                }
                let rest: Vec<f64> = values
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i && *k != j)
                    .map(|(_, v)| *v)
                    .collect();
                for op in Op::ALL {
                    if op == Op::Div && values[j].abs() < DIVISOR_EPSILON {
                        continue;
                    }
                    let mut next = rest.clone();
                    next.push(op.apply(values[i], values[j]));
                    if reference_reachable(&next, target) {
                        return true;
                    }
                }
            }
        }
        false
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(96))]

        #[test]
        fn search_agrees_with_reference(
            values in prop::collection::vec(1u32..=14, 1..=4),
            target in -50i32..=100,
        ) {
            let values: Vec<f64> = values.into_iter().map(f64::from).collect();
            let target = f64::from(target);
            let expected = reference_reachable(&values, target);
            prop_assert_eq!(first_solution(&values, target).is_some(), expected);
            prop_assert_eq!(reachable_values(&values).iter().any(|&v| approx_eq(v, target)), expected);
        }

        #[test]
        fn solutions_are_sound(
            mandatory in prop::collection::vec(1u32..=13, 0..=3),
            anchor in 1u32..=14,
            target in 0i32..=60,
        ) {
            let mandatory: Vec<f64> = mandatory.into_iter().map(f64::from).collect();
            let values = hand(&mandatory, f64::from(anchor));
            if let Some(solution) = Solver::default().solve(&values, f64::from(target), Some(ANCHOR)) {
                let expr = Expr::parse(&solution.expression).unwrap();
                prop_assert!(approx_eq(expr.eval().unwrap(), solution.result));
                prop_assert!(approx_eq(solution.result, f64::from(target)));

                let mut expected = mandatory.clone();
                if solution.used_exempt {
                    expected.push(f64::from(anchor));
                }
                prop_assert!(bag_eq(expr.literals(), expected));
            }
        }
    }
}
