//! Push an aggregate probability back down onto individual edges.
//!
//! Given `P` and the edges that produced it, fill in missing per-edge
//! probabilities so that their product reconstructs `P`:
//!
//! - every edge already assigned: nothing changes
//! - no edge assigned: each edge receives `P^(1/n)`
//! - mixed: with `A` the product of the assigned edges, the unassigned edges
//!   share `P / A` (or all of `P` when `A == 0`) by the same n-th root rule

use crate::scoring::Scorable;

/// Which decomposition rule was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decomposition {
    /// Empty edge list.
    Empty,
    /// Every edge already carried a probability; nothing was written.
    AlreadyAssigned,
    /// Every edge received the uniform n-th root of `P`.
    Uniform,
    /// Only the unassigned edges received the n-th root of the remainder.
    Remainder,
}

/// Assign missing edge probabilities so their product equals `probability`.
///
/// With `overwrite`, every existing manual probability is cleared first.
/// Confidence is left untouched, so the product identity holds for edges
/// whose confidence is unset or 1.0.
pub fn decompose_probability<'a, T, I>(probability: f64, edges: I, overwrite: bool) -> Decomposition
where
    T: Scorable + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let mut edges: Vec<&mut T> = edges.into_iter().collect();
    if edges.is_empty() {
        return Decomposition::Empty;
    }

    if overwrite {
        for edge in edges.iter_mut() {
            edge.scores_mut().probability = None;
        }
    }

    let total = edges.len();
    let assigned_product: f64 = edges
        .iter()
        .filter_map(|e| e.scores().probability)
        .product();
    let mut unassigned: Vec<&mut T> = edges
        .into_iter()
        .filter(|e| e.scores().probability.is_none())
        .collect();

    if unassigned.is_empty() {
        tracing::debug!("all edges carry a probability, leaving them as they are");
        return Decomposition::AlreadyAssigned;
    }

    let (remainder, rule) = if unassigned.len() == total {
        (probability, Decomposition::Uniform)
    } else if assigned_product > 0.0 {
        (probability / assigned_product, Decomposition::Remainder)
    } else {
        (probability, Decomposition::Remainder)
    };

    let share = remainder.powf(1.0 / unassigned.len() as f64);
    if share > 1.0 {
        tracing::warn!(
            probability,
            assigned_product,
            share,
            "pre-assigned edges leave a per-edge remainder above 1.0"
        );
    }
    tracing::debug!(?rule, edges = unassigned.len(), share, "decomposing probability");

    for edge in unassigned.iter_mut() {
        edge.scores_mut().probability = Some(share);
    }
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Predicate, Transition};

    const EPS: f64 = 1e-9;

    fn edges(probabilities: &[Option<f64>]) -> Vec<Transition> {
        probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut t = Transition::new(
                    Node::new(format!("N{i}"), "source"),
                    Node::new(format!("N{}", i + 1), "target"),
                    Predicate::Causes,
                )
                .unwrap();
                t.scores.probability = *p;
                t
            })
            .collect()
    }

    fn product(edges: &[Transition]) -> f64 {
        edges
            .iter()
            .filter_map(|e| e.scores.probability)
            .filter(|p| *p > 0.0)
            .product()
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let mut none: Vec<Transition> = Vec::new();
        assert_eq!(decompose_probability(0.5, &mut none, false), Decomposition::Empty);
    }

    #[test]
    fn uniform_root_when_nothing_assigned() {
        let mut es = edges(&[None, None, None]);
        assert_eq!(decompose_probability(0.125, &mut es, false), Decomposition::Uniform);
        for e in &es {
            assert!((e.scores.probability.unwrap() - 0.5).abs() < EPS);
        }
        assert!((product(&es) - 0.125).abs() < EPS);
    }

    #[test]
    fn fully_assigned_edges_are_not_renormalized() {
        let mut es = edges(&[Some(0.9), Some(0.8)]);
        assert_eq!(
            decompose_probability(0.1, &mut es, false),
            Decomposition::AlreadyAssigned
        );
        assert_eq!(es[0].scores.probability, Some(0.9));
        assert_eq!(es[1].scores.probability, Some(0.8));
    }

    #[test]
    fn remainder_goes_to_unassigned_edges() {
        let mut es = edges(&[Some(0.8), None, None]);
        assert_eq!(decompose_probability(0.2, &mut es, false), Decomposition::Remainder);
        assert_eq!(es[0].scores.probability, Some(0.8));
        assert!((es[1].scores.probability.unwrap() - 0.5).abs() < EPS);
        assert!((product(&es) - 0.2).abs() < EPS);
    }

    #[test]
    fn zero_assigned_product_redistributes_everything() {
        let mut es = edges(&[Some(0.0), None, None]);
        decompose_probability(0.36, &mut es, false);
        assert!((es[1].scores.probability.unwrap() - 0.6).abs() < EPS);
        assert!((es[2].scores.probability.unwrap() - 0.6).abs() < EPS);
        assert!((product(&es) - 0.36).abs() < EPS);
    }

    #[test]
    fn overwrite_clears_existing_values() {
        let mut es = edges(&[Some(0.9), Some(0.1)]);
        assert_eq!(decompose_probability(0.25, &mut es, true), Decomposition::Uniform);
        for e in &es {
            assert!((e.scores.probability.unwrap() - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn works_on_any_scorable() {
        let mut nodes = vec![Node::new("T1", "a"), Node::new("T2", "b")];
        decompose_probability(0.81, &mut nodes, false);
        assert!((nodes[0].scores.probability.unwrap() - 0.9).abs() < EPS);
    }
}
