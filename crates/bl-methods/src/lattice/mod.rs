//! Lattice methods for option and short-rate pricing.
//!
//! # Overview
//!
//! * [`Lattice`] — triangular recombining grid indexed by `(step, node)`
//! * [`backward_induction`] — generic rollback from a terminal column
//! * [`BinomialTree`] — CRR / manual up-down multiplicative tree
//! * [`additive_lattice`] — forward build of Ho-Lee / BDT state lattices
//! * [`TreeLayout`] — drawing instructions for an external renderer
//!
//! # Node convention
//!
//! Step `i` holds nodes `0..=i`. Node `j` is the state reached after `j`
//! down moves, so an up move from `(i, j)` lands on `(i + 1, j)` and a down
//! move lands on `(i + 1, j + 1)`. Node `0` is therefore the top of each
//! column.

pub mod binomial_tree;
pub mod layout;
pub mod short_rate_tree;

pub use binomial_tree::BinomialTree;
pub use layout::{Label, LayoutMode, Move, RenderContext, Segment, TreeLayout};
pub use short_rate_tree::{
    additive_lattice, discount_bond_lattice, discounted_cash_flow_lattice,
    discounted_payoff_lattice, EQUAL_PROBABILITY,
};

use bl_core::{
    errors::{Error, Result},
    Real,
};

// ─── Lattice ──────────────────────────────────────────────────────────────────

/// A recombining triangular lattice with `steps + 1` columns.
///
/// Values are stored column by column in a flat vector, so only the
/// `(steps + 1)(steps + 2) / 2` meaningful cells exist. The square view
/// with zero padding below the diagonal is available through
/// [`Lattice::to_dense`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLattice"))]
pub struct Lattice {
    steps: usize,
    values: Vec<Real>,
}

/// Unchecked wire form of a [`Lattice`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLattice {
    steps: usize,
    values: Vec<Real>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLattice> for Lattice {
    type Error = Error;

    fn try_from(raw: RawLattice) -> Result<Self> {
        Self::from_values(raw.steps, raw.values)
    }
}

#[inline]
fn offset(step: usize) -> usize {
    step * (step + 1) / 2
}

/// Number of cells in a lattice with `steps` steps, `None` on overflow.
fn cell_count(steps: usize) -> Option<usize> {
    let columns = steps.checked_add(1)?;
    columns.checked_mul(columns.checked_add(1)?).map(|n| n / 2)
}

impl Lattice {
    /// A zero-filled lattice with `steps` time steps.
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            values: vec![0.0; offset(steps + 1)],
        }
    }

    /// Build a lattice by evaluating `f(step, node)` on every cell.
    pub fn from_fn<F>(steps: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Real,
    {
        let mut values = Vec::with_capacity(offset(steps + 1));
        for step in 0..=steps {
            for node in 0..=step {
                values.push(f(step, node));
            }
        }
        Self { steps, values }
    }

    /// Wrap column-ordered `values` as a lattice with `steps` steps.
    ///
    /// # Errors
    /// `InvalidParameter` unless `values` holds exactly
    /// `(steps + 1)(steps + 2) / 2` cells.
    pub fn from_values(steps: usize, values: Vec<Real>) -> Result<Self> {
        match cell_count(steps) {
            Some(n) if n == values.len() => Ok(Self { steps, values }),
            Some(n) => Err(Error::InvalidParameter(format!(
                "lattice with {steps} steps needs {n} values, got {}",
                values.len()
            ))),
            None => Err(Error::InvalidParameter(format!("lattice with {steps} steps is too large"))),
        }
    }

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of columns (= steps + 1), the side of the dense view.
    pub fn size(&self) -> usize {
        self.steps + 1
    }

    /// Value at `(step, node)`, `None` outside the triangle.
    pub fn get(&self, step: usize, node: usize) -> Option<Real> {
        if step > self.steps || node > step {
            None
        } else {
            Some(self.values[offset(step) + node])
        }
    }

    /// Value at `(step, node)`.
    ///
    /// # Panics
    /// Panics if `step > steps` or `node > step`.
    pub fn value(&self, step: usize, node: usize) -> Real {
        assert!(
            step <= self.steps && node <= step,
            "node ({step}, {node}) outside lattice with {} steps",
            self.steps
        );
        self.values[offset(step) + node]
    }

    /// Overwrite the value at `(step, node)`.
    ///
    /// # Panics
    /// Panics if `step > steps` or `node > step`.
    pub fn set(&mut self, step: usize, node: usize, value: Real) {
        assert!(
            step <= self.steps && node <= step,
            "node ({step}, {node}) outside lattice with {} steps",
            self.steps
        );
        self.values[offset(step) + node] = value;
    }

    /// The `step + 1` values of column `step`.
    ///
    /// # Panics
    /// Panics if `step > steps`.
    pub fn column(&self, step: usize) -> &[Real] {
        &self.values[offset(step)..offset(step + 1)]
    }

    /// Mutable access to column `step`.
    ///
    /// # Panics
    /// Panics if `step > steps`.
    pub fn column_mut(&mut self, step: usize) -> &mut [Real] {
        &mut self.values[offset(step)..offset(step + 1)]
    }

    /// Value at the root `(0, 0)`.
    pub fn root(&self) -> Real {
        self.values[0]
    }

    /// The last column.
    pub fn terminal(&self) -> &[Real] {
        self.column(self.steps)
    }

    /// Iterate over `(step, node, value)` for every cell.
    pub fn nodes(&self) -> impl Iterator<Item = (usize, usize, Real)> + '_ {
        (0..=self.steps).flat_map(move |step| {
            self.column(step)
                .iter()
                .enumerate()
                .map(move |(node, &v)| (step, node, v))
        })
    }

    /// Apply `f` to every cell.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Real) -> Real,
    {
        Self {
            steps: self.steps,
            values: self.values.iter().map(f).collect(),
        }
    }

    /// The first `steps` time steps of this lattice.
    ///
    /// # Errors
    /// `OutOfRange` if `steps` exceeds the lattice's own step count.
    pub fn truncated(&self, steps: usize) -> Result<Self> {
        if steps > self.steps {
            return Err(Error::OutOfRange {
                requested: steps,
                available: self.steps,
            });
        }
        Ok(Self {
            steps,
            values: self.values[..offset(steps + 1)].to_vec(),
        })
    }

    /// Square `(steps + 1) × (steps + 1)` view indexed `[node][step]`,
    /// zero below the diagonal.
    pub fn to_dense(&self) -> Vec<Vec<Real>> {
        let n = self.size();
        let mut dense = vec![vec![0.0; n]; n];
        for (step, node, v) in self.nodes() {
            dense[node][step] = v;
        }
        dense
    }
}

// ─── Backward induction ───────────────────────────────────────────────────────

/// Roll a terminal column back to the root.
///
/// `terminal` holds the `n + 1` values at step `n`; for every earlier node
/// `rollback(step, node, up, down)` receives the values of the two
/// successors `(step + 1, node)` and `(step + 1, node + 1)` and returns the
/// node value.
///
/// # Panics
/// Panics if `terminal` is empty.
pub fn backward_induction<F>(terminal: Vec<Real>, mut rollback: F) -> Lattice
where
    F: FnMut(usize, usize, Real, Real) -> Real,
{
    assert!(!terminal.is_empty(), "terminal column must not be empty");
    let steps = terminal.len() - 1;
    let mut lattice = Lattice::new(steps);
    lattice.column_mut(steps).copy_from_slice(&terminal);

    for step in (0..steps).rev() {
        let (head, tail) = lattice.values.split_at_mut(offset(step + 1));
        let next = &tail[..step + 2];
        let current = &mut head[offset(step)..];
        for (node, slot) in current.iter_mut().enumerate() {
            *slot = rollback(step, node, next[node], next[node + 1]);
        }
    }
    lattice
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn storage_is_triangular() {
        let l = Lattice::new(3);
        assert_eq!(l.steps(), 3);
        assert_eq!(l.size(), 4);
        assert_eq!(l.nodes().count(), 10);
        assert_eq!(l.column(2).len(), 3);
        assert_eq!(l.terminal().len(), 4);
    }

    #[test]
    fn get_outside_triangle_is_none() {
        let l = Lattice::from_fn(2, |i, j| (10 * i + j) as Real);
        assert_eq!(l.get(2, 1), Some(21.0));
        assert_eq!(l.get(1, 2), None);
        assert_eq!(l.get(3, 0), None);
    }

    #[test]
    #[should_panic(expected = "outside lattice")]
    fn value_below_diagonal_panics() {
        Lattice::new(2).value(0, 1);
    }

    #[test]
    fn dense_view_pads_with_zeros() {
        let l = Lattice::from_fn(3, |_, _| 7.0);
        let dense = l.to_dense();
        for (node, row) in dense.iter().enumerate() {
            for (step, &v) in row.iter().enumerate() {
                if node > step {
                    assert_eq!(v, 0.0, "padding at ({node}, {step})");
                } else {
                    assert_eq!(v, 7.0);
                }
            }
        }
    }

    #[test]
    fn truncation() {
        let l = Lattice::from_fn(4, |i, j| (i + j) as Real);
        let t = l.truncated(2).unwrap();
        assert_eq!(t.steps(), 2);
        assert_eq!(t.value(2, 2), 4.0);
        assert_eq!(
            l.truncated(5).unwrap_err(),
            Error::OutOfRange {
                requested: 5,
                available: 4
            }
        );
    }

    #[test]
    fn backward_induction_averages() {
        // Equal-weight rollback of 0..=3 is the binomial mean at every node.
        let l = backward_induction(vec![0.0, 1.0, 2.0, 3.0], |_, _, up, down| 0.5 * (up + down));
        assert_abs_diff_eq!(l.root(), 1.5, epsilon = 1e-15);
        assert_abs_diff_eq!(l.value(2, 0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(l.value(1, 1), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn backward_induction_single_column() {
        let l = backward_induction(vec![4.2], |_, _, _, _| unreachable!());
        assert_eq!(l.steps(), 0);
        assert_eq!(l.root(), 4.2);
    }

    #[test]
    fn rollback_sees_correct_coordinates() {
        let mut visited = Vec::new();
        backward_induction(vec![0.0; 3], |i, j, _, _| {
            visited.push((i, j));
            0.0
        });
        assert_eq!(visited, vec![(1, 0), (1, 1), (0, 0)]);
    }

    #[test]
    fn from_values_checks_cell_count() {
        let l = Lattice::from_values(2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(l.value(2, 2), 6.0);
        assert_eq!(l, Lattice::from_fn(2, |i, j| (offset(i) + j + 1) as Real));
        assert!(matches!(Lattice::from_values(3, vec![1.0]), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            Lattice::from_values(usize::MAX, Vec::new()),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let l = Lattice::from_fn(2, |i, j| (i * j) as Real);
        let json = serde_json::to_string(&l).unwrap();
        let back: Lattice = serde_json::from_str(&json).unwrap();
        assert_eq!(l, back);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_short_triangle() {
        let err = serde_json::from_str::<Lattice>(r#"{"steps":3,"values":[1.0]}"#).unwrap_err();
        assert!(err.to_string().contains("needs 10 values"), "{err}");
        let ok = serde_json::from_str::<Lattice>(r#"{"steps":1,"values":[1.0,2.0,3.0]}"#).unwrap();
        assert_eq!(ok.get(1, 1), Some(3.0));
    }
}
