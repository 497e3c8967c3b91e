//! Shared-vertex merging of per-cell contributions.
//!
//! Within one pass each vertex accumulates a running mean of every cut cell
//! touching it, so the final value is independent of cell visitation order
//! up to floating rounding. Counters reset at each pass boundary; collected
//! diagnostics persist for the whole run.

use tracing::warn;

use crate::field::{ScalarField, UNSET};
use crate::mesh::VertexId;

/// A vertex that received contributions of both signs, an ambiguous or
/// degenerate interface there. Non-fatal; reported alongside the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignConflict {
    pub pass: usize,
    pub vertex: VertexId,
    pub existing: f64,
    pub incoming: f64,
}

/// Running-mean accumulator over vertex contributions, one pass at a time.
#[derive(Clone, Debug)]
pub struct VertexAccumulator {
    counts: Vec<u32>,
    conflicts: Vec<SignConflict>,
    pass: usize,
}

impl VertexAccumulator {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            counts: vec![0; vertex_count],
            conflicts: Vec::new(),
            pass: 0,
        }
    }

    /// Zero the counters for the next pass. Collected conflicts are kept.
    pub fn next_pass(&mut self) {
        self.counts.fill(0);
        self.pass += 1;
    }

    /// Fold `value` into the vertex: the first contribution of a pass
    /// overwrites, later ones update the running mean.
    pub fn merge(&mut self, field: &mut ScalarField, vertex: VertexId, value: f64) {
        let count = self.counts[vertex];
        if count == 0 {
            field.set(vertex, value);
            self.counts[vertex] = 1;
            return;
        }
        let existing = field.values()[vertex];
        if existing != UNSET && ((existing > 0.0 && value < 0.0) || (existing < 0.0 && value > 0.0))
        {
            warn!(vertex, existing, incoming = value, "sign conflict at shared vertex");
            self.conflicts.push(SignConflict {
                pass: self.pass,
                vertex,
                existing,
                incoming: value,
            });
        }
        field.set(
            vertex,
            (value + existing * f64::from(count)) / f64::from(count + 1),
        );
        self.counts[vertex] = count + 1;
    }

    /// Contributions folded into a vertex during the current pass.
    #[inline]
    pub fn count(&self, vertex: VertexId) -> u32 {
        self.counts[vertex]
    }

    #[inline]
    pub fn conflicts(&self) -> &[SignConflict] {
        &self.conflicts
    }

    pub fn into_conflicts(self) -> Vec<SignConflict> {
        self.conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldLocation;

    fn vertex_field(len: usize) -> ScalarField {
        let mut f = ScalarField::zeros(FieldLocation::Vertices, len);
        f.fill(UNSET);
        f
    }

    #[test]
    fn running_mean_matches_arithmetic_mean() {
        let mut field = vertex_field(1);
        let mut acc = VertexAccumulator::new(1);
        let samples = [0.4, -0.1, 0.3, 0.2];
        for &s in &samples {
            acc.merge(&mut field, 0, s);
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((field.values()[0] - mean).abs() < 1e-15);
        assert_eq!(acc.count(0), 4);
    }

    #[test]
    fn merge_order_does_not_matter() {
        let samples = [0.41, 0.17, -0.08, 0.33, 0.25];
        let orders: [[usize; 5]; 4] = [
            [0, 1, 2, 3, 4],
            [4, 3, 2, 1, 0],
            [2, 0, 4, 1, 3],
            [1, 4, 0, 3, 2],
        ];
        let mut results = Vec::new();
        for order in orders {
            let mut field = vertex_field(1);
            let mut acc = VertexAccumulator::new(1);
            for i in order {
                acc.merge(&mut field, 0, samples[i]);
            }
            results.push(field.values()[0]);
        }
        for r in &results[1..] {
            assert!((r - results[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn pass_reset_overwrites_stale_values() {
        let mut field = vertex_field(1);
        let mut acc = VertexAccumulator::new(1);
        acc.merge(&mut field, 0, 0.8);
        acc.merge(&mut field, 0, 0.4);
        acc.next_pass();
        acc.merge(&mut field, 0, -0.5);
        // The new pass starts from its own first contribution.
        assert!((field.values()[0] + 0.5).abs() < 1e-15);
        assert_eq!(acc.count(0), 1);
    }

    #[test]
    fn opposite_signs_are_recorded_not_dropped() {
        let mut field = vertex_field(1);
        let mut acc = VertexAccumulator::new(1);
        acc.merge(&mut field, 0, 0.5);
        acc.merge(&mut field, 0, -0.25);
        assert_eq!(acc.conflicts().len(), 1);
        let c = acc.conflicts()[0];
        assert_eq!(c.vertex, 0);
        assert!((c.existing - 0.5).abs() < 1e-15);
        assert!((c.incoming + 0.25).abs() < 1e-15);
        // The merge still happened.
        assert!((field.values()[0] - 0.125).abs() < 1e-15);
    }

    #[test]
    fn same_sign_contributions_do_not_conflict() {
        let mut field = vertex_field(1);
        let mut acc = VertexAccumulator::new(1);
        acc.merge(&mut field, 0, -0.5);
        acc.merge(&mut field, 0, -0.1);
        acc.merge(&mut field, 0, 0.0);
        assert!(acc.conflicts().is_empty());
    }
}
