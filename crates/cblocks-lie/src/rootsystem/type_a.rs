//! Type A root system
//!
//! Weights of `sl(r+1)` are handled in epsilon coordinates: a length `r+1`
//! vector `e` with `e[i] = Σ_{j≥i} λ[j]` and `e[r] = 0`. The Weyl group acts
//! by permuting these coordinates, so chamber reflection is a sort, orbit
//! enumeration is permutation enumeration, and the affine reflection that
//! bounds the alcove swaps the extreme coordinates shifted by the width.

use super::{RootSystem, RootSystemKind};
use crate::weight::{Root, Weight};
use crate::{Error, Result};

/// Default multiplier on the alcove fold bound
const DEFAULT_FOLD_SLACK: usize = 4;

/// Root system of type A and rank `r`
#[derive(Debug, Clone)]
pub struct TypeA {
    rank: usize,
    positive_roots: Vec<Root>,
    fold_slack: usize,
}

impl TypeA {
    /// Create the type A root system of the given rank
    pub fn new(rank: usize) -> Result<Self> {
        if rank == 0 {
            return Err(Error::InvalidRank(rank));
        }

        // Positive roots are the indicator vectors of intervals [i, j]
        let mut positive_roots = Vec::with_capacity(rank * (rank + 1) / 2);
        for i in 0..rank {
            for j in i..rank {
                let mut coords = vec![0; rank];
                for c in &mut coords[i..=j] {
                    *c = 1;
                }
                positive_roots.push(Root::new(coords));
            }
        }

        Ok(Self {
            rank,
            positive_roots,
            fold_slack: DEFAULT_FOLD_SLACK,
        })
    }

    /// Set the multiplier applied to the alcove fold bound
    ///
    /// A slack of 0 caps folding at `rank + 1` steps.
    pub fn with_fold_slack(mut self, slack: usize) -> Self {
        self.fold_slack = slack;
        self
    }

    /// Convert a weight of length `rank` to epsilon coordinates
    pub fn to_epc(&self, wt: &[i64]) -> Vec<i64> {
        debug_assert_eq!(wt.len(), self.rank);
        let mut epc = vec![0; self.rank + 1];
        for i in (0..self.rank).rev() {
            epc[i] = epc[i + 1] + wt[i];
        }
        epc
    }

    /// Convert epsilon coordinates back to a weight
    pub fn from_epc(&self, epc: &[i64]) -> Weight {
        debug_assert_eq!(epc.len(), self.rank + 1);
        epc_to_weight(epc)
    }

    /// Sort epsilon coordinates into the dominant chamber and translate the
    /// smallest coordinate to zero
    ///
    /// Returns the parity of the sorting permutation.
    pub fn reflect_epc_to_chamber(epc: &mut [i64]) -> i64 {
        let parity = sort_descending(epc);
        normalize(epc);
        parity
    }

    /// Fold epsilon coordinates into the alcove `e[0] - e[r] <= width`
    ///
    /// Each step reflects through the affine wall `e[0] - e[r] = width` and
    /// re-sorts. Every fold crosses a separating affine hyperplane, so the
    /// number of folds is bounded by the hyperplanes between the start point
    /// and the alcove; exceeding a multiple of that bound is an error.
    pub fn reflect_epc_to_alcove(&self, epc: &mut [i64], width: i64) -> Result<i64> {
        if width <= 0 {
            return Err(Error::InvalidAlcoveWidth(width));
        }

        let mut parity = Self::reflect_epc_to_chamber(epc);
        let last = epc.len() - 1;
        let limit = self.fold_limit(epc[0], width);

        let mut folds = 0;
        while epc[0] > width {
            if folds >= limit {
                return Err(Error::AlcoveFoldLimit { limit });
            }
            epc[last] = epc[0] - width;
            epc[0] = width;
            let fold_parity = Self::reflect_epc_to_chamber(epc);
            parity *= -fold_parity;
            folds += 1;
        }

        if folds > 0 {
            tracing::trace!(folds, width, "folded into alcove");
        }
        Ok(parity)
    }

    fn fold_limit(&self, spread: i64, width: i64) -> usize {
        let n = self.rank + 1;
        let pairs = n * (n - 1) / 2;
        let strips = usize::try_from(spread / width).unwrap_or(usize::MAX);
        pairs
            .saturating_mul(strips.saturating_add(1))
            .saturating_mul(self.fold_slack)
            .saturating_add(n)
    }
}

/// Insertion sort into descending order; returns `(-1)^transpositions`
fn sort_descending(epc: &mut [i64]) -> i64 {
    let mut parity = 1;
    for i in 1..epc.len() {
        let mut j = i;
        while j > 0 && epc[j - 1] < epc[j] {
            epc.swap(j - 1, j);
            parity = -parity;
            j -= 1;
        }
    }
    parity
}

fn normalize(epc: &mut [i64]) {
    if let Some(&last) = epc.last() {
        for c in epc.iter_mut() {
            *c -= last;
        }
    }
}

fn epc_to_weight(epc: &[i64]) -> Weight {
    Weight::new(epc.windows(2).map(|w| w[0] - w[1]).collect())
}

/// Iterator over the Weyl orbit of a type A weight
///
/// Walks the distinct permutations of the dominant epsilon coordinates,
/// starting from the descending order and ending at the ascending one.
#[derive(Debug, Clone)]
pub struct Orbit {
    epc: Vec<i64>,
    done: bool,
}

impl Orbit {
    fn new(mut epc: Vec<i64>) -> Self {
        sort_descending(&mut epc);
        Self { epc, done: false }
    }

    /// Advance to the next permutation; false once the last one was reached
    fn advance(&mut self) -> bool {
        let epc = &mut self.epc;
        let Some(i) = (1..epc.len()).find(|&i| epc[i - 1] > epc[i]) else {
            return false;
        };
        // epc[..i] is non-decreasing, so the first larger entry is the smallest one
        let Some(j) = (0..i).find(|&j| epc[j] > epc[i]) else {
            return false;
        };
        epc.swap(i, j);
        epc[..i].reverse();
        true
    }
}

impl Iterator for Orbit {
    type Item = Weight;

    fn next(&mut self) -> Option<Weight> {
        if self.done {
            return None;
        }
        let current = epc_to_weight(&self.epc);
        if !self.advance() {
            self.done = true;
        }
        Some(current)
    }
}

impl RootSystem for TypeA {
    fn kind(&self) -> RootSystemKind {
        RootSystemKind::A
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn dual_coxeter_number(&self) -> i64 {
        self.rank as i64 + 1
    }

    fn killing_factor(&self) -> i64 {
        self.rank as i64 + 1
    }

    fn positive_roots(&self) -> &[Root] {
        &self.positive_roots
    }

    fn convert_root(&self, root: &Root) -> Weight {
        let rt = root.coords();
        let n = self.rank;
        if n == 1 {
            return Weight::new(vec![2 * rt[0]]);
        }

        let mut wt = vec![0; n];
        wt[0] = 2 * rt[0] - rt[1];
        for i in 1..n - 1 {
            wt[i] = 2 * rt[i] - rt[i - 1] - rt[i + 1];
        }
        wt[n - 1] = 2 * rt[n - 1] - rt[n - 2];
        Weight::new(wt)
    }

    fn int_killing_form(&self, wt1: &[i64], wt2: &[i64]) -> i64 {
        debug_assert_eq!(wt1.len(), self.rank);
        debug_assert_eq!(wt2.len(), self.rank);
        let (mut part1, mut part2) = (0, 0);
        let (mut product, mut sum1, mut sum2) = (0, 0, 0);
        for (a, b) in wt1.iter().zip(wt2).rev() {
            part1 += a;
            part2 += b;
            product += part1 * part2;
            sum1 += part1;
            sum2 += part2;
        }
        (self.rank as i64 + 1) * product - sum1 * sum2
    }

    fn level(&self, wt: &[i64]) -> i64 {
        wt.iter().sum()
    }

    fn dual(&self, wt: &[i64]) -> Weight {
        Weight::new(wt.iter().rev().copied().collect())
    }

    fn weights(&self, level: i64) -> Vec<Weight> {
        if level < 0 {
            return Vec::new();
        }
        let mut partial: Vec<(Vec<i64>, i64)> = vec![(Vec::with_capacity(self.rank), 0)];
        for _ in 0..self.rank {
            let mut extended = Vec::new();
            for (coords, sum) in partial {
                for c in 0..=(level - sum) {
                    let mut next = coords.clone();
                    next.push(c);
                    extended.push((next, sum + c));
                }
            }
            partial = extended;
        }
        partial.into_iter().map(|(coords, _)| Weight::new(coords)).collect()
    }

    fn reflect_to_chamber(&self, wt: &[i64]) -> (Weight, i64) {
        let mut epc = self.to_epc(wt);
        let parity = Self::reflect_epc_to_chamber(&mut epc);
        (epc_to_weight(&epc), parity)
    }

    fn reflect_to_alcove(&self, wt: &[i64], width: i64) -> Result<(Weight, i64)> {
        let mut epc = self.to_epc(wt);
        let parity = self.reflect_epc_to_alcove(&mut epc, width)?;
        Ok((epc_to_weight(&epc), parity))
    }

    fn orbit(&self, wt: &[i64]) -> Box<dyn Iterator<Item = Weight> + '_> {
        Box::new(Orbit::new(self.to_epc(wt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn orbit_set(rs: &TypeA, wt: &[i64]) -> BTreeSet<Vec<i64>> {
        rs.orbit(wt).map(Weight::into_inner).collect()
    }

    #[test]
    fn test_invalid_rank() {
        assert_eq!(TypeA::new(0).unwrap_err(), Error::InvalidRank(0));
    }

    #[test]
    fn test_positive_roots() -> Result<()> {
        let rs = TypeA::new(3)?;
        let roots: Vec<&[i64]> = rs.positive_roots().iter().map(|r| r.coords()).collect();
        assert_eq!(
            roots,
            vec![
                &[1, 0, 0][..],
                &[1, 1, 0],
                &[1, 1, 1],
                &[0, 1, 0],
                &[0, 1, 1],
                &[0, 0, 1],
            ]
        );

        for rank in 1..6 {
            let rs = TypeA::new(rank)?;
            assert_eq!(rs.positive_roots().len(), rank * (rank + 1) / 2);
        }
        Ok(())
    }

    #[test]
    fn test_convert_root() -> Result<()> {
        let rs = TypeA::new(1)?;
        assert_eq!(rs.convert_root(&Root::new(vec![1])), Weight::from([2]));

        let rs = TypeA::new(2)?;
        assert_eq!(rs.convert_root(&Root::new(vec![1, 0])), Weight::from([2, -1]));
        assert_eq!(rs.convert_root(&Root::new(vec![1, 1])), Weight::from([1, 1]));

        let rs = TypeA::new(3)?;
        assert_eq!(rs.convert_root(&Root::new(vec![0, 1, 0])), Weight::from([-1, 2, -1]));
        assert_eq!(rs.convert_root(&Root::new(vec![1, 1, 1])), Weight::from([1, 0, 1]));
        Ok(())
    }

    #[test]
    fn test_killing_form() -> Result<()> {
        let cases: Vec<(usize, Vec<i64>, Vec<i64>, i64, f64)> = vec![
            (1, vec![1], vec![1], 1, 0.5),
            (1, vec![2], vec![1], 2, 1.0),
            (1, vec![2], vec![2], 4, 2.0),
            (2, vec![1, 0], vec![1, 0], 2, 0.6666666666666666),
            (2, vec![0, 1], vec![1, 0], 1, 0.3333333333333333),
        ];
        for (rank, a, b, int_want, want) in cases {
            let rs = TypeA::new(rank)?;
            assert_eq!(rs.int_killing_form(&a, &b), int_want, "A{rank} {a:?}·{b:?}");
            assert!((rs.killing_form(&a, &b) - want).abs() < 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_epc_round_trip() -> Result<()> {
        let rs = TypeA::new(3)?;
        let wt = [2, -1, 3];
        let epc = rs.to_epc(&wt);
        assert_eq!(epc, vec![4, 2, 3, 0]);
        assert_eq!(rs.from_epc(&epc).coords(), &wt);
        Ok(())
    }

    #[test]
    fn test_weights() -> Result<()> {
        let rs = TypeA::new(2)?;
        let got: BTreeSet<Vec<i64>> = rs.weights(2).into_iter().map(Weight::into_inner).collect();
        let want: BTreeSet<Vec<i64>> = [
            vec![0, 0],
            vec![1, 0],
            vec![0, 1],
            vec![2, 0],
            vec![1, 1],
            vec![0, 2],
        ]
        .into_iter()
        .collect();
        assert_eq!(got, want);

        let rs = TypeA::new(3)?;
        assert_eq!(rs.weights(2).len(), 10);
        assert_eq!(rs.weights(0), vec![Weight::zero(3)]);
        assert!(rs.weights(-1).is_empty());
        Ok(())
    }

    #[test]
    fn test_dual() -> Result<()> {
        let rs = TypeA::new(3)?;
        assert_eq!(rs.dual(&[1, 2, 3]), Weight::from([3, 2, 1]));
        assert_eq!(rs.dual(&rs.dual(&[0, 4, 1])), Weight::from([0, 4, 1]));
        Ok(())
    }

    #[test]
    fn test_reflect_to_chamber() -> Result<()> {
        let rs = TypeA::new(1)?;
        assert_eq!(rs.reflect_to_chamber(&[-1]), (Weight::from([1]), -1));
        assert_eq!(rs.reflect_to_chamber(&[2]), (Weight::from([2]), 1));

        let rs = TypeA::new(2)?;
        assert_eq!(rs.reflect_to_chamber(&[-1, 0]), (Weight::from([0, 1]), 1));
        assert_eq!(rs.reflect_to_chamber(&[0, -1]), (Weight::from([1, 0]), 1));
        assert_eq!(rs.reflect_to_chamber(&[-1, -1]), (Weight::from([1, 1]), -1));
        assert_eq!(rs.reflect_to_chamber(&[1, 1]), (Weight::from([1, 1]), 1));
        Ok(())
    }

    #[test]
    fn test_orbit() -> Result<()> {
        let rs = TypeA::new(2)?;
        let want: BTreeSet<Vec<i64>> = [vec![1, 0], vec![-1, 1], vec![0, -1]].into_iter().collect();
        assert_eq!(orbit_set(&rs, &[1, 0]), want);

        let want: BTreeSet<Vec<i64>> = [
            vec![1, 1],
            vec![-1, 2],
            vec![2, -1],
            vec![1, -2],
            vec![-2, 1],
            vec![-1, -1],
        ]
        .into_iter()
        .collect();
        assert_eq!(orbit_set(&rs, &[1, 1]), want);
        assert_eq!(rs.orbit_size(&[1, 1]), 6);
        assert_eq!(rs.orbit_size(&[0, 0]), 1);

        // Non-dominant input yields the same orbit
        assert_eq!(orbit_set(&rs, &[-1, 2]), orbit_set(&rs, &[1, 1]));
        Ok(())
    }

    #[test]
    fn test_orbit_counts() -> Result<()> {
        let rs = TypeA::new(3)?;
        assert_eq!(rs.orbit_size(&[1, 1, 1]), 24);
        assert_eq!(rs.orbit_size(&[1, 0, 1]), 12);
        assert_eq!(rs.orbit_size(&[0, 1, 0]), 6);
        assert_eq!(rs.orbit_size(&[0, 0, 0]), 1);
        Ok(())
    }

    #[test]
    fn test_reflect_to_alcove() -> Result<()> {
        let rs = TypeA::new(1)?;
        // [5] + nothing: epc [5, 0] folds once across width 4
        assert_eq!(rs.reflect_to_alcove(&[5], 4)?, (Weight::from([3]), -1));
        assert_eq!(rs.reflect_to_alcove(&[3], 4)?, (Weight::from([3]), 1));
        // On the wall: no fold
        assert_eq!(rs.reflect_to_alcove(&[4], 4)?, (Weight::from([4]), 1));
        Ok(())
    }

    #[test]
    fn test_alcove_fold_terminates_far_out() -> Result<()> {
        for rank in 1..5 {
            let rs = TypeA::new(rank)?;
            let mut wt = vec![0; rank];
            wt[0] = 997;
            wt[rank - 1] += 1013;
            let (folded, parity) = rs.reflect_to_alcove(&wt, rank as i64 + 3)?;
            assert!(folded.is_dominant());
            assert!(rs.level(&folded) <= rank as i64 + 3);
            assert!(parity == 1 || parity == -1);
        }
        Ok(())
    }

    #[test]
    fn test_alcove_invalid_width() -> Result<()> {
        let rs = TypeA::new(2)?;
        assert_eq!(rs.reflect_to_alcove(&[1, 1], 0), Err(Error::InvalidAlcoveWidth(0)));
        Ok(())
    }

    #[test]
    fn test_alcove_fold_within_unit_slack() -> Result<()> {
        let rs = TypeA::new(2)?.with_fold_slack(1);
        let mut epc = rs.to_epc(&[50, 0]);
        rs.reflect_epc_to_alcove(&mut epc, 3)?;
        assert!(epc[0] <= 3);
        Ok(())
    }

    #[test]
    fn test_alcove_fold_limit() -> Result<()> {
        // [50, 0] needs 11 folds to reach width 3; slack 0 allows rank + 1
        let rs = TypeA::new(2)?.with_fold_slack(0);
        let mut epc = rs.to_epc(&[50, 0]);
        assert_eq!(
            rs.reflect_epc_to_alcove(&mut epc, 3),
            Err(Error::AlcoveFoldLimit { limit: 3 })
        );
        assert_eq!(rs.reflect_to_alcove(&[2, 0], 3)?, (Weight::from([2, 0]), 1));
        Ok(())
    }
}
