//! F-curves on the moduli space of pointed rational curves
//!
//! An F-curve is determined by a partition of the marked points into four
//! nonempty blocks. Points are numbered from 0.

use std::fmt;

use cblocks_lie::{Error, Result};

/// A partition of the points `0..n` into four nonempty blocks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FCurve {
    blocks: [Vec<usize>; 4],
}

impl FCurve {
    /// Build an F-curve from four blocks, checking they partition `0..points`
    pub fn new(blocks: [Vec<usize>; 4], points: usize) -> Result<Self> {
        let curve = Self { blocks };
        curve.validate(points)?;
        Ok(curve)
    }

    /// The four blocks, in order
    pub fn blocks(&self) -> &[Vec<usize>; 4] {
        &self.blocks
    }

    /// Sizes of the four blocks
    pub fn block_sizes(&self) -> [usize; 4] {
        [
            self.blocks[0].len(),
            self.blocks[1].len(),
            self.blocks[2].len(),
            self.blocks[3].len(),
        ]
    }

    /// Total number of points covered
    pub fn points(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// Check that the blocks are nonempty and partition `0..points`
    pub fn validate(&self, points: usize) -> Result<()> {
        let mut seen = vec![false; points];
        for (k, block) in self.blocks.iter().enumerate() {
            if block.is_empty() {
                return Err(Error::InvalidPartition(format!("block {k} is empty")));
            }
            for &point in block {
                match seen.get_mut(point) {
                    None => {
                        return Err(Error::InvalidPartition(format!(
                            "point {point} out of range for {points} points"
                        )))
                    }
                    Some(true) => {
                        return Err(Error::InvalidPartition(format!("point {point} appears twice")))
                    }
                    Some(slot) => *slot = true,
                }
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Error::InvalidPartition(format!("point {missing} is not covered")));
        }
        Ok(())
    }
}

impl fmt::Display for FCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = &self.blocks;
        write!(f, "{a:?} | {b:?} | {c:?} | {d:?}")
    }
}

/// All `k`-element subsets of `items`, in lexicographic order of positions
pub(crate) fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        result.push(idx.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still advance
        let Some(pos) = (0..k).rev().find(|&p| idx[p] < n - k + p) else {
            return result;
        };
        idx[pos] += 1;
        for p in pos + 1..k {
            idx[p] = idx[p - 1] + 1;
        }
    }
}

fn complement(items: &[usize], remove: &[usize]) -> Vec<usize> {
    items.iter().copied().filter(|x| !remove.contains(x)).collect()
}

/// Every F-curve on `n` points
///
/// Blocks are ordered, so each unordered partition appears once per ordering
/// of its blocks. Empty for `n < 4`.
pub fn f_curves(n: usize) -> Vec<FCurve> {
    let mut curves = Vec::new();
    if n < 4 {
        return curves;
    }
    let all: Vec<usize> = (0..n).collect();
    for r1 in 1..n - 2 {
        for set1 in combinations(&all, r1) {
            let rest1 = complement(&all, &set1);
            for r2 in 1..n - r1 - 1 {
                for set2 in combinations(&rest1, r2) {
                    let rest2 = complement(&rest1, &set2);
                    for r3 in 1..n - r1 - r2 {
                        for set3 in combinations(&rest2, r3) {
                            let set4 = complement(&rest2, &set3);
                            curves.push(FCurve {
                                blocks: [set1.clone(), set2.clone(), set3, set4],
                            });
                        }
                    }
                }
            }
        }
    }
    curves
}

/// F-curves on `n` points up to permutation of the points
///
/// One curve per block-size pattern `p1 ≥ p2 ≥ p3` with `p4 = n - p1 - p2 - p3`
/// and `1 ≤ p4 ≤ p3`; blocks are consecutive runs of points.
pub fn sym_f_curves(n: usize) -> Vec<FCurve> {
    let mut curves = Vec::new();
    if n < 4 {
        return curves;
    }
    for p1 in n.div_ceil(4)..n - 2 {
        let r1 = n - p1;
        for p2 in r1.div_ceil(3)..=(r1 - 2).min(p1) {
            let r2 = r1 - p2;
            for p3 in r2.div_ceil(2)..=(r2 - 1).min(p2) {
                let (s1, s2, s3) = (p1, p1 + p2, p1 + p2 + p3);
                curves.push(FCurve {
                    blocks: [
                        (0..s1).collect(),
                        (s1..s2).collect(),
                        (s2..s3).collect(),
                        (s3..n).collect(),
                    ],
                });
            }
        }
    }
    curves
}
