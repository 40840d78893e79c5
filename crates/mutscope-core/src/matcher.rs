use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sequences at least this long get the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A maximal run of equal residues: `a[a_start..a_start + size] ==
/// b[b_start..b_start + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One edit step turning `a[a_start..a_end]` into `b[b_start..b_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

impl Opcode {
    pub fn a_len(&self) -> usize {
        self.a_end - self.a_start
    }

    pub fn b_len(&self) -> usize {
        self.b_end - self.b_start
    }
}

/// Longest-matching-block comparison of two residue strings.
///
/// Finds the longest common block, then recurses into the unmatched
/// remainders on either side. This is a similarity heuristic, not an
/// alignment: no scoring matrix or gap model is involved.
///
/// Autojunk is off unless requested with [`SequenceMatcher::with_autojunk`].
/// When on, residues of `b` occurring more than `len(b) / 100 + 1` times in a
/// `b` of at least 200 residues are not indexed. They can still extend a block
/// found through other residues. Nearly every residue of a real protein that
/// long is that frequent, so the option only suits long low-complexity input.
pub struct SequenceMatcher<'a> {
    a: &'a [u8],
    b: &'a [u8],
    b2j: HashMap<u8, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    pub fn new(a: &'a [u8], b: &'a [u8]) -> Self {
        Self::with_autojunk(a, b, false)
    }

    pub fn with_autojunk(a: &'a [u8], b: &'a [u8], autojunk: bool) -> Self {
        let mut b2j: HashMap<u8, Vec<usize>> = HashMap::new();
        for (j, &residue) in b.iter().enumerate() {
            b2j.entry(residue).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block inside `a[alo..ahi]` x `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    /// Returns a zero-size block at `(alo, blo)` when nothing matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j2len[j] = length of the block ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Grow over residues the index skipped
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All matching blocks in increasing order, adjacent blocks merged,
    /// terminated by a zero-size sentinel at `(len(a), len(b))`.
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_by_key(|b| (b.a_start, b.b_start));

        let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(MatchingBlock {
            a_start: la,
            b_start: lb,
            size: 0,
        });
        merged
    }

    /// Edit steps turning `a` into `b`.
    pub fn opcodes(&self) -> Vec<Opcode> {
        Self::opcodes_for(&self.matching_blocks())
    }

    /// Edit steps implied by the output of [`Self::matching_blocks`].
    pub fn opcodes_for(blocks: &[MatchingBlock]) -> Vec<Opcode> {
        let mut ops = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);

        for block in blocks {
            let tag = match (i < block.a_start, j < block.b_start) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    a_start: i,
                    a_end: block.a_start,
                    b_start: j,
                    b_end: block.b_start,
                });
            }
            i = block.a_start + block.size;
            j = block.b_start + block.size;
            if block.size > 0 {
                ops.push(Opcode {
                    tag: OpTag::Equal,
                    a_start: block.a_start,
                    a_end: i,
                    b_start: block.b_start,
                    b_end: j,
                });
            }
        }

        ops
    }

    /// `2 * matched / (len(a) + len(b))`, or 1.0 when both are empty.
    pub fn ratio(&self) -> f64 {
        self.ratio_for(&self.matching_blocks())
    }

    /// [`Self::ratio`] over blocks already computed for this pair.
    pub fn ratio_for(&self, blocks: &[MatchingBlock]) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = blocks.iter().map(|b| b.size).sum();
        2.0 * matched as f64 / total as f64
    }
}
