//! The `Hcs` structure: extraction and serialization.
//!
//! An `Hcs` owns its seven packed/bit arrays for its lifetime. Every
//! index in `0..size()` is exactly one of: a dense root, a sparse root,
//! or a subset, in that contiguous, non-overlapping order.

use crate::bits::{BitVector, PackedIntVec};
use crate::Error;

/// The seven concatenated arrays that make up a Hierarchical Color-Set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hcs {
    pub dense_container: BitVector,
    pub dense_starts: PackedIntVec,
    pub sparse_container: PackedIntVec,
    pub sparse_starts: PackedIntVec,
    pub subset_container: BitVector,
    pub subset_starts: PackedIntVec,
    pub parent_vec: PackedIntVec,
}

impl Hcs {
    pub fn dense_count(&self) -> usize {
        self.dense_starts.len() - 1
    }

    pub fn sparse_count(&self) -> usize {
        self.sparse_starts.len() - 1
    }

    pub fn subset_count(&self) -> usize {
        self.subset_starts.len() - 1
    }

    pub fn root_count(&self) -> usize {
        self.dense_count() + self.sparse_count()
    }

    pub fn size(&self) -> usize {
        self.root_count() + self.subset_count()
    }

    pub fn is_dense(&self, idx: usize) -> bool {
        idx < self.dense_count()
    }

    pub fn is_root(&self, idx: usize) -> bool {
        idx < self.root_count()
    }

    pub fn is_sparse(&self, idx: usize) -> bool {
        self.is_root(idx) && !self.is_dense(idx)
    }

    pub fn is_subset(&self, idx: usize) -> bool {
        !self.is_root(idx)
    }

    /// Decode the set at index `i` into a sorted vector of its elements.
    pub fn extract(&self, i: usize) -> Result<Vec<u32>, Error> {
        let size = self.size();
        if i >= size {
            return Err(Error::ExtractOutOfRange { index: i, size });
        }
        if self.is_dense(i) {
            Ok(self.extract_dense(i))
        } else if self.is_sparse(i) {
            Ok(self.extract_sparse(i - self.dense_count()))
        } else {
            Ok(self.extract_subset(i - self.root_count()))
        }
    }

    fn extract_dense(&self, idx: usize) -> Vec<u32> {
        let beg = self.dense_starts.get(idx) as usize;
        let end = self.dense_starts.get(idx + 1) as usize;
        let elems = self.dense_container.count_ones_range(beg, end);
        let mut s = Vec::with_capacity(elems);
        for i in 0..(end - beg) {
            if self.dense_container.get(beg + i) {
                s.push(i as u32);
            }
        }
        s
    }

    fn extract_sparse(&self, idx: usize) -> Vec<u32> {
        let beg = self.sparse_starts.get(idx) as usize;
        let end = self.sparse_starts.get(idx + 1) as usize;
        (beg..end).map(|i| self.sparse_container.get(i) as u32).collect()
    }

    /// Materialize the bitmap of a root set (dense or sparse), at the
    /// root's own universe size.
    fn materialize_root(&self, root: usize) -> BitVector {
        if self.is_dense(root) {
            let beg = self.dense_starts.get(root) as usize;
            let end = self.dense_starts.get(root + 1) as usize;
            let mut bv = BitVector::with_len(end - beg);
            for i in 0..(end - beg) {
                if self.dense_container.get(beg + i) {
                    bv.set(i, true);
                }
            }
            bv
        } else {
            let sparse_idx = root - self.dense_count();
            let beg = self.sparse_starts.get(sparse_idx) as usize;
            let end = self.sparse_starts.get(sparse_idx + 1) as usize;
            let sz = if end > beg { self.sparse_container.get(end - 1) as usize + 1 } else { 0 };
            let mut bv = BitVector::with_len(sz);
            for i in beg..end {
                bv.set(self.sparse_container.get(i) as usize, true);
            }
            bv
        }
    }

    /// Scatter-bits reconstruction: walk the ancestor chain to a root,
    /// materialize its bitmap, then apply each subset link's selector
    /// bits from nearest-root to nearest-leaf, one 64-bit word at a time.
    fn extract_subset(&self, idx: usize) -> Vec<u32> {
        let mut stack = vec![idx];
        let mut parent = self.parent_vec.get(idx) as usize;
        while self.is_subset(parent) {
            let p_ordinal = parent - self.root_count();
            stack.push(p_ordinal);
            parent = self.parent_vec.get(p_ordinal) as usize;
        }

        let mut bv = self.materialize_root(parent);

        while let Some(ss) = stack.pop() {
            let ss_beg = self.subset_starts.get(ss) as usize;
            let mut elem = ss_beg;
            for w in 0..bv.word_len() {
                let word = bv.word(w);
                let bits = word.count_ones();
                let mut mask: u64 = !0u64;
                let mut temp: u64 = 0u64;
                for _ in 0..bits {
                    let bit_idx = (word & mask).trailing_zeros();
                    if self.subset_container.get(elem) {
                        temp |= 1u64 << bit_idx;
                    }
                    elem += 1;
                    mask &= !(1u64 << bit_idx);
                }
                *bv.word_mut(w) = temp;
            }
        }

        let elems = bv.count_ones();
        let mut s = Vec::with_capacity(elems);
        for i in 0..bv.len() {
            if bv.get(i) {
                s.push(i as u32);
            }
        }
        s
    }

    /// Concatenate the seven containers in the canonical order:
    /// `dense_container, dense_starts, sparse_container, sparse_starts,
    /// subset_container, subset_starts, parent_vec`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.dense_container.serialize_into(&mut out);
        self.dense_starts.serialize_into(&mut out);
        self.sparse_container.serialize_into(&mut out);
        self.sparse_starts.serialize_into(&mut out);
        self.subset_container.serialize_into(&mut out);
        self.subset_starts.serialize_into(&mut out);
        self.parent_vec.serialize_into(&mut out);
        out
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, Error> {
        let mut off = 0usize;
        let (dense_container, n) = BitVector::deserialize(&buf[off..])?;
        off += n;
        let (dense_starts, n) = PackedIntVec::deserialize(&buf[off..])?;
        off += n;
        let (sparse_container, n) = PackedIntVec::deserialize(&buf[off..])?;
        off += n;
        let (sparse_starts, n) = PackedIntVec::deserialize(&buf[off..])?;
        off += n;
        let (subset_container, n) = BitVector::deserialize(&buf[off..])?;
        off += n;
        let (subset_starts, n) = PackedIntVec::deserialize(&buf[off..])?;
        off += n;
        let (parent_vec, n) = PackedIntVec::deserialize(&buf[off..])?;
        off += n;
        let _ = off;
        Ok(Self {
            dense_container,
            dense_starts,
            sparse_container,
            sparse_starts,
            subset_container,
            subset_starts,
            parent_vec,
        })
    }

    /// Byte size of the seven containers, for reporting (mirrors the
    /// source's `size_in_bytes`/`space_breakdown`).
    pub fn space_breakdown(&self) -> Vec<(&'static str, usize)> {
        fn framed_len(f: impl Fn(&mut Vec<u8>)) -> usize {
            let mut b = Vec::new();
            f(&mut b);
            b.len()
        }
        vec![
            ("dense_container", framed_len(|b| self.dense_container.serialize_into(b))),
            ("dense_starts", framed_len(|b| self.dense_starts.serialize_into(b))),
            ("sparse_container", framed_len(|b| self.sparse_container.serialize_into(b))),
            ("sparse_starts", framed_len(|b| self.sparse_starts.serialize_into(b))),
            ("subset_container", framed_len(|b| self.subset_container.serialize_into(b))),
            ("subset_starts", framed_len(|b| self.subset_starts.serialize_into(b))),
            ("parent_vec", framed_len(|b| self.parent_vec.serialize_into(b))),
        ]
    }

    pub fn size_in_bytes(&self) -> usize {
        self.space_breakdown().iter().map(|(_, n)| n).sum()
    }
}
