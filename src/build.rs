//! Container builder.
//!
//! Runs the full construction pipeline (parent discovery, depth
//! limiting, layout planning) and assembles the seven packed/bit
//! containers in a two-phase pass: first tally sizes (done by
//! [`crate::layout::plan`]), then fill, since a start vector's width
//! depends on the final container size.

use crate::bits::{bits_required, BitVector, PackedIntVec};
use crate::hcs::Hcs;
use crate::layout::{self, dense_bits_of, SetClass};
use crate::{depth, parents, BuildOptions, Error};

/// Build an `Hcs` from a collection of pre-sorted-by-ascending-cardinality
/// color sets, plus a mapping from input index to HCS index. Runs the
/// whole pipeline, including parent discovery.
pub fn build_hcs(color_sets: &[Vec<u32>], opts: &BuildOptions) -> Result<(Hcs, Vec<usize>), Error> {
    log::info!("computing parents for {} sets (threads={})", color_sets.len(), opts.num_threads);
    let ancestor = parents::find_parents_with_threads(color_sets, opts.num_threads);
    build_from_ancestors(color_sets, ancestor, opts.depth_limit)
}

/// Same as [`build_hcs`], but takes an already-computed `ancestor` vector
/// (e.g. loaded from a parent file written by a separate `find-parents`
/// step) instead of running parent discovery itself.
///
/// Returns [`Error::NonAscendingSet`] if the subset-encoding merge walk
/// ever diverges from a set it was told is a subset of its ancestor — the
/// late-detected symptom of malformed, non-strictly-ascending input.
pub fn build_from_ancestors(
    color_sets: &[Vec<u32>],
    mut ancestor: Vec<i64>,
    depth_limit: i64,
) -> Result<(Hcs, Vec<usize>), Error> {
    let n = color_sets.len();
    let max_elem = color_sets.iter().filter_map(|s| s.last()).copied().max().unwrap_or(0);
    let enc_width = bits_required(max_elem as u64);

    log::info!("applying depth limit {depth_limit}");
    depth::limit_depth(&mut ancestor, depth_limit);

    log::info!("planning layout (enc_width={enc_width})");
    let (classes, totals) = layout::plan(color_sets, &mut ancestor, enc_width);
    log::info!(
        "dense={} sparse={} subset={}",
        totals.dense_count,
        totals.sparse_count,
        totals.subset_count
    );

    let ptr_width = bits_required(n as u64);

    let mut dense_container = BitVector::with_len(totals.dense_elements);
    let mut dense_starts = PackedIntVec::with_capacity(totals.dense_count + 1, bits_required(totals.dense_elements as u64));
    let mut sparse_container = PackedIntVec::with_capacity(totals.sparse_elements, enc_width);
    let mut sparse_starts = PackedIntVec::with_capacity(totals.sparse_count + 1, bits_required(totals.sparse_elements as u64));
    let mut subset_container = BitVector::with_len(totals.subset_elements);
    let mut subset_starts = PackedIntVec::with_capacity(totals.subset_count + 1, bits_required(totals.subset_elements as u64));
    let mut parent_vec = PackedIntVec::with_capacity(totals.subset_count, ptr_width);

    let mut set_mapping = vec![0usize; n];
    let mut dense_idx = 0usize;
    let mut sparse_idx = totals.dense_count;
    let mut subset_idx = totals.root_count();

    let mut dense_pos = 0usize;
    let mut dense_starts_idx = 1usize;
    let mut sparse_pos = 0usize;
    let mut sparse_starts_idx = 1usize;
    let mut subset_pos = 0usize;
    let mut subset_starts_idx = 1usize;

    for (i, set) in color_sets.iter().enumerate() {
        match classes[i] {
            SetClass::Dense => {
                let base = dense_pos;
                for &x in set {
                    dense_container.set(base + x as usize, true);
                }
                dense_pos = base + dense_bits_of(set);
                dense_starts.set(dense_starts_idx, dense_pos as u64);
                dense_starts_idx += 1;
                set_mapping[i] = dense_idx;
                dense_idx += 1;
            }
            SetClass::Sparse => {
                for &x in set {
                    sparse_container.set(sparse_pos, x as u64);
                    sparse_pos += 1;
                }
                sparse_starts.set(sparse_starts_idx, sparse_pos as u64);
                sparse_starts_idx += 1;
                set_mapping[i] = sparse_idx;
                sparse_idx += 1;
            }
            SetClass::Subset => {
                let anc_set = &color_sets[ancestor[i] as usize];
                let base = subset_pos;
                let mut k = 0usize;
                for (m, &av) in anc_set.iter().enumerate() {
                    if k < set.len() && set[k] == av {
                        subset_container.set(base + m, true);
                        k += 1;
                    }
                }
                if k != set.len() {
                    return Err(Error::NonAscendingSet);
                }
                subset_pos = base + anc_set.len();
                subset_starts.set(subset_starts_idx, subset_pos as u64);
                subset_starts_idx += 1;
                set_mapping[i] = subset_idx;
                subset_idx += 1;
            }
        }
    }

    let mut subset_ordinal = 0usize;
    for a in ancestor.iter() {
        if *a != -1 {
            parent_vec.set(subset_ordinal, set_mapping[*a as usize] as u64);
            subset_ordinal += 1;
        }
    }

    let h = Hcs {
        dense_container,
        dense_starts,
        sparse_container,
        sparse_starts,
        subset_container,
        subset_starts,
        parent_vec,
    };
    Ok((h, set_mapping))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_equals_input_count() {
        let sets = vec![vec![3u32], vec![1, 3], vec![0, 1, 3, 4], vec![9u32]];
        let (h, mapping) = build_hcs(&sets, &BuildOptions::default()).unwrap();
        assert_eq!(h.size(), sets.len());
        let mut seen: Vec<usize> = mapping.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..sets.len()).collect::<Vec<_>>());
    }

    #[test]
    fn non_ascending_set_is_rejected_during_subset_encoding() {
        // set 0 is {5,3} out of order (should be {3,5}); forced onto ancestor
        // 1 ({3}) by an externally-supplied ancestor vector. The subset
        // merge walk never finds 5 in the ancestor and never consumes the
        // whole set, so it must be reported rather than silently encoded.
        let sets = vec![vec![5u32, 3], vec![3u32]];
        let ancestor = vec![1i64, -1];
        let err = build_from_ancestors(&sets, ancestor, 10).unwrap_err();
        assert!(matches!(err, Error::NonAscendingSet));
    }

    #[test]
    fn index_ranges_are_contiguous_and_ordered() {
        let sets = vec![vec![3u32], vec![1, 3], vec![0, 1, 3, 4], vec![200_000u32]];
        let (h, _) = build_hcs(&sets, &BuildOptions::default()).unwrap();
        for i in 0..h.dense_count() {
            assert!(h.is_dense(i) && h.is_root(i));
        }
        for i in h.dense_count()..h.root_count() {
            assert!(h.is_sparse(i) && h.is_root(i));
        }
        for i in h.root_count()..h.size() {
            assert!(h.is_subset(i));
        }
    }

    #[test]
    fn subset_selector_popcount_equals_cardinality() {
        // Large shared element keeps the children's own root costs
        // expensive relative to their ancestors' cardinality, so the
        // planner actually picks subset encoding here (see the similarly
        // constructed case in hcs.rs's `subset_chain_actually_exercises_scatter_bits`).
        let sets = vec![vec![999u32], vec![3, 999], vec![0, 1, 3, 4, 999]];
        let (h, mapping) = build_hcs(&sets, &BuildOptions::default()).unwrap();
        let mut saw_subset = false;
        for (i, set) in sets.iter().enumerate() {
            if h.is_subset(mapping[i]) {
                saw_subset = true;
                let ordinal = mapping[i] - h.root_count();
                let beg = h.subset_starts.get(ordinal) as usize;
                let end = h.subset_starts.get(ordinal + 1) as usize;
                let popcount = h.subset_container.count_ones_range(beg, end);
                assert_eq!(popcount, set.len());
            }
        }
        assert!(saw_subset, "expected at least one subset-encoded set in this fixture");
    }
}
