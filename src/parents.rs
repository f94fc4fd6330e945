//! Parent discovery.
//!
//! For each color set, in ascending-cardinality order, find the
//! smallest-index larger set that contains it. A set with no such
//! ancestor is a root candidate (`-1`).

use rayon::prelude::*;

/// `ancestor[i]` is the candidate parent of set `i`, or `-1` if none was
/// found. Input must already be sorted by ascending cardinality; this is
/// not checked here (the ascending-length sort pre-pass is an external
/// collaborator, see `io::sort_ascending`).
///
/// Iterations over `i` are independent and run on a rayon work-stealing
/// pool: work per `i` shrinks as `i` grows, so a dynamic schedule keeps
/// workers busy rather than partitioning the range evenly up front.
pub fn find_parents(color_sets: &[Vec<u32>]) -> Vec<i64> {
    (0..color_sets.len())
        .into_par_iter()
        .map(|i| find_parent_of(color_sets, i))
        .collect()
}

/// Same as [`find_parents`], but runs the scan on a dedicated rayon pool
/// sized to `num_threads` workers instead of rayon's global default pool.
/// `num_threads == 0` falls back to [`find_parents`]'s behavior.
pub fn find_parents_with_threads(color_sets: &[Vec<u32>], num_threads: usize) -> Vec<i64> {
    if num_threads == 0 {
        return find_parents(color_sets);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .expect("failed to build rayon thread pool");
    pool.install(|| find_parents(color_sets))
}

fn find_parent_of(color_sets: &[Vec<u32>], i: usize) -> i64 {
    let s1 = &color_sets[i];
    for (j, s2) in color_sets.iter().enumerate().skip(i + 1) {
        if s1.len() >= s2.len() {
            continue;
        }
        if is_subset_of(s1, s2) {
            return j as i64;
        }
    }
    -1
}

/// True iff `small` (sorted, strictly increasing) is a subset of `big`
/// (sorted, strictly increasing), via a linear merge walk.
fn is_subset_of(small: &[u32], big: &[u32]) -> bool {
    let mut bi = 0;
    for &x in small {
        while bi < big.len() && big[bi] < x {
            bi += 1;
        }
        if bi >= big.len() || big[bi] != x {
            return false;
        }
        bi += 1;
    }
    true
}
