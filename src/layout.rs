//! Layout planner.
//!
//! Chooses, for each input set, the cheapest of three encodings: a dense
//! bitmap root, a sparse element-list root, or a subset selector over an
//! ancestor. Demotes to a root in place when the subset encoding is not
//! strictly cheaper than both root forms.

use crate::bits::bits_required;

/// How a single input set will be stored in the assembled [`crate::Hcs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetClass {
    Dense,
    Sparse,
    Subset,
}

/// Running container sizes accumulated while planning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutTotals {
    pub dense_count: usize,
    pub dense_elements: usize,
    pub sparse_count: usize,
    pub sparse_elements: usize,
    pub subset_count: usize,
    pub subset_elements: usize,
}

impl LayoutTotals {
    pub fn root_count(&self) -> usize {
        self.dense_count + self.sparse_count
    }
}

pub(crate) fn dense_bits_of(set: &[u32]) -> usize {
    set.last().map(|&m| m as usize + 1).unwrap_or(0)
}

fn classify_root(set: &[u32], enc_width: u32, totals: &mut LayoutTotals) -> SetClass {
    let dense_bits = dense_bits_of(set);
    let sparse_bits = set.len() * enc_width as usize;
    if dense_bits <= sparse_bits {
        totals.dense_count += 1;
        totals.dense_elements += dense_bits;
        SetClass::Dense
    } else {
        totals.sparse_count += 1;
        totals.sparse_elements += set.len();
        SetClass::Sparse
    }
}

/// Plan the layout of every set. `ancestor` is rewritten in place:
/// whenever the subset encoding loses to both root forms, the entry is
/// set to `-1` and the set is classified as a root instead, so a later
/// pass over `ancestor` always reflects the final assignment (see the
/// note on ancestor over-counting in the design notes).
pub fn plan(color_sets: &[Vec<u32>], ancestor: &mut [i64], enc_width: u32) -> (Vec<SetClass>, LayoutTotals) {
    let n = color_sets.len();
    let ptr_width = bits_required(n as u64) as usize;
    let mut classes = Vec::with_capacity(n);
    let mut totals = LayoutTotals::default();

    for i in 0..n {
        let set = &color_sets[i];
        if ancestor[i] == -1 {
            classes.push(classify_root(set, enc_width, &mut totals));
            continue;
        }

        let ancestor_idx = ancestor[i] as usize;
        let ancestor_bits = color_sets[ancestor_idx].len();
        let ss_bits = ancestor_bits + ptr_width;
        let dense_bits = dense_bits_of(set);
        let sparse_bits = set.len() * enc_width as usize;

        if ss_bits < dense_bits && ss_bits < sparse_bits {
            totals.subset_count += 1;
            totals.subset_elements += ancestor_bits;
            classes.push(SetClass::Subset);
        } else {
            ancestor[i] = -1;
            classes.push(classify_root(set, enc_width, &mut totals));
        }
    }

    (classes, totals)
}
