//! # HCS — Hierarchical Color-Set compression
//!
//! Compresses and queries a large collection of sorted integer sets (the
//! "color sets" of a colored de Bruijn graph, though the structure itself
//! is domain-agnostic). Given N input sets over a universe `[0, U)`, this
//! crate builds a compact Hierarchical Color-Set (HCS) representation
//! supporting `extract(i)` with a known cost model, trading a small
//! amount of decode work for substantial space savings.
//!
//! Pipeline, leaves first:
//! * `bits` — bit-packed primitives (`BitVector`, `PackedIntVec`).
//! * `parents` — parent discovery.
//! * `depth` — depth-bounding of the subset forest.
//! * `layout` — per-set cost model and classification.
//! * `build` — container assembly.
//! * `hcs` — the `Hcs` structure itself: extraction and serialization.
//! * `io` — on-disk file formats for color sets and parent vectors.
//!
//! ## Example
//!
//! ```
//! use hcs::{build_hcs, BuildOptions};
//!
//! let color_sets = vec![vec![2u32, 5], vec![0, 2, 5, 9]];
//! let (h, mapping) = build_hcs(&color_sets, &BuildOptions::default()).unwrap();
//! assert_eq!(h.extract(mapping[0]).unwrap(), vec![2, 5]);
//! assert_eq!(h.extract(mapping[1]).unwrap(), vec![0, 2, 5, 9]);
//! ```

pub mod bits;
pub mod build;
pub mod depth;
pub mod hcs;
pub mod io;
pub mod layout;
pub mod parents;

pub use build::build_hcs;
pub use hcs::Hcs;

/// Crate-wide error type. The core surface is intentionally narrow: most
/// of the construction pipeline (parent discovery, layout planning)
/// cannot fail, since the absence of a suitable ancestor is a normal
/// outcome rather than an error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("record at byte offset {byte_offset} claims more elements than remain in the stream")]
    MalformedInput { byte_offset: u64 },
    #[error("color set is not strictly ascending during subset encoding")]
    NonAscendingSet,
    #[error("extract index {index} out of range (size {size})")]
    ExtractOutOfRange { index: usize, size: usize },
    #[error("corrupted serialized HCS: {0}")]
    CorruptedHcs(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Options controlling construction. Layout planning has no tunables;
/// the two knobs here govern the chain-depth bound and the worker pool
/// the parallel parent-finder scan runs on.
#[derive(Clone, Copy, Debug)]
pub struct BuildOptions {
    /// Maximum allowed length of a subset-to-root chain. `0` forces every
    /// subset directly onto its root.
    pub depth_limit: i64,
    /// Worker count for the parent-finder's rayon pool. `0` means "use
    /// rayon's global default pool" (one worker per available core).
    pub num_threads: usize,
}

pub const STD_OPTIONS: BuildOptions = BuildOptions { depth_limit: i64::MAX, num_threads: 0 };

impl Default for BuildOptions {
    fn default() -> Self {
        STD_OPTIONS
    }
}
