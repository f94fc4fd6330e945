//! On-disk file formats for color sets and parent vectors, plus the
//! ascending-cardinality sort pre-pass. These are external collaborators
//! to the core HCS data structure, not part of it, but the crate's CLI
//! needs them to drive the pipeline end to end.

use std::fs;
use std::path::Path;

use crate::Error;

/// Parse a sequence of color-set records: a little-endian `u32`
/// cardinality `k`, followed by `k` little-endian `u32` elements in
/// strictly ascending order, repeated to end of stream.
pub fn parse_color_sets(buf: &[u8]) -> Result<Vec<Vec<u32>>, Error> {
    let mut sets = Vec::new();
    let mut off = 0usize;
    while off < buf.len() {
        if off + 4 > buf.len() {
            return Err(Error::MalformedInput { byte_offset: off as u64 });
        }
        let k = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap()) as usize;
        off += 4;
        let need = k * 4;
        if off + need > buf.len() {
            return Err(Error::MalformedInput { byte_offset: off as u64 });
        }
        let mut set = Vec::with_capacity(k);
        for _ in 0..k {
            set.push(u32::from_le_bytes(buf[off..off + 4].try_into().unwrap()));
            off += 4;
        }
        sets.push(set);
    }
    Ok(sets)
}

pub fn read_color_sets<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u32>>, Error> {
    parse_color_sets(&fs::read(path)?)
}

pub fn write_color_sets<P: AsRef<Path>>(path: P, sets: &[Vec<u32>]) -> Result<(), Error> {
    let mut buf = Vec::new();
    for s in sets {
        buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
        for &x in s {
            buf.extend_from_slice(&x.to_le_bytes());
        }
    }
    fs::write(path, buf)?;
    Ok(())
}

/// A dense array of little-endian `i64`: `ancestor[i]`, or `-1`.
pub fn read_parents<P: AsRef<Path>>(path: P) -> Result<Vec<i64>, Error> {
    let buf = fs::read(path)?;
    if buf.len() % 8 != 0 {
        return Err(Error::CorruptedHcs("parent file length is not a multiple of 8".into()));
    }
    Ok(buf.chunks_exact(8).map(|c| i64::from_le_bytes(c.try_into().unwrap())).collect())
}

pub fn write_parents<P: AsRef<Path>>(path: P, ancestor: &[i64]) -> Result<(), Error> {
    let mut buf = Vec::with_capacity(ancestor.len() * 8);
    for &p in ancestor {
        buf.extend_from_slice(&p.to_le_bytes());
    }
    fs::write(path, buf)?;
    Ok(())
}

/// Ascending-cardinality sort pre-pass. Stable: sets with equal
/// cardinality keep their relative input order, since parent discovery
/// only depends on size ordering, not on any particular tie-break.
pub fn sort_ascending(mut sets: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
    sets.sort_by_key(|s| s.len());
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_with_write() {
        let sets = vec![vec![1u32, 2, 3], vec![], vec![7u32]];
        let mut buf = Vec::new();
        for s in &sets {
            buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
            for &x in s {
                buf.extend_from_slice(&x.to_le_bytes());
            }
        }
        assert_eq!(parse_color_sets(&buf).unwrap(), sets);
    }

    #[test]
    fn truncated_record_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        assert!(matches!(parse_color_sets(&buf), Err(Error::MalformedInput { .. })));
    }

    #[test]
    fn sort_ascending_is_stable_on_ties() {
        let sets = vec![vec![1u32, 2], vec![9u32], vec![3u32, 4]];
        let sorted = sort_ascending(sets);
        assert_eq!(sorted, vec![vec![9u32], vec![1u32, 2], vec![3u32, 4]]);
    }
}
