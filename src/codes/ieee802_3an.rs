//! IEEE 802.3an (10GBASE-T) LDPC code geometry.
//!
//! The 802.3an code has a 384 × 2048 parity check matrix made of 6 × 32
//! permutation blocks of size 64, so every check node has degree 32 and every
//! variable node has degree 6. The descriptor in this module is a stand-in
//! with that geometry: each block is a circulant whose cyclic shift comes from
//! a seeded search that rejects cycles of length 4. It is not the permutation
//! table of the standard, so it does not decode 10GBASE-T frames.
//!
//! Each layer of circulants adds up to the all-ones vector, so the matrix has
//! rank 379 and the code has dimension 1669 (the standard code has dimension
//! 1723). The first 1664 positions, which are the first 26 block columns, are
//! information positions, and these are the systematic bits of the
//! descriptor.

use crate::code::{CodeStructure, CodeStructureBuilder, Error};

/// Number of variable nodes (codeword length).
pub const NUM_VARIABLE_NODES: usize = 2048;
/// Number of check nodes.
pub const NUM_CHECK_NODES: usize = 384;
/// Maximum check node degree.
pub const MAX_CHECK_DEGREE: usize = 32;
/// Number of systematic bits.
///
/// These are information positions of the code, but the code has 5 more
/// information bits spread over the parity part.
pub const NUM_SYSTEMATIC_BITS: usize = 1664;
/// Circulant block size.
pub const BLOCK_SIZE: usize = 64;

const NUM_LAYERS: usize = NUM_CHECK_NODES / BLOCK_SIZE;
const NUM_BLOCK_COLUMNS: usize = NUM_VARIABLE_NODES / BLOCK_SIZE;

/// Returns the code descriptor.
///
/// # Errors
/// The descriptor is validated when it is built, as any other
/// [`CodeStructure`].
///
/// # Examples
/// ```
/// # use ldpc_8023an::codes::ieee802_3an;
/// let code = ieee802_3an::code().unwrap();
/// assert_eq!(code.num_variable_nodes(), 2048);
/// assert_eq!(code.num_check_nodes(), 384);
/// ```
pub fn code() -> Result<CodeStructure, Error> {
    let layer_degrees = [NUM_BLOCK_COLUMNS; NUM_LAYERS];
    let base_addresses = (0..NUM_LAYERS)
        .flat_map(|_| 0..NUM_BLOCK_COLUMNS)
        .collect::<Vec<_>>();
    let cyclic_shifts = SHIFTS.iter().flatten().copied().collect::<Vec<_>>();
    CodeStructureBuilder {
        num_variable_nodes: NUM_VARIABLE_NODES,
        num_check_nodes: NUM_CHECK_NODES,
        max_check_degree: MAX_CHECK_DEGREE,
        block_size: BLOCK_SIZE,
        num_systematic_bits: NUM_SYSTEMATIC_BITS,
        is_irregular_repeat_accumulate: false,
        layer_degrees: &layer_degrees,
        base_addresses: &base_addresses,
        cyclic_shifts: &cyclic_shifts,
    }
    .build()
}

const SHIFTS: [[usize; NUM_BLOCK_COLUMNS]; NUM_LAYERS] = [
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        0, 49, 33, 40, 7, 43, 32, 45, 13, 17, 48, 15, 5, 59, 19, 50,
        55, 6, 1, 42, 53, 57, 30, 36, 44, 39, 29, 47, 2, 41, 37, 14,
    ],
    [
        0, 20, 2, 3, 38, 56, 52, 19, 50, 36, 1, 30, 41, 62, 49, 25,
        61, 29, 51, 21, 40, 59, 23, 32, 45, 17, 11, 15, 55, 53, 48, 8,
    ],
    [
        0, 43, 62, 10, 47, 6, 4, 22, 52, 16, 41, 45, 7, 49, 35, 46,
        28, 30, 24, 13, 57, 38, 51, 25, 58, 44, 17, 34, 3, 36, 29, 12,
    ],
    [
        0, 54, 58, 9, 39, 20, 62, 51, 5, 59, 8, 16, 12, 50, 57, 34,
        2, 46, 28, 63, 33, 15, 26, 7, 3, 14, 38, 19, 45, 49, 47, 32,
    ],
    [
        0, 3, 38, 55, 11, 17, 39, 58, 57, 50, 30, 46, 27, 42, 9, 48,
        7, 25, 56, 52, 19, 41, 1, 8, 40, 32, 14, 12, 53, 61, 16, 35,
    ],
];

#[cfg(test)]
mod test {
    use super::*;
    use std::ops::Range;

    #[test]
    fn degrees() {
        let code = code().unwrap();
        assert_eq!(code.num_layers(), 6);
        for c in 0..NUM_CHECK_NODES {
            assert_eq!(code.check_degree(c), MAX_CHECK_DEGREE);
        }
        assert!(code.column_weights().iter().all(|&w| w == 6));
    }

    #[test]
    fn all_zero_codeword() {
        let code = code().unwrap();
        assert_eq!(code.satisfied_checks(|_| false), NUM_CHECK_NODES);
        assert_eq!(code.satisfied_checks(|v| v == 100), NUM_CHECK_NODES - 6);
    }

    // Two layers form a 4-cycle through two block columns iff the differences
    // of their shifts coincide modulo the block size.
    #[test]
    fn no_4_cycles() {
        for l1 in 0..NUM_LAYERS {
            for l2 in l1 + 1..NUM_LAYERS {
                let mut seen = [false; BLOCK_SIZE];
                for c in 0..NUM_BLOCK_COLUMNS {
                    let d = (BLOCK_SIZE + SHIFTS[l1][c] - SHIFTS[l2][c]) % BLOCK_SIZE;
                    assert!(!seen[d], "4-cycle between layers {l1} and {l2}");
                    seen[d] = true;
                }
            }
        }
    }

    // Rows of the parity check matrix restricted to some columns, as bit sets.
    fn parity_check_rows(code: &CodeStructure, columns: Range<usize>) -> Vec<Vec<u64>> {
        let words = (columns.len() + 63) / 64;
        (0..code.num_check_nodes())
            .map(|c| {
                let mut row = vec![0u64; words];
                for v in code.check_neighbors(c).filter(|v| columns.contains(v)) {
                    let j = v - columns.start;
                    row[j / 64] |= 1 << (j % 64);
                }
                row
            })
            .collect()
    }

    fn gf2_rank(mut rows: Vec<Vec<u64>>) -> usize {
        let words = rows.first().map_or(0, Vec::len);
        let mut rank = 0;
        for col in 0..words * 64 {
            let (w, bit) = (col / 64, 1u64 << (col % 64));
            let Some(pivot) = (rank..rows.len()).find(|&r| rows[r][w] & bit != 0) else {
                continue;
            };
            rows.swap(rank, pivot);
            let pivot = rows[rank].clone();
            for (r, row) in rows.iter_mut().enumerate() {
                if r != rank && row[w] & bit != 0 {
                    for (x, y) in row.iter_mut().zip(&pivot) {
                        *x ^= y;
                    }
                }
            }
            rank += 1;
        }
        rank
    }

    #[test]
    fn dimension() {
        let code = code().unwrap();
        let rank = gf2_rank(parity_check_rows(&code, 0..NUM_VARIABLE_NODES));
        // one dependency between the layers for each layer after the first
        assert_eq!(rank, NUM_CHECK_NODES - (NUM_LAYERS - 1));
        assert_eq!(NUM_VARIABLE_NODES - rank, 1669);
        // the systematic bits are information positions iff the remaining
        // columns span the column space of the matrix
        let parity = gf2_rank(parity_check_rows(
            &code,
            NUM_SYSTEMATIC_BITS..NUM_VARIABLE_NODES,
        ));
        assert_eq!(parity, rank);
    }
}
