//! # Structured parity check matrix descriptor
//!
//! This module implements a compact representation for quasi-cyclic LDPC
//! parity check matrices. The matrix is split into square blocks of size `Z`.
//! Each non-zero block is a circulant permutation matrix, which is fully
//! described by the index of the variable node block it connects to (its base
//! address) and its cyclic shift. The block rows are called layers, since they
//! are the unit of processing of the layered decoder.
//!
//! Row `i` of a layer connects, through a block with base address `b` and
//! shift `s`, to the variable node `b * Z + (i + s) % Z`.

use thiserror::Error;

/// Structural violation of a code descriptor.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The block size is zero.
    #[error("the block size must be non-zero")]
    ZeroBlockSize,
    /// A node count is not a multiple of the block size.
    #[error("number of {kind} nodes {count} is not a multiple of the block size {block_size}")]
    NodeCount {
        /// Kind of node ("variable" or "check").
        kind: &'static str,
        /// Number of nodes.
        count: usize,
        /// Block size.
        block_size: usize,
    },
    /// The base address and cyclic shift tables have different lengths.
    #[error("descriptor has {addresses} base addresses but {shifts} cyclic shifts")]
    LengthMismatch {
        /// Length of the base address table.
        addresses: usize,
        /// Length of the cyclic shift table.
        shifts: usize,
    },
    /// The number of layer degrees does not match the number of layers.
    #[error("descriptor lists {degrees} layer degrees but the code has {layers} layers")]
    LayerCount {
        /// Number of layer degrees given.
        degrees: usize,
        /// Number of layers of the code.
        layers: usize,
    },
    /// The layer degrees do not add up to the table length.
    #[error("layer degrees add up to {sum} but the tables have {len} entries")]
    LayerDegreeSum {
        /// Sum of the layer degrees.
        sum: usize,
        /// Length of the tables.
        len: usize,
    },
    /// A check node degree exceeds the maximum check node degree.
    #[error("check nodes in layer {layer} have degree {degree}, exceeding the maximum {max}")]
    DegreeExceeded {
        /// Layer index.
        layer: usize,
        /// Degree of the check nodes in the layer.
        degree: usize,
        /// Maximum check node degree.
        max: usize,
    },
    /// A check node has degree smaller than two.
    #[error("check nodes in layer {layer} have degree {degree}, but at least 2 is required")]
    DegreeTooSmall {
        /// Layer index.
        layer: usize,
        /// Degree of the check nodes in the layer.
        degree: usize,
    },
    /// A base address does not point to a variable node block.
    #[error("base address {address} in layer {layer} is out of range (code has {blocks} blocks)")]
    AddressOutOfRange {
        /// Layer index.
        layer: usize,
        /// Offending base address.
        address: usize,
        /// Number of variable node blocks.
        blocks: usize,
    },
    /// A cyclic shift is not smaller than the block size.
    #[error("cyclic shift {shift} in layer {layer} is not smaller than the block size {block_size}")]
    ShiftOutOfRange {
        /// Layer index.
        layer: usize,
        /// Offending shift.
        shift: usize,
        /// Block size.
        block_size: usize,
    },
    /// A variable node block appears twice in the same layer.
    #[error("variable node block {address} appears more than once in layer {layer}")]
    RepeatedBlock {
        /// Layer index.
        layer: usize,
        /// Repeated base address.
        address: usize,
    },
    /// The number of systematic bits is not valid for the code.
    #[error("invalid number of systematic bits {0}")]
    SystematicBits(usize),
}

/// Parameters used to build a [`CodeStructure`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CodeStructureBuilder<'a> {
    /// Number of variable nodes (codeword length).
    pub num_variable_nodes: usize,
    /// Number of check nodes.
    pub num_check_nodes: usize,
    /// Maximum check node degree.
    ///
    /// This sets the number of message store slots per check node.
    pub max_check_degree: usize,
    /// Size of the circulant blocks.
    pub block_size: usize,
    /// Number of systematic (information) bits.
    pub num_systematic_bits: usize,
    /// Whether the code is an irregular repeat-accumulate code.
    ///
    /// The parity part of IRA codes is stored in the APP memory in a
    /// column-twisted order. See [`CodeStructure::app_address`].
    pub is_irregular_repeat_accumulate: bool,
    /// Number of blocks in each layer.
    pub layer_degrees: &'a [usize],
    /// Variable node block of each non-zero block, layer by layer.
    pub base_addresses: &'a [usize],
    /// Cyclic shift of each non-zero block, layer by layer.
    pub cyclic_shifts: &'a [usize],
}

/// Quasi-cyclic LDPC code descriptor.
///
/// The descriptor is immutable once built. All the structural invariants
/// required by the decoder are checked by [`CodeStructureBuilder::build`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct CodeStructure {
    num_variable_nodes: usize,
    num_check_nodes: usize,
    max_check_degree: usize,
    block_size: usize,
    num_systematic_bits: usize,
    is_ira: bool,
    layer_degrees: Vec<usize>,
    layer_offsets: Vec<usize>,
    base_addresses: Vec<usize>,
    cyclic_shifts: Vec<usize>,
}

impl CodeStructureBuilder<'_> {
    /// Builds the code descriptor.
    ///
    /// # Errors
    /// Returns an [`Error`] describing the first structural violation found.
    ///
    /// # Examples
    /// ```
    /// # use ldpc_8023an::code::CodeStructureBuilder;
    /// let code = CodeStructureBuilder {
    ///     num_variable_nodes: 12,
    ///     num_check_nodes: 8,
    ///     max_check_degree: 3,
    ///     block_size: 4,
    ///     num_systematic_bits: 4,
    ///     is_irregular_repeat_accumulate: false,
    ///     layer_degrees: &[3, 3],
    ///     base_addresses: &[0, 1, 2, 0, 1, 2],
    ///     cyclic_shifts: &[0, 0, 0, 0, 1, 2],
    /// }
    /// .build()
    /// .unwrap();
    /// assert_eq!(code.num_layers(), 2);
    /// assert_eq!(code.check_neighbors(5).collect::<Vec<_>>(), vec![1, 6, 11]);
    /// ```
    pub fn build(self) -> Result<CodeStructure, Error> {
        let z = self.block_size;
        if z == 0 {
            return Err(Error::ZeroBlockSize);
        }
        for (kind, count) in [
            ("variable", self.num_variable_nodes),
            ("check", self.num_check_nodes),
        ] {
            if count == 0 || count % z != 0 {
                return Err(Error::NodeCount {
                    kind,
                    count,
                    block_size: z,
                });
            }
        }
        if self.base_addresses.len() != self.cyclic_shifts.len() {
            return Err(Error::LengthMismatch {
                addresses: self.base_addresses.len(),
                shifts: self.cyclic_shifts.len(),
            });
        }
        let num_layers = self.num_check_nodes / z;
        if self.layer_degrees.len() != num_layers {
            return Err(Error::LayerCount {
                degrees: self.layer_degrees.len(),
                layers: num_layers,
            });
        }
        let sum = self.layer_degrees.iter().sum::<usize>();
        if sum != self.base_addresses.len() {
            return Err(Error::LayerDegreeSum {
                sum,
                len: self.base_addresses.len(),
            });
        }

        let num_blocks = self.num_variable_nodes / z;
        let mut layer_offsets = Vec::with_capacity(num_layers);
        let mut offset = 0;
        for (layer, &degree) in self.layer_degrees.iter().enumerate() {
            if degree > self.max_check_degree {
                return Err(Error::DegreeExceeded {
                    layer,
                    degree,
                    max: self.max_check_degree,
                });
            }
            if degree < 2 {
                return Err(Error::DegreeTooSmall { layer, degree });
            }
            let range = offset..offset + degree;
            let mut seen = vec![false; num_blocks];
            for (&address, &shift) in self.base_addresses[range.clone()]
                .iter()
                .zip(&self.cyclic_shifts[range])
            {
                if address >= num_blocks {
                    return Err(Error::AddressOutOfRange {
                        layer,
                        address,
                        blocks: num_blocks,
                    });
                }
                if shift >= z {
                    return Err(Error::ShiftOutOfRange {
                        layer,
                        shift,
                        block_size: z,
                    });
                }
                // A layer must touch each variable node at most once, so that
                // all the check nodes of a layer can be updated concurrently.
                if std::mem::replace(&mut seen[address], true) {
                    return Err(Error::RepeatedBlock { layer, address });
                }
            }
            layer_offsets.push(offset);
            offset += degree;
        }

        let k = self.num_systematic_bits;
        if k > self.num_variable_nodes
            || (self.is_irregular_repeat_accumulate && (self.num_variable_nodes - k) % z != 0)
        {
            return Err(Error::SystematicBits(k));
        }

        Ok(CodeStructure {
            num_variable_nodes: self.num_variable_nodes,
            num_check_nodes: self.num_check_nodes,
            max_check_degree: self.max_check_degree,
            block_size: z,
            num_systematic_bits: k,
            is_ira: self.is_irregular_repeat_accumulate,
            layer_degrees: self.layer_degrees.to_vec(),
            layer_offsets,
            base_addresses: self.base_addresses.to_vec(),
            cyclic_shifts: self.cyclic_shifts.to_vec(),
        })
    }
}

impl CodeStructure {
    /// Returns the number of variable nodes.
    pub fn num_variable_nodes(&self) -> usize {
        self.num_variable_nodes
    }

    /// Returns the number of check nodes.
    pub fn num_check_nodes(&self) -> usize {
        self.num_check_nodes
    }

    /// Returns the maximum check node degree.
    pub fn max_check_degree(&self) -> usize {
        self.max_check_degree
    }

    /// Returns the circulant block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the number of layers (block rows).
    pub fn num_layers(&self) -> usize {
        self.layer_degrees.len()
    }

    /// Returns the number of systematic bits.
    pub fn num_systematic_bits(&self) -> usize {
        self.num_systematic_bits
    }

    /// Returns `true` if the code is an irregular repeat-accumulate code.
    pub fn is_irregular_repeat_accumulate(&self) -> bool {
        self.is_ira
    }

    /// Returns the degree of the check nodes of a layer.
    pub fn layer_degree(&self, layer: usize) -> usize {
        self.layer_degrees[layer]
    }

    /// Returns the degree of a check node.
    pub fn check_degree(&self, check: usize) -> usize {
        self.layer_degree(check / self.block_size)
    }

    /// Returns the (base address, cyclic shift) pairs describing the non-zero
    /// blocks of the layer a check node belongs to.
    pub fn check_blocks(&self, check: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let layer = check / self.block_size;
        let range = self.layer_offsets[layer]..self.layer_offsets[layer] + self.layer_degrees[layer];
        self.base_addresses[range.clone()]
            .iter()
            .copied()
            .zip(self.cyclic_shifts[range].iter().copied())
    }

    /// Returns an [`Iterator`] over the variable nodes connected to a check
    /// node.
    ///
    /// The variable nodes are listed in message slot order.
    pub fn check_neighbors(&self, check: usize) -> impl Iterator<Item = usize> + '_ {
        let z = self.block_size;
        let row = check % z;
        self.check_blocks(check)
            .map(move |(address, shift)| address * z + (row + shift) % z)
    }

    /// Returns the number of satisfied parity checks.
    ///
    /// The function `hard_decision` gives the hard decision bit for each
    /// variable node.
    pub fn satisfied_checks<F>(&self, hard_decision: F) -> usize
    where
        F: Fn(usize) -> bool,
    {
        (0..self.num_check_nodes)
            .filter(|&c| {
                self.check_neighbors(c)
                    .filter(|&v| hard_decision(v))
                    .count()
                    % 2
                    == 0
            })
            .count()
    }

    /// Returns the column weight of each variable node.
    pub fn column_weights(&self) -> Vec<usize> {
        let mut weights = vec![0; self.num_variable_nodes];
        for c in 0..self.num_check_nodes {
            for v in self.check_neighbors(c) {
                weights[v] += 1;
            }
        }
        weights
    }

    /// Returns the APP memory address of a codeword position.
    ///
    /// This is the identity except for the parity part of IRA codes, which
    /// is stored column-twisted: parity bit `p` is stored at `K + (p % q) * Z
    /// + p / q`, where `q = (N - K) / Z`.
    pub fn app_address(&self, position: usize) -> usize {
        let k = self.num_systematic_bits;
        if !self.is_ira || position < k {
            return position;
        }
        let p = position - k;
        let q = (self.num_variable_nodes - k) / self.block_size;
        k + (p % q) * self.block_size + p / q
    }

    /// Writes the parity check matrix in alist format to a writer.
    ///
    /// # Errors
    /// If a call to `write!()` returns an error, this function returns
    /// such an error.
    pub fn write_alist<W: std::fmt::Write>(&self, w: &mut W) -> std::fmt::Result {
        let mut cols = vec![Vec::new(); self.num_variable_nodes];
        let rows = (0..self.num_check_nodes)
            .map(|c| {
                let mut row = self.check_neighbors(c).collect::<Vec<_>>();
                for &v in &row {
                    cols[v].push(c);
                }
                row.sort_unstable();
                row
            })
            .collect::<Vec<_>>();
        writeln!(w, "{} {}", self.num_variable_nodes, self.num_check_nodes)?;
        let directions = [&cols, &rows];
        for dir in directions {
            write!(w, "{} ", dir.iter().map(Vec::len).max().unwrap_or(0))?;
        }
        writeln!(w)?;
        for dir in directions {
            for el in dir.iter() {
                write!(w, "{} ", el.len())?;
            }
            writeln!(w)?;
        }
        for dir in directions {
            for el in dir.iter() {
                for x in el {
                    write!(w, "{} ", x + 1)?;
                }
                writeln!(w)?;
            }
        }
        Ok(())
    }

    /// Returns a [`String`] with the alist representation of the matrix.
    pub fn alist(&self) -> String {
        let mut s = String::new();
        // Writing into a String does not fail.
        let _ = self.write_alist(&mut s);
        s
    }
}
