use std::ops::Deref;

use tracing::trace;

use crate::common::bitstream::BitStream;
use crate::common::error::{QRError, QRResult};

// Block pair
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BlockPair {
    data: Vec<u8>,
    ecc: Vec<u8>,
}

impl BlockPair {
    pub fn new(data: Vec<u8>, ecc_count: usize) -> Self {
        let ecc = super::ecc(&data, ecc_count);
        Self { data, ecc }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn ecc(&self) -> &[u8] {
        &self.ecc
    }
}

// Block layout
//------------------------------------------------------------------------------

// Returns (data bytes, ecc bytes) of a block. Blocks are split into two groups
// where group 2 blocks carry one more data byte than group 1 blocks.
pub fn block_layout(
    total_bytes: usize,
    data_bytes: usize,
    num_blocks: usize,
    block_id: usize,
) -> QRResult<(usize, usize)> {
    if block_id >= num_blocks {
        return Err(QRError::InternalConsistency(format!(
            "Block id {block_id} out of range for {num_blocks} blocks"
        )));
    }

    let group2_blocks = total_bytes % num_blocks;
    let group1_blocks = num_blocks - group2_blocks;
    let group1_total = total_bytes / num_blocks;
    let group2_total = group1_total + 1;
    let group1_data = data_bytes / num_blocks;
    let group2_data = group1_data + 1;
    let (Some(group1_ecc), Some(group2_ecc)) =
        (group1_total.checked_sub(group1_data), group2_total.checked_sub(group2_data))
    else {
        return Err(QRError::InternalConsistency(format!(
            "Data bytes {data_bytes} exceed total bytes {total_bytes}"
        )));
    };

    if group1_ecc != group2_ecc {
        return Err(QRError::InternalConsistency(format!(
            "EC bytes mismatch: group 1 {group1_ecc}, group 2 {group2_ecc}"
        )));
    }
    if num_blocks != group1_blocks + group2_blocks {
        return Err(QRError::InternalConsistency(format!(
            "RS blocks mismatch: {num_blocks} != {group1_blocks} + {group2_blocks}"
        )));
    }
    let sum = (group1_data + group1_ecc) * group1_blocks + (group2_data + group2_ecc) * group2_blocks;
    if total_bytes != sum {
        return Err(QRError::InternalConsistency(format!(
            "Total bytes mismatch: {total_bytes} != {sum}"
        )));
    }

    if block_id < group1_blocks {
        Ok((group1_data, group1_ecc))
    } else {
        Ok((group2_data, group2_ecc))
    }
}


// Interleaving
//------------------------------------------------------------------------------

// Splits the data codewords into RS blocks and computes the ecc of each block
pub fn compute_blocks(
    bits: &BitStream,
    total_bytes: usize,
    data_bytes: usize,
    num_blocks: usize,
) -> QRResult<Vec<BlockPair>> {
    if bits.byte_len() != data_bytes || bits.len() & 7 != 0 {
        return Err(QRError::InternalConsistency(format!(
            "Number of bits {} and data bytes {data_bytes} does not match",
            bits.len()
        )));
    }
    if num_blocks == 0 {
        return Err(QRError::InternalConsistency("Number of RS blocks is zero".to_string()));
    }

    let mut blocks = Vec::with_capacity(num_blocks);
    let mut offset = 0;
    for id in 0..num_blocks {
        let (dlen, ecc_len) = block_layout(total_bytes, data_bytes, num_blocks, id)?;
        let mut data = vec![0; dlen];
        bits.to_bytes(offset << 3, &mut data)?;
        trace!(block = id, data_len = dlen, ecc_len, "Computing block ecc");
        blocks.push(BlockPair::new(data, ecc_len));
        offset += dlen;
    }

    if offset != data_bytes {
        return Err(QRError::InternalConsistency(format!(
            "Data bytes {data_bytes} does not match offset {offset}"
        )));
    }
    Ok(blocks)
}

pub fn interleave_with_ecc(
    bits: &BitStream,
    total_bytes: usize,
    data_bytes: usize,
    num_blocks: usize,
) -> QRResult<BitStream> {
    let blocks = compute_blocks(bits, total_bytes, data_bytes, num_blocks)?;
    let data_blocks: Vec<&[u8]> = blocks.iter().map(BlockPair::data).collect();
    let ecc_blocks: Vec<&[u8]> = blocks.iter().map(BlockPair::ecc).collect();

    let mut res = BitStream::with_capacity(total_bytes << 3);
    res.extend(&interleave(&data_blocks));
    res.extend(&interleave(&ecc_blocks));

    if res.byte_len() != total_bytes {
        return Err(QRError::InternalConsistency(format!(
            "Interleaving error: {total_bytes} and {} differ",
            res.byte_len()
        )));
    }
    Ok(res)
}

pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}
