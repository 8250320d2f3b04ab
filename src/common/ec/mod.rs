mod block;
mod galois;

pub use block::*;

use galois::{generator_polynomial, gf_mul};

// ECC: Error Correction Codeword generator
//------------------------------------------------------------------------------

// Remainder of the data polynomial divided by the generator polynomial,
// computed with a shift register; the coefficients are appended to `codewords`
pub fn append_ecc(codewords: &mut Vec<u8>, ecc_count: usize) {
    let gen_poly = generator_polynomial(ecc_count);
    let mut rem = vec![0u8; ecc_count];
    for &b in codewords.iter() {
        let Some(&head) = rem.first() else { break };
        let factor = b ^ head;
        rem.rotate_left(1);
        rem[ecc_count - 1] = 0;
        for (r, &g) in rem.iter_mut().zip(gen_poly[1..].iter()) {
            *r ^= gf_mul(g, factor);
        }
    }
    codewords.extend_from_slice(&rem);
}

pub fn ecc(data: &[u8], ecc_count: usize) -> Vec<u8> {
    let mut codewords = data.to_vec();
    append_ecc(&mut codewords, ecc_count);
    codewords.split_off(data.len())
}
