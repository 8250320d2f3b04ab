// GF(256) arithmetic over the QR field polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

pub(crate) static EXP_TABLE: [u8; 256] = build_exp_table();

pub(crate) static LOG_TABLE: [u8; 256] = build_log_table();

const FIELD_POLY: u16 = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x >= 0x100 {
            x ^= FIELD_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

pub(crate) fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

// Coefficients of (x - a^0)(x - a^1)...(x - a^(degree-1)), highest degree first
pub(crate) fn generator_polynomial(degree: usize) -> Vec<u8> {
    let mut poly = Vec::with_capacity(degree + 1);
    poly.push(1u8);
    for i in 0..degree {
        let root = EXP_TABLE[i];
        poly.push(0);
        for j in (1..poly.len()).rev() {
            poly[j] ^= gf_mul(poly[j - 1], root);
        }
    }
    poly
}

#[cfg(test)]
mod galois_tests {
    use super::{generator_polynomial, gf_mul, EXP_TABLE, LOG_TABLE};

    #[test]
    fn test_tables() {
        assert_eq!(EXP_TABLE[0], 1);
        assert_eq!(EXP_TABLE[8], 0x1D);
        assert_eq!(EXP_TABLE[255], 1);
        for i in 1..256 {
            assert_eq!(EXP_TABLE[LOG_TABLE[i] as usize] as usize, i);
        }
    }

    #[test]
    fn test_gf_mul() {
        assert_eq!(gf_mul(0, 7), 0);
        assert_eq!(gf_mul(1, 0xAB), 0xAB);
        assert_eq!(gf_mul(2, 0x80), 0x1D);
        for a in 1..=255u8 {
            assert_eq!(gf_mul(a, EXP_TABLE[255 - LOG_TABLE[a as usize] as usize]), 1);
        }
    }

    #[test]
    fn test_generator_polynomial() {
        // Exponents of a for degree 7: 0, 87, 229, 146, 149, 238, 102, 21
        let exp: Vec<u8> = [0, 87, 229, 146, 149, 238, 102, 21].iter().map(|&e| EXP_TABLE[e]).collect();
        assert_eq!(generator_polynomial(7), exp);
        assert_eq!(generator_polynomial(0), vec![1]);
    }
}
