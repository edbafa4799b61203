use super::BLOCK_SIZE;
use super::field::{FieldElement, reverse_bits};
use super::ghash::GHash;
use zeroize::Zeroize;

// reverse order of bits of f(x) * (x^7 + x^2 + x + 1) for deg(x) <= 3.
// The result is represented by two bytes.
// EX: f(x) = 1 and x^7 + x^2 + x + 1 = 0b0000_0000_1000_0111 => 0b1110_0001_0000_0000 = 0xe100
// reverse bits of f(x) = 1 is 1000 = 8.
// So GCM_REDUCTION_TABLE[8] = 0xe100.
const GCM_REDUCTION_TABLE: [u16; 16] = [
    0x0000, 0x1c20, 0x3840, 0x2460, 0x7080, 0x6ca0, 0x48c0, 0x54e0, 0xe100,
    0xfd20, 0xd940, 0xc560, 0x9180, 0x8da0, 0xa9c0, 0xb5e0,
];

// ProductTable contains the first sixteen multiples of the key, H.
// However, they are in bit reversed order: table[reverse_bits(i)] = i*H.
pub(crate) struct ProductTable([FieldElement; 16]);

impl ProductTable {
    pub(crate) fn new(h: &[u8; BLOCK_SIZE]) -> Self {
        // We precompute 16 multiples of |key|. However, when we do lookups
        // into this table we'll be using bits from a field element and
        // therefore the bits will be in the reverse order. So normally one
        // would expect, say, 4*key to be in index 4 of the table but due to
        // this bit ordering it will actually be in index 0010 (base 2) = 2.
        let x = FieldElement::from_be_bytes(h);
        let mut table = [FieldElement::default(); 16];
        table[reverse_bits(1)] = x;

        let mut i = 2;
        while i < 16 {
            table[reverse_bits(i)] = table[reverse_bits(i / 2)].double();
            table[reverse_bits(i + 1)] = table[reverse_bits(i)] + x;
            i += 2;
        }
        ProductTable(table)
    }
}

impl GHash for ProductTable {
    // set y = y*H
    fn mul(&self, y: &mut FieldElement) {
        let mut z = FieldElement::default();
        for word in [y.high, y.low] {
            let mut word = word;

            // Multiplication works by multiplying z by 16 and adding in
            // one of the precomputed multiples of H.
            let mut j = 0;
            while j < 64 {
                let msw = z.high & 0xf;
                z.high >>= 4;
                z.high |= z.low << 60;
                z.low >>= 4;
                z.low ^= (GCM_REDUCTION_TABLE[msw as usize] as u64) << 48;

                // the values in |table| are ordered for
                // little-endian bit positions. See the comment
                // in ProductTable::new.
                z += self.0[(word & 0xf) as usize];
                word >>= 4;
                j += 4;
            }
        }

        *y = z;
    }
}

impl Drop for ProductTable {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(Zeroize::zeroize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const H: [u8; 16] = hex!("66e94bd4ef8a2c3b884cfa59ca342b2e");

    #[test]
    fn test_product_table() {
        let t = ProductTable::new(&H);
        let h = FieldElement::from_be_bytes(&H);

        assert_eq!(t.0[0], FieldElement::default());
        assert_eq!(t.0[reverse_bits(1)], h);
        assert_eq!(t.0[reverse_bits(2)], h.double());
        assert_eq!(t.0[reverse_bits(3)], h.double() + h);
        assert_eq!(t.0[reverse_bits(8)], h.double().double().double());
        // i*H is linear in i.
        for i in 0..16 {
            for j in 0..16 {
                assert_eq!(t.0[reverse_bits(i ^ j)], t.0[reverse_bits(i)] + t.0[reverse_bits(j)]);
            }
        }
    }

    #[test]
    fn test_mul() {
        let t = ProductTable::new(&H);
        let h = FieldElement::from_be_bytes(&H);

        // 1 * H = H
        let mut y = FieldElement { low: 1 << 63, high: 0 };
        t.mul(&mut y);
        assert_eq!(y, h);

        // x * H = double(H)
        let mut y = FieldElement { low: 1 << 62, high: 0 };
        t.mul(&mut y);
        assert_eq!(y, h.double());

        // x^127 * H
        let mut y = FieldElement { low: 0, high: 1 };
        t.mul(&mut y);
        let mut want = h;
        for _ in 0..127 {
            want = want.double();
        }
        assert_eq!(y, want);

        // 0 * H = 0
        let mut y = FieldElement::default();
        t.mul(&mut y);
        assert_eq!(y, FieldElement::default());
    }

    #[test]
    fn test_mul_commutes() {
        let a = hex!("0388dace60b6a392f328c2b971b2fe78");
        let ta = ProductTable::new(&a);
        let th = ProductTable::new(&H);

        let mut x = FieldElement::from_be_bytes(&H);
        ta.mul(&mut x);
        let mut y = FieldElement::from_be_bytes(&a);
        th.mul(&mut y);
        assert_eq!(x, y);
    }
}
