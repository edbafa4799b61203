// Note: For GCM standard, a 16 Bytes sequence represents a polynomial of degree 127 in GF(2)[x]
// The Bytes sequence is in little endian.
// But in each byte is "big-endian". For example, 0x80, the first bit is 1,
// and 0x01, the 7-th bit is 1.
// Example:
// [0x80, 00, ..., 0x01] <=> x^127 + 1
// [b0, b1, b2, ..., b15]:
// coefficient of:
// x^0 = (b0 >> 7) & 1
// x^1 = (b0 >> 6) & 1
// ....
// x^126 = (b15 >> 1) & 1
// x^127 = b15 & 1
use core::ops::{Add, AddAssign};
use zeroize::Zeroize;

use super::BLOCK_SIZE;

// 1+x+x^2+x^7, the reduction polynomial without its x^128 term, in the
// bit order of FieldElement.low.
const R: u64 = 0xe100000000000000;

// FieldElement represents a value in GF(2^128). In order to reflect the GCM
// standard and make big-endian loads suitable for marshaling these values, the
// bits are stored in big endian order. For example:
//
//	the coefficient of x^0 can be obtained by v.low >> 63.
//	the coefficient of x^63 can be obtained by v.low & 1.
//	the coefficient of x^64 can be obtained by v.high >> 63.
//	the coefficient of x^127 can be obtained by v.high & 1.
// GF(2^128) = GF(2)[x]/(x^128 + x^7 + x^2 + x + 1)
#[derive(Default, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct FieldElement {
    pub(crate) low: u64,
    pub(crate) high: u64,
}

impl Add for FieldElement {
    type Output = FieldElement;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        FieldElement {
            low: self.low ^ rhs.low,
            high: self.high ^ rhs.high,
        }
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.low ^= rhs.low;
        self.high ^= rhs.high;
    }
}

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.low.zeroize();
        self.high.zeroize();
    }
}

impl FieldElement {
    #[inline]
    pub(crate) fn from_be_bytes(block: &[u8; BLOCK_SIZE]) -> Self {
        let v = u128::from_be_bytes(*block);
        FieldElement {
            low: (v >> 64) as u64,
            high: v as u64,
        }
    }

    #[inline]
    pub(crate) fn to_be_bytes(self) -> [u8; BLOCK_SIZE] {
        let mut out = [0; BLOCK_SIZE];
        out[..8].copy_from_slice(&self.low.to_be_bytes());
        out[8..].copy_from_slice(&self.high.to_be_bytes());
        out
    }

    // Multiplies by x. Because of the bit ordering this is a right shift.
    #[inline]
    pub(crate) fn double(self) -> Self {
        let msb = self.high & 1;

        let high = (self.high >> 1) | (self.low << 63);
        let mut low = self.low >> 1;

        // If the most-significant bit was set before shifting then it,
        // conceptually, becomes a term of x^128. This is greater than the
        // irreducible polynomial so the result has to be reduced. The
        // irreducible polynomial is 1+x+x^2+x^7+x^128. We can subtract that to
        // eliminate the term at x^128 which also means subtracting the other
        // four terms. In characteristic 2 fields, subtraction == addition ==
        // XOR. The mask keeps this free of a branch on the (secret) bit.
        low ^= R & msb.wrapping_neg();
        FieldElement { low, high }
    }
}

// reverse_bits reverses the order of the bits of 4-bit number in i.
#[inline]
pub(crate) const fn reverse_bits(i: usize) -> usize {
    let i = ((i << 2) & 0xc) | ((i >> 2) & 0x3);
    ((i << 1) & 0xa) | ((i >> 1) & 0x5)
}
