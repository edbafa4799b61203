use super::BLOCK_SIZE;
use super::field::FieldElement;
use super::ghash::GHash;
use crate::internal::cpuid::support_pclmulqdq;
use core::arch::x86_64::*;
use zeroize::Zeroize;

// ClmulKey holds H for the carry-less multiplication backend. A ClmulKey
// exists only if the CPU supports pclmulqdq.
pub(crate) struct ClmulKey {
    h: FieldElement,
}

impl ClmulKey {
    pub(crate) fn new(h: &[u8; BLOCK_SIZE]) -> Option<Self> {
        if !support_pclmulqdq() {
            return None;
        }
        Some(ClmulKey {
            h: FieldElement::from_be_bytes(h),
        })
    }
}

impl GHash for ClmulKey {
    #[inline]
    fn mul(&self, y: &mut FieldElement) {
        // SAFETY: ClmulKey::new checked for pclmulqdq and sse2.
        *y = unsafe { ghash_mul_reflect(*y, self.h) };
    }
}

impl Drop for ClmulKey {
    fn drop(&mut self) {
        self.h.zeroize();
    }
}

// A FieldElement is the big-endian load of a GCM block, so as a 128-bit
// register it is the byte-swapped block that the Intel algorithm works on:
// low goes to the upper lane and high to the lower lane.
#[inline(always)]
unsafe fn load(x: FieldElement) -> __m128i {
    unsafe { _mm_set_epi64x(x.low as i64, x.high as i64) }
}

#[inline(always)]
unsafe fn store(x: __m128i) -> FieldElement {
    let mut lanes = [0u64; 2];
    unsafe { _mm_storeu_si128(lanes.as_mut_ptr().cast(), x) };
    FieldElement {
        low: lanes[1],
        high: lanes[0],
    }
}

// a,b is 128 bit reflected, the output is also reflected
// Note that reflect(a) * reflect(b) = reflect(a * b) >> 1.
// For
//   reflect(a) * reflect(b) = x^127 * a(x^-1) * x^127 * b(x^-1)
// = x^(127*2) (a * b) (x^-1)
// = x * a*b(x) // deg(a*b) = 2*127-1, the MSB bit is 0 and thus the LSB bit is 0 after reflect.
// = reflect(a * b) >> 1
// ref: "Intel® Carry-Less Multiplication Instruction and its Usage for Computing the GCM Mode"
#[target_feature(enable = "pclmulqdq,sse2")]
unsafe fn ghash_mul_reflect(a: FieldElement, b: FieldElement) -> FieldElement {
    unsafe {
        let a = load(a);
        let b = load(b);

        let tmp3 = _mm_clmulepi64_si128::<0x00>(a, b);
        let tmp4 = _mm_clmulepi64_si128::<0x10>(a, b);
        let tmp5 = _mm_clmulepi64_si128::<0x01>(a, b);
        let tmp6 = _mm_clmulepi64_si128::<0x11>(a, b);
        let tmp4 = _mm_xor_si128(tmp4, tmp5);
        let tmp5 = _mm_slli_si128::<8>(tmp4);
        let tmp4 = _mm_srli_si128::<8>(tmp4);
        let tmp3 = _mm_xor_si128(tmp3, tmp5);
        let tmp6 = _mm_xor_si128(tmp6, tmp4);

        // shift the 256-bit product tmp6:tmp3 left by one.
        let tmp7 = _mm_srli_epi32::<31>(tmp3);
        let tmp8 = _mm_srli_epi32::<31>(tmp6);
        let tmp3 = _mm_slli_epi32::<1>(tmp3);
        let tmp6 = _mm_slli_epi32::<1>(tmp6);
        let tmp9 = _mm_srli_si128::<12>(tmp7);
        let tmp8 = _mm_slli_si128::<4>(tmp8);
        let tmp7 = _mm_slli_si128::<4>(tmp7);
        let tmp3 = _mm_or_si128(tmp3, tmp7);
        let tmp6 = _mm_or_si128(tmp6, tmp8);
        let tmp6 = _mm_or_si128(tmp6, tmp9);

        // reduce modulo x^128 + x^7 + x^2 + x + 1.
        let tmp7 = _mm_slli_epi32::<31>(tmp3);
        let tmp8 = _mm_slli_epi32::<30>(tmp3);
        let tmp9 = _mm_slli_epi32::<25>(tmp3);
        let tmp7 = _mm_xor_si128(tmp7, tmp8);
        let tmp7 = _mm_xor_si128(tmp7, tmp9);
        let tmp8 = _mm_srli_si128::<4>(tmp7);
        let tmp7 = _mm_slli_si128::<12>(tmp7);
        let tmp3 = _mm_xor_si128(tmp3, tmp7);
        let tmp2 = _mm_srli_epi32::<1>(tmp3);
        let tmp4 = _mm_srli_epi32::<2>(tmp3);
        let tmp5 = _mm_srli_epi32::<7>(tmp3);
        let tmp2 = _mm_xor_si128(tmp2, tmp4);
        let tmp2 = _mm_xor_si128(tmp2, tmp5);
        let tmp2 = _mm_xor_si128(tmp2, tmp8);
        let tmp3 = _mm_xor_si128(tmp3, tmp2);
        let tmp6 = _mm_xor_si128(tmp6, tmp3);

        store(tmp6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockmode::gcm::ghash_generic::ProductTable;
    use hex_literal::hex;

    #[test]
    fn test_ghash_mul() {
        let h = hex!("66e94bd4ef8a2c3b884cfa59ca342b2e");
        let Some(k) = ClmulKey::new(&h) else {
            return;
        };
        let t = ProductTable::new(&h);

        let inputs = [
            FieldElement { low: 1 << 63, high: 0 },
            FieldElement { low: 0, high: 1 },
            FieldElement { low: 0x0388dace60b6a392, high: 0xf328c2b971b2fe78 },
            FieldElement { low: u64::MAX, high: u64::MAX },
        ];
        for x in inputs {
            let mut y1 = x;
            k.mul(&mut y1);
            let mut y2 = x;
            t.mul(&mut y2);
            assert_eq!(y1, y2);
        }

        // 1 * H = H
        let mut y = FieldElement { low: 1 << 63, high: 0 };
        k.mul(&mut y);
        assert_eq!(y.to_be_bytes(), h);
    }
}
