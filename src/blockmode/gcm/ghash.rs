use super::BLOCK_SIZE;
use super::field::FieldElement;
use super::ghash_generic::ProductTable;

#[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
use super::ghash_amd64::ClmulKey;

// GHash is a multiplication by the hash subkey H, fixed when the GCM is
// created. The running value y lives with the caller, so a single key may be
// used by any number of concurrent seal/open calls.
pub(crate) trait GHash {
    // set y = y*H
    fn mul(&self, y: &mut FieldElement);

    // update_blocks extends y with more polynomial terms from blocks, based on
    // Horner's rule. There must be a multiple of BLOCK_SIZE bytes in blocks.
    #[inline]
    fn update_blocks(&self, y: &mut FieldElement, blocks: &[u8]) {
        debug_assert_eq!(blocks.len() % BLOCK_SIZE, 0);
        let mut block = [0u8; BLOCK_SIZE];
        for chunk in blocks.chunks_exact(BLOCK_SIZE) {
            block.copy_from_slice(chunk);
            *y += FieldElement::from_be_bytes(&block);
            self.mul(y);
        }
    }

    // update extends y with more polynomial terms from data. If data is not a
    // multiple of BLOCK_SIZE bytes long then the remainder is zero padded.
    #[inline]
    fn update(&self, y: &mut FieldElement, data: &[u8]) {
        let full_blocks = (data.len() >> 4) << 4; //data.len() % 16

        self.update_blocks(y, &data[..full_blocks]);

        if data.len() != full_blocks {
            let mut partial_block = [0u8; BLOCK_SIZE];
            partial_block[..data.len() - full_blocks]
                .copy_from_slice(&data[full_blocks..]);
            self.update_blocks(y, &partial_block);
        }
    }

    // update_lengths absorbs the final length block a || b, where a and b are
    // bit lengths written as big-endian u64s.
    #[inline]
    fn update_lengths(&self, y: &mut FieldElement, a: u64, b: u64) {
        y.low ^= a;
        y.high ^= b;
        self.mul(y);
    }
}

// GHasher is the GHASH backend picked once when a GCM is created.
pub(crate) enum GHasher {
    Generic(ProductTable),
    #[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
    Clmul(ClmulKey),
}

impl GHasher {
    pub(crate) fn new(h: &[u8; BLOCK_SIZE]) -> Self {
        #[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
        if let Some(key) = ClmulKey::new(h) {
            return GHasher::Clmul(key);
        }
        GHasher::Generic(ProductTable::new(h))
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            GHasher::Generic(_) => "generic",
            #[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
            GHasher::Clmul(_) => "pclmulqdq",
        }
    }

    #[inline]
    pub(crate) fn update(&self, y: &mut FieldElement, data: &[u8]) {
        match self {
            GHasher::Generic(t) => t.update(y, data),
            #[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
            GHasher::Clmul(k) => k.update(y, data),
        }
    }

    #[inline]
    pub(crate) fn update_lengths(&self, y: &mut FieldElement, a: u64, b: u64) {
        match self {
            GHasher::Generic(t) => t.update_lengths(y, a, b),
            #[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
            GHasher::Clmul(k) => k.update_lengths(y, a, b),
        }
    }
}
