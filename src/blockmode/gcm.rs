mod field;
mod ghash;
mod ghash_generic;

#[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
mod ghash_amd64;

mod random_nonce;

use ghash::GHasher;

pub use random_nonce::GCMWithRandomNonce;

use super::{Error, Result};
use crate::internal::alias::{check_input, inexact_overlap, region};
use crate::traits::{AEAD, Block};
use core::cmp::min;
use core::fmt;
use core::ops::Range;
use field::FieldElement;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

#[cfg(feature = "aes")]
use crate::aes::AesCipher;

const BLOCK_SIZE: usize = 16;
const TAG_SIZE: usize = 16;
// NIST SP 800-38D recommends tags with 12 or more bytes.
const MIN_TAG_SIZE: usize = 12;
const STD_NONCE_SIZE: usize = 12;

// The 32-bit block counter must never wrap within one message: one block goes
// to the tag mask and the counter starts at 1 for a 12-byte nonce.
const MAX_PLAINTEXT_SIZE: u64 = ((1 << 32) - 2) * BLOCK_SIZE as u64;

// Counter blocks are encrypted this many at a time.
const CTR_BATCH_BLOCKS: usize = 8;

// Returns an AES-GCM instance with standard nonce size 12 and tag size 16.
// The key must have length 16, 24 or 32.
#[cfg(feature = "aes")]
pub fn new_aes_gcm(key: &[u8]) -> Result<GCM<AesCipher>> {
    GCM::new(AesCipher::new(key)?, STD_NONCE_SIZE, TAG_SIZE)
}

// Returns an AES-GCM instance that generates a random nonce for every seal.
#[cfg(feature = "aes")]
pub fn new_aes_gcm_with_random_nonce(key: &[u8]) -> Result<GCMWithRandomNonce<AesCipher>> {
    GCMWithRandomNonce::new(AesCipher::new(key)?)
}

/// GCM represents a Galois Counter Mode with a specific key. See
/// <https://csrc.nist.gov/groups/ST/toolkit/BCM/documents/proposedmodes/gcm/gcm-revised-spec.pdf>
///
/// A GCM is immutable once created and may be shared between threads.
pub struct GCM<B: Block> {
    cipher: B,
    nonce_size: usize,
    tag_size: usize,
    ghash: GHasher,
}

impl<B: Block> GCM<B> {
    /// Creates a GCM over `cipher`, which must have a 16-byte block.
    ///
    /// `nonce_size` must be positive; 12 is the standard size and takes the
    /// fast path. `tag_size` must be in `12..=16`.
    pub fn new(cipher: B, nonce_size: usize, tag_size: usize) -> Result<Self> {
        if !(MIN_TAG_SIZE..=TAG_SIZE).contains(&tag_size) {
            return Err(Error::InvalidTagSize(tag_size));
        }
        if nonce_size == 0 {
            return Err(Error::InvalidNonceSize);
        }
        let block_size = cipher.block_size();
        if block_size != BLOCK_SIZE {
            return Err(Error::UnsupportedBlockSize(block_size));
        }

        // h = CIPH_K(0^128)
        let mut h = [0u8; BLOCK_SIZE];
        cipher.encrypt_inplace(&mut h);
        let ghash = GHasher::new(&h);
        h.zeroize();

        Ok(GCM {
            cipher,
            nonce_size,
            tag_size,
            ghash,
        })
    }

    /// Encrypts `in_out` in place and writes the tag to `tag`, which must be
    /// exactly `overhead()` bytes long.
    pub fn seal_in_place_detached(
        &self,
        in_out: &mut [u8],
        tag: &mut [u8],
        nonce: &[u8],
        aad: &[u8],
    ) {
        self.check_nonce(nonce);
        check_plaintext_size(in_out.len());
        assert_eq!(tag.len(), self.tag_size, "opengm_gcm: incorrect tag length given to GCM");

        let len = in_out.len();
        let full_tag = self.seal_unchecked(in_out, 0..len, 0, nonce, aad);
        tag.copy_from_slice(&full_tag[..self.tag_size]);
    }

    /// Verifies `tag` and decrypts `in_out` in place. On failure `in_out` is
    /// zeroed.
    pub fn open_in_place_detached(
        &self,
        in_out: &mut [u8],
        tag: &[u8],
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<()> {
        self.check_nonce(nonce);
        if tag.len() != self.tag_size || in_out.len() as u64 > MAX_PLAINTEXT_SIZE {
            in_out.zeroize();
            return Err(Error::AuthenticationFailed);
        }

        let len = in_out.len();
        let result = self.open_unchecked(in_out, 0..len, 0, tag, nonce, aad);
        if result.is_err() {
            in_out.zeroize();
        }
        result
    }

    #[inline]
    fn check_nonce(&self, nonce: &[u8]) {
        assert_eq!(
            nonce.len(),
            self.nonce_size,
            "opengm_gcm: incorrect nonce length given to GCM"
        );
    }

    // seal_unchecked encrypts in_out[src] to in_out[dst..dst+src.len()] and
    // returns the full 16-byte tag. The caller has validated the nonce, the
    // size and the regions; dst must not lie inside src past its start.
    pub(crate) fn seal_unchecked(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> [u8; TAG_SIZE] {
        let n = src.len();
        let mut counter = self.derive_counter(nonce);
        let mut tag_mask = [0; BLOCK_SIZE];
        self.cipher.encrypt(&mut tag_mask, &counter);
        inc32(&mut counter);

        self.counter_crypt(in_out, src, dst, &mut counter);

        self.auth(&in_out[dst..dst + n], aad, &tag_mask)
    }

    // open_unchecked verifies tag over the ciphertext in_out[src] and, if it
    // matches, decrypts it to in_out[dst..dst+src.len()]. Nothing is written
    // on failure.
    pub(crate) fn open_unchecked(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        tag: &[u8],
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<()> {
        // Sanity check to prevent the authentication from always succeeding
        // if the tag size were ever left unset.
        assert!(self.tag_size >= MIN_TAG_SIZE, "opengm_gcm: incorrect GCM tag size");
        debug_assert_eq!(tag.len(), self.tag_size);

        let mut counter = self.derive_counter(nonce);
        let mut tag_mask = [0; BLOCK_SIZE];
        self.cipher.encrypt(&mut tag_mask, &counter);
        inc32(&mut counter);

        let expected_tag = self.auth(&in_out[src.clone()], aad, &tag_mask);
        if !bool::from(expected_tag[..self.tag_size].ct_eq(tag)) {
            return Err(Error::AuthenticationFailed);
        }

        self.counter_crypt(in_out, src, dst, &mut counter);
        Ok(())
    }

    // deriveCounter computes the initial GCM counter state from the given nonce.
    // See NIST SP 800-38D, section 7.1.
    fn derive_counter(&self, nonce: &[u8]) -> [u8; BLOCK_SIZE] {
        // GCM has two modes of operation with respect to the initial counter
        // state: a "fast path" for 96-bit (12-byte) nonces, and a "slow path"
        // for nonces of other lengths. For a 96-bit nonce, the nonce, along
        // with a four-byte big-endian counter starting at one, is used
        // directly as the starting counter. For other nonce sizes, the counter
        // is computed by passing it through the GHASH function.
        let mut counter = [0; BLOCK_SIZE];
        if nonce.len() == STD_NONCE_SIZE {
            counter[..STD_NONCE_SIZE].copy_from_slice(nonce);
            counter[BLOCK_SIZE - 1] = 1;
        } else {
            let mut y = FieldElement::default();
            self.ghash.update(&mut y, nonce);
            self.ghash.update_lengths(&mut y, 0, nonce.len() as u64 * 8);
            counter = y.to_be_bytes();
        }
        counter
    }

    // counter_crypt crypts in_out[src] to in_out[dst..] using self.cipher in
    // counter mode. The output may start before the input (or at the same
    // index): blocks are read into a local buffer before they are written,
    // moving forward, so an output region that trails the input never
    // clobbers unread input.
    fn counter_crypt(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        counter: &mut [u8; BLOCK_SIZE],
    ) {
        let len = src.len();
        debug_assert!(dst <= src.start || dst >= src.end);
        // The length cap keeps the low 32 bits of the counter from wrapping
        // into the nonce-derived prefix.
        debug_assert!(len as u64 <= MAX_PLAINTEXT_SIZE);

        let mut keystream = [0u8; BLOCK_SIZE * CTR_BATCH_BLOCKS];
        let mut input = [0u8; BLOCK_SIZE * CTR_BATCH_BLOCKS];
        let mut offset = 0;
        while offset < len {
            let n = min(len - offset, keystream.len());
            let blocks_len = n.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;

            for chunk in keystream[..blocks_len].chunks_exact_mut(BLOCK_SIZE) {
                chunk.copy_from_slice(counter);
                inc32(counter);
            }
            self.cipher.encrypt_inplace(&mut keystream[..blocks_len]);

            let from = src.start + offset;
            input[..n].copy_from_slice(&in_out[from..from + n]);

            let to = dst + offset;
            in_out[to..to + n]
                .iter_mut()
                .zip(&input[..n])
                .zip(&keystream[..n])
                .for_each(|((z, x), k)| *z = *x ^ *k);
            offset += n;
        }
        keystream.zeroize();
        input.zeroize();
    }

    // auth calculates GHASH(ciphertext, additionalData), masks the result with
    // tagMask and returns it.
    fn auth(&self, ciphertext: &[u8], aad: &[u8], tag_mask: &[u8; BLOCK_SIZE]) -> [u8; TAG_SIZE] {
        let mut y = FieldElement::default();
        self.ghash.update(&mut y, aad);
        self.ghash.update(&mut y, ciphertext);
        self.ghash
            .update_lengths(&mut y, aad.len() as u64 * 8, ciphertext.len() as u64 * 8);

        let mut tag = y.to_be_bytes();
        tag.iter_mut().zip(tag_mask).for_each(|(z, x)| *z ^= *x);
        tag
    }
}

impl<B: Block> AEAD for GCM<B> {
    fn nonce_size(&self) -> usize {
        self.nonce_size
    }

    fn overhead(&self) -> usize {
        self.tag_size
    }

    fn seal_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> usize {
        self.check_nonce(nonce);
        check_input(in_out.len(), &src);
        let n = src.len();
        check_plaintext_size(n);

        let out = region(in_out.len(), dst, n + self.tag_size);
        assert!(
            !inexact_overlap(&out, &src),
            "opengm_gcm: invalid buffer overlap of output and input"
        );

        let tag = self.seal_unchecked(in_out, src, dst, nonce, aad);
        in_out[dst + n..out.end].copy_from_slice(&tag[..self.tag_size]);
        out.len()
    }

    fn open_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<usize> {
        self.check_nonce(nonce);
        check_input(in_out.len(), &src);

        let n = src.len();
        if n < self.tag_size || n as u64 > MAX_PLAINTEXT_SIZE + self.tag_size as u64 {
            return Err(Error::AuthenticationFailed);
        }
        let plain_len = n - self.tag_size;
        let out = region(in_out.len(), dst, plain_len);
        assert!(
            !inexact_overlap(&out, &src),
            "opengm_gcm: invalid buffer overlap of output and input"
        );

        let body_end = src.start + plain_len;
        let mut tag = [0u8; TAG_SIZE];
        tag[..self.tag_size].copy_from_slice(&in_out[body_end..src.end]);

        let tag = &tag[..self.tag_size];
        match self.open_unchecked(in_out, src.start..body_end, dst, tag, nonce, aad) {
            Ok(()) => Ok(plain_len),
            Err(e) => {
                // Never release unauthenticated plaintext.
                in_out[out].zeroize();
                Err(e)
            }
        }
    }
}

impl<B: Block> fmt::Debug for GCM<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GCM")
            .field("nonce_size", &self.nonce_size)
            .field("tag_size", &self.tag_size)
            .field("ghash", &self.ghash.name())
            .finish_non_exhaustive()
    }
}

#[inline]
fn check_plaintext_size(len: usize) {
    assert!(
        len as u64 <= MAX_PLAINTEXT_SIZE,
        "opengm_gcm: message too large for GCM"
    );
}

// inc32 treats the final four bytes of counter as a big-endian value and
// increments it, wrapping at 2^32.
#[inline]
fn inc32(counter: &mut [u8; BLOCK_SIZE]) {
    let mut ctr = [0u8; 4];
    ctr.copy_from_slice(&counter[BLOCK_SIZE - 4..]);
    let x = u32::from_be_bytes(ctr).wrapping_add(1);
    counter[BLOCK_SIZE - 4..].copy_from_slice(&x.to_be_bytes());
}
