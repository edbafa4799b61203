use super::{GCM, MAX_PLAINTEXT_SIZE, STD_NONCE_SIZE, TAG_SIZE, check_plaintext_size};
use crate::blockmode::{Error, Result};
use crate::internal::alias::{check_input, exact_overlap, inexact_overlap, region};
use crate::traits::Block;
#[cfg(feature = "std")]
use crate::traits::AEAD;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;
use rand::CryptoRng;
use zeroize::Zeroize;

/// GCMWithRandomNonce is an AEAD that generates a random 12-byte nonce for
/// every seal and prepends it to the ciphertext:
///
/// ```text
/// nonce (12) || ciphertext || tag (16)
/// ```
///
/// The nonce size exposed through [`AEAD`] is zero, and the nonce size is
/// folded into the overhead.
pub struct GCMWithRandomNonce<B: Block> {
    gcm: GCM<B>,
}

impl<B: Block> GCMWithRandomNonce<B> {
    pub fn new(cipher: B) -> Result<Self> {
        Ok(GCMWithRandomNonce {
            gcm: GCM::new(cipher, STD_NONCE_SIZE, TAG_SIZE)?,
        })
    }

    /// Like [`AEAD::seal_within`], drawing the nonce from `rng`.
    ///
    /// `nonce` must be empty.
    pub fn seal_within_with_rng<R: CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> usize {
        assert!(
            nonce.is_empty(),
            "opengm_gcm: non-empty nonce passed to GCMWithRandomNonce"
        );
        check_input(in_out.len(), &src);
        let n = src.len();
        check_plaintext_size(n);

        let out = region(in_out.len(), dst, STD_NONCE_SIZE + n + TAG_SIZE);
        assert!(
            !inexact_overlap(&out, &src),
            "opengm_gcm: invalid buffer overlap of output and input"
        );

        // Sealing in place would write the nonce over the head of the
        // plaintext before it is read, so move the plaintext up first:
        //
        //     | P P P P P P P P P . . . . . . . . . . |
        //       ╲
        //     | N N | C C C C C C C C C | T T T T T T |
        let body = dst + STD_NONCE_SIZE;
        let mut src = src;
        if exact_overlap(&out, &src) {
            in_out.copy_within(src, body);
            src = body..body + n;
        }

        let mut nonce = [0u8; STD_NONCE_SIZE];
        rng.fill_bytes(&mut nonce);
        in_out[dst..body].copy_from_slice(&nonce);

        let tag = self.gcm.seal_unchecked(in_out, src, body, &nonce, aad);
        in_out[body + n..out.end].copy_from_slice(&tag);
        out.len()
    }

    /// Appends a random nonce and the encryption of `plaintext` to `dst`,
    /// drawing the nonce from `rng`.
    pub fn seal_with_rng<R: CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        dst: &mut Vec<u8>,
        plaintext: &[u8],
        aad: &[u8],
    ) {
        let n = plaintext.len();
        check_plaintext_size(n);

        // Lay the plaintext out behind the nonce slot and seal it there, so
        // no move is needed.
        let start = dst.len();
        let body = start + STD_NONCE_SIZE;
        dst.resize(body, 0);
        dst.extend_from_slice(plaintext);
        dst.resize(body + n + TAG_SIZE, 0);

        let mut nonce = [0u8; STD_NONCE_SIZE];
        rng.fill_bytes(&mut nonce);
        dst[start..body].copy_from_slice(&nonce);

        let tag = self.gcm.seal_unchecked(dst, body..body + n, body, &nonce, aad);
        dst[body + n..].copy_from_slice(&tag);
    }
}

#[cfg(feature = "std")]
impl<B: Block> AEAD for GCMWithRandomNonce<B> {
    fn nonce_size(&self) -> usize {
        0
    }

    fn overhead(&self) -> usize {
        STD_NONCE_SIZE + TAG_SIZE
    }

    fn seal_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> usize {
        self.seal_within_with_rng(&mut rand::rng(), in_out, src, dst, nonce, aad)
    }

    fn open_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<usize> {
        self.open_within(in_out, src, dst, nonce, aad)
    }

    fn seal(&self, dst: &mut Vec<u8>, nonce: &[u8], plaintext: &[u8], aad: &[u8]) {
        assert!(
            nonce.is_empty(),
            "opengm_gcm: non-empty nonce passed to GCMWithRandomNonce"
        );
        self.seal_with_rng(&mut rand::rng(), dst, plaintext, aad)
    }
}

impl<B: Block> GCMWithRandomNonce<B> {
    /// Extracts the nonce from `in_out[src]` and decrypts the rest to
    /// `in_out[dst..]`, returning the plaintext length. Needs no randomness,
    /// so it is available without `std`.
    ///
    /// `nonce` must be empty.
    pub fn open_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<usize> {
        assert!(
            nonce.is_empty(),
            "opengm_gcm: non-empty nonce passed to GCMWithRandomNonce"
        );
        check_input(in_out.len(), &src);

        let n = src.len();
        if n < STD_NONCE_SIZE + TAG_SIZE
            || n as u64 > (STD_NONCE_SIZE + TAG_SIZE) as u64 + MAX_PLAINTEXT_SIZE
        {
            return Err(Error::AuthenticationFailed);
        }
        let plain_len = n - STD_NONCE_SIZE - TAG_SIZE;
        let out = region(in_out.len(), dst, plain_len);
        assert!(
            !inexact_overlap(&out, &src),
            "opengm_gcm: invalid buffer overlap of output and input"
        );

        let mut nonce = [0u8; STD_NONCE_SIZE];
        nonce.copy_from_slice(&in_out[src.start..src.start + STD_NONCE_SIZE]);
        let body = src.start + STD_NONCE_SIZE..src.end - TAG_SIZE;
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&in_out[body.end..src.end]);

        // When opening in place the output starts at the nonce, ahead of the
        // ciphertext it is decrypted from.
        match self.gcm.open_unchecked(in_out, body, dst, &tag, &nonce, aad) {
            Ok(()) => Ok(plain_len),
            Err(e) => {
                in_out[out].zeroize();
                Err(e)
            }
        }
    }
}

impl<B: Block> fmt::Debug for GCMWithRandomNonce<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GCMWithRandomNonce")
            .field("gcm", &self.gcm)
            .finish()
    }
}
