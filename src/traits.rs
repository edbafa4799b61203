use alloc::vec::Vec;
use core::ops::Range;

use crate::blockmode::Result;
use zeroize::Zeroize;

pub trait Block {
    fn block_size(&self) -> usize;

    // Encrypt as many blocks as possible from src to dst.
    // More precisely, encrypt min(dst.len()/BLOCK_SIZE, src.len()/BLOCK_SIZE) blocks.
    // Returns the number of bytes encrypted.
    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> usize;

    fn encrypt_inplace(&self, in_out: &mut [u8]) -> usize;
}

impl<B: Block + ?Sized> Block for &B {
    #[inline]
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    #[inline]
    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> usize {
        (**self).encrypt(dst, src)
    }

    #[inline]
    fn encrypt_inplace(&self, in_out: &mut [u8]) -> usize {
        (**self).encrypt_inplace(in_out)
    }
}

/// An authenticated encryption with associated data (AEAD) cipher.
///
/// Implementors provide the two `*_within` operations, which read the input
/// from `in_out[src]` and write the output starting at `in_out[dst]`. The
/// output region and `src` may be disjoint or may start at the same index;
/// any other overlap is a caller bug and panics.
pub trait AEAD {
    // NonceSize returns the size of the nonce that must be passed to Seal
    // and Open.
    fn nonce_size(&self) -> usize;

    // Overhead returns the maximum difference between the lengths of a
    // plaintext and its ciphertext.
    fn overhead(&self) -> usize;

    /// Encrypts and authenticates `in_out[src]`, writing
    /// `plaintext.len() + overhead()` bytes at `in_out[dst..]`. Returns the
    /// number of bytes written.
    ///
    /// # Panics
    ///
    /// On a nonce of the wrong length, a message that is too large, regions
    /// that do not fit in `in_out`, or inexact overlap of input and output.
    fn seal_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> usize;

    /// Authenticates and decrypts `in_out[src]`, writing the plaintext at
    /// `in_out[dst..]`. Returns the plaintext length.
    ///
    /// On failure the output region is zeroed and no plaintext is released.
    fn open_within(
        &self,
        in_out: &mut [u8],
        src: Range<usize>,
        dst: usize,
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<usize>;

    /// Appends the encryption of `plaintext` (followed by the tag) to `dst`.
    fn seal(&self, dst: &mut Vec<u8>, nonce: &[u8], plaintext: &[u8], aad: &[u8]) {
        let start = dst.len();
        dst.extend_from_slice(plaintext);
        dst.resize(start + plaintext.len() + self.overhead(), 0);
        self.seal_within(dst, start..start + plaintext.len(), start, nonce, aad);
    }

    /// Appends the decryption of `ciphertext` to `dst`. On failure `dst` is
    /// left as it was.
    fn open(&self, dst: &mut Vec<u8>, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<()> {
        let start = dst.len();
        dst.extend_from_slice(ciphertext);
        let end = dst.len();
        match self.open_within(dst, start..end, start, nonce, aad) {
            Ok(n) => {
                dst.truncate(start + n);
                Ok(())
            }
            Err(e) => {
                dst[start..].zeroize();
                dst.truncate(start);
                Err(e)
            }
        }
    }

    /// Encrypts `in_out` in place and appends the tag.
    fn seal_in_place(&self, in_out: &mut Vec<u8>, nonce: &[u8], aad: &[u8]) {
        let n = in_out.len();
        in_out.resize(n + self.overhead(), 0);
        self.seal_within(in_out, 0..n, 0, nonce, aad);
    }

    /// Decrypts `in_out` in place, returning the plaintext prefix.
    fn open_in_place<'a>(
        &self,
        in_out: &'a mut [u8],
        nonce: &[u8],
        aad: &[u8],
    ) -> Result<&'a mut [u8]> {
        let len = in_out.len();
        let n = self.open_within(in_out, 0..len, 0, nonce, aad)?;
        Ok(&mut in_out[..n])
    }
}
