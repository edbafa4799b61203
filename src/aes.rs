use crate::blockmode::{Error, Result};
use crate::traits::Block;
use ::aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};
use core::fmt;

const BLOCK_SIZE: usize = 16;

/// AES with a 128, 192 or 256-bit key, chosen by the key length.
#[derive(Clone)]
pub enum AesCipher {
    Aes128(::aes::Aes128),
    Aes192(::aes::Aes192),
    Aes256(::aes::Aes256),
}

impl AesCipher {
    pub fn new(key: &[u8]) -> Result<Self> {
        let key_size = key.len();
        match key_size {
            16 => Ok(AesCipher::Aes128(::aes::Aes128::new(GenericArray::from_slice(key)))),
            24 => Ok(AesCipher::Aes192(::aes::Aes192::new(GenericArray::from_slice(key)))),
            32 => Ok(AesCipher::Aes256(::aes::Aes256::new(GenericArray::from_slice(key)))),
            _ => Err(Error::InvalidKeySize(key_size)),
        }
    }

    #[inline]
    fn encrypt_block(&self, dst: &mut [u8], src: &[u8]) {
        let src = GenericArray::from_slice(src);
        let dst = GenericArray::from_mut_slice(dst);
        match self {
            AesCipher::Aes128(c) => c.encrypt_block_b2b(src, dst),
            AesCipher::Aes192(c) => c.encrypt_block_b2b(src, dst),
            AesCipher::Aes256(c) => c.encrypt_block_b2b(src, dst),
        }
    }

    #[inline]
    fn encrypt_block_inplace(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesCipher::Aes128(c) => c.encrypt_block(block),
            AesCipher::Aes192(c) => c.encrypt_block(block),
            AesCipher::Aes256(c) => c.encrypt_block(block),
        }
    }
}

impl fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AesCipher::Aes128(_) => "Aes128",
            AesCipher::Aes192(_) => "Aes192",
            AesCipher::Aes256(_) => "Aes256",
        };
        f.write_str(name)
    }
}

impl Block for AesCipher {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn encrypt(&self, dst: &mut [u8], src: &[u8]) -> usize {
        let mut n = 0;
        for (d, s) in dst
            .chunks_exact_mut(BLOCK_SIZE)
            .zip(src.chunks_exact(BLOCK_SIZE))
        {
            self.encrypt_block(d, s);
            n += BLOCK_SIZE;
        }
        n
    }

    fn encrypt_inplace(&self, in_out: &mut [u8]) -> usize {
        let mut n = 0;
        for block in in_out.chunks_exact_mut(BLOCK_SIZE) {
            self.encrypt_block_inplace(block);
            n += BLOCK_SIZE;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // FIPS 197, appendix C.
    #[test]
    fn test_aes_fips197() {
        let plain = hex!("00112233445566778899aabbccddeeff");
        let cases: [(&[u8], [u8; 16]); 3] = [
            (
                &hex!("000102030405060708090a0b0c0d0e0f"),
                hex!("69c4e0d86a7b0430d8cdb78070b4c55a"),
            ),
            (
                &hex!("000102030405060708090a0b0c0d0e0f1011121314151617"),
                hex!("dda97ca4864cdfe06eaf70a0ec0d7191"),
            ),
            (
                &hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"),
                hex!("8ea2b7ca516745bfeafc49904b496089"),
            ),
        ];
        for (key, want) in cases {
            let c = AesCipher::new(key).unwrap();
            let mut out = [0u8; 16];
            assert_eq!(c.encrypt(&mut out, &plain), 16);
            assert_eq!(out, want);

            let mut in_out = [plain, plain].concat();
            assert_eq!(c.encrypt_inplace(&mut in_out), 32);
            assert_eq!(&in_out[..16], &want);
            assert_eq!(&in_out[16..], &want);
        }
    }

    #[test]
    fn test_aes_partial_block_untouched() {
        let c = AesCipher::new(&[0u8; 16]).unwrap();
        let mut in_out = [0xabu8; 20];
        assert_eq!(c.encrypt_inplace(&mut in_out), 16);
        assert_eq!(&in_out[16..], &[0xab; 4]);
    }

    #[test]
    fn test_aes_invalid_key_size() {
        assert_eq!(AesCipher::new(&[0u8; 15]).unwrap_err(), Error::InvalidKeySize(15));
        assert_eq!(AesCipher::new(&[]).unwrap_err(), Error::InvalidKeySize(0));
    }
}
