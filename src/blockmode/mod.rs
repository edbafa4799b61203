pub mod gcm;
use thiserror;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("incorrect tag size given to GCM: {}, want 12..=16", .0)]
    InvalidTagSize(usize),

    #[error("the nonce can't have zero length")]
    InvalidNonceSize,

    #[error("GCM requires a 128-bit block cipher, got block size {}", .0)]
    UnsupportedBlockSize(usize),

    #[error("invalid key size {}", .0)]
    InvalidKeySize(usize),

    // Carries no detail about which check failed.
    #[error("message authentication failed")]
    AuthenticationFailed,
}
pub type Result<T> = core::result::Result<T, Error>;
