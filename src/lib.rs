#![no_std]
#![warn(clippy::std_instead_of_alloc, clippy::std_instead_of_core)]

#[cfg(feature = "aes")]
pub mod aes;
pub mod blockmode;
pub mod traits;

mod internal;

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub use blockmode::gcm::{GCM, GCMWithRandomNonce};
#[cfg(feature = "aes")]
pub use blockmode::gcm::{new_aes_gcm, new_aes_gcm_with_random_nonce};
pub use blockmode::{Error, Result};
#[cfg(feature = "aes")]
pub use crate::aes::AesCipher;
pub use traits::{AEAD, Block};
