pub(crate) mod alias;

#[cfg(all(target_arch = "x86_64", not(feature = "force-soft")))]
pub(crate) mod cpuid;
