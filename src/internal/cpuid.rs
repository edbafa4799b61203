#[cfg(not(feature = "std"))]
pub use x86_64_no_std::*;

#[cfg(feature = "std")]
pub use x86_64_std::*;

#[cfg(feature = "std")]
mod x86_64_std {
    #[inline]
    pub fn support_pclmulqdq() -> bool {
        std::is_x86_feature_detected!("pclmulqdq") && std::is_x86_feature_detected!("sse2")
    }
}

#[allow(dead_code)]
mod x86_64_no_std {
    use core::arch::x86_64::__cpuid;

    #[inline]
    pub fn cpuid(leaf: u32, sub_leaf: u32) -> (u32, u32, u32, u32) {
        #[allow(unused_unsafe)]
        let r = unsafe { core::arch::x86_64::__cpuid_count(leaf, sub_leaf) };
        (r.eax, r.ebx, r.ecx, r.edx)
    }

    #[inline]
    fn max_leaf() -> u32 {
        #[allow(unused_unsafe)]
        unsafe { __cpuid(0) }.eax
    }

    // CPUID.01H: ECX bit 1 is PCLMULQDQ, EDX bit 26 is SSE2.
    #[inline]
    pub fn support_pclmulqdq() -> bool {
        if max_leaf() < 1 {
            return false;
        }
        let (_, _, ecx, edx) = cpuid(1, 0);
        (ecx & (1 << 1)) != 0 && (edx & (1 << 26)) != 0
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(feature = "std")]
    fn test_support_pclmulqdq() {
        use super::*;
        assert_eq!(
            x86_64_std::support_pclmulqdq(),
            x86_64_no_std::support_pclmulqdq()
        );
    }
}
