// Overlap rules for an input and an output region carved out of one buffer.
// Regions are index ranges into the same `&mut [u8]`; two distinct borrows can
// never alias, so this is the only place overlap has to be checked.
use core::ops::Range;

// any_overlap reports whether x and y share any element. Empty regions never
// overlap anything.
#[inline]
pub(crate) fn any_overlap(x: &Range<usize>, y: &Range<usize>) -> bool {
    !x.is_empty() && !y.is_empty() && x.start < y.end && y.start < x.end
}

// inexact_overlap reports whether x and y share any element at
// non-corresponding positions. Regions that start at the same index are an
// exact overlap, which in-place operation relies on.
#[inline]
pub(crate) fn inexact_overlap(x: &Range<usize>, y: &Range<usize>) -> bool {
    if x.is_empty() || y.is_empty() || x.start == y.start {
        return false;
    }
    any_overlap(x, y)
}

// exact_overlap reports whether x and y are non-empty and start at the same index.
#[inline]
pub(crate) fn exact_overlap(x: &Range<usize>, y: &Range<usize>) -> bool {
    !x.is_empty() && !y.is_empty() && x.start == y.start
}

// region returns start..start+len, panicking if it does not fit in a buffer of
// buf_len bytes.
#[inline]
pub(crate) fn region(buf_len: usize, start: usize, len: usize) -> Range<usize> {
    let end = start.checked_add(len);
    match end {
        Some(end) if end <= buf_len => start..end,
        _ => panic!("opengm_gcm: output region out of bounds of the buffer"),
    }
}

// check_input panics unless src is a well-formed range inside a buffer of
// buf_len bytes.
#[inline]
pub(crate) fn check_input(buf_len: usize, src: &Range<usize>) {
    assert!(
        src.start <= src.end && src.end <= buf_len,
        "opengm_gcm: input range out of bounds of the buffer"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        // disjoint
        assert!(!any_overlap(&(0..4), &(4..8)));
        assert!(!inexact_overlap(&(0..4), &(4..8)));

        // exact
        assert!(any_overlap(&(0..4), &(0..8)));
        assert!(!inexact_overlap(&(0..4), &(0..8)));
        assert!(exact_overlap(&(0..4), &(0..8)));

        // inexact
        assert!(inexact_overlap(&(0..4), &(3..8)));
        assert!(inexact_overlap(&(3..8), &(0..4)));
        assert!(inexact_overlap(&(2..3), &(0..16)));

        // empty regions never overlap
        assert!(!any_overlap(&(2..2), &(0..16)));
        assert!(!inexact_overlap(&(0..16), &(2..2)));
        assert!(!exact_overlap(&(0..0), &(0..16)));
    }

    #[test]
    fn test_region() {
        assert_eq!(region(32, 16, 16), 16..32);
        assert_eq!(region(32, 32, 0), 32..32);
    }

    #[test]
    #[should_panic]
    fn test_region_out_of_bounds() {
        region(32, 17, 16);
    }

    #[test]
    #[should_panic]
    fn test_region_overflow() {
        region(32, usize::MAX, 2);
    }

    #[test]
    #[should_panic]
    fn test_check_input_reversed() {
        #[allow(clippy::reversed_empty_ranges)]
        check_input(32, &(8..4));
    }
}
