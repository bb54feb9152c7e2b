/// Aligns a value to 4-byte boundary.
pub(crate) fn align_stride(n: usize) -> usize {
    (n + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_stride_rounds_up_to_four() {
        assert_eq!(align_stride(0), 0);
        assert_eq!(align_stride(9), 12);
        assert_eq!(align_stride(12), 12);
        assert_eq!(align_stride(2685), 2688);
    }
}
