/// Index before `index` in a list of `len`, wrapping to the end.
pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 || index >= len {
        len - 1
    } else {
        index - 1
    }
}

/// Index after `index` in a list of `len`, wrapping to the start.
pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_both_ends() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_decrement(5, 3), 2);
        assert_eq!(wrap_increment(0, 0), 0);
        assert_eq!(wrap_decrement(0, 0), 0);
    }
}
