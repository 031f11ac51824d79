use sighting_globe::domain::Period;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Maps the number keys `1`..`4` onto periods.
pub fn period_for_digit(ch: char) -> Option<Period> {
    let digit = ch.to_digit(10)?;
    let index = usize::try_from(digit).ok()?.checked_sub(1)?;
    Period::from_index(index)
}

/// Accepts the characters a (possibly negative) year can contain.
pub const fn is_year_char(ch: char, input: &str) -> bool {
    ch.is_ascii_digit() || (ch == '-' && input.is_empty())
}
