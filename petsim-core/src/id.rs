//! Document id generation.
//!
//! Ids combine a random alphanumeric prefix with the current timestamp in
//! 100 ns ticks, formatted as uppercase hexadecimal. The random prefix keeps
//! ids unique under concurrent writers; the tick suffix keeps them roughly
//! sortable by creation time without a central counter.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a document id of roughly the requested length.
///
/// Lengths below 20 clamp the random prefix to 5 characters; longer requests
/// widen the prefix by `length - 15`. The tick suffix is appended either way,
/// so the result can be a little longer than asked for.
pub fn generate(length: usize) -> String {
    let prefix_len = if length < 20 { 5 } else { length - 15 };

    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(prefix_len + 16);
    for _ in 0..prefix_len {
        id.push(CHARS[rng.gen_range(0..CHARS.len())] as char);
    }

    let ticks = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        / 100;
    id.push_str(&format!("{ticks:X}"));
    id
}

/// Generates a document id with the default length of 20.
pub fn generate_short_id() -> String {
    generate(20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_has_random_prefix_and_hex_suffix() {
        let id = generate_short_id();
        assert!(id.len() > 5);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = generate_short_id();
        let b = generate_short_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_sort_roughly_by_creation_time() {
        // The tick suffix grows over time; compare suffixes directly.
        let a = generate(30);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = generate(30);
        assert!(a[15..] < b[15..]);
    }
}
