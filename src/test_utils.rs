//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

/// Non-empty text without surrounding whitespace or control characters,
/// at most `max_len` characters long (`max_len >= 2`).
pub(crate) fn arb_clean_text(max_len: usize) -> impl Strategy<Value = String> {
    let pattern = format!(
        "[a-zA-Z0-9]([a-zA-Z0-9 _.-]{{0,{}}}[a-zA-Z0-9])?",
        max_len - 2
    );
    prop::string::string_regex(&pattern).expect("valid regex")
}
