//! Voucher number suggestions.
//!
//! Numbers are a two-letter type prefix followed by six digits. Neither scheme checks for
//! collisions; the repository rejects a duplicate number within a voucher type and fiscal
//! year, and the service retries generated numbers on conflict.

use rand::Rng;

/// Smallest random suffix.
pub const RANDOM_MIN: u32 = 100_000;
/// Largest random suffix.
pub const RANDOM_MAX: u32 = 999_999;

/// Returns `prefix` followed by a uniformly random number in `100000..=999999`.
#[must_use]
pub fn generate_voucher_number(prefix: &str) -> String {
    generate_voucher_number_with(prefix, &mut rand::thread_rng())
}

/// Same as [`generate_voucher_number`] with a caller-supplied generator.
#[must_use]
pub fn generate_voucher_number_with<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format!("{prefix}{}", rng.gen_range(RANDOM_MIN..=RANDOM_MAX))
}

/// Returns the number after the highest `prefix`-numbered entry in `existing`.
///
/// Numbers that do not start with `prefix` or whose suffix is not numeric are ignored.
/// The suffix is zero-padded to six digits; the first number is `prefix000001`. When the
/// highest suffix has no successor the result is a random number instead.
#[must_use]
pub fn next_sequential_number<I, S>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let last = existing
        .into_iter()
        .filter_map(|number| {
            number
                .as_ref()
                .strip_prefix(prefix)
                .and_then(|suffix| suffix.parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0);
    last.checked_add(1).map_or_else(
        || generate_voucher_number(prefix),
        |next| format!("{prefix}{next:06}"),
    )
}
