//! Bazaar Domain Concerns

pub mod accounts;
pub mod carts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod settings;
pub mod shipping;

/// First `max_chars` characters of `value`, for provider fields with length
/// limits.
pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
