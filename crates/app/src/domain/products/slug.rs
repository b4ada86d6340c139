//! Product slugs.

use rand::seq::SliceRandom;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LENGTH: usize = 6;

/// Lowercase a name and collapse every run of non-alphanumeric characters
/// into a single `-`, trimming leading and trailing dashes.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Build a unique-ish slug: the slugified name plus a random suffix.
#[must_use]
pub fn generate_slug(name: &str) -> String {
    let mut rng = rand::thread_rng();

    let suffix: String = (0..SUFFIX_LENGTH)
        .filter_map(|_| SUFFIX_CHARSET.choose(&mut rng).copied().map(char::from))
        .collect();

    let base = slugify(name);

    if base.is_empty() {
        format!("product-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}
