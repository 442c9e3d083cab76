//! Slug helpers for tag routes and post identifiers.
//!
//! ASCII slugification comes from the `slug` crate; Chinese text is
//! transliterated with `pinyin` first so a tag like “预言机” becomes
//! `yu-yan-ji` and stays addressable as `/tags/yu-yan-ji`.

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Route segment for a tag label.
///
/// Labels that cannot be slugified (emoji-only, punctuation-only) fall back
/// to their trimmed lowercase form, which is not a canonical slug; the
/// content loader rejects such tags.
pub fn tag_slug(tag: &str) -> String {
    derive_slug(tag).unwrap_or_else(|_| tag.trim().to_lowercase())
}

/// True when `value` is already in canonical slug form.
pub fn is_canonical(value: &str) -> bool {
    matches!(derive_slug(value), Ok(slug) if slug == value)
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_lowercases_and_hyphenates() {
        assert_eq!(
            derive_slug("Prediction Markets").expect("slug"),
            "prediction-markets"
        );
    }

    #[test]
    fn derive_slug_transliterates_chinese() {
        let slug = derive_slug("Rust 基础教程").expect("slug");
        assert_eq!(slug, "rust-ji-chu-jiao-cheng");
    }

    #[test]
    fn derive_slug_rejects_blank_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn tag_slug_falls_back_for_unrepresentable_labels() {
        assert_eq!(tag_slug("DeFi"), "defi");
        assert_eq!(tag_slug(" !!! "), "!!!");
    }

    #[test]
    fn canonical_detection() {
        assert!(is_canonical("solana"));
        assert!(!is_canonical("Solana"));
        assert!(!is_canonical("my slug"));
    }
}
