//! Per-source normalizers mapping provider-native records into the
//! canonical [`crate::content::ContentDraft`] shape.
//!
//! Each provider gets one pure mapping function, selected by source
//! identity at the call site. The output shape is identical across all of
//! them; only the field extraction differs. Normalizers never validate -
//! the acceptance gate ([`crate::content::ContentDraft::is_acceptable`])
//! belongs to the caller.

pub mod books;
pub mod media;
pub mod text;

pub use text::DESCRIPTION_MAX;

/// Fallback language code when the provider gives none.
pub const DEFAULT_LANGUAGE: &str = "ar";

/// Applies the language fallback to a sanitized language code.
fn language_or_default(code: String) -> String {
    if code.is_empty() {
        DEFAULT_LANGUAGE.to_string()
    } else {
        code
    }
}
