//! Page objects
//!
//! Each control of the wizard is an ordered candidate list. The first entry
//! is the selector seen in the live markup; later entries cover locale
//! variants and generic fallbacks.

pub mod auth;
pub mod landing;
pub mod onboarding;

/// XPath matching a `tag` whose text or inner span contains `text`
pub(crate) fn labelled(tag: &str, text: &str) -> String {
    format!(
        "//{tag}[span[contains(normalize-space(.), '{text}')] or contains(normalize-space(.), '{text}')]"
    )
}
