//! The two remote services this crate talks to.

use std::fmt;

/// Sample keys and template placeholders for the cartoonify service.
///
/// The first entry is the sample key that shipped in the project's default
/// configuration; it is public and never a usable credential.
pub const CARTOONIFY_PLACEHOLDERS: &[&str] = &[
    "c0b70261-2bd5-4805-9b33-cdfeb6e7b8eb",
    "YOUR_API_KEY_HERE",
    "your_deepai_api_key_here",
    "your_deepai_key_here",
    "your_api_key_here",
    "your_key_here",
];

/// Sample keys and template placeholders for the avatar service.
pub const AVATAR_PLACEHOLDERS: &[&str] = &[
    "68deefe93emshbcaf075f3a1a1cfp187d87jsn18efbe156976",
    "YOUR_API_KEY_HERE",
    "YOUR_RAPIDAPI_KEY_HERE",
    "your_rapidapi_key_here",
    "your_rapid_api_key_here",
    "your_api_key_here",
    "your_key_here",
];

/// Identifies which remote service a credential or request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Photo to cartoon transformation (DeepAI toonify).
    Cartoonify,
    /// Avatar generation (DoppelMe via RapidAPI).
    Avatar,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Cartoonify, Service::Avatar];

    /// Known placeholder values that must never be treated as real keys.
    pub fn placeholders(self) -> &'static [&'static str] {
        match self {
            Service::Cartoonify => CARTOONIFY_PLACEHOLDERS,
            Service::Avatar => AVATAR_PLACEHOLDERS,
        }
    }

    /// Environment variable holding this service's key.
    pub fn key_var(self) -> &'static str {
        match self {
            Service::Cartoonify => "DEEPAI_API_KEY",
            Service::Avatar => "RAPIDAPI_KEY",
        }
    }

    /// Where to obtain a key, shown when the feature is disabled.
    pub fn signup_url(self) -> &'static str {
        match self {
            Service::Cartoonify => "https://deepai.org/",
            Service::Avatar => "https://rapidapi.com/",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Cartoonify => write!(f, "DeepAI"),
            Service::Avatar => write!(f, "RapidAPI"),
        }
    }
}
