//! Entry handler module driving the QR access state machine
//!
//! One logical flow spans several HTTP requests: the QR link click, the
//! human-timescale login gap, and the post-login redemption. The handler
//! resumes across that gap purely via the continuation cookie.

mod service;

#[cfg(test)]
mod tests;

pub use service::{
    attribution_cookie_name, is_attribution_cookie, CookieSpec, EntryConfig, EntryOutcome,
    EntryRequest, EntryService, RedirectResolution, ACCESS_COOKIE, ATTRIBUTION_KEYS,
};
