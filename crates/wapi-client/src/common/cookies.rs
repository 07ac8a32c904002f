//! Session cookie store
//!
//! The grid answers the first authenticated request with an `ibapauth`
//! session cookie. [`SessionCookieJar`] keeps it in a reqwest [`Jar`] but
//! drops any cookie whose `Domain` attribute is a public suffix (`com`,
//! `co.uk`, ...), so the session is never offered to unrelated hosts that
//! happen to share that suffix.

use cookie::Cookie;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::debug;

/// Cookie jar scoped by the public suffix list
#[derive(Debug, Default)]
pub struct SessionCookieJar {
    jar: Jar,
}

impl SessionCookieJar {
    /// Create an empty jar
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let host = url.host_str().unwrap_or_default();
        let mut accepted = cookie_headers.filter(|value| {
            let allowed = is_allowed(value, host);
            if !allowed {
                debug!("Dropping cookie from {} scoped to a public suffix", host);
            }
            allowed
        });
        self.jar.set_cookies(&mut accepted, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

/// A cookie may name a public suffix as its domain only when that suffix is
/// the host itself. Unparsable headers are left for the jar to reject.
fn is_allowed(value: &HeaderValue, host: &str) -> bool {
    let Ok(raw) = value.to_str() else {
        return true;
    };
    let Ok(cookie) = Cookie::parse(raw) else {
        return true;
    };

    match cookie.domain() {
        Some(domain) => {
            let domain = domain.trim_start_matches('.').to_ascii_lowercase();
            !is_public_suffix(&domain) || domain.eq_ignore_ascii_case(host)
        }
        None => true,
    }
}

fn is_public_suffix(domain: &str) -> bool {
    psl::suffix_str(domain) == Some(domain)
}
