//! Request cookies and password access tokens
//!
//! Two cookies matter to the site:
//! - `post_pass_{id}`: hex SHA-256 of `{id}:{password}`, plain jar
//! - `comment_author_email`: signed with the site key, so only an email the
//!   site itself handed out unlocks that author's pending comments

use axum_extra::extract::cookie::{Cookie, CookieJar, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha256, Sha512};

use crate::content::ContentItem;
use crate::theme::Access;

/// Cookie remembering the email of the last comment author
pub const AUTHOR_EMAIL_COOKIE: &str = "comment_author_email";

/// Signing key for the author cookie. A configured secret is stretched to
/// the 64 bytes the key needs; without one a random key is drawn.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => Key::generate(),
    }
}

/// What a request's cookies say about the viewer
#[derive(Clone)]
pub struct Visitor {
    jar: CookieJar,
    author_email: Option<String>,
}

impl Visitor {
    pub fn new(jar: CookieJar, signed: &SignedCookieJar) -> Self {
        let author_email = signed
            .get(AUTHOR_EMAIL_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|e| !e.is_empty());
        Self { jar, author_email }
    }

    /// Email of the viewer, if this site signed it for them
    pub fn author_email(&self) -> Option<&str> {
        self.author_email.as_deref()
    }

    /// Whether the viewer may read `item`
    pub fn access_to(&self, item: &ContentItem) -> Access {
        access_for(item, &self.jar)
    }
}

/// Name of the cookie holding the access token for `item_id`
pub fn access_cookie_name(item_id: i64) -> String {
    format!("post_pass_{}", item_id)
}

/// Access token for a post: hex SHA-256 of `{id}:{password}`. Changing the
/// password invalidates every token issued for the old one.
pub fn access_token(item_id: i64, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", item_id, password).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn access_for(item: &ContentItem, jar: &CookieJar) -> Access {
    let Some(password) = item.password.as_deref().filter(|p| !p.is_empty()) else {
        return Access::Granted;
    };
    match jar.get(&access_cookie_name(item.id)) {
        Some(cookie) if cookie.value() == access_token(item.id, password) => Access::Granted,
        _ => Access::Denied,
    }
}

/// Session cookie carrying the access token
pub fn access_cookie(item_id: i64, password: &str) -> Cookie<'static> {
    Cookie::build((access_cookie_name(item_id), access_token(item_id, password)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie remembering a comment author's email for a year. Add it to a
/// `SignedCookieJar`.
pub fn author_cookie(email: &str) -> Cookie<'static> {
    Cookie::build((AUTHOR_EMAIL_COOKIE, email.to_string()))
        .path("/")
        .max_age(time::Duration::days(365))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
