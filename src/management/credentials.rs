use chrono::{DateTime, TimeDelta, Utc};

use crate::types::AuthorizationResponse;

/// Bearer credentials issued by the TIDAL authorization endpoint.
///
/// The token and its lifetime never change after construction; only the
/// passage of time moves [`Credentials::expires_in_seconds`] towards zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
    expiration_time_seconds: u64,
    issued_at: DateTime<Utc>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, expiration_time_seconds: u64) -> Self {
        Self::issued_at(access_token, expiration_time_seconds, Utc::now())
    }

    pub fn issued_at(
        access_token: impl Into<String>,
        expiration_time_seconds: u64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Credentials {
            access_token: access_token.into(),
            expiration_time_seconds,
            issued_at,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token lifetime as reported by the server.
    pub fn expiration_time_seconds(&self) -> u64 {
        self.expiration_time_seconds
    }

    pub fn issued(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Instant the token expires, clamped to the latest representable time.
    pub fn expires_at(&self) -> DateTime<Utc> {
        TimeDelta::try_milliseconds(self.lifetime_millis())
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whole seconds left before the token expires, floored at zero.
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds_at(Utc::now())
    }

    pub fn expires_in_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        let expires_at = self
            .issued_at
            .timestamp_millis()
            .saturating_add(self.lifetime_millis());
        let remaining = expires_at.saturating_sub(now.timestamp_millis());
        (remaining.max(0) / 1000) as u64
    }

    /// A token is usable for bearer auth while it is non-empty and unexpired.
    pub fn is_usable(&self) -> bool {
        !self.access_token.is_empty() && self.expires_in_seconds() > 0
    }

    fn lifetime_millis(&self) -> i64 {
        i64::try_from(self.expiration_time_seconds)
            .unwrap_or(i64::MAX / 1000)
            .saturating_mul(1000)
    }
}

impl From<AuthorizationResponse> for Credentials {
    fn from(response: AuthorizationResponse) -> Self {
        Credentials::new(response.access_token, response.expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const REFRESH_THRESHOLD: u64 = crate::tidal::REFRESH_THRESHOLD_SECONDS;

    #[test]
    fn fresh_credentials_report_full_lifetime() {
        let now = Utc::now();
        let creds = Credentials::issued_at("token", 86_400, now);
        assert_eq!(creds.expires_in_seconds_at(now), 86_400);
    }

    #[test]
    fn remaining_seconds_are_floored() {
        let now = Utc::now();
        let creds = Credentials::issued_at("token", 10, now);
        assert_eq!(creds.expires_in_seconds_at(now + Duration::milliseconds(1_500)), 8);
    }

    #[test]
    fn expired_credentials_stay_at_zero() {
        let issued = Utc::now() - Duration::seconds(120);
        let creds = Credentials::issued_at("token", 60, issued);

        assert_eq!(creds.expires_in_seconds(), 0);
        assert_eq!(
            creds.expires_in_seconds_at(Utc::now() + Duration::days(365)),
            0
        );
        assert!(!creds.is_usable());
    }

    #[test]
    fn remaining_time_never_increases() {
        let issued = Utc::now();
        let creds = Credentials::issued_at("token", 30, issued);
        let mut previous = u64::MAX;
        for step in 0..40 {
            let left = creds.expires_in_seconds_at(issued + Duration::seconds(step));
            assert!(left <= previous);
            previous = left;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn empty_token_is_not_usable() {
        assert!(!Credentials::new("", 3600).is_usable());
        assert!(Credentials::new("abc", 3600).is_usable());
    }

    #[test]
    fn huge_lifetime_saturates_instead_of_overflowing() {
        let creds = Credentials::new("t", u64::MAX);

        assert!(creds.expires_in_seconds() > REFRESH_THRESHOLD);
        assert!(creds.is_usable());
        assert!(creds.expires_at() > creds.issued());
        assert!(creds.expires_in_seconds_at(Utc::now() + Duration::days(365)) > REFRESH_THRESHOLD);
    }

    #[test]
    fn builds_from_authorization_response() {
        let response = AuthorizationResponse {
            access_token: "abc".to_string(),
            expires_in: 86_400,
        };
        let creds = Credentials::from(response);
        assert_eq!(creds.access_token(), "abc");
        assert_eq!(creds.expiration_time_seconds(), 86_400);
        assert!(creds.expires_at() > creds.issued());
    }
}
