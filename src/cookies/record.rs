use cookie::Cookie;
use time::OffsetDateTime;

use crate::base::guarderror::GuardError;

/// A single cookie decoded from a set-string such as
/// `name=value; Expires=Thu, 01 Jan 1970 00:00:01 GMT; Path=/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub expiration_time: Option<OffsetDateTime>,
    /// The set-string this record was decoded from, verbatim.
    pub raw: String,
}

impl CookieRecord {
    /// Decode a set-string.
    ///
    /// `Max-Age` takes precedence over `Expires`, as in browsers.
    pub fn parse(set_string: &str) -> Result<Self, GuardError> {
        let parsed = Cookie::parse(set_string)
            .map_err(|e| GuardError::InvalidCookie(format!("{}: {}", set_string, e)))?;

        let expiration_time = match parsed.max_age() {
            Some(max_age) => Some(OffsetDateTime::now_utc() + max_age),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        Ok(Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            expiration_time,
            raw: set_string.to_string(),
        })
    }

    /// A session cookie (no expiration) never expires.
    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        if let Some(expiry) = self.expiration_time {
            expiry < current_time
        } else {
            false
        }
    }
}

/// Build a set-string for `name=value` expiring at `expires`.
pub fn set_string_with_expiry(name: &str, value: &str, expires: OffsetDateTime) -> String {
    Cookie::build((name, value)).expires(expires).build().to_string()
}

/// Build a set-string that removes `name` from a store.
pub fn removal_set_string(name: &str) -> String {
    set_string_with_expiry(name, "", OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[test]
    fn test_parse_plain() {
        let record = CookieRecord::parse("analytics_x=1").unwrap();
        assert_eq!(record.name, "analytics_x");
        assert_eq!(record.value, "1");
        assert_eq!(record.expiration_time, None);
        assert_eq!(record.raw, "analytics_x=1");
    }

    #[test]
    fn test_parse_expires() {
        let record =
            CookieRecord::parse("ads_y=2; expires=Thu, 01 Jan 1970 00:00:01 GMT; path=/").unwrap();
        assert_eq!(record.value, "2");
        assert_eq!(
            record.expiration_time,
            Some(OffsetDateTime::UNIX_EPOCH + Duration::seconds(1))
        );
        assert!(record.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_max_age_wins_over_expires() {
        let record = CookieRecord::parse(
            "id=abc; Max-Age=3600; Expires=Thu, 01 Jan 1970 00:00:01 GMT",
        )
        .unwrap();
        assert!(!record.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_parse_rejects_missing_pair() {
        let err = CookieRecord::parse("").unwrap_err();
        assert!(matches!(err, GuardError::InvalidCookie(_)));
    }

    #[test]
    fn test_session_cookie_never_expires() {
        let record = CookieRecord::parse("s=v").unwrap();
        assert_eq!(record.expiration_time, None);
        assert!(!record.is_expired(OffsetDateTime::now_utc() + Duration::days(10_000)));
    }

    #[test]
    fn test_removal_set_string_is_expired() {
        let record = CookieRecord::parse(&removal_set_string("gone")).unwrap();
        assert_eq!(record.name, "gone");
        assert_eq!(record.value, "");
        assert!(record.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn test_set_string_with_expiry_round_trips() {
        let expires = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000);
        let raw = set_string_with_expiry("a", "1", expires);
        let record = CookieRecord::parse(&raw).unwrap();
        assert_eq!(record.value, "1");
        assert_eq!(record.expiration_time, Some(expires));
    }
}
