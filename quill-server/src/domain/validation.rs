/// Basic email shape check: one `@` with non-empty local part, and a domain
/// containing a dot with non-empty labels.
pub fn validate_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = match parts.next() {
        Some(d) => d,
        None => return false,
    };

    if local.is_empty() || domain.is_empty() || email.contains(' ') {
        return false;
    }

    let valid_part = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
    };

    valid_part(local)
        && domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Document ids are 24 hexadecimal characters. Checked before any database
/// access so malformed ids fail fast with a 400.
pub fn validate_object_id(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit())
}

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Clamped pagination window. Non-numeric input falls back to the defaults;
/// out-of-range values clamp rather than error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        let limit = limit
            .and_then(|l| l.parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        Self { page, limit }
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Total page count for a collection of `total` items.
    pub fn pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_email_shapes() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last@sub.domain.org"));
        assert!(validate_email("user-name_1@example.co"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!validate_email(""));
        assert!(!validate_email("plainaddress"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@nodot"));
        assert!(!validate_email("user@domain..com"));
        assert!(!validate_email("user name@example.com"));
    }

    #[test]
    fn object_id_requires_24_hex_chars() {
        assert!(validate_object_id("507f1f77bcf86cd799439011"));
        assert!(validate_object_id("ABCDEF0123456789abcdef01"));
        assert!(!validate_object_id("507f1f77bcf86cd79943901")); // 23 chars
        assert!(!validate_object_id("507f1f77bcf86cd7994390111")); // 25 chars
        assert!(!validate_object_id("507f1f77bcf86cd79943901g")); // non-hex
        assert!(!validate_object_id(""));
    }

    #[test]
    fn pagination_defaults() {
        let p = Pagination::from_params(None, None);
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        assert_eq!(Pagination::from_params(Some("0"), None).page, 1);
        assert_eq!(Pagination::from_params(Some("-3"), None).page, 1);
        assert_eq!(Pagination::from_params(None, Some("500")).limit, 100);
        assert_eq!(Pagination::from_params(None, Some("0")).limit, 1);
        assert_eq!(Pagination::from_params(None, Some("-1")).limit, 1);
    }

    #[test]
    fn pagination_falls_back_on_non_numeric_input() {
        let p = Pagination::from_params(Some("abc"), Some("xyz"));
        assert_eq!(p, Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn pagination_skip_and_pages() {
        let p = Pagination::from_params(Some("3"), Some("20"));
        assert_eq!(p.skip(), 40);
        assert_eq!(p.pages(0), 0);
        assert_eq!(p.pages(41), 3);
        assert_eq!(p.pages(40), 2);
    }
}
