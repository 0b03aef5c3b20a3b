//! Default [`CredentialSource`]: plain owned strings.

use crate::traits::CredentialSource;

#[derive(Debug, Clone)]
pub struct BasicCredentials {
    user: String,
    domain: Option<String>,
    password: String,
}

impl BasicCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            domain: None,
            password: password.into(),
        }
    }

    pub fn with_domain(user: impl Into<String>, domain: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            domain: Some(domain.into()),
            password: password.into(),
        }
    }
}

impl CredentialSource for BasicCredentials {
    fn user(&self) -> &str {
        &self.user
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn password(&self) -> &str {
        &self.password
    }
}

/// Splits `domain/user` or `domain\user` into `(domain, user)`, as accepted
/// anywhere a user name is supplied without an explicit domain.
pub fn split_domain_user(raw: &str) -> (Option<&str>, &str) {
    match raw.find(['/', '\\']) {
        Some(i) => (Some(&raw[..i]), &raw[i + 1..]),
        None => (None, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_forward_slash() {
        assert_eq!(split_domain_user("WORKGROUP/alice"), (Some("WORKGROUP"), "alice"));
    }

    #[test]
    fn splits_on_backslash() {
        assert_eq!(split_domain_user(r"WORKGROUP\alice"), (Some("WORKGROUP"), "alice"));
    }

    #[test]
    fn no_separator_leaves_domain_none() {
        assert_eq!(split_domain_user("alice"), (None, "alice"));
    }
}
