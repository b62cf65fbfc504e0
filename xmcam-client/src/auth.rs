//! Credential hashing seam.

/// Turns a password into the token sent in the login request.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;
}

/// Sends the password unchanged.
///
/// Use this when the configured password already holds the device token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl CredentialHasher for PassThrough {
    fn hash(&self, password: &str) -> String {
        password.to_string()
    }
}

impl<F> CredentialHasher for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn hash(&self, password: &str) -> String {
        self(password)
    }
}
