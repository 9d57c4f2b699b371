use std::fmt::{Debug, Display};

use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString},
};
use rand::{
    Rng, SeedableRng, TryRngCore,
    distr::Alphanumeric,
    rngs::{OsRng, StdRng},
};

const KEY_PREFIX_LENGTH: usize = 8;
const KEY_LENGTH: usize = 32;

/// A curator's API key in plain text. Only ever held in memory; the database
/// stores a [`HashedApiKey`].
pub struct ApiKey(String);
impl ApiKey {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The first few characters of the key, stored unhashed so the row can be
    /// found before verifying the hash. Keys shorter than the prefix have no
    /// prefix and can never match.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        let Self(key) = self;
        key.get(..KEY_PREFIX_LENGTH)
    }

    /// # Errors
    pub fn hash(&self) -> Result<HashedApiKey, argon2::password_hash::Error> {
        let Self(key) = self;

        let mut salt = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|_| argon2::password_hash::Error::Crypto)?;
        let salt = SaltString::encode_b64(&salt)?;

        let hash = Argon2::default()
            .hash_password(key.as_bytes(), &salt)?
            .to_string();

        Ok(HashedApiKey {
            prefix: self.prefix().unwrap_or_default().to_string(),
            hash,
        })
    }

    #[must_use]
    pub fn is_same_hash(&self, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(self.as_str().as_bytes(), &parsed_hash)
            .is_ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        let Self(inner) = self;

        inner
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        let mut rng = StdRng::from_os_rng();
        let key = (0..KEY_LENGTH)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect();

        Self(key)
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&self.prefix()).finish()
    }
}

impl Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self(inner) = self;
        <String as Display>::fmt(inner, f)
    }
}

#[derive(Debug)]
pub struct HashedApiKey {
    pub prefix: String,
    pub hash: String,
}
