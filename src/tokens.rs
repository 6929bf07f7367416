//! Anti-forgery and captcha token state.
//!
//! The session that remembers issued tokens between requests belongs to the
//! host application. Forma only sees it through [`TokenStore`], passed in
//! explicitly wherever tokens are issued ([`FieldFactory`](crate::factory::FieldFactory))
//! or cleared ([`Form::clear_tokens`](crate::form::Form::clear_tokens)).

use im::HashMap;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

/// Session key holding the current CSRF token.
pub const CSRF_KEY: &str = "forma_csrf";
/// Session key holding the expected captcha answer.
pub const CAPTCHA_KEY: &str = "forma_captcha";

/// Session collaborator for token elements.
pub trait TokenStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn clear(&mut self, key: &str);
}

/// In-process token store, backed by a persistent map so snapshots are cheap.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    entries: HashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Returns the CSRF token held by `store`, issuing a fresh one first when the
/// store has none.
pub fn issue_csrf_token(store: &mut dyn TokenStore, rng: &mut impl RngCore) -> String {
    if let Some(existing) = store.get(CSRF_KEY) {
        return existing;
    }
    let token = generate_token(rng);
    store.set(CSRF_KEY, token.clone());
    tracing::debug!("issued new csrf token");
    token
}

/// Issues an addition question and stores its answer. Returns
/// `(question, answer)`.
pub fn issue_captcha(store: &mut dyn TokenStore, rng: &mut impl Rng) -> (String, String) {
    let a: u32 = rng.gen_range(1..=9);
    let b: u32 = rng.gen_range(1..=9);
    let answer = (a + b).to_string();
    store.set(CAPTCHA_KEY, answer.clone());
    tracing::debug!("issued new captcha challenge");
    (format!("{} + {}", a, b), answer)
}

/// Hex-encoded SHA-256 digest of 32 random bytes.
pub fn generate_token(rng: &mut impl RngCore) -> String {
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);
    let digest = Sha256::digest(seed);
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}
