//! User accounts: registration, login and throwaway guest identities.
//!
//! Passwords are stored and compared as plaintext; this layer does not
//! hash. Anything security-sensitive belongs in front of it.

use crate::error::{AccountError, StoreError};
use crate::ranking::store::{Store, UserRow};

/// How many guest name candidates to try before giving up.
const GUEST_ATTEMPTS: u32 = 32;

/// Account operations over a shared store.
pub struct AccountService<'a> {
    store: &'a Store,
}

impl<'a> AccountService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a named account. The username is the stable key; the
    /// display name is what leaderboards show.
    pub fn register(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
        now_ms: i64,
    ) -> Result<UserRow, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::EmptyUsername);
        }
        let display_name = display_name.trim();
        let display_name = if display_name.is_empty() {
            username
        } else {
            display_name
        };
        self.store
            .create_user(username, display_name, password, now_ms)
            .map_err(AccountError::Store)?;
        log::info!("registered user {username}");
        Ok(UserRow {
            username: username.to_string(),
            display_name: display_name.to_string(),
            password: password.to_string(),
            created_at: now_ms,
        })
    }

    /// Look up an account and check its credentials. A wrong password and
    /// an unknown username both come back `None`, so callers can't tell
    /// the two apart.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self
            .store
            .find_user(username.trim())?
            .filter(|user| user.password == password))
    }

    /// Create a guest account with a generated `guest-NNNN` name and a
    /// generated password (returned in the row so the caller can log back
    /// in). On a collision the suffix is rehashed and retried, so bursts
    /// of guests joining at the same instant still all get a name.
    pub fn register_guest(&self, now_ms: i64) -> Result<UserRow, AccountError> {
        let mut seed = (now_ms as u32) | 1;
        for _ in 0..GUEST_ATTEMPTS {
            // xorshift over the seed walks the suffix space
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let username = format!("guest-{:04}", seed % 10_000);
            let password = format!("{:08x}", seed.wrapping_mul(0x9e37_79b9));
            match self
                .store
                .create_user(&username, &username, &password, now_ms)
            {
                Ok(()) => {
                    log::info!("registered {username}");
                    return Ok(UserRow {
                        display_name: username.clone(),
                        username,
                        password,
                        created_at: now_ms,
                    });
                }
                Err(StoreError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(AccountError::GuestPoolExhausted(GUEST_ATTEMPTS))
    }
}
