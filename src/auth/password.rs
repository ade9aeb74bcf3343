//! Password hashing

use crate::error::{Error, Result};

/// Lowest bcrypt cost factor accepted
pub const MIN_COST: u32 = 4;
/// Highest bcrypt cost factor accepted
pub const MAX_COST: u32 = 31;

/// One-way salted password hashing backed by bcrypt
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost factor
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::Config(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password. Every call uses a fresh salt.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed hash is a failed verification, never an error.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        bcrypt::verify(plaintext, hashed).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}
