//! Nickname registry.
//!
//! Unique nickname↔address binding so members can invite each other by
//! name instead of raw addresses. Format rule: 3-32 ASCII alphanumeric
//! characters, no separators.

use crate::error::{FundError, FundResult};
use crate::types::Address;
use std::collections::HashMap;

/// Bidirectional nickname↔address registry.
///
/// A caller may replace their own nickname (the old binding is
/// released); a nickname held by a different address is never
/// claimable.
#[derive(Debug, Clone, Default)]
pub struct NicknameRegistry {
    by_name: HashMap<String, Address>,
    by_address: HashMap<Address, String>,
}

impl NicknameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `caller`.
    ///
    /// Fails if the name is malformed or already bound to another
    /// address. Re-binding the caller's own current name is a no-op.
    pub fn set_nickname(&mut self, caller: Address, name: &str) -> FundResult<()> {
        if !is_valid_nickname(name) {
            return Err(FundError::MalformedNickname(name.to_string()));
        }

        match self.by_name.get(name) {
            Some(owner) if *owner != caller => {
                return Err(FundError::NicknameTaken(name.to_string()));
            }
            _ => {}
        }

        if let Some(previous) = self.by_address.insert(caller, name.to_string()) {
            self.by_name.remove(&previous);
        }
        self.by_name.insert(name.to_string(), caller);
        Ok(())
    }

    /// Resolve a nickname to its address.
    pub fn resolve(&self, name: &str) -> FundResult<Address> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| FundError::NicknameNotFound(name.to_string()))
    }

    /// The nickname currently bound to `address`, if any.
    pub fn nickname_of(&self, address: &Address) -> Option<&str> {
        self.by_address.get(address).map(String::as_str)
    }
}

/// Format rule: 3-32 characters, all ASCII alphanumeric.
fn is_valid_nickname(name: &str) -> bool {
    (3..=32).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric())
}
