use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::domain::network::link::Link;
use crate::domain::utils::id::EndpointPair;
use crate::error::{Error, Result};

new_key_type! {
    pub struct LinkKey;
}

/// Owns every link of a topology.
///
/// Routes refer to links by [`LinkKey`]; the pair index resolves a sorted endpoint pair to its key.
#[derive(Debug, Default, Clone)]
pub struct LinkStore {
    /// Link storage.
    slots: SlotMap<LinkKey, Link>,

    /// Index lookup LinkKey using the normalized endpoint pair.
    pair_index: HashMap<EndpointPair, LinkKey>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link to the store.
    ///
    /// # Errors
    /// `Error::DuplicateLink` if a link with the same endpoints is already present.
    pub fn insert(&mut self, link: Link) -> Result<LinkKey> {
        if self.pair_index.contains_key(link.endpoints()) {
            return Err(Error::DuplicateLink(link.endpoints().clone()));
        }

        let pair = link.endpoints().clone();
        let key = self.slots.insert(link);
        self.pair_index.insert(pair, key);

        Ok(key)
    }

    pub fn get(&self, key: LinkKey) -> Option<&Link> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: LinkKey) -> Option<&mut Link> {
        self.slots.get_mut(key)
    }

    /// Resolves the key of the link between the endpoints of `pair`.
    ///
    /// # Errors
    /// `Error::UnknownLink` if no such link exists.
    pub fn key_for(&self, pair: &EndpointPair) -> Result<LinkKey> {
        self.pair_index.get(pair).copied().ok_or_else(|| Error::UnknownLink(pair.clone()))
    }

    pub fn get_by_endpoints(&self, pair: &EndpointPair) -> Option<&Link> {
        let key = self.pair_index.get(pair)?;
        self.slots.get(*key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkKey, &Link)> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_used(&self) -> f64 {
        self.slots.values().map(Link::used).sum()
    }
}
