use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::domain::network::route::Route;
use crate::domain::utils::id::EndpointPair;
use crate::error::{Error, Result};

new_key_type! {
    pub struct RouteKey;
}

/// Owns the routes of a topology, indexed by their {first, last} waypoint pair.
#[derive(Debug, Default, Clone)]
pub struct RouteStore {
    slots: SlotMap<RouteKey, Route>,
    pair_index: HashMap<EndpointPair, RouteKey>,

    /// Keys in the order routes were supplied.
    order: Vec<RouteKey>,
}

impl RouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route to the store.
    ///
    /// # Errors
    /// `Error::DuplicateRoute` if another route already connects the same endpoints.
    pub fn insert(&mut self, route: Route) -> Result<RouteKey> {
        if self.pair_index.contains_key(route.endpoints()) {
            return Err(Error::DuplicateRoute(route.endpoints().clone()));
        }

        let pair = route.endpoints().clone();
        let key = self.slots.insert(route);
        self.pair_index.insert(pair, key);
        self.order.push(key);

        Ok(key)
    }

    pub fn get(&self, key: RouteKey) -> Option<&Route> {
        self.slots.get(key)
    }

    /// Resolves the route connecting the endpoints of `pair`.
    ///
    /// # Errors
    /// `Error::UnknownRoute` if no route has this identity.
    pub fn lookup_by_endpoints(&self, pair: &EndpointPair) -> Result<RouteKey> {
        self.pair_index.get(pair).copied().ok_or_else(|| Error::UnknownRoute(pair.clone()))
    }

    /// Routes in the order they were inserted.
    pub fn iter(&self) -> impl Iterator<Item = (RouteKey, &Route)> {
        self.order.iter().filter_map(|key| self.slots.get(*key).map(|route| (*key, route)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
