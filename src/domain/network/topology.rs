use crate::api::network_dto::NetworkDto;
use crate::domain::network::link::Link;
use crate::domain::network::link_store::{LinkKey, LinkStore};
use crate::domain::network::route::Route;
use crate::domain::network::route_store::{RouteKey, RouteStore};
use crate::domain::utils::id::{EndpointId, EndpointPair};
use crate::error::{Error, Result};

/// Models the complete circuit network.
///
/// The `NetworkTopology` owns:
/// * **Physical Layer**: every link, keyed by its sorted endpoint pair.
/// * **Routes**: the supplied circuits, each bound to the links it crosses.
///
/// Links are created first; routes are resolved against them afterwards. Both sets stay fixed
/// once the topology is built, only the load on the links changes.
#[derive(Debug, Default, Clone)]
pub struct NetworkTopology {
    links: LinkStore,
    routes: RouteStore,
}

impl TryFrom<&NetworkDto> for NetworkTopology {
    type Error = Error;

    fn try_from(dto: &NetworkDto) -> Result<Self> {
        let mut topology = NetworkTopology::new();

        // 1. Init physical links.
        for link_dto in &dto.links {
            let (a, b) = link_dto.endpoints()?;
            topology.add_link(a, b, link_dto.capacity)?;
        }

        // 2. Bind routes to the links they traverse.
        for waypoints in &dto.possible_circuits {
            topology.add_route(waypoints.iter().map(|p| EndpointId::new(p.as_str())).collect())?;
        }

        if topology.routes.is_empty() {
            log::warn!("Network topology has no routes; every demand will fail to bind.");
        }

        log::info!("Network topology built: {} links, {} routes.", topology.links.len(), topology.routes.len());

        Ok(topology)
    }
}

impl NetworkTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link between `a` and `b`.
    ///
    /// # Errors
    /// `Error::InvalidCapacity` or `Error::DuplicateLink`.
    pub fn add_link(&mut self, a: impl Into<EndpointId>, b: impl Into<EndpointId>, capacity: f64) -> Result<LinkKey> {
        let link = Link::new(a, b, capacity)?;
        log::debug!("Adding link {}", link);
        self.links.insert(link)
    }

    /// Adds a route over already known links.
    ///
    /// # Errors
    /// `Error::InvalidRoute`, `Error::UnknownLink` or `Error::DuplicateRoute`.
    pub fn add_route(&mut self, waypoints: Vec<EndpointId>) -> Result<RouteKey> {
        let route = Route::build(&self.links, waypoints)?;
        log::debug!("Adding route {} ({})", route, route.endpoints());
        self.routes.insert(route)
    }

    pub fn links(&self) -> &LinkStore {
        &self.links
    }

    pub fn routes(&self) -> &RouteStore {
        &self.routes
    }

    pub fn route(&self, key: RouteKey) -> Option<&Route> {
        self.routes.get(key)
    }

    /// # Errors
    /// `Error::UnknownRoute` if no route connects the endpoints of `pair`.
    pub fn lookup_route(&self, pair: &EndpointPair) -> Result<RouteKey> {
        self.routes.lookup_by_endpoints(pair)
    }

    /// Runs the all-or-nothing reservation of `amount` on the route behind `key`.
    ///
    /// # Errors
    /// `Error::InvalidAmount` for a non-positive or non-finite amount.
    pub fn demand(&mut self, key: RouteKey, amount: f64) -> Result<bool> {
        let route = self.routes.get(key).ok_or_else(|| Error::InvalidInput(format!("unknown route key {:?}", key)))?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { endpoints: route.endpoints().clone(), amount });
        }

        let granted = route.demand(&mut self.links, amount);
        if !granted {
            log::debug!("Route {} cannot carry {}: bottleneck has {} free.", route, amount, route.bottleneck(&self.links));
        }

        Ok(granted)
    }

    /// Gives `amount` back to every link of the route behind `key`.
    ///
    /// # Errors
    /// `Error::CapacityUnderflow` if the amount was never allocated on that route.
    pub fn release(&mut self, key: RouteKey, amount: f64) -> Result<()> {
        let route = self.routes.get(key).ok_or_else(|| Error::InvalidInput(format!("unknown route key {:?}", key)))?;
        route.release(&mut self.links, amount)
    }

    /// Checks `0 <= used <= capacity` on every link.
    pub fn capacity_invariant_holds(&self) -> bool {
        self.links.iter().all(|(_, link)| link.used() >= 0.0 && link.used() <= link.capacity())
    }
}
