use std::fmt;

use crate::domain::network::link::LOAD_TOLERANCE;
use crate::domain::network::link_store::{LinkKey, LinkStore};
use crate::domain::utils::id::{EndpointId, EndpointPair};
use crate::error::{Error, Result};

/// An ordered path of waypoints over existing links.
///
/// A route does not own its links. It keeps the [`LinkKey`]s of the links connecting each pair of
/// consecutive waypoints and every operation is applied against the [`LinkStore`] those keys
/// belong to. All load of a route lives in its links.
#[derive(Debug, Clone)]
pub struct Route {
    waypoints: Vec<EndpointId>,

    /// Links in waypoint order.
    links: Vec<LinkKey>,

    /// Distinct links with the number of times the path crosses them.
    /// A path that crosses a link twice puts twice the amount on it.
    link_usage: Vec<(LinkKey, usize)>,

    /// {first waypoint, last waypoint}
    endpoints: EndpointPair,
}

impl Route {
    /// Resolves every consecutive waypoint pair to a link in `links`.
    ///
    /// # Errors
    /// * `Error::InvalidRoute` for fewer than two waypoints.
    /// * `Error::UnknownLink` if a consecutive pair has no link.
    pub fn build(links: &LinkStore, waypoints: Vec<EndpointId>) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(Error::InvalidRoute(waypoints.len()));
        }

        let route_links = waypoints
            .windows(2)
            .map(|hop| links.key_for(&EndpointPair::new(hop[0].clone(), hop[1].clone())))
            .collect::<Result<Vec<LinkKey>>>()?;

        let mut link_usage: Vec<(LinkKey, usize)> = Vec::with_capacity(route_links.len());
        for key in &route_links {
            match link_usage.iter_mut().find(|(k, _)| k == key) {
                Some((_, count)) => *count += 1,
                None => link_usage.push((*key, 1)),
            }
        }

        let endpoints = EndpointPair::new(waypoints[0].clone(), waypoints[waypoints.len() - 1].clone());

        Ok(Self { waypoints, links: route_links, link_usage, endpoints })
    }

    pub fn endpoints(&self) -> &EndpointPair {
        &self.endpoints
    }

    pub fn links(&self) -> &[LinkKey] {
        &self.links
    }

    /// True iff every link on the path can take `amount` on top of its current load.
    pub fn can_allocate(&self, links: &LinkStore, amount: f64) -> bool {
        self.link_usage.iter().all(|(key, count)| match links.get(*key) {
            Some(link) => link.can_allocate(amount * *count as f64),
            None => {
                log::error!("Route {} refers to a link that is not part of the given store.", self);
                false
            }
        })
    }

    /// Puts `amount` on every link of the path. Only call after [`Route::can_allocate`]
    /// returned true for the same store state.
    pub fn allocate(&self, links: &mut LinkStore, amount: f64) {
        for key in &self.links {
            if let Some(link) = links.get_mut(*key) {
                link.allocate(amount);
            }
        }
    }

    /// All-or-nothing reservation: allocates on every link if all of them have room,
    /// otherwise leaves every link untouched.
    pub fn demand(&self, links: &mut LinkStore, amount: f64) -> bool {
        if !self.can_allocate(links, amount) {
            return false;
        }

        self.allocate(links, amount);
        true
    }

    /// Takes `amount` off every link of the path.
    ///
    /// # Errors
    /// `Error::CapacityUnderflow` if any link holds less than what is released. No link is
    /// changed in that case.
    pub fn release(&self, links: &mut LinkStore, amount: f64) -> Result<()> {
        for (key, count) in &self.link_usage {
            if let Some(link) = links.get(*key) {
                let total = amount * *count as f64;
                if link.used() - total < -LOAD_TOLERANCE {
                    return Err(Error::CapacityUnderflow { endpoints: link.endpoints().clone(), used: link.used(), amount: total });
                }
            }
        }

        for key in &self.links {
            if let Some(link) = links.get_mut(*key) {
                link.release(amount)?;
            }
        }

        Ok(())
    }

    /// Smallest free capacity along the path.
    pub fn bottleneck(&self, links: &LinkStore) -> f64 {
        self.link_usage
            .iter()
            .filter_map(|(key, count)| links.get(*key).map(|link| link.available() / *count as f64))
            .fold(f64::INFINITY, f64::min)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<&str> = self.waypoints.iter().map(EndpointId::as_str).collect();
        write!(f, "{}", path.join("->"))
    }
}
