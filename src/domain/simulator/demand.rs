use crate::api::network_dto::DemandDto;
use crate::domain::network::route_store::RouteKey;
use crate::domain::network::topology::NetworkTopology;
use crate::domain::utils::id::EndpointPair;
use crate::error::{Error, Result};

/// One discrete unit of simulated time.
pub type Tick = u64;

/// A demand request bound to the route it targets.
///
/// The allocation, if granted, occupies the route for the ticks `[start_time, end_time)`: it is
/// attempted in the tick equal to `start_time` and released in the tick equal to `end_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Demand {
    pub route: RouteKey,
    pub endpoints: EndpointPair,
    pub amount: f64,
    pub start_time: Tick,
    pub end_time: Tick,
}

impl Demand {
    /// Validates a demand and resolves its route in `topology`.
    ///
    /// # Errors
    /// * `Error::UnknownRoute` if no route connects `endpoints`.
    /// * `Error::InvalidAmount` for a non-positive or non-finite amount.
    /// * `Error::InvalidDemandWindow` if `end_time < start_time`.
    pub fn bind(topology: &NetworkTopology, endpoints: EndpointPair, amount: f64, start_time: Tick, end_time: Tick) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { endpoints, amount });
        }

        if end_time < start_time {
            return Err(Error::InvalidDemandWindow { endpoints, start_time, end_time });
        }

        let route = topology.lookup_route(&endpoints)?;

        Ok(Self { route, endpoints, amount, start_time, end_time })
    }

    /// # Errors
    /// See [`Demand::bind`]; additionally `Error::InvalidInput` for a malformed endpoint list.
    pub fn from_dto(topology: &NetworkTopology, dto: &DemandDto) -> Result<Self> {
        let (a, b) = dto.endpoints()?;
        Self::bind(topology, EndpointPair::new(a, b), dto.amount, dto.start_time, dto.end_time)
    }
}
