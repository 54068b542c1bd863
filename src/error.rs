use thiserror::Error;

use crate::domain::utils::id::EndpointPair;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse network JSON: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input document: {0}")]
    InvalidInput(String),

    #[error("No such link: {0}")]
    UnknownLink(EndpointPair),

    #[error("No such route: {0}")]
    UnknownRoute(EndpointPair),

    #[error("Link {0} is defined more than once")]
    DuplicateLink(EndpointPair),

    #[error("Route {0} is defined more than once")]
    DuplicateRoute(EndpointPair),

    #[error("Route must have at least two waypoints, got {0}")]
    InvalidRoute(usize),

    #[error("Link {endpoints} has invalid capacity {capacity}")]
    InvalidCapacity { endpoints: EndpointPair, capacity: f64 },

    #[error("Demand on {endpoints} has invalid amount {amount}")]
    InvalidAmount { endpoints: EndpointPair, amount: f64 },

    #[error("Demand on {endpoints} ends at {end_time} before it starts at {start_time}")]
    InvalidDemandWindow { endpoints: EndpointPair, start_time: u64, end_time: u64 },

    #[error("Releasing {amount} from link {endpoints} would leave a negative load (used: {used})")]
    CapacityUnderflow { endpoints: EndpointPair, used: f64, amount: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
