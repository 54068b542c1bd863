use serde::Deserialize;

use crate::error::{Error, Result};

/// Root of the input document: the topology plus an optional simulation block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkDto {
    pub links: Vec<LinkDto>,

    /// Every route as its ordered list of waypoints.
    pub possible_circuits: Vec<Vec<String>>,

    #[serde(default)]
    pub simulation: Option<SimulationDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDto {
    pub points: Vec<String>,
    pub capacity: f64,
}

impl LinkDto {
    /// # Errors
    /// `Error::InvalidInput` unless `points` holds exactly two endpoints.
    pub fn endpoints(&self) -> Result<(&str, &str)> {
        match self.points.as_slice() {
            [a, b] => Ok((a.as_str(), b.as_str())),
            other => Err(Error::InvalidInput(format!("a link needs exactly two points, got {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationDto {
    pub duration: u64,
    pub demands: Vec<DemandDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DemandDto {
    pub amount: f64,
    pub end_points: Vec<String>,
    pub start_time: u64,
    pub end_time: u64,
}

impl DemandDto {
    /// # Errors
    /// `Error::InvalidInput` unless `end-points` holds exactly two endpoints.
    pub fn endpoints(&self) -> Result<(&str, &str)> {
        match self.end_points.as_slice() {
            [a, b] => Ok((a.as_str(), b.as_str())),
            other => Err(Error::InvalidInput(format!("a demand needs exactly two end-points, got {:?}", other))),
        }
    }
}
