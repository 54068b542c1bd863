use std::path::Path;

use crate::api::network_dto::{NetworkDto, SimulationDto};
use crate::domain::network::topology::NetworkTopology;
use crate::domain::simulator::reporter::Reporter;
use crate::domain::simulator::simulation::{Simulation, SimulationReport};
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Reads and parses the input document at `file_path`.
pub fn load_input(file_path: impl AsRef<Path>) -> Result<NetworkDto> {
    let dto: NetworkDto = parse_json_file(file_path.as_ref())?;
    log::info!("JSON file '{}' parsed successfully.", file_path.as_ref().display());

    Ok(dto)
}

/// Builds the topology and binds every demand to its route.
///
/// All lookup and validation errors surface here, before any tick is simulated. A document
/// without a simulation block yields a zero-length run without demands.
pub fn prepare_simulation(dto: &NetworkDto) -> Result<Simulation> {
    let topology = NetworkTopology::try_from(dto)?;

    let empty = SimulationDto { duration: 0, demands: Vec::new() };
    let simulation = Simulation::from_dto(topology, dto.simulation.as_ref().unwrap_or(&empty))?;
    log::info!("Simulation constructed successfully.");

    Ok(simulation)
}

/// Loads `file_path`, runs the whole simulation and returns its summary.
pub fn run_from_file<R: Reporter + ?Sized>(file_path: impl AsRef<Path>, reporter: &mut R) -> Result<SimulationReport> {
    let dto = load_input(file_path)?;
    let mut simulation = prepare_simulation(&dto)?;

    simulation.run(reporter)
}
