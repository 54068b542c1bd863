use std::collections::HashMap;
use std::fmt;

use crate::api::network_dto::SimulationDto;
use crate::domain::network::topology::NetworkTopology;
use crate::domain::simulator::demand::{Demand, Tick};
use crate::domain::simulator::ledger::{Allocation, Ledger};
use crate::domain::simulator::reporter::Reporter;
use crate::domain::utils::id::EndpointPair;
use crate::error::Result;

/// Discrete time simulation of circuit demands over a fixed topology.
///
/// Every tick from `0` to `duration` (both inclusive) runs two phases in this order:
/// 1. **Release**: allocations whose expiry equals the current tick give their amount back.
/// 2. **Allocate**: demands starting at the current tick are attempted in input order.
///
/// An allocation granted in tick `t` therefore cannot be released before the release phase of a
/// later tick, and capacity freed in tick `t` is available to demands starting in tick `t`.
#[derive(Debug)]
pub struct Simulation {
    topology: NetworkTopology,
    demands: Vec<Demand>,

    /// Demand indices per start tick, in input order.
    schedule: HashMap<Tick, Vec<usize>>,

    ledger: Ledger,
    duration: Tick,
    time: Tick,
    finished: bool,
    stats: RunStats,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RunStats {
    granted: usize,
    rejected: usize,
    released: usize,
}

impl Simulation {
    /// Creates a simulation over already bound demands.
    pub fn new(topology: NetworkTopology, duration: Tick, demands: Vec<Demand>) -> Self {
        let mut schedule: HashMap<Tick, Vec<usize>> = HashMap::new();

        for (index, demand) in demands.iter().enumerate() {
            if demand.start_time > duration {
                log::warn!(
                    "Demand on {} starts at {} after the simulation ends at {}; it will never be attempted.",
                    demand.endpoints,
                    demand.start_time,
                    duration
                );
            }
            schedule.entry(demand.start_time).or_default().push(index);
        }

        log::info!("Simulation prepared: {} demands over {} ticks.", demands.len(), duration.saturating_add(1));

        Self { topology, demands, schedule, ledger: Ledger::new(), duration, time: 0, finished: false, stats: RunStats::default() }
    }

    /// Binds every demand of `dto` to its route before the first tick.
    ///
    /// # Errors
    /// The first demand that fails [`Demand::from_dto`]; nothing is simulated in that case.
    pub fn from_dto(topology: NetworkTopology, dto: &SimulationDto) -> Result<Self> {
        let demands = dto.demands.iter().map(|demand| Demand::from_dto(&topology, demand)).collect::<Result<Vec<Demand>>>()?;

        Ok(Self::new(topology, dto.duration, demands))
    }

    /// Runs all remaining ticks and summarizes the run.
    ///
    /// # Errors
    /// `Error::CapacityUnderflow` if a release would drive a link below zero.
    pub fn run<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<SimulationReport> {
        while !self.finished {
            self.step(reporter)?;
        }

        Ok(self.report())
    }

    /// Processes the current tick and advances the clock. Does nothing once `duration` was processed.
    ///
    /// # Errors
    /// `Error::CapacityUnderflow` if a release would drive a link below zero. Rejected demands
    /// are not errors.
    pub fn step<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        log::trace!("Tick {} / {}", self.time, self.duration);

        self.release_expired(reporter)?;
        self.allocate_starting(reporter)?;

        if self.time == self.duration {
            self.finished = true;
        } else {
            self.time += 1;
        }

        Ok(())
    }

    /// An allocation leaves the ledger only after its load left the links. If a release fails, it
    /// and every later allocation of this tick stay recorded.
    fn release_expired<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<()> {
        for key in self.ledger.expiring(self.time) {
            let Some((route, amount)) = self.ledger.get(key).map(|allocation| (allocation.route, allocation.amount)) else {
                continue;
            };

            self.topology.release(route, amount)?;

            if let Some(allocation) = self.ledger.remove(key) {
                self.stats.released += 1;
                reporter.on_release(&allocation.endpoints, self.time);
            }
        }

        Ok(())
    }

    fn allocate_starting<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> Result<()> {
        let Some(starting) = self.schedule.get(&self.time) else {
            return Ok(());
        };

        for &index in starting {
            let demand = &self.demands[index];
            let succeeded = self.topology.demand(demand.route, demand.amount)?;

            if succeeded {
                self.ledger.record(demand.route, demand.endpoints.clone(), demand.amount, demand.end_time);
                self.stats.granted += 1;
            } else {
                self.stats.rejected += 1;
            }

            reporter.on_allocation_attempt(&demand.endpoints, self.time, succeeded);
        }

        Ok(())
    }

    /// The clock: the tick that the next [`Simulation::step`] processes.
    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn topology(&self) -> &NetworkTopology {
        &self.topology
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Summary of the run so far.
    pub fn report(&self) -> SimulationReport {
        let ticks = if self.finished { self.duration.saturating_add(1) } else { self.time };

        SimulationReport {
            ticks,
            granted: self.stats.granted,
            rejected: self.stats.rejected,
            released: self.stats.released,
            outstanding: self.ledger.active().into_iter().cloned().collect(),
            links: self
                .topology
                .links()
                .iter()
                .map(|(_, link)| LinkUtilization {
                    endpoints: link.endpoints().clone(),
                    used: link.used(),
                    capacity: link.capacity(),
                    utilization: link.utilization(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkUtilization {
    pub endpoints: EndpointPair,
    pub used: f64,
    pub capacity: f64,

    /// `used / capacity`, 0.0 for links without capacity.
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    /// Number of ticks processed.
    pub ticks: Tick,
    pub granted: usize,
    pub rejected: usize,
    pub released: usize,

    /// Allocations still held when the run ended, in grant order.
    pub outstanding: Vec<Allocation>,

    /// Final load of every link.
    pub links: Vec<LinkUtilization>,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticks processed:         {}", self.ticks)?;
        writeln!(f, "Demands granted:         {}", self.granted)?;
        writeln!(f, "Demands rejected:        {}", self.rejected)?;
        writeln!(f, "Allocations released:    {}", self.released)?;
        writeln!(f, "Allocations outstanding: {}", self.outstanding.len())?;

        for allocation in &self.outstanding {
            writeln!(f, "  {} amount {} (expires at {})", allocation.endpoints, allocation.amount, allocation.expiry)?;
        }

        writeln!(f, "Links:")?;
        for link in &self.links {
            writeln!(f, "  <Link {} {}/{}> {:.1}%", link.endpoints, link.used, link.capacity, link.utilization * 100.0)?;
        }

        Ok(())
    }
}
