use colored::Colorize;
use std::io::Write;

use crate::domain::simulator::demand::Tick;
use crate::domain::utils::id::EndpointPair;
use crate::error::{Error, Result};

/// Receives the two notifications a simulation emits.
pub trait Reporter {
    /// Called for every demand attempted in a tick, granted or not.
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool);

    /// Called for every allocation released in a tick.
    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        (**self).on_allocation_attempt(endpoints, time, succeeded);
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        (**self).on_release(endpoints, time);
    }
}

/// Fan-out: forwards every notification to both reporters.
impl<A: Reporter, B: Reporter> Reporter for (A, B) {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        self.0.on_allocation_attempt(endpoints, time, succeeded);
        self.1.on_allocation_attempt(endpoints, time, succeeded);
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        self.0.on_release(endpoints, time);
        self.1.on_release(endpoints, time);
    }
}

impl<R: Reporter> Reporter for Option<R> {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        if let Some(reporter) = self {
            reporter.on_allocation_attempt(endpoints, time, succeeded);
        }
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        if let Some(reporter) = self {
            reporter.on_release(endpoints, time);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    AllocationAttempt { endpoints: EndpointPair, time: Tick, succeeded: bool },
    Release { endpoints: EndpointPair, time: Tick },
}

impl SimulationEvent {
    pub fn time(&self) -> Tick {
        match self {
            SimulationEvent::AllocationAttempt { time, .. } | SimulationEvent::Release { time, .. } => *time,
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<SimulationEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, time: Tick) -> impl Iterator<Item = &SimulationEvent> {
        self.events.iter().filter(move |event| event.time() == time)
    }
}

impl Reporter for EventRecorder {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        self.events.push(SimulationEvent::AllocationAttempt { endpoints: endpoints.clone(), time, succeeded });
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        self.events.push(SimulationEvent::Release { endpoints: endpoints.clone(), time });
    }
}

/// Routes events into the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        if succeeded {
            log::info!("[t={}] Allocated circuit {}", time, endpoints);
        } else {
            log::warn!("[t={}] Allocation of circuit {} rejected: not enough capacity", time, endpoints);
        }
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        log::info!("[t={}] Released circuit {}", time, endpoints);
    }
}

/// Prints one colored line per event.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: String) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::error!("Console reporter failed to write event: {}", e);
        }
    }
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        let outcome = if succeeded { "ALLOCATED".green() } else { "REJECTED".red() };
        self.write_line(format!("[t={}] {} {}", time, outcome, endpoints));
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        self.write_line(format!("[t={}] {} {}", time, "RELEASED".blue(), endpoints));
    }
}

/// Column order of [`CsvReporter`] output.
pub const CSV_HEADERS: [&str; 5] = ["Time", "Event", "Start", "End", "Succeeded"];

/// Writes events as `;` separated CSV rows.
pub struct CsvReporter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReporter<W> {
    /// # Errors
    /// `Error::Csv` if the header cannot be written.
    pub fn new(out: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
        writer.write_record(CSV_HEADERS)?;

        Ok(Self { writer })
    }

    /// Flushes buffered rows and hands back the underlying writer.
    ///
    /// # Errors
    /// `Error::Io` if flushing fails.
    pub fn finish(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| Error::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }

    fn write_row(&mut self, time: Tick, event: &str, endpoints: &EndpointPair, succeeded: &str) {
        let time = time.to_string();
        let row = [time.as_str(), event, endpoints.low().as_str(), endpoints.high().as_str(), succeeded];

        if let Err(e) = self.writer.write_record(row) {
            log::error!("Stats Error: Failed to write record: {}", e);
        }
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn on_allocation_attempt(&mut self, endpoints: &EndpointPair, time: Tick, succeeded: bool) {
        self.write_row(time, "Allocate", endpoints, if succeeded { "true" } else { "false" });
    }

    fn on_release(&mut self, endpoints: &EndpointPair, time: Tick) {
        self.write_row(time, "Release", endpoints, "NA");
    }
}
