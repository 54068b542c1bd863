pub mod network;
pub mod simulator;
pub mod utils;
