pub mod demand;
pub mod ledger;
pub mod reporter;
pub mod simulation;
