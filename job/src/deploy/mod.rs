//! Deploy status tracking

pub mod fsm;
pub mod report;
pub mod terminal;
