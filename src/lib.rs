// Unsent - a terminal sanctuary for unspoken feelings
// Library exports

// Core modules
pub mod analysis;
pub mod claude;
pub mod cli;
pub mod config;
pub mod emotion;
pub mod flow;
pub mod journal;
pub mod stats;
