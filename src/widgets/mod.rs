pub mod bets;
pub mod controls;
pub mod debug;
pub mod detail;
pub mod grid;
pub mod pagination;
pub mod strategies;
