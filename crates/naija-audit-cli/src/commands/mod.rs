pub mod classify;
pub mod compliance;
pub mod evaluate;
pub mod risk;
pub mod sampling;
