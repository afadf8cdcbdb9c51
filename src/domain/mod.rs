pub mod chart;
pub mod errors;
pub mod indicators;
pub mod logging;
pub mod market_data;
pub mod signals;
pub mod sync;
