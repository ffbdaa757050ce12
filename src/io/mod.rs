pub mod cache;
pub mod hyperedge;
pub mod risk;
pub mod run_log;
pub mod synth;
pub mod trajectory;
