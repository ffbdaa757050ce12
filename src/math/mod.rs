pub mod sampling;
pub mod transition;
