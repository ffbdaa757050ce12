pub mod error;
pub mod trajectory;
pub mod config;
pub mod math;
pub mod model;
pub mod projection;
pub mod metrics;
pub mod pipeline;
pub mod io;

pub use config::{GeneratorConfig, Strategy};
pub use error::{GenError, Result};
pub use math::transition::TransitionMatrix;
pub use model::risk_domain::{DayDomain, RiskBand, RiskDomainTable};
pub use model::guided::GuidedSampler;
pub use model::TrajectorySampler;
pub use projection::{HyperedgeIndexTable, HyperedgeSequences};
pub use trajectory::{LocationId, TrajectoryMatrix, UNKNOWN_LOCATION};
