// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod logging;
pub mod telemetry;
pub mod template;
pub mod validation;
pub mod yaml;

pub use telemetry::{OperationTimer, PerformanceMetrics};
pub use template::FileTemplate;
pub use validation::Validator;
pub use yaml::{parse_yaml, to_yaml_string};
