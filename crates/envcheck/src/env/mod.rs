//! Environment traits and wrappers.
//!
//! Provides the `Environment` capability trait that every checked environment
//! implements, the typed `StepResult` decoded from raw step tuples, and the
//! `TimeLimit` wrapper applied by the registry.

mod traits;
mod wrappers;

pub use traits::{
    decode_info, reset_value, unpack, Environment, GoalEnv, Info, Metadata, RenderFrame,
    StepResult,
};
pub use wrappers::TimeLimit;
