//! Input normalization and the generic validator dispatcher.
//!
//! Every `validate_as` call walks the same pipeline regardless of type:
//! resolve the class, normalize the input into an instance, check the
//! instance's tag against the requested name, then thread the value
//! through the class's validator chain.

pub mod chain;
pub mod dispatcher;
pub mod normalizer;

pub use chain::{FieldContext, StepFn, StepValue, ValidatorStep};
pub use normalizer::ModelInput;
