//! Exception family of the dynamic-graph manager.
//!
//! Every failure carries an [`ErrorCode`] and a message. Messages can be built
//! from a base text plus formatted arguments, see [`exception!`].

#[macro_use]
mod macros;

pub mod buffer;
pub mod code;
pub mod debug;
pub mod error;

pub use buffer::{BoundedBuffer, FormatPolicy, Rendered};
pub use code::{
    Category, DynamicError, ErrorCode, FactoryError, FeatureError, SignalError, TaskError,
    ToolsError, YamlCppError,
};
pub use debug::Verbosity;
pub use error::Exception;
