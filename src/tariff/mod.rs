pub mod conversion;
mod ordered;
pub mod registry;
pub mod rule;
pub mod set;
pub mod step;

pub use conversion::*;
pub use registry::*;
pub use rule::*;
pub use set::*;
pub use step::*;
