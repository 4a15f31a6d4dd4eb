pub mod adjustment;
pub mod report;
pub mod settings;

pub use adjustment::*;
pub use report::*;
pub use settings::*;
