mod model;

pub use model::Household;
