use thiserror::Error;

/// Errors that can occur while loading tariff data into a registry.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    #[error("Failed to parse tariff configuration JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to read tariff configuration '{path}': {message}")]
    Io { path: String, message: String },

    #[error("City '{city}' declares a service named '{service}', which is reserved for the total")]
    ReservedServiceName { city: String, service: String },

    #[error("City '{city}' declares a service with an empty name")]
    EmptyServiceName { city: String },

    #[error("Service '{service}' is declared more than once for city '{city}'")]
    DuplicateService { city: String, service: String },

    #[error("City '{0}' is declared more than once")]
    DuplicateCity(String),

    #[error("Step '{operator}' is missing its required field '{field}'")]
    MalformedStep {
        operator: String,
        field: &'static str,
    },

    #[error("Unsupported condition '{0}'; expected one of 'gt', 'lt' or 'eq'")]
    InvalidCondition(String),
}

/// Errors that can occur while loading household input data.
#[derive(Error, Debug, Clone)]
pub enum DataError {
    #[error("Failed to read household file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse household JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid household field '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

/// Errors that can occur while building a benchmark report.
#[derive(Error, Debug, Clone)]
pub enum BenchmarkError {
    #[error("City '{0}' is not present in the tariff registry")]
    UnknownCity(String),
}
