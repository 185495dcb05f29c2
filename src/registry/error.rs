/// Errors that can occur during registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("service already registered: {0}")]
    DuplicateService(String),

    #[error("unknown service: {0}")]
    UnknownService(String),
}
