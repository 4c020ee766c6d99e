/// Result alias used across the crate.
pub type FramepaceResult<T> = Result<T, FramepaceError>;

/// Errors surfaced to the host.
///
/// Configuration values are clamped rather than rejected, and sequencing violations (such as a
/// transition without a preceding freeze) are silent no-ops, so neither has a variant here.
#[derive(thiserror::Error, Debug)]
pub enum FramepaceError {
    /// A configuration document could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A GPU-side resource (texture, buffer) could not be created. Fatal for the session.
    #[error("resource error: {0}")]
    Resource(String),

    /// The device rejected a command or reported loss.
    #[error("device error: {0}")]
    Device(String),

    /// The render thread is gone or failed to start.
    #[error("worker error: {0}")]
    Worker(String),

    /// The host invoked an operation this core does not provide.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Image decoding or encoding failed (transition masks, snapshots).
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramepaceError {
    /// Build a [`FramepaceError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FramepaceError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`FramepaceError::Device`].
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`FramepaceError::Worker`].
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Build a [`FramepaceError::NotImplemented`].
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
