use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackdropError>;

/// Errors raised while building or driving the backdrop and its collaborators
#[derive(Debug, Error)]
pub enum BackdropError {
    /// No drawing surface is registered under the requested identifier
    #[error("drawing surface `{0}` not found")]
    SurfaceNotFound(String),

    /// Adapter or device negotiation failed
    #[error("gpu initialization failed: {0}")]
    Gpu(String),

    /// Surface creation, configuration or presentation failed
    #[error("surface error: {0}")]
    Surface(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Contact form rejected; the message is shown to the visitor as-is
    #[error("{0}")]
    Contact(String),
}

impl From<wgpu::CreateSurfaceError> for BackdropError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(err.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for BackdropError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        Self::Gpu(err.to_string())
    }
}

impl From<wgpu::SurfaceError> for BackdropError {
    fn from(err: wgpu::SurfaceError) -> Self {
        Self::Surface(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_not_found_names_the_identifier() {
        let err = BackdropError::SurfaceNotFound("particle-canvas".into());
        assert_eq!(err.to_string(), "drawing surface `particle-canvas` not found");
    }

    #[test]
    fn contact_error_displays_message_verbatim() {
        let err = BackdropError::Contact("Please fill in all fields.".into());
        assert_eq!(err.to_string(), "Please fill in all fields.");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BackdropError = io.into();
        assert!(matches!(err, BackdropError::Io(_)));
    }
}
