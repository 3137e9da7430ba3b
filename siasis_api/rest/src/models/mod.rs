use serde::Serialize;

pub mod lead;

/// Response envelope shared by every endpoint of the landing page API.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: &'static str,
    #[serde(flatten)]
    pub detail: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &'static str, detail: T) -> Self {
        Self {
            success: true,
            message,
            detail,
        }
    }

    pub fn failure(message: &'static str, detail: T) -> Self {
        Self {
            success: false,
            message,
            detail,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiData<D> {
    pub data: D,
}

#[derive(Debug, Serialize)]
pub struct ApiValidationErrors {
    pub errores: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub error: String,
}
