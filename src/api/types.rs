use serde::Serialize;

/// Standard success envelope: `{ "message": ..., "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Pagination numbers attached to list responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// Success envelope for paginated lists.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub message: String,
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(message: impl Into<String>, data: Vec<T>, meta: PageMeta) -> Self {
        Self {
            message: message.into(),
            data,
            meta,
        }
    }
}

/// Error envelope: `{ "status_code": ..., "message": ..., "errors": [...] }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub errors: Vec<String>,
}
