use http::StatusCode;
use tours_db::DbError;
use tours_query::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ToursHttpError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("invalid request body: {0}")]
    Body(String),

    #[error("no tour found with id {0}")]
    NotFound(String),

    #[error("can't find {0} on this server")]
    RouteNotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToursHttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ToursHttpError::Validation(_) | ToursHttpError::Body(_) => StatusCode::BAD_REQUEST,
            ToursHttpError::NotFound(_) | ToursHttpError::RouteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ToursHttpError::Db(DbError::DuplicateId(_) | DbError::InvalidDocument(_)) => {
                StatusCode::BAD_REQUEST
            }
            ToursHttpError::Db(_) | ToursHttpError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Expected failures caused by the request, safe to report verbatim.
    pub fn is_operational(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Envelope status: `fail` for client errors, `error` otherwise.
    pub fn status_label(&self) -> &'static str {
        if self.is_operational() { "fail" } else { "error" }
    }
}
