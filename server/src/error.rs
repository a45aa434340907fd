use comingsoon_api::ErrorResponse;
use log::error;
use rusqlite::ErrorCode;
use std::{convert::Infallible, time::Duration};
use thiserror::Error;
use warp::{
    body::BodyDeserializeError,
    http::StatusCode,
    reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge, Reject, UnsupportedMediaType},
    Rejection, Reply,
};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("leaderboard storage is unavailable: {0}")]
    ConnectionUnavailable(String),
    #[error("leaderboard names must contain at least one visible character")]
    InvalidName,
    #[error("leaderboard storage did not answer within {0:?}")]
    Timeout(Duration),
    #[error("unexpected pool error")]
    Pool {
        #[from]
        source: r2d2::Error,
    },
    #[error("unexpected redis error")]
    Redis {
        #[from]
        source: redis::RedisError,
    },
    #[error("unexpected serde error")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("unexpected sqlite error")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },
}

impl BoardError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, BoardError::Sqlite {
                source: rusqlite::Error::SqliteFailure(e, _),
                ..
            } if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked)
    }

    pub fn is_unavailable(&self) -> bool {
        match self {
            BoardError::ConnectionUnavailable(_) | BoardError::Timeout(_) | BoardError::Pool { .. } => {
                true
            }
            BoardError::Redis { source } => {
                source.is_io_error()
                    || source.is_connection_refusal()
                    || source.is_connection_dropped()
                    || source.is_timeout()
            }
            BoardError::Sqlite { .. } => self.is_retriable(),
            BoardError::InvalidName | BoardError::Serde { .. } => false,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BoardError::InvalidName => StatusCode::BAD_REQUEST,
            e if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self.status_code() {
            StatusCode::SERVICE_UNAVAILABLE => "Storage not available".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR => "Failed to save score".to_string(),
            _ => self.to_string(),
        }
    }
}

impl Reject for BoardError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "not found".to_string();
    } else if let Some(error) = err.find::<BoardError>() {
        code = error.status_code();
        message = error.message();
    } else if let Some(error) = err.find::<BodyDeserializeError>() {
        code = StatusCode::BAD_REQUEST;
        message = error.to_string();
    } else if let Some(_) = err.find::<PayloadTooLarge>() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "payload too large".to_string();
    } else if let Some(_) = err.find::<LengthRequired>() {
        code = StatusCode::LENGTH_REQUIRED;
        message = "content length required".to_string();
    } else if let Some(_) = err.find::<UnsupportedMediaType>() {
        code = StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "leaderboard submissions must be JSON".to_string();
    } else if let Some(_) = err.find::<MethodNotAllowed>() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "method not allowed".to_string();
    } else {
        error!("Unhandled rejection {:?}", err);
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = format!("{:?}", err);
    }

    let json = warp::reply::json(&ErrorResponse { error: message });
    Ok(warp::reply::with_status(json, code))
}
