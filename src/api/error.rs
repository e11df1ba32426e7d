use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use std::{borrow::Cow, fmt};

use crate::ENV;

/// Which kind of edge (or directory entry) an error talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    FriendshipRequest,
    Friendship,
    Follow,
    Profile,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationKind::FriendshipRequest => "Friendship request",
            RelationKind::Friendship => "Friendship",
            RelationKind::Follow => "Follow",
            RelationKind::Profile => "Profile",
        };
        f.write_str(name)
    }
}

pub mod codes {
    pub const FRIENDSHIP_REQUEST_EXISTS: u16 = 5001;
    pub const ALREADY_FRIENDS: u16 = 5002;
    pub const SELF_FRIENDSHIP: u16 = 5003;
    pub const FRIENDSHIP_MISSING: u16 = 5004;
    pub const FOLLOW_EXISTS: u16 = 6001;
    pub const FOLLOW_MISSING: u16 = 6002;
    pub const SELF_FOLLOW: u16 = 6003;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Refused ({code}): {message}")]
    Refused { code: u16, message: Cow<'static, str> },
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: Cow<'static, str>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn refused(code: u16, msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Refused { code, message: msg.into() }
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) | Error::Refused { .. } => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        res.insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, ENV.frontend_url.as_str()));
        res.insert_header((header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"));

        match self {
            Error::Refused { code, message } => {
                res.json(ErrorBody { code: Some(*code), message: message.clone() })
            }
            Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Unauthorized(msg)
            | Error::BadRequest(msg) => res.json(ErrorBody { code: None, message: msg.clone() }),
            Error::InternalServer => {
                res.json(ErrorBody { code: None, message: "Internal Server Error".into() })
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Migration Error")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Constraint Violation: {0:?}")]
    Violation(Option<DbErrorMeta>),
    // relationship errors
    #[error("{0} would relate a profile to itself")]
    SelfRelation(RelationKind),
    #[error("{0} already exists")]
    AlreadyExists(RelationKind),
    #[error("Profiles are already friends")]
    AlreadyFriends,
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

fn conflict_message(meta: &Option<DbErrorMeta>) -> Cow<'static, str> {
    let Some(constraint) = meta.as_ref().and_then(|m| m.constraint.as_deref()) else {
        return "Duplicate value".into();
    };

    // profiles_username_key -> username
    let field = constraint
        .strip_suffix("_key")
        .unwrap_or(constraint)
        .split('_')
        .next_back()
        .unwrap_or("value");

    let mut chars = field.chars();
    let field = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Value".to_string(),
    };

    format!("{field} already exists").into()
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::NotFound(msg) => Error::NotFound(msg),
            SystemError::Conflict(meta) => {
                if let Some(meta) = &meta {
                    log::debug!(
                        "Conflict [{}]: {}",
                        meta.code.as_deref().unwrap_or("-"),
                        meta.message
                    );
                }
                Error::Conflict(conflict_message(&meta))
            }
            SystemError::AlreadyExists(kind) => match kind {
                RelationKind::FriendshipRequest => {
                    Error::refused(codes::FRIENDSHIP_REQUEST_EXISTS, "Friendship request already exist")
                }
                RelationKind::Friendship => {
                    Error::refused(codes::ALREADY_FRIENDS, "Friendship already exist")
                }
                RelationKind::Follow => Error::refused(codes::FOLLOW_EXISTS, "Follow already exist"),
                RelationKind::Profile => Error::Conflict("Username already exists".into()),
            },
            SystemError::AlreadyFriends => {
                Error::refused(codes::ALREADY_FRIENDS, "You are already friends")
            }
            SystemError::SelfRelation(kind) => match kind {
                RelationKind::FriendshipRequest | RelationKind::Friendship => {
                    Error::refused(codes::SELF_FRIENDSHIP, "You cannot be friends with yourself")
                }
                RelationKind::Follow => Error::refused(codes::SELF_FOLLOW, "You cannot follow yourself"),
                RelationKind::Profile => Error::bad_request("Invalid profile reference"),
            },
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let meta = || {
                Some(DbErrorMeta {
                    code: db_err.code().map(|s| s.to_string()),
                    constraint: db_err.constraint().map(|s| s.to_string()),
                    message: db_err.message().to_string(),
                })
            };
            match db_err.code().as_deref() {
                Some("23505") => {
                    log::debug!("Unique violation: {:?}", db_err.constraint());
                    return SystemError::Conflict(meta());
                }
                Some("23514") => {
                    log::debug!("Check violation: {:?}", db_err.constraint());
                    return SystemError::Violation(meta());
                }
                Some("23503") => {
                    return SystemError::NotFound("Referenced profile not found".into());
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        log::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Same shape Postgres reports for SQLSTATE 23505.
    pub fn unique_violation(constraint: &str) -> Self {
        Self::Conflict(Some(DbErrorMeta {
            code: Some("23505".to_string()),
            constraint: Some(constraint.to_string()),
            message: format!("duplicate key value violates unique constraint \"{constraint}\""),
        }))
    }

    /// Same shape Postgres reports for SQLSTATE 23514.
    pub fn check_violation(constraint: &str) -> Self {
        Self::Violation(Some(DbErrorMeta {
            code: Some("23514".to_string()),
            constraint: Some(constraint.to_string()),
            message: format!("new row violates check constraint \"{constraint}\""),
        }))
    }

    pub fn violates(&self, constraint: &str) -> bool {
        match self {
            SystemError::Conflict(Some(meta)) | SystemError::Violation(Some(meta)) => {
                meta.constraint.as_deref() == Some(constraint)
            }
            _ => false,
        }
    }
}
