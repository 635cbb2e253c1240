#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("insufficient points: need {required}, have {balance}")]
    InsufficientPoints { required: i64, balance: i64 },

    #[error("item is out of stock")]
    OutOfStock,

    #[error("write conflict")]
    Conflict,

    #[error("permission denied")]
    PermissionDenied,

    #[error("already checked in today")]
    AlreadyCheckedIn,

    #[error("raffle has no participants")]
    EmptyRaffle,

    #[error("raffle is not open")]
    RaffleClosed,

    #[error("raffle winner already drawn")]
    AlreadyDrawn,

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Store(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Store(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Store(format!($fmt, $($arg)*)))
    };
}
