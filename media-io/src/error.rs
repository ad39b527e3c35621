use std::{borrow::Cow, io};

use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("Open failed: {0}")]
    OpenFailed(Cow<'static, str>),
    #[error("Unsupported: {0}")]
    Unsupported(Cow<'static, str>),
    #[error("Not seekable: {0}")]
    NotSeekable(Cow<'static, str>),
    #[error("I/O failure: {0}")]
    IoFailure(Cow<'static, str>),
    #[error("Already closed: {0}")]
    AlreadyClosed(Cow<'static, str>),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoFailure(err.to_string().into())
    }
}

#[macro_export]
macro_rules! open_failed_error {
    ($param:literal) => {
        $crate::error::Error::OpenFailed($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::OpenFailed(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! unsupported_error {
    ($param:literal) => {
        $crate::error::Error::Unsupported($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::Unsupported(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! not_seekable_error {
    ($param:literal) => {
        $crate::error::Error::NotSeekable($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::NotSeekable(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! io_failure_error {
    ($param:literal) => {
        $crate::error::Error::IoFailure($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::IoFailure(format!("{:?}", $param).into())
    };
}

#[macro_export]
macro_rules! already_closed_error {
    ($param:literal) => {
        $crate::error::Error::AlreadyClosed($param.into())
    };
    ($param:expr) => {
        $crate::error::Error::AlreadyClosed(format!("{:?}", $param).into())
    };
}
