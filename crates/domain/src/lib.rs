pub mod case;
pub mod document;
pub mod error;
pub mod ports;
pub mod util;
pub mod webhook;

pub type DomainResult<T> = Result<T, error::DomainError>;
