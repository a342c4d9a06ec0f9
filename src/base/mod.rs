//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): every failure the pipeline can surface,
//!   with Chromium-style numeric codes and an [`ErrorKind`](neterror::ErrorKind)
//! - [`context`]: classification of socket IO errors into `NetError`s

pub mod context;
pub mod neterror;

#[cfg(test)]
mod tests;
