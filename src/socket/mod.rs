//! Connections and the transport seam.
//!
//! - [`transport`]: the [`Transport`](transport::Transport) trait and the default HTTP/1.1 transport
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`stream`]: the connected socket type

pub mod connectjob;
pub mod stream;
pub mod transport;
