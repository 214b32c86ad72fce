//! Unified infrastructure error type.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// The error type returned by the server's fallible startup operations.
///
/// Request-level failures (a missing list, a malformed `todo` parameter) are
/// expressed as HTTP [`Response`](crate::Response) values built from
/// [`TodoError`](crate::todos::TodoError), not as `Error`s. This type surfaces
/// infrastructure failures: binding a port or preparing the data directory.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("data directory {} is unusable: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
