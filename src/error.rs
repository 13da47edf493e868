//! Tipos de erro do worker.
//!
//! [`WorkerError`] cobre falhas de infraestrutura ao falar com a fila.
//! [`DispatchError`] cobre falhas de uma chamada HTTP a um target; o texto
//! exibido por ela é gravado como `trace` do job.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single outbound call to a resolved target.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The client rejected the call with a plain message.
    #[error("{0}")]
    Rejected(String),

    /// The target answered with a non-success status.
    #[error("target returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
