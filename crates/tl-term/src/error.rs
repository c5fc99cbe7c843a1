// SPDX-License-Identifier: MIT
//
// Error types for display selection, painting, and backend I/O.
//
// Out-of-range buffer access is not here on purpose: it is a precondition
// violation and panics at the call site. Termination of the run loop is
// not an error either; it travels through `Flow::Stop`.

use std::io;

use thiserror::Error;

/// Errors surfaced by the toolkit.
#[derive(Error, Debug)]
pub enum Error {
    /// The display selector named no known backend.
    #[error("unsupported display type: {0:?}")]
    UnsupportedDisplay(String),

    /// The real terminal backend cannot run here (no TTY, no size).
    ///
    /// [`open_display`](crate::display::open_display) recovers from this
    /// by falling back to the line backend.
    #[error("terminal unavailable: {0}")]
    TerminalUnavailable(String),

    /// A painting primitive received input it cannot handle.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias using the toolkit [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
