// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the error type used throughout the library.
//! Running out of time, nodes or iterations is *not* an error: it is reported
//! as the `Reason` of a `Completion`.

use crate::RelaxationStatus;

/// This enumeration groups the kinds of errors that may occur when setting up
/// or running a solver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user provided an invalid configuration (bad CLI argument, out of
    /// range parameter, unparsable boolean, ...)
    #[error("configuration error: {0}")]
    Configuration(String),
    /// An instance file could not be understood
    #[error("instance format error: {0}")]
    InstanceFormat(String),
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// A formulation was used inconsistently (e.g. a constraint referencing a
    /// variable that was never declared)
    #[error("model error: {0}")]
    Model(String),
    /// The relaxation solver failed on a node where the failure cannot be
    /// recovered from (typically the root node)
    #[error("solver error: {context} ended with status {status:?}")]
    Solver { status: RelaxationStatus, context: String },
    /// Some algorithmic invariant of the reformulation or of the pricing was
    /// broken. This denotes a bug and is never silently tolerated.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// Returns true iff the error may be recovered from by pruning the node
    /// which caused it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Solver { .. })
    }
}
