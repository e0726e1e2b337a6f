// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can fail.  All of them are fatal: nothing in
//! the scheduler retries, and no image is written once one of these
//! has been raised.

use failure::Fail;

use transport::Rank;

/// The error type shared by the controller, the workers, the
/// transport, and the image writer.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The requested render cannot be carried out as described.
    /// Raised before any work is handed out.
    #[fail(display = "configuration error: {}", _0)]
    Config(String),

    /// A message could not be delivered or received.
    #[fail(display = "transport error at rank {}: {}", rank, reason)]
    Transport {
        /// The rank that observed the failure.
        rank: Rank,
        /// What went wrong.
        reason: String,
    },

    /// A peer sent something the receiving rank cannot interpret.
    #[fail(display = "protocol violation at rank {}: {}", rank, reason)]
    Protocol {
        /// The rank that received the bad message.
        rank: Rank,
        /// What was wrong with it.
        reason: String,
    },

    /// The thread running a rank panicked.
    #[fail(display = "rank {} panicked", _0)]
    RankPanicked(Rank),

    /// The finished image could not be encoded or written.
    #[fail(display = "could not write image: {}", _0)]
    Output(String),
}

impl RenderError {
    /// Shorthand for a `Transport` error.
    pub fn transport<S: Into<String>>(rank: Rank, reason: S) -> RenderError {
        RenderError::Transport {
            rank,
            reason: reason.into(),
        }
    }

    /// Shorthand for a `Protocol` error.
    pub fn protocol<S: Into<String>>(rank: Rank, reason: S) -> RenderError {
        RenderError::Protocol {
            rank,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_rank() {
        let e = RenderError::protocol(3, "unknown tag 9");
        assert_eq!(e.to_string(), "protocol violation at rank 3: unknown tag 9");
        let e = RenderError::transport(0, "rank 2 has disconnected");
        assert_eq!(e.to_string(), "transport error at rank 0: rank 2 has disconnected");
    }
}
