// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The process group.  A fixed number of ranks is wired together
//! once, at startup: rank 0 is the controller, everyone else is a
//! worker.  The wiring is a star; the controller can reach every
//! worker and every worker can reach the controller, but workers
//! cannot reach each other.
//!
//! Each rank has a single inbox.  Frames from one sender arrive in
//! the order they were sent; frames from different senders arrive in
//! whatever order they happen to.

use crossbeam::channel::{unbounded, Receiver, Sender};

use errors::RenderError;
use protocol::Frame;

/// A rank's position in the group.
pub type Rank = usize;

/// The rank that plays the controller.
pub const CONTROLLER: Rank = 0;

/// A frame, and who sent it.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// The sending rank.
    pub source: Rank,
    /// What was sent.
    pub frame: Frame,
}

/// The two operations a rank needs from its transport: a blocking
/// send to a named peer, and a blocking receive from whoever speaks
/// next.  Neither has a timeout.
pub trait Communicator {
    /// This rank.
    fn rank(&self) -> Rank;

    /// The number of ranks in the group, controller included.
    fn size(&self) -> usize;

    /// Deliver a frame to `dest`.
    fn send(&self, dest: Rank, frame: Frame) -> Result<(), RenderError>;

    /// Wait for the next frame from any peer.
    fn recv(&self) -> Result<Envelope, RenderError>;
}

/// One rank's end of the group.
#[derive(Debug)]
pub struct Link {
    rank: Rank,
    size: usize,
    routes: Vec<Option<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
}

/// Wires up a group of `size` ranks, and returns their links in rank
/// order.  A group needs a controller and at least one worker.
pub fn establish(size: usize) -> Result<Vec<Link>, RenderError> {
    if size < 2 {
        return Err(RenderError::Config(format!(
            "A process group needs at least 2 ranks, not {}.",
            size
        )));
    }

    let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();

    let links = receivers
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| {
            let routes = (0..size)
                .map(|dest| {
                    let reachable = if rank == CONTROLLER {
                        dest != CONTROLLER
                    } else {
                        dest == CONTROLLER
                    };
                    if reachable {
                        Some(senders[dest].clone())
                    } else {
                        None
                    }
                })
                .collect();
            Link {
                rank,
                size,
                routes,
                inbox,
            }
        })
        .collect();

    // Only the links hold senders from here on, so a rank whose
    // peers have all gone away sees its inbox disconnect.
    drop(senders);
    Ok(links)
}

impl Communicator for Link {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: Rank, frame: Frame) -> Result<(), RenderError> {
        let route = match self.routes.get(dest) {
            Some(&Some(ref route)) => route,
            _ => {
                return Err(RenderError::transport(
                    self.rank,
                    format!("no route to rank {}", dest),
                ))
            }
        };
        route
            .send(Envelope {
                source: self.rank,
                frame,
            })
            .map_err(|_| RenderError::transport(self.rank, format!("rank {} has disconnected", dest)))
    }

    fn recv(&self) -> Result<Envelope, RenderError> {
        self.inbox
            .recv()
            .map_err(|_| RenderError::transport(self.rank, "every peer has disconnected"))
    }
}
