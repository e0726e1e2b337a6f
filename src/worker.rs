// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The worker loop.  A worker owns nothing but a borrowed
//! configuration: it waits for the controller to name a band of
//! rows, computes every pixel in that band, ships the lot back, and
//! waits again, until it is told to finish.

use config::RenderConfig;
use errors::RenderError;
use kernel::escape_time;
use planes::Pixel;
use protocol::{Message, Triple};
use transport::{Communicator, Rank, CONTROLLER};

/// Computes every pixel of the band starting at `row`, column by
/// column, and top to bottom within each column.
pub fn compute_band(config: &RenderConfig, row: usize) -> Vec<Triple> {
    let plane = config.plane();
    let max_iterations = config.max_iterations();
    iproduct!(0..config.width(), row..row + config.granularity())
        .map(|(x, y)| Triple {
            x,
            y,
            color: escape_time(plane.pixel_to_point(&Pixel(x, y)), max_iterations),
        })
        .collect()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum State {
    AwaitingAssignment,
    Computing(usize),
}

/// What a worker did before it was told to finish.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerReport {
    /// The worker's rank.
    pub rank: Rank,
    /// The first row of every band it computed, in the order it
    /// computed them.
    pub rows: Vec<usize>,
}

/// A worker rank.
pub struct Worker<'a> {
    config: &'a RenderConfig,
}

impl<'a> Worker<'a> {
    /// A worker that renders bands of the image described by
    /// `config`.
    pub fn new(config: &'a RenderConfig) -> Worker<'a> {
        Worker { config }
    }

    /// Runs the worker until the controller sends `Finish`.  Any
    /// transport failure or malformed message ends the worker with an
    /// error; there are no retries.
    pub fn run<C: Communicator>(&self, comm: &C) -> Result<WorkerReport, RenderError> {
        let rank = comm.rank();
        let mut rows = Vec::new();
        let mut state = State::AwaitingAssignment;
        loop {
            state = match state {
                State::AwaitingAssignment => match self.receive(comm)? {
                    Message::Assign(row) => State::Computing(row),
                    Message::Finish => break,
                    Message::Result(_) => {
                        return Err(RenderError::protocol(
                            rank,
                            "workers do not accept results",
                        ))
                    }
                },
                State::Computing(row) => {
                    let triples = compute_band(self.config, row);
                    comm.send(CONTROLLER, Message::Result(triples).encode())?;
                    rows.push(row);
                    State::AwaitingAssignment
                }
            }
        }
        debug!(rank, units = rows.len(), "worker finished");
        Ok(WorkerReport { rank, rows })
    }

    fn receive<C: Communicator>(&self, comm: &C) -> Result<Message, RenderError> {
        let rank = comm.rank();
        let envelope = comm.recv()?;
        if envelope.source != CONTROLLER {
            return Err(RenderError::protocol(
                rank,
                format!("message from rank {}, not the controller", envelope.source),
            ));
        }
        let message = Message::decode(envelope.frame, self.config.unit_len())
            .map_err(|e| RenderError::protocol(rank, e.to_string()))?;
        if let Message::Assign(row) = message {
            if !self.config.is_unit_row(row) {
                return Err(RenderError::protocol(
                    rank,
                    format!("row {} does not start a work unit", row),
                ));
            }
            trace!(rank, row, "assigned");
        }
        Ok(message)
    }
}
