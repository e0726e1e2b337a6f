// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The controller's scheduler.
//!
//! The image is cut into bands of `granularity` rows.  The controller
//! hands one band to every worker, then waits for whichever worker
//! answers first, writes its pixels, and hands that same worker the
//! next band that nobody has seen yet.  Fast workers come back sooner
//! and so get more bands; nobody is assigned work up front beyond
//! their first band.  When there are no bands left, a worker that
//! answers is told to finish instead.
//!
//! The run has three phases:
//!
//! 1. *Seed*: one band per worker, or an immediate finish for workers
//!    beyond the number of bands.
//! 2. *Drain*: receive from anyone, assemble, re-seed or finish the
//!    sender, until every row has come back.
//! 3. *Sweep*: finish any worker that somehow hasn't been.
//!
//! Every worker is told to finish exactly once.  A band is assigned
//! exactly once and is, at any moment, either complete or in flight
//! at exactly one worker.

use canvas::PixelSink;
use config::RenderConfig;
use errors::RenderError;
use protocol::{Message, Triple};
use transport::{Communicator, Rank, CONTROLLER};

/// What happened during a scheduled render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleReport {
    /// Every assignment made, as (worker, first row), in the order
    /// they were sent.
    pub assignments: Vec<(Rank, usize)>,
    /// Every finish sent, by worker, in the order they were sent.
    pub finishes: Vec<Rank>,
    /// How many results arrived.
    pub results_received: usize,
    /// Bands completed, indexed by rank.  Entry 0 is the controller
    /// and is always zero.
    pub units_per_rank: Vec<usize>,
}

/// The controller rank.  Owns the scheduling state; nothing else
/// touches it.
pub struct Controller<'a> {
    config: &'a RenderConfig,
    next_row: usize,
    rows_completed: usize,
    in_flight: Vec<Option<usize>>,
    finished: Vec<bool>,
    report: ScheduleReport,
}

impl<'a> Controller<'a> {
    /// A controller for a group of `processes` ranks (itself
    /// included) rendering the image described by `config`.
    pub fn new(config: &'a RenderConfig, processes: usize) -> Result<Controller<'a>, RenderError> {
        config.check_group(processes)?;
        Ok(Controller {
            config,
            next_row: 0,
            rows_completed: 0,
            in_flight: vec![None; processes],
            finished: vec![false; processes],
            report: ScheduleReport {
                units_per_rank: vec![0; processes],
                ..ScheduleReport::default()
            },
        })
    }

    /// Schedules the whole image across the group behind `comm`,
    /// writing every returned pixel into `sink`.  Returns once every
    /// row has been written and every worker has been told to finish.
    /// Any transport failure or protocol violation ends the run.
    pub fn run<C, S>(mut self, comm: &C, sink: &mut S) -> Result<ScheduleReport, RenderError>
    where
        C: Communicator,
        S: PixelSink,
    {
        if comm.rank() != CONTROLLER || comm.size() != self.in_flight.len() {
            return Err(RenderError::Config(format!(
                "A controller for {} ranks cannot run as rank {} of {}.",
                self.in_flight.len(),
                comm.rank(),
                comm.size()
            )));
        }
        self.seed(comm)?;
        self.drain(comm, sink)?;
        self.sweep(comm)?;
        Ok(self.report)
    }

    fn workers(&self) -> ::std::ops::Range<Rank> {
        1..self.in_flight.len()
    }

    fn seed<C: Communicator>(&mut self, comm: &C) -> Result<(), RenderError> {
        for worker in self.workers() {
            if self.next_row < self.config.height() {
                self.assign(comm, worker)?;
            } else {
                // More workers than bands: this one never gets any.
                self.finish(comm, worker)?;
            }
        }
        debug!(
            seeded = self.report.assignments.len(),
            idle = self.report.finishes.len(),
            "seeded workers"
        );
        Ok(())
    }

    fn drain<C, S>(&mut self, comm: &C, sink: &mut S) -> Result<(), RenderError>
    where
        C: Communicator,
        S: PixelSink,
    {
        let height = self.config.height();
        while self.rows_completed < height {
            let envelope = comm.recv()?;
            let source = envelope.source;
            let triples = match Message::decode(envelope.frame, self.config.unit_len()) {
                Ok(Message::Result(triples)) => triples,
                Ok(other) => {
                    return Err(RenderError::protocol(
                        CONTROLLER,
                        format!("rank {} sent a {} message", source, other.kind()),
                    ))
                }
                Err(e) => {
                    return Err(RenderError::protocol(
                        CONTROLLER,
                        format!("from rank {}: {}", source, e),
                    ))
                }
            };

            let row = match self.in_flight.get_mut(source).and_then(Option::take) {
                Some(row) => row,
                None => {
                    return Err(RenderError::protocol(
                        CONTROLLER,
                        format!("rank {} sent a result it was never asked for", source),
                    ))
                }
            };
            self.check_band(source, row, &triples)?;

            for t in triples {
                sink.set_pixel(t.x, t.y, t.color);
            }
            self.rows_completed += self.config.granularity();
            self.report.results_received += 1;
            self.report.units_per_rank[source] += 1;
            trace!(source, row, completed = self.rows_completed, "band complete");

            if self.next_row < height {
                self.assign(comm, source)?;
            } else {
                self.finish(comm, source)?;
            }
        }
        Ok(())
    }

    fn sweep<C: Communicator>(&mut self, comm: &C) -> Result<(), RenderError> {
        let stragglers: Vec<Rank> = self.workers().filter(|w| !self.finished[*w]).collect();
        if !stragglers.is_empty() {
            debug!(count = stragglers.len(), "finishing remaining workers");
        }
        for worker in stragglers {
            self.finish(comm, worker)?;
        }
        Ok(())
    }

    fn assign<C: Communicator>(&mut self, comm: &C, worker: Rank) -> Result<(), RenderError> {
        let row = self.next_row;
        comm.send(worker, Message::Assign(row).encode())?;
        self.in_flight[worker] = Some(row);
        self.next_row += self.config.granularity();
        self.report.assignments.push((worker, row));
        trace!(worker, row, "assigned");
        Ok(())
    }

    fn finish<C: Communicator>(&mut self, comm: &C, worker: Rank) -> Result<(), RenderError> {
        debug_assert!(!self.finished[worker], "rank {} finished twice", worker);
        comm.send(worker, Message::Finish.encode())?;
        self.finished[worker] = true;
        self.report.finishes.push(worker);
        trace!(worker, "finished");
        Ok(())
    }

    // A band must come back exactly as the worker loop produces it:
    // every column, every row of the band, in order.
    fn check_band(&self, source: Rank, row: usize, triples: &[Triple]) -> Result<(), RenderError> {
        let granularity = self.config.granularity();
        for (i, t) in triples.iter().enumerate() {
            let (x, y) = (i / granularity, row + i % granularity);
            if t.x != x || t.y != y {
                return Err(RenderError::protocol(
                    CONTROLLER,
                    format!(
                        "rank {} returned pixel ({}, {}) where ({}, {}) belongs in the band at row {}",
                        source, t.x, t.y, x, y, row
                    ),
                ));
            }
        }
        Ok(())
    }
}
