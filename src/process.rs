// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running a whole process group.  Each rank is chosen a `Role` once,
//! from its rank number, and then runs that role's loop to the end;
//! nothing else in the crate asks "am I the controller?".
//!
//! The workers run on scoped threads; the controller runs on the
//! calling thread and owns the canvas.

use canvas::Canvas;
use config::RenderConfig;
use controller::{Controller, ScheduleReport};
use errors::RenderError;
use transport::{establish, Communicator, Link, Rank, CONTROLLER};
use worker::{Worker, WorkerReport};

/// The part a rank plays.
pub enum Role<'a> {
    /// Rank 0: schedules the work and assembles the image.
    Controller(Controller<'a>, Canvas),
    /// Every other rank: computes bands on request.
    Worker(Worker<'a>),
}

/// What a rank hands back when its role is done.
#[derive(Debug)]
pub enum Outcome {
    /// The controller's finished image and its account of the run.
    Image(Canvas, ScheduleReport),
    /// A worker's account of what it computed.
    Worker(WorkerReport),
}

/// The result of a successful scheduled render.
#[derive(Debug)]
pub struct Render {
    /// The assembled image.
    pub canvas: Canvas,
    /// The controller's account of the run.
    pub schedule: ScheduleReport,
    /// Every worker's account, in rank order.
    pub workers: Vec<WorkerReport>,
}

impl<'a> Role<'a> {
    /// Picks the role for `rank` in a group of `processes` ranks.
    pub fn select(
        config: &'a RenderConfig,
        rank: Rank,
        processes: usize,
    ) -> Result<Role<'a>, RenderError> {
        if rank == CONTROLLER {
            let canvas = Canvas::new(config.width(), config.height());
            Ok(Role::Controller(Controller::new(config, processes)?, canvas))
        } else {
            Ok(Role::Worker(Worker::new(config)))
        }
    }

    /// Runs the role to completion over `comm`.
    pub fn run<C: Communicator>(self, comm: &C) -> Result<Outcome, RenderError> {
        match self {
            Role::Controller(controller, mut canvas) => {
                let report = controller.run(comm, &mut canvas)?;
                Ok(Outcome::Image(canvas, report))
            }
            Role::Worker(worker) => worker.run(comm).map(Outcome::Worker),
        }
    }
}

/// Renders `config` on a group of `processes` ranks: one controller
/// and `processes - 1` workers.  Fails if any rank fails; in that
/// case no image is returned.
pub fn launch(config: &RenderConfig, processes: usize) -> Result<Render, RenderError> {
    config.check_group(processes)?;
    let mut links = establish(processes)?.into_iter();
    let controller_link = match links.next() {
        Some(link) => link,
        None => return Err(RenderError::Config("The process group is empty.".to_string())),
    };
    let workers: Vec<(Role, Link)> = links
        .map(|link| Role::select(config, link.rank(), processes).map(|role| (role, link)))
        .collect::<Result<_, _>>()?;
    let controller = Role::select(config, CONTROLLER, processes)?;
    info!(
        processes,
        width = config.width(),
        height = config.height(),
        granularity = config.granularity(),
        "launching process group"
    );

    crossbeam::scope(|spawner| {
        let handles: Vec<_> = workers
            .into_iter()
            .map(|(role, link)| {
                let rank = link.rank();
                (rank, spawner.spawn(move |_| role.run(&link)))
            })
            .collect();

        let outcome = controller.run(&controller_link);
        // Hang up before joining, so that workers still waiting on a
        // failed controller see the disconnect and exit.
        drop(controller_link);

        let mut reports = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for (rank, handle) in handles {
            match handle.join() {
                Ok(Ok(Outcome::Worker(report))) => reports.push(report),
                Ok(Ok(Outcome::Image(..))) => {
                    first_error = first_error.or_else(|| {
                        Some(RenderError::protocol(rank, "a worker produced an image"))
                    })
                }
                Ok(Err(e)) => {
                    warn!(rank, error = %e, "worker failed");
                    first_error = first_error.or(Some(e));
                }
                Err(_) => first_error = first_error.or(Some(RenderError::RankPanicked(rank))),
            }
        }

        match (outcome?, first_error) {
            (_, Some(e)) => Err(e),
            (Outcome::Image(canvas, schedule), None) => Ok(Render {
                canvas,
                schedule,
                workers: reports,
            }),
            (Outcome::Worker(_), None) => Err(RenderError::protocol(
                CONTROLLER,
                "the controller rank produced no image",
            )),
        }
    })
    .unwrap_or_else(|_| Err(RenderError::RankPanicked(CONTROLLER)))
}
