#![allow(dead_code)]

use mandelfarm::protocol::{Frame, Message};
use mandelfarm::transport::Envelope;
use mandelfarm::{
    establish, Canvas, Communicator, Controller, PixelSink, Rank, RenderConfig, RenderError,
    ScheduleReport, Worker, WorkerReport,
};
use rand::{thread_rng, Rng};
use std::cell::RefCell;
use std::thread;
use std::time::Duration;

/// What the controller's link saw, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Sent(Rank, Message),
    Received(Rank),
}

/// Wraps the controller's link and records every send and receive.
pub struct Tap<C> {
    inner: C,
    unit_len: usize,
    pub events: RefCell<Vec<Event>>,
}

impl<C: Communicator> Tap<C> {
    pub fn new(inner: C, config: &RenderConfig) -> Tap<C> {
        Tap {
            inner,
            unit_len: config.unit_len(),
            events: RefCell::new(Vec::new()),
        }
    }
}

impl<C: Communicator> Communicator for Tap<C> {
    fn rank(&self) -> Rank {
        self.inner.rank()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn send(&self, dest: Rank, frame: Frame) -> Result<(), RenderError> {
        let message = Message::decode(frame.clone(), self.unit_len).unwrap();
        self.events.borrow_mut().push(Event::Sent(dest, message));
        self.inner.send(dest, frame)
    }

    fn recv(&self) -> Result<Envelope, RenderError> {
        let envelope = self.inner.recv()?;
        self.events.borrow_mut().push(Event::Received(envelope.source));
        Ok(envelope)
    }
}

/// Wraps a worker's link and stalls for a random moment before every
/// send, so replies reach the controller in no particular order.
pub struct Jitter<C>(pub C);

impl<C: Communicator> Communicator for Jitter<C> {
    fn rank(&self) -> Rank {
        self.0.rank()
    }

    fn size(&self) -> usize {
        self.0.size()
    }

    fn send(&self, dest: Rank, frame: Frame) -> Result<(), RenderError> {
        let pause = thread_rng().gen_range(0, 1500);
        thread::sleep(Duration::from_micros(pause));
        self.0.send(dest, frame)
    }

    fn recv(&self) -> Result<Envelope, RenderError> {
        self.0.recv()
    }
}

/// A canvas that also counts how many times each pixel was written.
pub struct CountingSink {
    pub canvas: Canvas,
    pub writes: Vec<u32>,
}

impl CountingSink {
    pub fn new(width: usize, height: usize) -> CountingSink {
        CountingSink {
            canvas: Canvas::new(width, height),
            writes: vec![0; width * height],
        }
    }
}

impl PixelSink for CountingSink {
    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        self.writes[y * self.canvas.width() + x] += 1;
        self.canvas.set_pixel(x, y, color);
    }
}

pub struct Run {
    pub sink: CountingSink,
    pub report: ScheduleReport,
    pub events: Vec<Event>,
    pub workers: Vec<WorkerReport>,
}

impl Run {
    /// Every row assigned over the run, sorted.
    pub fn assigned_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.report.assignments.iter().map(|a| a.1).collect();
        rows.sort();
        rows
    }

    /// How many finishes each rank was sent, indexed by rank.
    pub fn finishes_per_rank(&self, processes: usize) -> Vec<usize> {
        let mut counts = vec![0; processes];
        for event in &self.events {
            if let Event::Sent(dest, Message::Finish) = *event {
                counts[dest] += 1;
            }
        }
        counts
    }
}

/// Runs a full group: the controller, behind a `Tap`, on this thread,
/// and the workers on scoped threads.
pub fn run_group(config: &RenderConfig, processes: usize, jitter: bool) -> Run {
    let mut links = establish(processes).unwrap().into_iter();
    let tap = Tap::new(links.next().unwrap(), config);

    crossbeam::scope(|spawner| {
        let handles: Vec<_> = links
            .map(|link| {
                spawner.spawn(move |_| {
                    let worker = Worker::new(config);
                    if jitter {
                        worker.run(&Jitter(link))
                    } else {
                        worker.run(&link)
                    }
                })
            })
            .collect();

        let mut sink = CountingSink::new(config.width(), config.height());
        let report = Controller::new(config, processes)
            .unwrap()
            .run(&tap, &mut sink)
            .unwrap();
        let workers = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect();

        Run {
            sink,
            report,
            events: tap.events.into_inner(),
            workers,
        }
    })
    .unwrap()
}
