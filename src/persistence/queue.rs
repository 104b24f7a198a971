//! Background write queue
//!
//! The UI never blocks on a write. Requests go to a single worker thread
//! that executes them strictly in issue order; results come back as
//! [`WriteOutcome`]s the UI drains on every tick.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use super::request::{WriteReceipt, WriteRequest};
use super::Persistence;
use crate::error::{FairShareError, FairShareResult};

/// Identifies one submitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Result of one request, reported back to the UI
#[derive(Debug)]
pub struct WriteOutcome {
    pub ticket: Ticket,
    /// Human-readable description of the request
    pub label: String,
    pub result: FairShareResult<WriteReceipt>,
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct WriteQueue {
    requests: Option<Sender<(Ticket, WriteRequest)>>,
    outcomes: Receiver<WriteOutcome>,
    /// Outcomes produced locally when the worker is gone
    undelivered: Vec<WriteOutcome>,
    worker: Option<JoinHandle<()>>,
    next_ticket: u64,
    in_flight: usize,
}

impl WriteQueue {
    /// Start the worker, which takes ownership of the backend
    pub fn spawn<P>(mut backend: P) -> Self
    where
        P: Persistence + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<(Ticket, WriteRequest)>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            for (ticket, request) in request_rx {
                let label = request.describe();
                debug!(?ticket, request = %label, "executing write");
                let result = backend.execute(request);
                if outcome_tx
                    .send(WriteOutcome {
                        ticket,
                        label,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
            debug!("write worker stopped");
        });

        Self {
            requests: Some(request_tx),
            outcomes: outcome_rx,
            undelivered: Vec::new(),
            worker: Some(worker),
            next_ticket: 0,
            in_flight: 0,
        }
    }

    /// Queue a request without waiting for it
    pub fn submit(&mut self, request: WriteRequest) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        let sent = match &self.requests {
            Some(tx) => tx.send((ticket, request)),
            None => Err(mpsc::SendError((ticket, request))),
        };
        match sent {
            Ok(()) => self.in_flight += 1,
            Err(mpsc::SendError((_, request))) => {
                error!("write worker is gone; dropping request");
                self.undelivered.push(WriteOutcome {
                    ticket,
                    label: request.describe(),
                    result: Err(FairShareError::Persistence(
                        "the background writer has stopped".into(),
                    )),
                });
            }
        }
        ticket
    }

    /// Requests submitted but not yet reported
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Outcomes that are ready now, in issue order
    pub fn poll(&mut self) -> Vec<WriteOutcome> {
        let mut ready = std::mem::take(&mut self.undelivered);
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    ready.push(outcome);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.in_flight = 0;
                    break;
                }
            }
        }
        ready
    }

    /// Block until every submitted request has been reported
    pub fn drain(&mut self) -> Vec<WriteOutcome> {
        let mut ready = std::mem::take(&mut self.undelivered);
        while self.in_flight > 0 {
            match self.outcomes.recv() {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    ready.push(outcome);
                }
                Err(_) => {
                    self.in_flight = 0;
                }
            }
        }
        ready
    }

    /// Finish outstanding writes and stop the worker
    pub fn shutdown(mut self) -> Vec<WriteOutcome> {
        let outcomes = self.drain();
        self.stop();
        outcomes
    }

    fn stop(&mut self) {
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("write worker panicked");
            }
        }
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        self.stop();
    }
}
