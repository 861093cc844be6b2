/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use anyhow::anyhow;
use log::{debug, warn};

use crate::config::{BackgroundDispatchConfig, DispatchMode};

type Job = Box<dyn FnOnce() + Send>;

/// The result of some work handed to the dispatcher.
///
/// It may be ignored. If the work never runs, `wait` returns the fallback
/// value chosen when it was submitted.
pub struct Pending<T>(PendingInner<T>);

enum PendingInner<T> {
    Ready(T),
    Waiting {
        receiver: kanal::Receiver<T>,
        fallback: T,
    },
}

impl<T> Pending<T> {
    pub(crate) fn ready(v: T) -> Self {
        Pending(PendingInner::Ready(v))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.0, PendingInner::Ready(_))
    }

    /// Block until the work is done.
    pub fn wait(self) -> T {
        match self.0 {
            PendingInner::Ready(v) => v,
            PendingInner::Waiting { receiver, fallback } => receiver.recv().unwrap_or(fallback),
        }
    }
}

pub(crate) enum Dispatcher {
    Immediate(AtomicBool),
    Background(BackgroundWorker),
}

impl Dispatcher {
    pub(crate) fn new(mode: &DispatchMode) -> anyhow::Result<Self> {
        match mode {
            DispatchMode::Immediate => Ok(Dispatcher::Immediate(AtomicBool::new(false))),
            DispatchMode::Background(config) => {
                BackgroundWorker::spawn(config).map(Dispatcher::Background)
            }
        }
    }

    pub(crate) fn submit<T, F>(&self, fallback: T, task: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        match self {
            Dispatcher::Immediate(shutdown) => {
                if shutdown.load(Ordering::Acquire) {
                    Pending::ready(fallback)
                } else {
                    Pending::ready(task())
                }
            }
            Dispatcher::Background(worker) => worker.submit(fallback, task),
        }
    }

    /// Stop taking new work. Work already queued is finished first.
    pub(crate) fn shutdown(&self) {
        match self {
            Dispatcher::Immediate(shutdown) => shutdown.store(true, Ordering::Release),
            Dispatcher::Background(worker) => worker.shutdown(),
        }
    }
}

pub(crate) struct BackgroundWorker {
    sender: Mutex<Option<kanal::Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundWorker {
    fn spawn(config: &BackgroundDispatchConfig) -> anyhow::Result<Self> {
        let (sender, receiver) = kanal::bounded::<Job>(config.channel_capacity.get());

        let handle = std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
                debug!("dispatch queue closed");
            })
            .map_err(|e| anyhow!("failed to spawn thread {}: {e}", config.thread_name))?;

        Ok(BackgroundWorker {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    fn submit<T, F>(&self, fallback: T, task: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let sender = self.sender.lock().unwrap();
        let Some(sender) = sender.as_ref() else {
            return Pending::ready(fallback);
        };

        let (result_sender, result_receiver) = kanal::bounded::<T>(1);
        let job: Job = Box::new(move || {
            let _ = result_sender.send(task());
        });
        match sender.try_send(job) {
            Ok(true) => Pending(PendingInner::Waiting {
                receiver: result_receiver,
                fallback,
            }),
            Ok(false) => {
                warn!("dispatch queue is full, task dropped");
                Pending::ready(fallback)
            }
            Err(e) => {
                warn!("dispatch queue is closed, task dropped: {e}");
                Pending::ready(fallback)
            }
        }
    }

    fn shutdown(&self) {
        // dropping the sender lets the worker drain the queue and exit
        drop(self.sender.lock().unwrap().take());

        let Some(handle) = self.handle.lock().unwrap().take() else {
            return;
        };
        if handle.thread().id() == std::thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            warn!("dispatch thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn background_with_capacity(capacity: usize) -> Dispatcher {
        let config = BackgroundDispatchConfig {
            thread_name: "bort-test".to_string(),
            channel_capacity: NonZeroUsize::new(capacity).unwrap(),
        };
        Dispatcher::new(&DispatchMode::Background(config)).unwrap()
    }

    fn background() -> Dispatcher {
        background_with_capacity(16)
    }

    #[test]
    fn immediate() {
        let dispatcher = Dispatcher::new(&DispatchMode::Immediate).unwrap();
        let pending = dispatcher.submit(0, || 42);
        assert!(pending.is_ready());
        assert_eq!(pending.wait(), 42);

        dispatcher.shutdown();
        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = ran.clone();
        let pending = dispatcher.submit(0, move || {
            ran2.store(true, Ordering::Relaxed);
            42
        });
        assert_eq!(pending.wait(), 0);
        assert!(!ran.load(Ordering::Relaxed));
    }

    #[test]
    fn background_order() {
        let dispatcher = background();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut pending = Vec::new();
        for i in 0..10 {
            let seen = seen.clone();
            pending.push(dispatcher.submit(usize::MAX, move || {
                seen.lock().unwrap().push(i);
                i
            }));
        }
        for (i, p) in pending.into_iter().enumerate() {
            assert_eq!(p.wait(), i);
        }
        assert_eq!(*seen.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn background_thread_name() {
        let dispatcher = background();
        let name = dispatcher
            .submit(None, || std::thread::current().name().map(str::to_string))
            .wait();
        assert_eq!(name.as_deref(), Some("bort-test"));
    }

    #[test]
    fn background_queue_full() {
        let dispatcher = background_with_capacity(1);
        let (started_sender, started_receiver) = kanal::bounded::<()>(1);
        let (release_sender, release_receiver) = kanal::bounded::<()>(1);
        let running = dispatcher.submit(0, move || {
            let _ = started_sender.send(());
            let _ = release_receiver.recv();
            1
        });
        started_receiver.recv().unwrap();

        let queued = dispatcher.submit(0, || 2);
        assert!(!queued.is_ready());
        let dropped = dispatcher.submit(0, || 3);
        assert!(dropped.is_ready());
        assert_eq!(dropped.wait(), 0);

        release_sender.send(()).unwrap();
        assert_eq!(running.wait(), 1);
        assert_eq!(queued.wait(), 2);
        dispatcher.shutdown();
    }

    #[test]
    fn background_shutdown() {
        let dispatcher = background();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let count = count.clone();
            let _ = dispatcher.submit((), move || {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }
        dispatcher.shutdown();
        assert_eq!(count.load(Ordering::Relaxed), 8);

        let pending = dispatcher.submit(false, || true);
        assert!(pending.is_ready());
        assert!(!pending.wait());
        dispatcher.shutdown();
    }
}
