//! The UI-owning thread.
//!
//! A single worker thread owns every [`ContentHost`] and drains a FIFO of jobs.
//! After each batch it redraws the content that was invalidated or received
//! input. Other threads talk to it through a cloneable [`UiHandle`].

use std::collections::BTreeMap;
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Receiver, Sender};

use crate::content::{ContentHost, ContentId};
use crate::error::CompositorError;
use crate::input::{EventResult, PointerEvent};

type Job = Box<dyn FnOnce(&mut UiContext) + Send + 'static>;

enum Message {
    Run(Job),
    Shutdown,
}

struct HostSlot {
    host: Box<dyn ContentHost>,
    dirty: bool,
}

/// UI-thread state handed to every job.
pub struct UiContext {
    hosts: BTreeMap<ContentId, HostSlot>,
    next_id: u64,
}

impl UiContext {
    fn new() -> Self {
        Self {
            hosts: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Takes ownership of `host`; it is drawn on the next traversal.
    pub fn insert(&mut self, host: Box<dyn ContentHost>) -> ContentId {
        let id = ContentId(self.next_id);
        self.next_id += 1;
        self.hosts.insert(id, HostSlot { host, dirty: true });
        id
    }

    pub fn remove(&mut self, id: ContentId) -> bool {
        self.hosts.remove(&id).is_some()
    }

    pub fn contains(&self, id: ContentId) -> bool {
        self.hosts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn with_host<R>(&mut self, id: ContentId, f: impl FnOnce(&mut dyn ContentHost) -> R) -> Option<R> {
        let slot = self.hosts.get_mut(&id)?;
        Some(f(slot.host.as_mut()))
    }

    /// Forwards an invalidate and schedules a redraw. `false` for unknown ids.
    pub fn invalidate(&mut self, id: ContentId) -> bool {
        let Some(slot) = self.hosts.get_mut(&id) else {
            return false;
        };
        slot.host.invalidate();
        slot.dirty = true;
        true
    }

    /// Delivers a pointer event and schedules a redraw. `None` for unknown ids.
    pub fn dispatch(&mut self, id: ContentId, event: &PointerEvent) -> Option<EventResult> {
        let slot = self.hosts.get_mut(&id)?;
        let result = slot.host.dispatch_pointer_event(event);
        slot.dirty = true;
        Some(result)
    }

    /// Draws every dirty host. Returns how many were drawn.
    pub fn redraw_dirty(&mut self) -> usize {
        let mut drawn = 0;
        for slot in self.hosts.values_mut().filter(|s| s.dirty) {
            slot.dirty = false;
            slot.host.draw();
            drawn += 1;
        }
        drawn
    }
}

/// Cloneable sender side of the UI thread.
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<Message>,
    thread: ThreadId,
}

impl UiHandle {
    /// Queues `f` on the UI thread. Returns `false` if the thread has stopped.
    pub fn post(&self, f: impl FnOnce(&mut UiContext) + Send + 'static) -> bool {
        self.tx.send(Message::Run(Box::new(f))).is_ok()
    }

    /// Runs `f` on the UI thread and blocks until it returns.
    ///
    /// Fails with [`CompositorError::UiThreadReentry`] when called from the UI
    /// thread itself, which would otherwise wait on its own queue forever.
    pub fn call<R, F>(&self, f: F) -> Result<R, CompositorError>
    where
        R: Send + 'static,
        F: FnOnce(&mut UiContext) -> R + Send + 'static,
    {
        if self.is_current() {
            return Err(CompositorError::UiThreadReentry);
        }

        let (tx, rx) = crossbeam_channel::bounded(1);
        let posted = self.post(move |ctx| {
            // The caller may have given up; nothing to do then.
            let _ = tx.send(f(ctx));
        });
        if !posted {
            return Err(CompositorError::UiThreadGone);
        }
        rx.recv().map_err(|_| CompositorError::UiThreadGone)
    }

    /// Waits until every job queued so far has run and dirty content has been
    /// redrawn. Returns the number of hosts drawn by this flush.
    pub fn flush(&self) -> Result<usize, CompositorError> {
        self.call(UiContext::redraw_dirty)
    }

    /// True when called on the UI thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }
}

/// Owner of the UI thread. Dropping it stops the thread and drops all content.
pub struct UiThread {
    handle: UiHandle,
    join: Option<JoinHandle<()>>,
}

impl UiThread {
    pub fn spawn(name: &str) -> Result<Self, CompositorError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let join = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || run(rx))
            .map_err(CompositorError::UiThreadSpawn)?;

        let thread = join.thread().id();
        log::debug!("UiThread::spawn: started {name:?}");
        Ok(Self {
            handle: UiHandle { tx, thread },
            join: Some(join),
        })
    }

    pub fn handle(&self) -> &UiHandle {
        &self.handle
    }

    /// Stops the loop after the jobs already queued and joins the thread.
    pub fn shutdown(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        let _ = self.handle.tx.send(Message::Shutdown);

        if self.handle.is_current() {
            // Dropped from inside a job; the loop exits on its own.
            return;
        }
        if join.join().is_err() {
            log::error!("UiThread::shutdown: UI thread panicked");
        }
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(rx: Receiver<Message>) {
    let mut ctx = UiContext::new();

    'outer: while let Ok(first) = rx.recv() {
        let mut next = Some(first);
        while let Some(msg) = next.take() {
            match msg {
                Message::Run(job) => job(&mut ctx),
                Message::Shutdown => break 'outer,
            }
            next = rx.try_recv().ok();
        }
        ctx.redraw_dirty();
    }

    log::debug!("UI thread stopping, dropping {} content host(s)", ctx.len());
}
