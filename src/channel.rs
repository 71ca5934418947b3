//! Bounded intent queue between the network task and the control loop.
//!
//! The messaging callback may run in another task or in interrupt context,
//! so every access to the queue happens inside a critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// The queue was full; the rejected value is handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// The queue was empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Fixed-capacity FIFO shared between producers and a single consumer
pub struct Channel<T, const CAPACITY: usize> {
    queue: Mutex<RefCell<Deque<T, CAPACITY>>>,
}

impl<T, const CAPACITY: usize> Channel<T, CAPACITY> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> Sender<'_, T, CAPACITY> {
        Sender { channel: self }
    }

    pub const fn receiver(&self) -> Receiver<'_, T, CAPACITY> {
        Receiver { channel: self }
    }

    /// Queue a value, or hand it back if the queue is full
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            self.queue
                .borrow(cs)
                .borrow_mut()
                .push_back(value)
                .map_err(TrySendError)
        })
    }

    /// Take the oldest queued value
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            self.queue
                .borrow(cs)
                .borrow_mut()
                .pop_front()
                .ok_or(TryReceiveError)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const CAPACITY: usize> Default for Channel<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle of a [`Channel`]
#[derive(Clone, Copy)]
pub struct Sender<'a, T, const CAPACITY: usize> {
    channel: &'a Channel<T, CAPACITY>,
}

impl<T, const CAPACITY: usize> Sender<'_, T, CAPACITY> {
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.channel.try_send(value)
    }
}

/// Consumer handle of a [`Channel`]
#[derive(Clone, Copy)]
pub struct Receiver<'a, T, const CAPACITY: usize> {
    channel: &'a Channel<T, CAPACITY>,
}

impl<T, const CAPACITY: usize> Receiver<'_, T, CAPACITY> {
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.channel.try_receive()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
