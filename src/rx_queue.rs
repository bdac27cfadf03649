//! Receive byte queue for `no_std` environments.
//!
//! A bounded FIFO built on `critical-section` and `heapless::Deque`. The UART
//! receive interrupt pushes bytes, the main loop reads them through
//! [`SerialPort`]. Interrupt safe via critical sections.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::SerialPort;

/// Error returned when a byte arrives while the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxOverflow(pub u8);

/// A bounded, interrupt-safe byte queue.
///
/// ```ignore
/// static RX: RxQueue<64> = RxQueue::new();
///
/// #[interrupt]
/// fn USART_RXC() {
///     let _ = RX.try_push(uart.read_data());
/// }
///
/// let mut controller = Controller::new(&RX, &DUTY, &ControllerConfig::default());
/// ```
pub struct RxQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<u8, SIZE>>>,
}

impl<const SIZE: usize> RxQueue<SIZE> {
    /// Create a new empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Queue a received byte.
    ///
    /// Returns `Err(RxOverflow(byte))` if the queue is full; the byte is
    /// dropped.
    pub fn try_push(&self, byte: u8) -> Result<(), RxOverflow> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(byte).map_err(RxOverflow)
        })
    }

    /// Take the oldest byte, if any.
    pub fn try_pop(&self) -> Option<u8> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of queued bytes.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for RxQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> SerialPort for &RxQueue<SIZE> {
    fn byte_available(&mut self) -> bool {
        !self.is_empty()
    }

    /// Spins until the receive interrupt has queued a byte.
    fn read_byte(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.try_pop() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }
}
