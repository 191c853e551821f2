//! Latest-value mailbox for the newest accepted angle.
//!
//! [`SharedAngleSlot`] is written once per accepted datagram by the receive
//! thread and drained once per tick by the foreground. It is not a queue:
//! samples published between two ticks overwrite each other and only the
//! newest one is seen, which is all an orientation consumer needs.
//!
//! # Layout
//!
//! The value and its fresh flag share a single `AtomicU64`:
//!
//! ```text
//!  63            33   32   31                 0
//! ┌────────────────┬─────┬────────────────────┐
//! │    unused      │fresh│   f32 angle bits   │
//! └────────────────┴─────┴────────────────────┘
//! ```
//!
//! Publishing is one release store of value + flag; taking is one acquire
//! `fetch_and` that clears the flag and returns the previous word. A reader
//! therefore sees either the old pair or the new pair, never half of each.

use core::sync::atomic::{AtomicU64, Ordering};

const FRESH_BIT: u64 = 1 << 32;
const VALUE_MASK: u64 = 0xFFFF_FFFF;

/// Single-slot, overwrite-on-write mailbox for the newest angle.
///
/// # Thread Safety
///
/// Intended for one producer and one consumer, but every operation is a
/// single atomic instruction, so additional readers or writers cannot corrupt
/// the value; they only race over who observes the fresh flag.
///
/// # Example
///
/// ```rust
/// use anglelink_atomic::SharedAngleSlot;
///
/// let slot = SharedAngleSlot::new();
/// slot.publish(10.0);
/// slot.publish(20.0); // overwrites, 10.0 is never observed
///
/// assert_eq!(slot.take(), Some(20.0));
/// assert_eq!(slot.take(), None);
/// assert_eq!(slot.peek(), 20.0);
/// ```
#[derive(Debug)]
pub struct SharedAngleSlot {
    word: AtomicU64,
}

impl Default for SharedAngleSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedAngleSlot {
    /// Create an empty slot holding 0.0 and no fresh value.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            word: AtomicU64::new(0),
        }
    }

    #[inline]
    fn pack(angle: f32) -> u64 {
        FRESH_BIT | u64::from(angle.to_bits())
    }

    #[inline]
    fn unpack(word: u64) -> f32 {
        let bits = u32::try_from(word & VALUE_MASK).unwrap_or_default();
        f32::from_bits(bits)
    }

    /// Store `angle` and mark it fresh, replacing any unconsumed value.
    #[inline]
    pub fn publish(&self, angle: f32) {
        self.word.store(Self::pack(angle), Ordering::Release);
    }

    /// Consume the fresh value, if any.
    ///
    /// Returns `Some(angle)` exactly once per publish that has not been
    /// overwritten; afterwards the slot reports no fresh value until the next
    /// publish.
    #[inline]
    #[must_use]
    pub fn take(&self) -> Option<f32> {
        let previous = self.word.fetch_and(!FRESH_BIT, Ordering::AcqRel);
        if previous & FRESH_BIT == 0 {
            None
        } else {
            Some(Self::unpack(previous))
        }
    }

    /// Most recently stored value, fresh or not. Does not consume.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> f32 {
        Self::unpack(self.word.load(Ordering::Acquire))
    }

    /// Whether an unconsumed value is waiting.
    #[inline]
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.word.load(Ordering::Acquire) & FRESH_BIT != 0
    }

    /// Drop any fresh value but keep the stored angle.
    #[inline]
    pub fn discard(&self) {
        self.word.fetch_and(!FRESH_BIT, Ordering::AcqRel);
    }

    /// Reset to 0.0 with no fresh value.
    #[inline]
    pub fn reset(&self) {
        self.word.store(0, Ordering::Release);
    }
}
