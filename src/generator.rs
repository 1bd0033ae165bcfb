//! hqid7 generator and related types.

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{GenerateError, Hqid7};

pub mod with_rand08;


/// The maximum value of the 12-bit `sub_ms_precision` counter.
const MAX_COUNTER: u16 = (1 << 12) - 1;

/// The mask to extract the 62 `random_bits` from a random `u64`.
const RANDOM_MASK: u64 = (1 << 62) - 1;

/// The default amount of `unix_ts_ms` rollback tolerated before the generator gives up on the
/// previous timestamp.
pub const DEFAULT_ROLLBACK_ALLOWANCE: u64 = 10_000;

/// A trait that defines the minimum random number generator interface for [`Hqid7Generator`].
///
/// Implementations are expected to be cryptographically secure.
pub trait RandSource {
    /// Returns the next random `u64`, or an error if the underlying source is unavailable.
    fn try_next_u64(&mut self) -> Result<u64, rand::Error>;
}

/// A trait that defines the minimum system clock interface for [`Hqid7Generator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that reads the system clock.
///
/// A clock set before the Unix epoch is reported as `0`, which the generator rejects.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Represents an hqid7 generator that encapsulates a counter and guarantees the monotonic order
/// of identifiers generated within the same millisecond.
///
/// This type provides the interface to customize the random number generator, system clock, and
/// clock rollback handling of a generator. It also helps control the scope of guaranteed order of
/// the generated identifiers. The following example guarantees the process-wide (cross-thread)
/// monotonicity using Rust's standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use hqid7::Hqid7Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(Hqid7Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 let id = g.lock().unwrap().generate().unwrap();
///                 println!("{} by thread {}", id, i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// The generator comes with four different methods that generate an identifier:
///
/// | Flavor                     | Timestamp | On big clock rewind  |
/// | -------------------------- | --------- | -------------------- |
/// | [`generate`]               | Now       | Resets generator     |
/// | [`generate_or_abort`]      | Now       | Returns an error     |
/// | [`generate_or_reset_core`] | Argument  | Resets generator     |
/// | [`generate_or_abort_core`] | Argument  | Returns an error     |
///
/// All of the four return a monotonically increasing identifier by reusing the previous timestamp
/// even if the one provided is smaller than the immediately preceding identifier's. However, when
/// such a clock rollback is larger than the rollback allowance (by default, ten seconds):
///
/// 1.  `generate` (or_reset) methods reset the generator and return a new identifier based on the
///     given timestamp, breaking the increasing order of identifiers.
/// 2.  `or_abort` variants return [`GenerateError::ClockRollback`] immediately.
///
/// The 12-bit counter is reset to zero whenever the timestamp moves forward. When it is exhausted
/// within a millisecond, the generator borrows the next millisecond, so `unix_ts_ms` may run
/// slightly ahead of the real-time clock under heavy load.
///
/// A failed call never changes the generator state.
///
/// [`generate`]: Hqid7Generator::generate
/// [`generate_or_abort`]: Hqid7Generator::generate_or_abort
/// [`generate_or_reset_core`]: Hqid7Generator::generate_or_reset_core
/// [`generate_or_abort_core`]: Hqid7Generator::generate_or_abort_core
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Hqid7Generator<R, T = StdSystemTime> {
    timestamp: u64,
    counter: u16,
    rollback_allowance: u64,

    /// The random number generator used by the generator.
    rng: R,

    /// The system clock used by the generator.
    time_source: T,
}

impl<R: Default, T: Default> Default for Hqid7Generator<R, T> {
    fn default() -> Self {
        Self::with_rand_and_time_sources(R::default(), T::default())
    }
}

impl<R: RandSource> Hqid7Generator<R> {
    /// Creates a generator instance that reads the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R, T> Hqid7Generator<R, T> {
    /// Creates a generator instance with specified random number generator and system clock.
    pub const fn with_rand_and_time_sources(rng: R, time_source: T) -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            rollback_allowance: DEFAULT_ROLLBACK_ALLOWANCE,
            rng,
            time_source,
        }
    }

    /// Sets the amount of `unix_ts_ms` rollback (in milliseconds) that the generator tolerates by
    /// reusing the previous timestamp. Values that do not fit in 48 bits are clamped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hqid7::Hqid7Generator;
    ///
    /// let g = Hqid7Generator::with_rand08(rand::thread_rng()).with_rollback_allowance(1_000);
    /// assert_eq!(g.rollback_allowance(), 1_000);
    /// ```
    pub fn with_rollback_allowance(mut self, rollback_allowance: u64) -> Self {
        self.rollback_allowance = rollback_allowance.min((1 << 48) - 1);
        self
    }

    /// Returns the amount of `unix_ts_ms` rollback tolerated by the generator.
    pub const fn rollback_allowance(&self) -> u64 {
        self.rollback_allowance
    }
}

impl<R: RandSource, T: TimeSource> Hqid7Generator<R, T> {
    /// Generates a new identifier from the current timestamp, or resets the generator upon
    /// significant timestamp rollback.
    ///
    /// See the [`Hqid7Generator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::RandomSourceUnavailable`] if the random number generator fails and
    /// [`GenerateError::TimestampOutOfRange`] if the clock is outside the 48-bit range.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&mut self) -> Result<Hqid7, GenerateError> {
        let unix_ts_ms = self.time_source.unix_ts_ms();
        self.generate_or_reset_core(unix_ts_ms)
    }

    /// Generates a new identifier from the current timestamp, or returns an error upon
    /// significant timestamp rollback.
    ///
    /// See the [`Hqid7Generator`] type documentation for the description.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_or_abort(&mut self) -> Result<Hqid7, GenerateError> {
        let unix_ts_ms = self.time_source.unix_ts_ms();
        self.generate_or_abort_core(unix_ts_ms)
    }
}

impl<R: RandSource, T> Hqid7Generator<R, T> {
    /// Generates a new identifier from the `unix_ts_ms` passed, or resets the generator upon
    /// significant timestamp rollback.
    ///
    /// See the [`Hqid7Generator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::RandomSourceUnavailable`] if the random number generator fails and
    /// [`GenerateError::TimestampOutOfRange`] if `unix_ts_ms` is not a 48-bit positive integer.
    pub fn generate_or_reset_core(&mut self, unix_ts_ms: u64) -> Result<Hqid7, GenerateError> {
        match self.generate_or_abort_core(unix_ts_ms) {
            Err(GenerateError::ClockRollback { .. }) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    unix_ts_ms,
                    last_unix_ts_ms = self.timestamp,
                    "clock moved back beyond allowance; resetting generator"
                );

                // reset state and resume, restoring it if the retry fails
                let last_timestamp = self.timestamp;
                self.timestamp = 0;
                let result = self.generate_or_abort_core(unix_ts_ms);
                if result.is_err() {
                    self.timestamp = last_timestamp;
                }
                result
            }
            result => result,
        }
    }

    /// Generates a new identifier from the `unix_ts_ms` passed, or returns an error upon
    /// significant timestamp rollback.
    ///
    /// See the [`Hqid7Generator`] type documentation for the description.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::ClockRollback`] if `unix_ts_ms` is smaller than the previous
    /// timestamp by more than the rollback allowance, in addition to the errors returned by
    /// [`generate_or_reset_core`](Self::generate_or_reset_core).
    pub fn generate_or_abort_core(&mut self, unix_ts_ms: u64) -> Result<Hqid7, GenerateError> {
        if unix_ts_ms == 0 || unix_ts_ms >= 1 << 48 {
            return Err(GenerateError::TimestampOutOfRange { unix_ts_ms });
        }

        let (timestamp, counter) = if unix_ts_ms > self.timestamp {
            (unix_ts_ms, 0)
        } else if unix_ts_ms + self.rollback_allowance >= self.timestamp {
            // go on with previous timestamp if new one is not much smaller
            if self.counter < MAX_COUNTER {
                (self.timestamp, self.counter + 1)
            } else {
                // increment timestamp at counter overflow
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    unix_ts_ms = self.timestamp,
                    "sub-millisecond counter exhausted"
                );
                (self.timestamp + 1, 0)
            }
        } else {
            return Err(GenerateError::ClockRollback {
                unix_ts_ms,
                last_unix_ts_ms: self.timestamp,
            });
        };

        if timestamp >= 1 << 48 {
            return Err(GenerateError::TimestampOutOfRange {
                unix_ts_ms: timestamp,
            });
        }

        let random_bits = self.rng.try_next_u64()? & RANDOM_MASK;
        self.timestamp = timestamp;
        self.counter = counter;
        Ok(Hqid7::from_fields(timestamp, counter, random_bits))
    }
}
