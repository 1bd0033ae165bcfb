//! Integration with `rand` (v0.8) crate.

use super::{Hqid7Generator, RandSource, StdSystemTime};
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn try_next_u64(&mut self) -> Result<u64, rand::Error> {
        let mut bytes = [0u8; 8];
        self.0.try_fill_bytes(&mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }
}

impl<T: RngCore> Hqid7Generator<Adapter<T>, StdSystemTime> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// The random number generator should be cryptographically secure, e.g. [`rand::rngs::OsRng`]
    /// or [`rand::rngs::ThreadRng`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hqid7::Hqid7Generator;
    ///
    /// let mut g = Hqid7Generator::with_rand08(rand::thread_rng());
    /// println!("{}", g.generate()?);
    /// # Ok::<(), hqid7::GenerateError>(())
    /// ```
    pub const fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng))
    }
}
