//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{GenerateError, Hqid7};
use inner::GlobalGenInner;

/// Returns the lock handle of the process-wide global generator slot.
///
/// A poisoned lock is recovered because the generator commits its state only after a successful
/// generation.
fn lock_global_gen() -> sync::MutexGuard<'static, Option<GlobalGenInner>> {
    static G: sync::Mutex<Option<GlobalGenInner>> = sync::Mutex::new(None);
    G.lock().unwrap_or_else(sync::PoisonError::into_inner)
}

/// Generates an hqid7 object.
///
/// This function employs a global generator and guarantees the process-wide monotonic order of
/// identifiers generated within the same millisecond. On Unix, this function resets the generator
/// when the process ID changes (i.e., upon process forks) to prevent collisions across processes.
///
/// # Errors
///
/// Returns [`GenerateError::RandomSourceUnavailable`] if the operating system's random number
/// generator cannot be read, and [`GenerateError::TimestampOutOfRange`] if the system clock is
/// outside the 48-bit millisecond range.
///
/// # Examples
///
/// ```rust
/// let id = hqid7::hqid7()?;
/// println!("{}", id); // e.g., "1BihbxwwQ4NZZpKRH9JDCz"
/// println!("{:?}", id.as_bytes()); // as 16-byte big-endian array
///
/// let id_string: String = hqid7::hqid7()?.to_string();
/// # Ok::<(), hqid7::GenerateError>(())
/// ```
pub fn hqid7() -> Result<Hqid7, GenerateError> {
    let mut slot = lock_global_gen();
    let inner = match slot.take() {
        Some(inner) if !inner.is_stale() => inner,
        _ => GlobalGenInner::try_new()?,
    };
    slot.insert(inner).generator.generate()
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha12Core;

    use crate::generator::{Hqid7Generator, RandSource};
    use crate::GenerateError;

    /// The random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    #[derive(Debug)]
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn try_next_u64(&mut self) -> Result<u64, rand::Error> {
            let mut bytes = [0u8; 8];
            self.0.try_fill_bytes(&mut bytes)?;
            Ok(u64::from_le_bytes(bytes))
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        pub generator: Hqid7Generator<GlobalGenRng>,
    }

    impl GlobalGenInner {
        /// Creates a generator seeded from the operating system.
        pub fn try_new() -> Result<Self, GenerateError> {
            let core = ChaCha12Core::from_rng(OsRng)?;
            #[cfg(feature = "tracing")]
            tracing::debug!("initialized global hqid7 generator");
            Ok(Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: Hqid7Generator::new(GlobalGenRng(ReseedingRng::new(
                    core,
                    1024 * 64,
                    OsRng,
                ))),
            })
        }

        /// Returns true if the process ID has changed since the generator was created.
        pub fn is_stale(&self) -> bool {
            #[cfg(unix)]
            return self.pid != std::process::id();

            #[cfg(not(unix))]
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::hqid7;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| hqid7().unwrap().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[1-9A-HJ-NP-Za-km-z]{22}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = hqid7().unwrap().timestamp_ms() as i64;
            // other tests share the generator and may push the counter into later milliseconds
            assert!(ts_now <= timestamp && timestamp < ts_now + 1_000);
        }
    }

    /// Reproduces generation timestamp through string round trip
    #[test]
    fn reproduces_generation_timestamp_through_string_round_trip() {
        use std::time;
        let before = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64;
        let text = crate::encode_base58(hqid7().unwrap().as_bytes());
        let after = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64;

        let e = crate::Hqid7::from(crate::decode_base58(&text).unwrap());
        assert!(before <= e.timestamp_ms() && e.timestamp_ms() < after + 1_000);
    }

    /// Encodes unique sortable pair of timestamp and counter
    #[test]
    fn encodes_unique_sortable_pair_of_timestamp_and_counter() {
        SAMPLES.with(|samples| {
            let decoded: Vec<crate::Hqid7> = samples.iter().map(|e| e.parse().unwrap()).collect();
            for w in decoded.windows(2) {
                let prev = (w[0].timestamp_ms(), w[0].sub_ms_precision());
                let curr = (w[1].timestamp_ms(), w[1].sub_ms_precision());
                assert!(prev < curr);
            }
        });
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let n = u128::from(e.parse::<crate::Hqid7>().unwrap());
                for (i, bin) in bins.iter_mut().enumerate() {
                    *bin += (n >> (127 - i)) as u32 & 1;
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in 66..128 {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = hqid7().unwrap();
            assert_eq!(e.variant(), 0b10);
            assert_eq!(e.version(), 7);
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(hqid7().unwrap()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert((e.timestamp_ms(), e.sub_ms_precision()));
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
