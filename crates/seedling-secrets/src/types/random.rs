//! Random password/string generator.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::ThreadRng;
use rand::{thread_rng, CryptoRng, RngCore};
use seedling_types::Result;
use std::collections::HashMap;
use std::fmt;

/// Characters random secrets are drawn from: ASCII letters, digits, and
/// punctuation. Together these are every printable non-space ASCII character.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Infinite stream of random strings of a fixed length.
///
/// Every character is drawn uniformly, with replacement, from [`ALPHABET`].
/// Pulling a value touches nothing but the RNG.
pub struct RandomStrings<R = ThreadRng> {
    length: usize,
    rng: R,
    dist: Uniform<usize>,
}

impl RandomStrings<ThreadRng> {
    /// Stream backed by the thread-local CSPRNG.
    pub fn new(length: usize) -> Self {
        Self::with_rng(length, thread_rng())
    }
}

impl<R: RngCore + CryptoRng> RandomStrings<R> {
    /// Stream backed by the given cryptographically secure RNG.
    pub fn with_rng(length: usize, rng: R) -> Self {
        Self {
            length,
            rng,
            dist: Uniform::from(0..ALPHABET.len()),
        }
    }

    /// Length of every string this stream yields.
    pub fn length(&self) -> usize {
        self.length
    }

    fn draw(&mut self) -> String {
        (0..self.length)
            .map(|_| ALPHABET[self.dist.sample(&mut self.rng)] as char)
            .collect()
    }
}

impl<R: RngCore + CryptoRng> Iterator for RandomStrings<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(Ok(self.draw()))
    }
}

impl<R> fmt::Debug for RandomStrings<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomStrings")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Named random streams, created lazily and shared by every caller that asks
/// for the same name within one run.
///
/// Two secrets drawing from one stream receive successive values of that
/// stream. If the first secret is skipped, the second gets the stream's
/// first value.
pub struct RandomStreams<R = ThreadRng> {
    streams: HashMap<String, RandomStrings<R>>,
    factory: Box<dyn FnMut() -> R>,
}

impl RandomStreams<ThreadRng> {
    /// Streams backed by the thread-local CSPRNG.
    pub fn new() -> Self {
        Self::with_factory(thread_rng)
    }
}

impl Default for RandomStreams<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> RandomStreams<R> {
    /// Streams whose RNGs come from `factory`, called once per new stream.
    pub fn with_factory(factory: impl FnMut() -> R + 'static) -> Self {
        Self {
            streams: HashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Get the stream called `name`, creating it with `length` on first use.
    ///
    /// The length of an existing stream is never changed.
    pub fn stream(&mut self, name: &str, length: usize) -> &mut RandomStrings<R> {
        let Self { streams, factory } = self;
        streams
            .entry(name.to_string())
            .or_insert_with(|| RandomStrings::with_rng(length, factory()))
    }

    /// Number of streams created so far.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether no stream has been created yet.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
