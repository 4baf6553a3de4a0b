//! Implementations of the **Sampler** trait.
//!
//! - RandomSampler
//!
//! ## Random Sampler
//!
//! The **RandomSampler** just consumes a uniform random number
//! generator to produce independent samples. Each pixel sample
//! restarts the generator from a hash of the pixel coordinates, the
//! sample index and the seed, which keeps multi-threaded renders
//! reproducible.

pub mod random;
