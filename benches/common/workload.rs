//! Request key streams for tracker benchmarks.
//!
//! Keys are IPv4 addresses drawn from a fixed universe so that runs are
//! reproducible for a given seed.

use std::net::Ipv4Addr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Zipf};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Every address in the universe equally likely.
    Uniform,
    /// Zipf-distributed ranks: a few addresses dominate, like real traffic.
    Zipfian { exponent: f64 },
    /// Each address exactly once, in order: only new keys.
    Distinct,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u32,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    /// Materializes `len` keys.
    pub fn keys(self, len: usize) -> Vec<Ipv4Addr> {
        let universe = self.universe.max(1);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        match self.workload {
            Workload::Uniform => (0..len)
                .map(|_| address(rng.random_range(0..universe)))
                .collect(),
            Workload::Zipfian { exponent } => {
                let zipf = Zipf::new(f64::from(universe), exponent)
                    .expect("valid zipf parameters");
                (0..len)
                    .map(|_| address(zipf.sample(&mut rng) as u32 - 1))
                    .collect()
            },
            Workload::Distinct => (0..len as u32).map(|i| address(i % universe)).collect(),
        }
    }
}

/// Spreads small ranks across the address space.
fn address(rank: u32) -> Ipv4Addr {
    Ipv4Addr::from(rank.wrapping_mul(2_654_435_761))
}
