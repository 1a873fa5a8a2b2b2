use std::{collections::BTreeSet, ops::Range};

use rand::{
    distributions::{Distribution, Uniform},
    seq::SliceRandom,
    Rng,
};

pub trait Gen {
    type Output;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output;
}

impl Gen for Range<i32> {
    type Output = i32;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let between = Uniform::from(self.clone());
        between.sample(rng)
    }
}

/// `len` distinct keys drawn from `bound`, in shuffled order.
pub struct UniqueKeys {
    pub bound: Range<i32>,
    pub len: usize,
}

impl Gen for UniqueKeys {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { bound, len } = self;
        assert!((bound.end - bound.start) as usize >= *len);

        let mut seen = BTreeSet::new();
        while seen.len() < *len {
            seen.insert(bound.clone().generate(rng));
        }
        let mut keys: Vec<_> = seen.into_iter().collect();
        keys.shuffle(rng);
        keys
    }
}

/// Keys `0..distinct`, each repeated between 1 and `max_run` times,
/// in shuffled order.
pub struct KeyRuns {
    pub distinct: usize,
    pub max_run: usize,
}

impl Gen for KeyRuns {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { distinct, max_run } = self;
        let mut keys = vec![];
        for k in 0..*distinct as i32 {
            let run = rng.gen_range(1..=*max_run);
            keys.extend(std::iter::repeat(k).take(run));
        }
        keys.shuffle(rng);
        keys
    }
}
