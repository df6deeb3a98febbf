mod math;

#[cfg(test)]
mod invariants;

pub use math::*;
