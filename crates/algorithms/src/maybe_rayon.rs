//! `into_par_iter` for batch index ranges, with or without rayon.
//!
//! The pipeline fans arrays out as `(0..len).into_par_iter().map(f).collect()`.
//! With `parallel` that is rayon's indexed iterator, whose `collect` keeps
//! index order. Without it the same expression runs on a plain `Range`, so
//! batch reports come out identical in both builds.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    use std::ops::Range;

    /// Sequential `into_par_iter` for array index ranges
    pub trait IntoParallelIterator {
        type Iter: Iterator<Item = usize>;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl IntoParallelIterator for Range<usize> {
        type Iter = Range<usize>;
        fn into_par_iter(self) -> Self::Iter {
            self
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
