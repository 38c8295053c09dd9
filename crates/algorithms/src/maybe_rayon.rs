//! Row iteration that is parallel when the `parallel` feature is on.
//!
//! With the feature, this is `rayon::prelude`. Without it (single-threaded
//! or wasm builds), `into_par_iter()` resolves to a plain `into_iter()` so
//! the raster kernels compile unchanged against `std::iter::Iterator`.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
pub use serial::IntoParallelIterator;

#[cfg(not(feature = "parallel"))]
mod serial {
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}
