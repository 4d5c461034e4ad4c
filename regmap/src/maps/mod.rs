//! The built-in register maps, bit-exact with the generated C headers.

pub mod encoder;
pub mod probe;
pub mod wrapper;

use model::Model;

use crate::revision::Revision;

pub use encoder::encoder;
pub use probe::probe;
pub use wrapper::wrapper;

/// Every built-in map: each encoder revision followed by the TX wrapper.
pub fn all() -> Vec<Model> {
    Revision::ALL
        .into_iter()
        .map(encoder)
        .chain([wrapper()])
        .collect()
}
