//! Image store implementations.

mod disk;

pub use disk::DiskImageStore;
