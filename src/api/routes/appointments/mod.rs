pub mod public;
pub mod router;

pub use router::router;
