mod encoder;
mod mode;
mod writer;

pub use encoder::*;
pub use mode::*;
pub use writer::*;
