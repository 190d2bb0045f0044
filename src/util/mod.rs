pub mod logging;
pub mod ring_buffer;
