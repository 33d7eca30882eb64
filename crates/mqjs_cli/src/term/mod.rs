mod logger;

pub mod styles;

pub use logger::init_logger;
