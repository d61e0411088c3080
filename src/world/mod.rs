pub mod configurator;
pub mod map;

pub use configurator::{Configurator, DispatchQueueEntry};
pub use map::GridMap;
