pub mod context;
pub mod emission;
pub mod evaluation;
pub mod journal;
pub mod pipeline;
pub mod resources;
pub mod store;

pub use context::ActorContext;
pub use resources::{ActorArchetype, Occupancy, ResourceSet, ResourceTriple, RESOURCE_INFINITY};
pub use store::ActorStore;
