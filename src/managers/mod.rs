// Fetchdock state managers
// Managers own the download sessions: registry, event reconciliation, history persistence, filename collisions.

pub mod filename_resolver;
pub mod history_store;
pub mod reconciler;
pub mod session_registry;
