// Fetchdock services
// Collaborator seams and adapters: transfer backend, local disk probing, settings, updates.

pub mod local_disk;
pub mod settings_engine;
pub mod transfer_backend;
pub mod update_manager;
