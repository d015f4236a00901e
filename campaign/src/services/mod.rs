//! Production service implementations for the injected traits

pub mod completion;
pub mod notifier;
pub mod store;
pub mod surface;

#[cfg(test)]
mod tests;

pub use completion::HttpCompletionClient;
pub use notifier::{HttpNotifier, NullNotifier};
pub use store::JsonlEngagementStore;
pub use surface::{RemoteSurface, ScriptedSurface};
