//! Seams to the external collaborators. Both are shared across concurrent
//! runs behind `Arc<dyn ...>`.

mod index_provider;
mod reasoning_model;

pub use index_provider::IIndexProvider;
pub use reasoning_model::IReasoningModel;
