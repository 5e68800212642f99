//! Store services layered over a [`Context`](crate::Context).

mod client;
mod server;
mod store;

pub use client::{AvailableProduct, ClientStoreService};
pub use server::{ServerStoreService, NOT_SUBSCRIBED};
pub use store::StoreService;
