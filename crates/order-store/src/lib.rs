pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod store;

pub use common::OrderId;
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use order::{Order, OrderItem};
pub use postgres::PostgresOrderStore;
pub use store::{OrderStore, TransitionOutcome};
