pub mod ids;
pub mod money;
pub mod status;

pub use ids::{OrderId, ProductId};
pub use money::Money;
pub use status::{OrderStatus, PaymentOutcome, UnknownStatus};
