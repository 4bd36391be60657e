//! Record ID type definitions.
//!
//! Every record is identified by a UUID generated by the application, so the
//! same record can be upserted into either store.

use uuid::Uuid;

pub type UserId = Uuid;
pub type CostCenterId = Uuid;
pub type SubgroupId = Uuid;
pub type PaymentMethodId = Uuid;
pub type TransactionId = Uuid;
pub type CreditSaleId = Uuid;

/// Generate a fresh random ID for a new record.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}
