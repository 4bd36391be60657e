//! The in-memory copy of all five collections.

use serde::{Deserialize, Serialize};

use crate::{
    cost_center::CostCenter,
    credit_sale::CreditSale,
    database_id::{CostCenterId, CreditSaleId, PaymentMethodId, TransactionId, UserId},
    payment_method::PaymentMethod,
    transaction::Transaction,
    user::User,
};

/// Every record the application knows about.
///
/// This is also the shape of the JSON document kept by the local store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub cost_centers: Vec<CostCenter>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub credit_sales: Vec<CreditSale>,
}

impl Snapshot {
    /// The state of a brand new installation: the master user and nothing else.
    pub fn seed() -> Self {
        Self {
            users: vec![User::seed_master()],
            ..Default::default()
        }
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn cost_center(&self, id: CostCenterId) -> Option<&CostCenter> {
        self.cost_centers.iter().find(|center| center.id == id)
    }

    pub fn payment_method(&self, id: PaymentMethodId) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|method| method.id == id)
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    pub fn credit_sale(&self, id: CreditSaleId) -> Option<&CreditSale> {
        self.credit_sales.iter().find(|sale| sale.id == id)
    }

    /// The transaction recording the down payment of the credit sale `id`, if any.
    pub fn linked_transaction(&self, id: CreditSaleId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.credit_sale_id == Some(id))
    }

    /// The name of the cost center `id`, or `None` if it no longer exists.
    pub fn cost_center_name(&self, id: Option<CostCenterId>) -> Option<&str> {
        id.and_then(|id| self.cost_center(id))
            .map(|center| center.name.as_str())
    }

    pub fn payment_method_name(&self, id: Option<PaymentMethodId>) -> Option<&str> {
        id.and_then(|id| self.payment_method(id))
            .map(|method| method.name.as_str())
    }
}
