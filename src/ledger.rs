//! The application state holder: a store plus the in-memory snapshot mirroring it.
//!
//! The snapshot is hydrated once from the store. Each mutation calls the store
//! first and only touches the snapshot after every store call has succeeded,
//! so a failed call leaves the snapshot as it was.

use std::slice;

use crate::{
    Error,
    cost_center::CostCenter,
    credit_sale::CreditSale,
    database_id::{CreditSaleId, PaymentMethodId, TransactionId, UserId},
    payment_method::PaymentMethod,
    snapshot::Snapshot,
    store::{Backend, Filter, Record, Store},
    transaction::Transaction,
    user::User,
};

/// The store and the snapshot of everything in it.
#[derive(Debug)]
pub struct Ledger<S = Backend> {
    store: S,
    snapshot: Snapshot,
}

impl<S: Store> Ledger<S> {
    /// Load every collection from `store`.
    ///
    /// If the store has no users, the master user is written to it first.
    ///
    /// # Errors
    /// Returns an error if any collection cannot be read or the master user
    /// cannot be written.
    pub fn hydrate(mut store: S) -> Result<Self, Error> {
        let mut snapshot = Snapshot {
            users: store.select(&Filter::All)?,
            cost_centers: store.select(&Filter::All)?,
            payment_methods: store.select(&Filter::All)?,
            transactions: store.select(&Filter::All)?,
            credit_sales: store.select(&Filter::All)?,
        };

        if snapshot.users.is_empty() {
            tracing::info!("No users found, creating the master user.");
            let master = User::seed_master();
            store.insert(&master)?;
            snapshot.users.push(master);
        }

        tracing::debug!(
            "Hydrated ledger with {} users, {} transactions and {} credit sales.",
            snapshot.users.len(),
            snapshot.transactions.len(),
            snapshot.credit_sales.len()
        );

        Ok(Self { store, snapshot })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), Error> {
        self.store.insert(&transaction)?;
        self.snapshot.transactions.insert(0, transaction);

        Ok(())
    }

    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if the transaction is not in the store.
    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<(), Error> {
        if self.store.update(&transaction)? == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        replace_by_id(&mut self.snapshot.transactions, transaction);

        Ok(())
    }

    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if the transaction is not in the store.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<(), Error> {
        if self.store.delete::<Transaction>(&Filter::id(id))? == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        self.snapshot
            .transactions
            .retain(|transaction| transaction.id != id);

        Ok(())
    }

    /// # Errors
    /// Returns [Error::DuplicateUsername] if another user has the same username.
    pub fn add_user(&mut self, user: User) -> Result<(), Error> {
        self.check_username_is_free(&user)?;
        self.store.insert(&user)?;
        self.snapshot.users.push(user);

        Ok(())
    }

    /// Replace the stored user with the same ID as `user`.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::UpdateMissingUser] if the user does not exist.
    /// - [Error::DeactivateMasterUser] if `user` would deactivate a master user.
    /// - [Error::DuplicateUsername] if another user has the same username.
    pub fn update_user(&mut self, user: User) -> Result<(), Error> {
        let existing = self
            .snapshot
            .user(user.id)
            .ok_or(Error::UpdateMissingUser)?;

        if existing.is_master() && !user.active {
            return Err(Error::DeactivateMasterUser);
        }

        self.check_username_is_free(&user)?;

        if self.store.update(&user)? == 0 {
            return Err(Error::UpdateMissingUser);
        }

        replace_by_id(&mut self.snapshot.users, user);

        Ok(())
    }

    /// # Errors
    /// Returns [Error::DeleteMasterUser] for master users and
    /// [Error::DeleteMissingUser] if the user does not exist.
    pub fn delete_user(&mut self, id: UserId) -> Result<(), Error> {
        let existing = self.snapshot.user(id).ok_or(Error::DeleteMissingUser)?;

        if existing.is_master() {
            return Err(Error::DeleteMasterUser);
        }

        if self.store.delete::<User>(&Filter::id(id))? == 0 {
            return Err(Error::DeleteMissingUser);
        }

        self.snapshot.users.retain(|user| user.id != id);

        Ok(())
    }

    fn check_username_is_free(&self, user: &User) -> Result<(), Error> {
        let is_taken = self
            .snapshot
            .users
            .iter()
            .any(|other| other.id != user.id && other.username == user.username);

        if is_taken {
            Err(Error::DuplicateUsername(user.username.clone()))
        } else {
            Ok(())
        }
    }

    pub fn add_payment_method(&mut self, payment_method: PaymentMethod) -> Result<(), Error> {
        self.store.insert(&payment_method)?;
        self.snapshot.payment_methods.push(payment_method);

        Ok(())
    }

    pub fn update_payment_method(&mut self, payment_method: PaymentMethod) -> Result<(), Error> {
        if self.store.update(&payment_method)? == 0 {
            return Err(Error::UpdateMissingPaymentMethod);
        }

        replace_by_id(&mut self.snapshot.payment_methods, payment_method);

        Ok(())
    }

    pub fn delete_payment_method(&mut self, id: PaymentMethodId) -> Result<(), Error> {
        if self.store.delete::<PaymentMethod>(&Filter::id(id))? == 0 {
            return Err(Error::DeleteMissingPaymentMethod);
        }

        self.snapshot.payment_methods.retain(|method| method.id != id);

        Ok(())
    }

    /// Make `cost_centers` the complete list of cost centers.
    ///
    /// The list is upserted and then every stored cost center that is not in
    /// it is deleted.
    pub fn replace_cost_centers(&mut self, cost_centers: Vec<CostCenter>) -> Result<(), Error> {
        self.store.upsert(&cost_centers)?;

        let ids = cost_centers
            .iter()
            .map(|center| center.id.to_string())
            .collect::<Vec<_>>();
        let stale = if ids.is_empty() {
            Filter::All
        } else {
            Filter::NotIn("id", ids)
        };
        self.store.delete::<CostCenter>(&stale)?;

        self.snapshot.cost_centers = cost_centers;

        Ok(())
    }

    /// Save a credit sale and its down payment transaction.
    ///
    /// The sale is upserted first. Then `transaction` is upserted if given and
    /// any other transaction linked to the sale is deleted, otherwise every
    /// transaction linked to the sale is deleted. The snapshot is only updated
    /// once every store call succeeds.
    ///
    /// If a later store call fails the sale stays written in the store.
    pub fn save_credit_sale(
        &mut self,
        sale: CreditSale,
        transaction: Option<Transaction>,
    ) -> Result<(), Error> {
        self.store.upsert(slice::from_ref(&sale))?;

        match &transaction {
            Some(transaction) => {
                self.store.upsert(slice::from_ref(transaction))?;

                let linked: Vec<Transaction> = self.store.select(&linked_to(sale.id))?;
                for stale in linked.iter().filter(|linked| linked.id != transaction.id) {
                    self.store.delete::<Transaction>(&Filter::id(stale.id))?;
                }
            }
            None => {
                self.store.delete::<Transaction>(&linked_to(sale.id))?;
            }
        }

        let sale_id = sale.id;
        let transaction_id = transaction.as_ref().map(|transaction| transaction.id);
        self.snapshot.transactions.retain(|existing| {
            existing.credit_sale_id != Some(sale_id) && Some(existing.id) != transaction_id
        });

        if let Some(transaction) = transaction {
            self.snapshot.transactions.insert(0, transaction);
        }

        replace_or_prepend(&mut self.snapshot.credit_sales, sale);

        Ok(())
    }

    /// Delete a credit sale and every transaction linked to it.
    ///
    /// Deleting a sale that does not exist does nothing.
    pub fn delete_credit_sale(&mut self, id: CreditSaleId) -> Result<(), Error> {
        self.store.delete::<CreditSale>(&Filter::id(id))?;
        self.store.delete::<Transaction>(&linked_to(id))?;

        self.snapshot.credit_sales.retain(|sale| sale.id != id);
        self.snapshot
            .transactions
            .retain(|transaction| transaction.credit_sale_id != Some(id));

        Ok(())
    }
}

fn linked_to(sale_id: CreditSaleId) -> Filter {
    Filter::Eq("credit_sale_id", sale_id.to_string())
}

fn replace_by_id<R: Record>(records: &mut [R], record: R) {
    if let Some(existing) = records.iter_mut().find(|existing| existing.id() == record.id()) {
        *existing = record;
    }
}

fn replace_or_prepend<R: Record>(records: &mut Vec<R>, record: R) {
    match records.iter_mut().find(|existing| existing.id() == record.id()) {
        Some(existing) => *existing = record,
        None => records.insert(0, record),
    }
}
