//! Transaction bookkeeping: listing, recording, replacing and removing.
//!
//! Category references are stored as given; a reference to a missing category
//! is allowed and shows up as "Uncategorized" in analytics.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::commands::transactions::{TransactionCommand, TransactionListQuery};
use crate::domain::errors::DomainError;
use crate::domain::models::Transaction;
use crate::storage::{Connection, TransactionFilter, TransactionStorage};

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    transaction_repository: C::TransactionRepository,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let transaction_repository = connection.create_transaction_repository();
        Self {
            transaction_repository,
        }
    }

    /// Most recent first
    pub async fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> Result<Vec<Transaction>, DomainError> {
        let filter = match query.period {
            Some(period) => TransactionFilter::within(period.window()?),
            None => TransactionFilter::default(),
        };

        let transactions = self.transaction_repository.find_transactions(&filter).await?;
        info!("Listed {} transactions", transactions.len());
        Ok(transactions)
    }

    pub async fn create_transaction(
        &self,
        command: TransactionCommand,
    ) -> Result<Transaction, DomainError> {
        let now = Utc::now();
        let transaction = Transaction {
            id: Transaction::generate_id(),
            amount: command.amount,
            date: command.date,
            description: command.description,
            category: command.category,
            transaction_type: command.transaction_type,
            created_at: now,
            updated_at: now,
        };

        self.transaction_repository.store_transaction(&transaction).await?;
        info!(
            "Recorded {} transaction {} of {:.2}",
            transaction.transaction_type, transaction.id, transaction.amount
        );
        Ok(transaction)
    }

    /// Replace every user-supplied field of an existing transaction
    pub async fn update_transaction(
        &self,
        transaction_id: &str,
        command: TransactionCommand,
    ) -> Result<Transaction, DomainError> {
        let existing = self
            .transaction_repository
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| {
                warn!("Transaction {} not found for update", transaction_id);
                DomainError::not_found(format!("Transaction {} not found", transaction_id))
            })?;

        let transaction = Transaction {
            amount: command.amount,
            date: command.date,
            description: command.description,
            category: command.category,
            transaction_type: command.transaction_type,
            updated_at: Utc::now(),
            ..existing
        };

        // The record may have been deleted since it was read
        if !self.transaction_repository.update_transaction(&transaction).await? {
            return Err(DomainError::not_found(format!(
                "Transaction {} not found",
                transaction_id
            )));
        }

        info!("Updated transaction {}", transaction_id);
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<(), DomainError> {
        if !self.transaction_repository.delete_transaction(transaction_id).await? {
            warn!("Transaction {} not found for deletion", transaction_id);
            return Err(DomainError::not_found(format!(
                "Transaction {} not found",
                transaction_id
            )));
        }

        info!("Deleted transaction {}", transaction_id);
        Ok(())
    }
}
