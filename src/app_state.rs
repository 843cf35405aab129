//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, RwLock};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    storage::load_transactions,
    transaction::TransactionSet,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the storage slot.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The transactions shown by every page.
    ///
    /// Only ever replaced as a whole by [AppState::replace_transactions].
    pub transactions: Arc<RwLock<TransactionSet>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database and load any transactions
    /// saved by a previous import.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or read.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let transactions = TransactionSet::new(load_transactions(&db_connection)?);

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            transactions: Arc::new(RwLock::new(transactions)),
        })
    }

    /// Get a snapshot of the current transactions.
    ///
    /// The snapshot is unaffected by later imports.
    ///
    /// # Errors
    /// Returns an [Error::StateLockError] if the lock is poisoned.
    pub fn transactions(&self) -> Result<TransactionSet, Error> {
        get_transactions_snapshot(&self.transactions)
    }

    /// Swap in `transactions` as the current set.
    ///
    /// # Errors
    /// Returns an [Error::StateLockError] if the lock is poisoned.
    pub fn replace_transactions(&self, transactions: TransactionSet) -> Result<(), Error> {
        replace_transactions(&self.transactions, transactions)
    }
}

/// Clone the set behind `transactions` without holding the lock afterwards.
pub(crate) fn get_transactions_snapshot(
    transactions: &RwLock<TransactionSet>,
) -> Result<TransactionSet, Error> {
    transactions
        .read()
        .map(|transactions| transactions.clone())
        .map_err(|error| {
            tracing::error!("could not acquire transactions read lock: {error}");
            Error::StateLockError
        })
}

pub(crate) fn replace_transactions(
    transactions: &RwLock<TransactionSet>,
    new_transactions: TransactionSet,
) -> Result<(), Error> {
    let mut current = transactions.write().map_err(|error| {
        tracing::error!("could not acquire transactions write lock: {error}");
        Error::StateLockError
    })?;

    *current = new_transactions;

    Ok(())
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        storage::save_transactions,
        transaction::{Transaction, TransactionSet},
    };

    use super::AppState;

    #[test]
    fn new_state_with_empty_database_has_no_transactions() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();

        assert!(state.transactions().unwrap().is_empty());
    }

    #[test]
    fn new_state_loads_saved_transactions() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let saved = vec![Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0)];
        save_transactions(&saved, &connection).unwrap();

        let state = AppState::new(connection).unwrap();

        assert_eq!(state.transactions().unwrap().as_slice(), saved.as_slice());
    }

    #[test]
    fn replace_swaps_whole_set_and_keeps_old_snapshots() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        let before = state.transactions().unwrap();
        let new_set = TransactionSet::new(vec![
            Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0),
            Transaction::new("2024-01-20", "Gasto", "Ocio", 200.0),
        ]);

        state.replace_transactions(new_set.clone()).unwrap();

        assert_eq!(state.transactions().unwrap(), new_set);
        assert!(before.is_empty());
    }
}
