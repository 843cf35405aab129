//! The key/value slot that persists the transaction set between restarts.
//!
//! The set is stored as a JSON array under a single key. Only the date, type,
//! category and amount of each transaction are stored.

use rusqlite::{Connection, OptionalExtension, params};

use crate::{Error, transaction::Transaction};

/// The key of the slot holding the transaction set.
pub const STORAGE_KEY: &str = "finanzly_data";

pub fn create_storage_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS app_storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Load the persisted transactions.
///
/// Returns an empty list if nothing has been saved yet. If the slot holds
/// data that cannot be read as transactions, the slot is cleared and an empty
/// list is returned.
///
/// # Errors
/// Returns an [Error::SqlError] if the slot could not be read or cleared.
pub fn load_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let value: Option<String> = connection
        .query_row(
            "SELECT value FROM app_storage WHERE key = ?1",
            params![STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()?;

    let Some(value) = value else {
        tracing::info!("No saved transactions found, starting with an empty set");
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<Transaction>>(&value) {
        Ok(transactions) => {
            tracing::info!("Loaded {} saved transactions", transactions.len());
            Ok(transactions)
        }
        Err(error) => {
            tracing::error!("PersistedStateCorrupt: could not read saved transactions: {error}");
            clear_transactions(connection)?;
            Ok(Vec::new())
        }
    }
}

/// Save `transactions`, replacing whatever was saved before.
///
/// # Errors
/// Returns an [Error::JsonSerializationError] if the transactions could not be
/// serialized or an [Error::SqlError] if the slot could not be written.
pub fn save_transactions(transactions: &[Transaction], connection: &Connection) -> Result<(), Error> {
    let value = serde_json::to_string(transactions)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    connection.execute(
        "INSERT INTO app_storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![STORAGE_KEY, value],
    )?;

    tracing::debug!(
        "Saved {} transactions ({} bytes)",
        transactions.len(),
        value.len()
    );

    Ok(())
}

/// Delete the saved transactions.
pub fn clear_transactions(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM app_storage WHERE key = ?1",
        params![STORAGE_KEY],
    )?;

    Ok(())
}

#[cfg(test)]
mod storage_tests {
    use rusqlite::{Connection, params};

    use crate::{Error, db::initialize, transaction::Transaction};

    use super::{STORAGE_KEY, clear_transactions, load_transactions, save_transactions};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn example_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new("2024-01-15", "Ingreso", "Salario", 1000.0),
            Transaction::new("2024-01-20", "Gasto", "Ocio", 200.0),
        ]
    }

    fn slot_exists(connection: &Connection) -> bool {
        connection
            .query_row(
                "SELECT COUNT(*) FROM app_storage WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get::<_, i64>(0),
            )
            .unwrap()
            == 1
    }

    #[test]
    fn load_empty_slot_returns_no_transactions() {
        let connection = get_test_connection();

        let transactions = load_transactions(&connection).unwrap();

        assert!(transactions.is_empty());
    }

    #[test]
    fn saved_transactions_load_unchanged() {
        let connection = get_test_connection();
        let want = example_transactions();

        save_transactions(&want, &connection).unwrap();
        let got = load_transactions(&connection).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn saved_amounts_keep_every_digit() {
        let connection = get_test_connection();
        let want = vec![
            Transaction::new("2024-01-01", "Gasto", "Vivienda", 2073866.2810683418),
            Transaction::new("2024-01-02", "Ingreso", "Salario", 0.1 + 0.2),
            Transaction::new("2024-01-03", "Gasto", "Ocio", 9999999.999999998),
        ];

        save_transactions(&want, &connection).unwrap();
        let got = load_transactions(&connection).unwrap();

        assert_eq!(want, got);
        assert_eq!(got[0].amount().to_bits(), 2073866.2810683418_f64.to_bits());
    }

    #[test]
    fn save_replaces_previous_transactions() {
        let connection = get_test_connection();
        save_transactions(&example_transactions(), &connection).unwrap();
        let want = vec![Transaction::new("2024-03-01", "Gasto", "Comida", 12.5)];

        save_transactions(&want, &connection).unwrap();

        assert_eq!(load_transactions(&connection).unwrap(), want);
    }

    #[test]
    fn corrupt_slot_is_cleared() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO app_storage (key, value) VALUES (?1, ?2)",
                params![STORAGE_KEY, "{not json"],
            )
            .unwrap();

        let transactions = load_transactions(&connection).unwrap();

        assert!(transactions.is_empty());
        assert!(!slot_exists(&connection));
    }

    #[test]
    fn clear_removes_slot() {
        let connection = get_test_connection();
        save_transactions(&example_transactions(), &connection).unwrap();

        clear_transactions(&connection).unwrap();

        assert!(!slot_exists(&connection));
        assert!(load_transactions(&connection).unwrap().is_empty());
    }

    #[test]
    fn save_without_table_fails() {
        let connection = Connection::open_in_memory().unwrap();

        let result = save_transactions(&example_transactions(), &connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }
}
