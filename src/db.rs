//! Sets up the application's SQLite database.

use rusqlite::Connection;

use crate::{Error, storage::create_storage_table};

/// Create the tables the application needs, if they do not exist yet.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_storage_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
