use config::shared::MySqlConnectionConfig;
use mysql::connection::{close_record_store, connect_to_record_store};
use sqlx::mysql::{MySql, MySqlConnection};
use sqlx::{Connection, Transaction};

use crate::normalize::NormalizedRow;
use crate::store::base::{HandleStore, HandleTransaction, StoreResult, URL_HANDLE_TYPE};

/// Conditional update applied for every valid row.
///
/// The driver negotiates found-rows reporting, so re-applying an identical value
/// still reports the record as matched.
const UPDATE_HANDLE_URL_SQL: &str = "UPDATE handles SET data = ? WHERE handle = ? AND type = ?";

/// [`HandleStore`] backed by a single MySQL connection.
pub struct MySqlHandleStore {
    connection: MySqlConnection,
}

impl MySqlHandleStore {
    /// Connects to the record store described by `config`.
    pub async fn connect(config: &MySqlConnectionConfig) -> Result<Self, sqlx::Error> {
        let connection = connect_to_record_store(config).await?;

        Ok(Self::from_connection(connection))
    }

    /// Wraps an already established connection.
    pub fn from_connection(connection: MySqlConnection) -> Self {
        Self { connection }
    }

    /// Closes the underlying connection.
    pub async fn close(self) {
        close_record_store(self.connection).await;
    }
}

impl HandleStore for MySqlHandleStore {
    type Transaction<'c> = MySqlHandleTransaction<'c>;

    async fn begin(&mut self) -> StoreResult<Self::Transaction<'_>> {
        let transaction = self.connection.begin().await?;

        Ok(MySqlHandleTransaction { transaction })
    }
}

/// A MySQL transaction on the store's connection.
///
/// Rolled back by the driver when dropped uncommitted.
pub struct MySqlHandleTransaction<'c> {
    transaction: Transaction<'c, MySql>,
}

impl HandleTransaction for MySqlHandleTransaction<'_> {
    async fn update_url(&mut self, row: &NormalizedRow) -> StoreResult<u64> {
        let result = sqlx::query(UPDATE_HANDLE_URL_SQL)
            .bind(&row.url)
            .bind(&row.handle)
            .bind(URL_HANDLE_TYPE)
            .execute(&mut *self.transaction)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self) -> StoreResult<()> {
        self.transaction.commit().await?;

        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        self.transaction.rollback().await?;

        Ok(())
    }
}
