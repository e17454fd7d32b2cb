//! Postgres-backed persistence gateway.
//!
//! All values travel as bound parameters; nothing computed or
//! user-influenced is ever interpolated into a query string.
//!
//! ## Admission atomicity
//!
//! `insert_rental` runs one transaction that row-locks the game
//! (`SELECT … FOR UPDATE`), counts the game's open rentals, and inserts.
//! Concurrent admissions for the same game serialize on the game row, so
//! the open-rental count can never exceed `stock_total`. "Count, then
//! insert" as two unguarded statements permits overbooking and is not an
//! acceptable implementation of this method.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::instrument;

use boardrent_catalog::Game;
use boardrent_core::{CustomerId, GameId, RentalId, StoreError};
use boardrent_parties::{Cpf, Customer};
use boardrent_rentals::{Admission, Rental, RentalStore, RentalWithNames};

use crate::directory::DirectoryStore;

/// Postgres persistence gateway over a `sqlx` connection pool.
///
/// `Send + Sync`; clone freely. The pool handles connection management.
#[derive(Debug, Clone)]
pub struct PostgresRentalStore {
    pool: Arc<PgPool>,
}

impl PostgresRentalStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(op: &'static str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        // 23505: unique_violation (duplicate cpf on customers).
        if db.code().as_deref() == Some("23505") {
            return StoreError::Conflict(format!("{op}: {}", db.message()));
        }
    }
    StoreError::backend(format!("{op}: {e}"))
}

fn game_from_row(row: &sqlx::postgres::PgRow) -> Result<Game, StoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| StoreError::backend(format!("game row: {e}")))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| StoreError::backend(format!("game row: {e}")))?;
    let image: String = row
        .try_get("image")
        .map_err(|e| StoreError::backend(format!("game row: {e}")))?;
    let stock_total: i32 = row
        .try_get("stock_total")
        .map_err(|e| StoreError::backend(format!("game row: {e}")))?;
    let price_per_day: i64 = row
        .try_get("price_per_day")
        .map_err(|e| StoreError::backend(format!("game row: {e}")))?;

    Ok(Game::from_record(
        GameId::from_uuid(id),
        name,
        image,
        stock_total as u32,
        price_per_day,
    ))
}

fn customer_from_row(row: &sqlx::postgres::PgRow) -> Result<Customer, StoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| StoreError::backend(format!("customer row: {e}")))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| StoreError::backend(format!("customer row: {e}")))?;
    let phone: String = row
        .try_get("phone")
        .map_err(|e| StoreError::backend(format!("customer row: {e}")))?;
    let cpf: String = row
        .try_get("cpf")
        .map_err(|e| StoreError::backend(format!("customer row: {e}")))?;
    let birthday: NaiveDate = row
        .try_get("birthday")
        .map_err(|e| StoreError::backend(format!("customer row: {e}")))?;

    let cpf = Cpf::parse(cpf).map_err(|e| StoreError::backend(format!("customer row: {e}")))?;
    Ok(Customer::from_record(
        CustomerId::from_uuid(id),
        name,
        phone,
        cpf,
        birthday,
    ))
}

fn rental_from_row(row: &sqlx::postgres::PgRow) -> Result<Rental, StoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let customer_id: uuid::Uuid = row
        .try_get("customer_id")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let game_id: uuid::Uuid = row
        .try_get("game_id")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let rent_date: NaiveDate = row
        .try_get("rent_date")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let days_rented: i32 = row
        .try_get("days_rented")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let return_date: Option<NaiveDate> = row
        .try_get("return_date")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let original_price: i64 = row
        .try_get("original_price")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
    let delay_fee: Option<i64> = row
        .try_get("delay_fee")
        .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;

    Ok(Rental::from_record(
        RentalId::from_uuid(id),
        CustomerId::from_uuid(customer_id),
        GameId::from_uuid(game_id),
        rent_date,
        days_rented as u32,
        return_date,
        original_price,
        delay_fee,
    ))
}

#[async_trait]
impl RentalStore for PostgresRentalStore {
    #[instrument(skip(self), fields(game_id = %id), err)]
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, image, stock_total, price_per_day
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_game", e))?;

        row.as_ref().map(game_from_row).transpose()
    }

    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, cpf, birthday
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_customer", e))?;

        row.as_ref().map(customer_from_row).transpose()
    }

    #[instrument(skip(self), fields(game_id = %game_id), err)]
    async fn count_active_rentals(&self, game_id: GameId) -> Result<i64, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS open_count
            FROM rentals
            WHERE game_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(game_id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_active_rentals", e))?;

        row.try_get("open_count")
            .map_err(|e| StoreError::backend(format!("count_active_rentals: {e}")))
    }

    #[instrument(skip(self, rental), fields(rental_id = %rental.id_typed(), game_id = %rental.game_id()), err)]
    async fn insert_rental(&self, rental: &Rental) -> Result<Admission, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_rental:begin", e))?;

        // Lock the game row: concurrent admissions for this game serialize
        // here until commit.
        let stock_row = sqlx::query(
            r#"
            SELECT stock_total
            FROM games
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(rental.game_id().as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_rental:lock", e))?;

        let stock_total: i32 = match stock_row {
            Some(row) => row
                .try_get("stock_total")
                .map_err(|e| StoreError::backend(format!("insert_rental: {e}")))?,
            None => return Err(StoreError::backend("rental references an unknown game")),
        };

        let count_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS open_count
            FROM rentals
            WHERE game_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(rental.game_id().as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_rental:count", e))?;
        let open_count: i64 = count_row
            .try_get("open_count")
            .map_err(|e| StoreError::backend(format!("insert_rental: {e}")))?;

        if open_count >= i64::from(stock_total) {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("insert_rental:rollback", e))?;
            return Ok(Admission::Exhausted);
        }

        sqlx::query(
            r#"
            INSERT INTO rentals
                (id, customer_id, game_id, rent_date, days_rented,
                 return_date, original_price, delay_fee)
            VALUES ($1, $2, $3, $4, $5, NULL, $6, NULL)
            "#,
        )
        .bind(rental.id_typed().as_uuid())
        .bind(rental.customer_id().as_uuid())
        .bind(rental.game_id().as_uuid())
        .bind(rental.rent_date())
        .bind(rental.days_rented() as i32)
        .bind(rental.original_price())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_rental:insert", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_rental:commit", e))?;

        Ok(Admission::Granted)
    }

    #[instrument(skip(self), fields(rental_id = %id), err)]
    async fn get_rental(&self, id: RentalId) -> Result<Option<Rental>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, game_id, rent_date, days_rented,
                   return_date, original_price, delay_fee
            FROM rentals
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_rental", e))?;

        row.as_ref().map(rental_from_row).transpose()
    }

    #[instrument(skip(self), fields(rental_id = %id), err)]
    async fn update_rental_on_return(
        &self,
        id: RentalId,
        return_date: NaiveDate,
        delay_fee: i64,
    ) -> Result<bool, StoreError> {
        // Gated on the row still being open; both fields land in one update.
        let result = sqlx::query(
            r#"
            UPDATE rentals
            SET return_date = $2, delay_fee = $3
            WHERE id = $1 AND return_date IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(return_date)
        .bind(delay_fee)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_rental_on_return", e))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(rental_id = %id), err)]
    async fn delete_rental(&self, id: RentalId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM rentals
            WHERE id = $1 AND return_date IS NOT NULL
            "#,
        )
        .bind(id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_rental", e))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), err)]
    async fn list_rentals_with_names(&self) -> Result<Vec<RentalWithNames>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.customer_id, r.game_id, r.rent_date, r.days_rented,
                   r.return_date, r.original_price, r.delay_fee,
                   c.name AS customer_name, g.name AS game_name
            FROM rentals r
            JOIN customers c ON c.id = r.customer_id
            JOIN games g ON g.id = r.game_id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_rentals_with_names", e))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let rental = rental_from_row(&row)?;
            let customer_name: String = row
                .try_get("customer_name")
                .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
            let game_name: String = row
                .try_get("game_name")
                .map_err(|e| StoreError::backend(format!("rental row: {e}")))?;
            out.push(RentalWithNames {
                rental,
                customer_name,
                game_name,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl DirectoryStore for PostgresRentalStore {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id_typed()), err)]
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, cpf, birthday)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(customer.id_typed().as_uuid())
        .bind(customer.name())
        .bind(customer.phone())
        .bind(customer.cpf().as_str())
        .bind(customer.birthday())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Ok(())
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.id_typed()), err)]
    async fn update_customer(&self, customer: &Customer) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, phone = $3, cpf = $4, birthday = $5
            WHERE id = $1
            "#,
        )
        .bind(customer.id_typed().as_uuid())
        .bind(customer.name())
        .bind(customer.phone())
        .bind(customer.cpf().as_str())
        .bind(customer.birthday())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_customer", e))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), err)]
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, cpf, birthday
            FROM customers
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_customers", e))?;

        rows.iter().map(customer_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, image, stock_total, price_per_day
            FROM games
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_games", e))?;

        rows.iter().map(game_from_row).collect()
    }
}
