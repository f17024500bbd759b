//! SQLite database layer (embedded, no external dependencies)

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result as AnyResult};
use forno_core::{validate_price, Error, Pizza, Restaurant, RestaurantPizza, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn connect(database_url: &str) -> AnyResult<Self> {
        tracing::info!("Opening SQLite database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {database_url}"))?;

        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Shared in-memory database for tests. A single-connection pool keeps
    /// every query on the same `:memory:` instance.
    pub async fn in_memory() -> AnyResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Raw pool handle; used by tests that need to inspect or mutate rows
    /// behind the cache's back.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn run_migrations(pool: &SqlitePool) -> AnyResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS restaurants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pizzas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                ingredients TEXT NOT NULL DEFAULT '[]'
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS restaurant_pizzas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                price INTEGER NOT NULL CHECK (price BETWEEN 1 AND 30),
                restaurant_id INTEGER NOT NULL REFERENCES restaurants(id) ON DELETE CASCADE,
                pizza_id INTEGER NOT NULL REFERENCES pizzas(id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Restaurant operations

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT id, name, address FROM restaurants ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT id, name, address FROM restaurants WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(|r| r.into()))
    }

    /// Delete a restaurant and its join rows in one transaction. Either
    /// both deletes commit or neither does.
    pub async fn delete_restaurant(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        sqlx::query(
            r#"
            DELETE FROM restaurant_pizzas WHERE restaurant_id = ?1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        let result = sqlx::query(
            r#"
            DELETE FROM restaurants WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(storage_err)?;
            return Err(Error::NotFound("Restaurant"));
        }

        tx.commit().await.map_err(storage_err)?;
        Ok(())
    }

    // Pizza operations

    pub async fn list_pizzas(&self) -> Result<Vec<Pizza>> {
        let rows: Vec<PizzaRow> = sqlx::query_as(
            r#"
            SELECT id, name, ingredients FROM pizzas ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    // RestaurantPizza operations

    /// Validate and insert a join row in one transaction: price domain
    /// check, then both foreign ids must resolve, then the insert. Any
    /// failure rolls back with no partial row visible. Returns the created
    /// join together with both referenced entities.
    pub async fn create_restaurant_pizza(
        &self,
        price: i64,
        restaurant_id: i64,
        pizza_id: i64,
    ) -> Result<(RestaurantPizza, Restaurant, Pizza)> {
        validate_price(price)?;

        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let restaurant: Option<RestaurantRow> = sqlx::query_as(
            r#"
            SELECT id, name, address FROM restaurants WHERE id = ?1
            "#,
        )
        .bind(restaurant_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_err)?;

        let pizza: Option<PizzaRow> = sqlx::query_as(
            r#"
            SELECT id, name, ingredients FROM pizzas WHERE id = ?1
            "#,
        )
        .bind(pizza_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_err)?;

        let mut errors = Vec::new();
        if restaurant.is_none() {
            errors.push("restaurant_id does not reference an existing restaurant".to_string());
        }
        if pizza.is_none() {
            errors.push("pizza_id does not reference an existing pizza".to_string());
        }
        let (Some(restaurant), Some(pizza)) = (restaurant, pizza) else {
            tx.rollback().await.map_err(storage_err)?;
            return Err(Error::Validation(errors));
        };

        let result = sqlx::query(
            r#"
            INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(price)
        .bind(restaurant_id)
        .bind(pizza_id)
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        let id = result.last_insert_rowid();

        tx.commit().await.map_err(storage_err)?;

        Ok((
            RestaurantPizza {
                id,
                price,
                restaurant_id,
                pizza_id,
            },
            restaurant.into(),
            pizza.into(),
        ))
    }

    /// Wipe and repopulate demo rows. Deletes existing data first so
    /// reseeding never duplicates entries.
    pub async fn seed_demo(&self) -> Result<()> {
        tracing::info!("Seeding demo data...");

        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        for table in ["restaurant_pizzas", "pizzas", "restaurants"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }

        for (name, address) in [
            ("Dough Joe's", "1 Main St"),
            ("Crust & Co.", "42 Flour Ave"),
            ("Slice Harbor", "9 Dock Rd"),
        ] {
            sqlx::query("INSERT INTO restaurants (name, address) VALUES (?1, ?2)")
                .bind(name)
                .bind(address)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }

        for (name, ingredients) in [
            ("Margherita", r#"["tomato","mozzarella","basil"]"#),
            ("Pepperoni", r#"["tomato","mozzarella","pepperoni"]"#),
            (
                "Quattro Formaggi",
                r#"["mozzarella","gorgonzola","parmesan","taleggio"]"#,
            ),
        ] {
            sqlx::query("INSERT INTO pizzas (name, ingredients) VALUES (?1, ?2)")
                .bind(name)
                .bind(ingredients)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }

        tx.commit().await.map_err(storage_err)?;

        tracing::info!("Seeding done");
        Ok(())
    }
}

/// The client only ever learns "service unavailable"; the detail stays in
/// the logs.
fn storage_err(e: sqlx::Error) -> Error {
    Error::Unavailable(e.to_string())
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    name: String,
    address: String,
}

impl From<RestaurantRow> for Restaurant {
    fn from(r: RestaurantRow) -> Self {
        Restaurant {
            id: r.id,
            name: r.name,
            address: r.address,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PizzaRow {
    id: i64,
    name: String,
    ingredients: String,
}

impl From<PizzaRow> for Pizza {
    fn from(r: PizzaRow) -> Self {
        Pizza {
            id: r.id,
            name: r.name,
            ingredients: serde_json::from_str(&r.ingredients).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_db() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.seed_demo().await.unwrap();
        db
    }

    #[tokio::test]
    async fn list_and_get_agree() {
        let db = seeded_db().await;

        let all = db.list_restaurants().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Dough Joe's");

        for restaurant in &all {
            let fetched = db.get_restaurant(restaurant.id).await.unwrap().unwrap();
            assert_eq!(&fetched, restaurant);
        }
    }

    #[tokio::test]
    async fn pizzas_keep_ingredient_order() {
        let db = seeded_db().await;

        let pizzas = db.list_pizzas().await.unwrap();
        assert_eq!(pizzas[0].name, "Margherita");
        assert_eq!(pizzas[0].ingredients, ["tomato", "mozzarella", "basil"]);
    }

    #[tokio::test]
    async fn delete_cascades_to_join_rows() {
        let db = seeded_db().await;

        db.create_restaurant_pizza(12, 1, 1).await.unwrap();
        db.create_restaurant_pizza(15, 1, 2).await.unwrap();
        db.create_restaurant_pizza(8, 2, 1).await.unwrap();

        db.delete_restaurant(1).await.unwrap();

        let (orphans,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas WHERE restaurant_id = 1")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(orphans, 0);

        // Unrelated join rows survive.
        let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn delete_missing_restaurant_is_not_found() {
        let db = seeded_db().await;
        assert_eq!(
            db.delete_restaurant(999).await.unwrap_err(),
            Error::NotFound("Restaurant")
        );
    }

    #[tokio::test]
    async fn create_rejects_price_outside_domain() {
        let db = seeded_db().await;

        assert!(matches!(
            db.create_restaurant_pizza(0, 1, 1).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            db.create_restaurant_pizza(31, 1, 1).await,
            Err(Error::Validation(_))
        ));
        assert!(db.create_restaurant_pizza(1, 1, 1).await.is_ok());
        assert!(db.create_restaurant_pizza(30, 1, 1).await.is_ok());
    }

    #[tokio::test]
    async fn create_with_dangling_reference_leaves_no_row() {
        let db = seeded_db().await;

        let err = db.create_restaurant_pizza(12, 999, 1).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = db.create_restaurant_pizza(12, 1, 999).await.unwrap_err();
        match err {
            Error::Validation(msgs) => {
                assert_eq!(msgs, vec!["pizza_id does not reference an existing pizza"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurant_pizzas")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn create_returns_join_and_both_sides() {
        let db = seeded_db().await;

        let (join, restaurant, pizza) = db.create_restaurant_pizza(12, 1, 1).await.unwrap();
        assert_eq!(join.price, 12);
        assert_eq!(restaurant.name, "Dough Joe's");
        assert_eq!(pizza.name, "Margherita");
    }

    #[tokio::test]
    async fn reseeding_does_not_duplicate() {
        let db = seeded_db().await;
        db.seed_demo().await.unwrap();

        assert_eq!(db.list_restaurants().await.unwrap().len(), 3);
        assert_eq!(db.list_pizzas().await.unwrap().len(), 3);
    }
}
