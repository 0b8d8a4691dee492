//! MySQL product repository implementation.

use super::{limit_offset, order_clause, to_count};
use crate::{traits::ProductRepository, DatabasePoolInterface};
use catalog_core::{
    CatalogError, CatalogResult, Category, CategoryId, NewProduct, Page, PageRequest, Product,
    ProductId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::mysql::MySqlConnection;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const SORTABLE_COLUMNS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("price", "price"),
    ("date", "date"),
];

/// MySQL product repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct MySqlProductRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Loads the categories of every product in `product_ids`, keyed by product.
    async fn load_categories(
        &self,
        product_ids: &[i64],
    ) -> CatalogResult<HashMap<i64, Vec<Category>>> {
        let mut by_product: HashMap<i64, Vec<Category>> = HashMap::new();
        if product_ids.is_empty() {
            return Ok(by_product);
        }

        let mut query = QueryBuilder::<MySql>::new(
            "SELECT pc.product_id, c.id, c.name \
             FROM tb_product_category pc \
             INNER JOIN tb_category c ON c.id = pc.category_id \
             WHERE pc.product_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in product_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY pc.product_id, c.id");

        let rows = query
            .build_query_as::<ProductCategoryRow>()
            .fetch_all(self.pool.inner())
            .await?;

        for row in rows {
            by_product
                .entry(row.product_id)
                .or_default()
                .push(Category::new(CategoryId::new(row.id), row.name));
        }
        Ok(by_product)
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    img_url: String,
    date: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, categories: Vec<Category>) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            img_url: self.img_url,
            date: self.date,
            categories,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductCategoryRow {
    product_id: i64,
    id: i64,
    name: String,
}

/// Inserts the join rows linking `product_id` to `category_ids`.
async fn insert_links(
    conn: &mut MySqlConnection,
    product_id: i64,
    category_ids: &[CategoryId],
) -> CatalogResult<()> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let mut query =
        QueryBuilder::<MySql>::new("INSERT INTO tb_product_category (product_id, category_id) ");
    query.push_values(category_ids, |mut row, category_id| {
        row.push_bind(product_id).push_bind(category_id.value());
    });
    query.build().execute(conn).await?;
    Ok(())
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, img_url, date
            FROM tb_product
            WHERE id = ?
            ",
        )
        .bind(id.value())
        .fetch_optional(self.pool.inner())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut categories = self.load_categories(&[row.id]).await?;
        let product_categories = categories.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_product(product_categories)))
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
        debug!(
            "Finding products page={} size={} order_by={:?}",
            page.page, page.size, page.order_by
        );

        let (limit, offset) = limit_offset(&page);
        let sql = format!(
            "SELECT id, name, description, price, img_url, date FROM tb_product {} LIMIT ? OFFSET ?",
            order_clause(&page, SORTABLE_COLUMNS)
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.inner())
            .await?;

        let total = self.count().await?;
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut categories = self.load_categories(&ids).await?;

        let products = rows
            .into_iter()
            .map(|row| {
                let product_categories = categories.remove(&row.id).unwrap_or_default();
                row.into_product(product_categories)
            })
            .collect();

        Ok(Page::new(products, page.page, page.size, total))
    }

    async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
        debug!("Saving product: {}", product.name);

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO tb_product (name, description, price, img_url, date)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.img_url)
        .bind(product.date)
        .execute(&mut *tx)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| CatalogError::Database(format!("Generated id out of range: {e}")))?;

        insert_links(&mut *tx, id, &product.category_ids()).await?;
        tx.commit().await?;

        Ok(product.clone().into_product(ProductId::new(id)))
    }

    async fn update(&self, product: &Product) -> CatalogResult<Product> {
        debug!("Updating product: {}", product.id);

        let mut tx = self.pool.inner().begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM tb_product WHERE id = ? FOR UPDATE")
                .bind(product.id.value())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(CatalogError::not_found("Product", product.id));
        }

        sqlx::query(
            r"
            UPDATE tb_product
            SET name = ?, description = ?, price = ?, img_url = ?, date = ?
            WHERE id = ?
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.img_url)
        .bind(product.date)
        .bind(product.id.value())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM tb_product_category WHERE product_id = ?")
            .bind(product.id.value())
            .execute(&mut *tx)
            .await?;
        insert_links(&mut *tx, product.id.value(), &product.category_ids()).await?;

        tx.commit().await?;
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        sqlx::query("DELETE FROM tb_product_category WHERE product_id = ?")
            .bind(id.value())
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM tb_product WHERE id = ?")
            .bind(id.value())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: ProductId) -> CatalogResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_product WHERE id = ?")
            .bind(id.value())
            .fetch_one(self.pool.inner())
            .await?;
        Ok(count > 0)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_product")
            .fetch_one(self.pool.inner())
            .await?;
        Ok(to_count(count))
    }
}
