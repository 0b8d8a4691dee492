//! MySQL category repository implementation.

use super::{limit_offset, order_clause, to_count};
use crate::{traits::CategoryRepository, DatabasePoolInterface};
use catalog_core::{
    CatalogError, CatalogResult, Category, CategoryId, NewCategory, Page, PageRequest,
};
use async_trait::async_trait;
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const SORTABLE_COLUMNS: &[(&str, &str)] = &[("id", "id"), ("name", "name")];

/// MySQL category repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CategoryRepository)]
pub struct MySqlCategoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCategoryRepository {
    /// Creates a new MySQL category repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::new(CategoryId::new(row.id), row.name)
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        debug!("Finding category by id: {}", id);

        let row = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM tb_category WHERE id = ?")
            .bind(id.value())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Category::from))
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Finding {} categories by id", ids.len());

        let mut query = QueryBuilder::<MySql>::new("SELECT id, name FROM tb_category WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.value());
        }
        separated.push_unseparated(") ORDER BY id");

        let rows = query
            .build_query_as::<CategoryRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_all_ordered(&self) -> CatalogResult<Vec<Category>> {
        debug!("Finding all categories");

        let rows = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM tb_category ORDER BY name, id")
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Category>> {
        debug!("Finding categories page={} size={}", page.page, page.size);

        let (limit, offset) = limit_offset(&page);
        let sql = format!(
            "SELECT id, name FROM tb_category {} LIMIT ? OFFSET ?",
            order_clause(&page, SORTABLE_COLUMNS)
        );

        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.inner())
            .await?;

        let total = self.count().await?;
        let categories = rows.into_iter().map(Category::from).collect();
        Ok(Page::new(categories, page.page, page.size, total))
    }

    async fn save(&self, category: &NewCategory) -> CatalogResult<Category> {
        debug!("Saving category: {}", category.name);

        let result = sqlx::query("INSERT INTO tb_category (name) VALUES (?)")
            .bind(&category.name)
            .execute(self.pool.inner())
            .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| CatalogError::Database(format!("Generated id out of range: {e}")))?;

        Ok(category.clone().into_category(CategoryId::new(id)))
    }

    async fn update(&self, category: &Category) -> CatalogResult<Category> {
        debug!("Updating category: {}", category.id);

        if !self.exists(category.id).await? {
            return Err(CatalogError::not_found("Category", category.id));
        }

        sqlx::query("UPDATE tb_category SET name = ? WHERE id = ?")
            .bind(&category.name)
            .bind(category.id.value())
            .execute(self.pool.inner())
            .await?;

        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> CatalogResult<bool> {
        debug!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM tb_category WHERE id = ?")
            .bind(id.value())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: CategoryId) -> CatalogResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_category WHERE id = ?")
            .bind(id.value())
            .fetch_one(self.pool.inner())
            .await?;
        Ok(count > 0)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_category")
            .fetch_one(self.pool.inner())
            .await?;
        Ok(to_count(count))
    }
}
