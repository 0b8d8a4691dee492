//! In-memory doubles shared by the service tests.

use crate::cache::CacheInterface;
use crate::dto::ProductRequest;
use async_trait::async_trait;
use catalog_core::{
    CatalogError, CatalogResult, Category, CategoryId, NewCategory, NewProduct, Page,
    PageRequest, Product, ProductId,
};
use catalog_repository::{CategoryRepository, ProductRepository};
use chrono::{TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

fn paginate<T: Clone>(items: Vec<T>, page: &PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = page.offset().min(items.len());
    let end = (start + page.limit()).min(items.len());
    Page::new(items[start..end].to_vec(), page.page, page.size, total)
}

/// Product store with a call counter on `find_by_id`.
pub struct InMemoryProductRepository {
    products: Mutex<BTreeMap<ProductId, Product>>,
    next_id: AtomicI64,
    blocked: Mutex<HashSet<ProductId>>,
    find_by_id_calls: AtomicUsize,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            blocked: Mutex::new(HashSet::new()),
            find_by_id_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let repo = Self::new();
        let max_id = products.iter().map(|p| p.id.value()).max().unwrap_or(0);
        repo.next_id.store(max_id + 1, Ordering::SeqCst);
        for product in products {
            repo.products.lock().unwrap().insert(product.id, product);
        }
        repo
    }

    /// Makes `delete(id)` fail as if another row referenced the product.
    pub fn block_delete(&self, id: ProductId) {
        self.blocked.lock().unwrap().insert(id);
    }

    pub fn stored(&self, id: ProductId) -> Option<Product> {
        self.products.lock().unwrap().get(&id).cloned()
    }

    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored(id))
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Product>> {
        let products: Vec<Product> = self.products.lock().unwrap().values().cloned().collect();
        Ok(paginate(products, &page))
    }

    async fn save(&self, product: &NewProduct) -> CatalogResult<Product> {
        let id = ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let saved = product.clone().into_product(id);
        self.products.lock().unwrap().insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, product: &Product) -> CatalogResult<Product> {
        let mut products = self.products.lock().unwrap();
        if !products.contains_key(&product.id) {
            return Err(CatalogError::not_found("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        if self.blocked.lock().unwrap().contains(&id) {
            return Err(CatalogError::integrity_violation(format!(
                "product {id} is still referenced"
            )));
        }
        Ok(self.products.lock().unwrap().remove(&id).is_some())
    }

    async fn exists(&self, id: ProductId) -> CatalogResult<bool> {
        Ok(self.products.lock().unwrap().contains_key(&id))
    }

    async fn count(&self) -> CatalogResult<u64> {
        Ok(self.products.lock().unwrap().len() as u64)
    }
}

/// Category store. Categories marked as referenced refuse deletion.
pub struct InMemoryCategoryRepository {
    categories: Mutex<BTreeMap<CategoryId, Category>>,
    next_id: AtomicI64,
    referenced: Mutex<HashSet<CategoryId>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            referenced: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        let repo = Self::new();
        let max_id = categories.iter().map(|c| c.id.value()).max().unwrap_or(0);
        repo.next_id.store(max_id + 1, Ordering::SeqCst);
        for category in categories {
            repo.categories.lock().unwrap().insert(category.id, category);
        }
        repo
    }

    pub fn mark_referenced(&self, id: CategoryId) {
        self.referenced.lock().unwrap().insert(id);
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        Ok(self.categories.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> CatalogResult<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_all_ordered(&self) -> CatalogResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.categories.lock().unwrap().values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_all(&self, page: PageRequest) -> CatalogResult<Page<Category>> {
        let categories: Vec<Category> = self.categories.lock().unwrap().values().cloned().collect();
        Ok(paginate(categories, &page))
    }

    async fn save(&self, category: &NewCategory) -> CatalogResult<Category> {
        let id = CategoryId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let saved = category.clone().into_category(id);
        self.categories.lock().unwrap().insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, category: &Category) -> CatalogResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if !categories.contains_key(&category.id) {
            return Err(CatalogError::not_found("Category", category.id));
        }
        categories.insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> CatalogResult<bool> {
        if self.referenced.lock().unwrap().contains(&id) {
            return Err(CatalogError::integrity_violation(format!(
                "category {id} is referenced by products"
            )));
        }
        Ok(self.categories.lock().unwrap().remove(&id).is_some())
    }

    async fn exists(&self, id: CategoryId) -> CatalogResult<bool> {
        Ok(self.categories.lock().unwrap().contains_key(&id))
    }

    async fn count(&self) -> CatalogResult<u64> {
        Ok(self.categories.lock().unwrap().len() as u64)
    }
}

/// String cache with call counters and a switch that simulates an outage.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
    failing: AtomicBool,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            get_calls: AtomicUsize::new(0),
            set_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// Stores a raw payload directly, bypassing the counters.
    pub fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), None));
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries.lock().unwrap().get(key).and_then(|(_, ttl)| *ttl)
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> CatalogResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Cache("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.value(key))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CatalogResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> CatalogResult<bool> {
        self.check()?;
        Ok(self.entries.lock().unwrap().contains_key(key))
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

pub fn electronics() -> Category {
    Category::new(CategoryId::new(2), "Electronics")
}

pub fn computers() -> Category {
    Category::new(CategoryId::new(3), "Computers")
}

pub fn stored_product(id: i64, name: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: "Lorem ipsum dolor sit amet".to_string(),
        price: 2190.0,
        img_url: format!("https://img.example.com/{id}-big.jpg"),
        date: Utc.with_ymd_and_hms(2020, 7, 14, 10, 0, 0).unwrap(),
        categories: vec![electronics()],
    }
}

pub fn product_request(name: &str, category_ids: Vec<CategoryId>) -> ProductRequest {
    ProductRequest {
        name: name.to_string(),
        description: "Brand new product".to_string(),
        price: 1250.5,
        img_url: "https://img.example.com/new.jpg".to_string(),
        date: Utc.with_ymd_and_hms(2021, 3, 1, 9, 30, 0).unwrap(),
        category_ids,
    }
}
