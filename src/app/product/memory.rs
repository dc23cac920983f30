//! 内存存储实现
//!
//! 行为与 PostgreSQL 实现保持一致：id 自增，按 id 顺序列出，
//! 更新和删除不存在的 id 时不报错。

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::model::Product;
use super::repository::{ProductRepository, StoreError, StoreResult};

struct Table {
    rows: BTreeMap<i32, Product>,
    next_id: i32,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Default)]
pub struct MemoryProductRepository {
    table: Mutex<Table>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空所有产品并把 id 重置为 1
    pub fn clear(&self) -> StoreResult<()> {
        *self.lock()? = Table::default();
        Ok(())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.rows.is_empty())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| StoreError::Storage("product table lock poisoned".to_string()))
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn fetch(&self, id: i32) -> StoreResult<Product> {
        self.lock()?.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create(&self, product: &mut Product) -> StoreResult<()> {
        let mut table = self.lock()?;
        let id = table.next_id;
        table.next_id = id
            .checked_add(1)
            .ok_or_else(|| StoreError::Storage("products_id_seq exhausted".to_string()))?;

        product.id = id;
        table.rows.insert(id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> StoreResult<()> {
        if let Some(row) = self.lock()?.rows.get_mut(&product.id) {
            row.name = product.name.clone();
            row.price = product.price;
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }

    async fn list(&self, start: i64, count: i64) -> StoreResult<Vec<Product>> {
        let start = usize::try_from(start).unwrap_or(0);
        let count = usize::try_from(count).unwrap_or(0);

        Ok(self
            .lock()?
            .rows
            .values()
            .skip(start)
            .take(count)
            .cloned()
            .collect())
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, price: i64) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            price: Decimal::from(price),
        }
    }

    async fn seed(repo: &MemoryProductRepository, n: usize) {
        for i in 0..n {
            let mut p = product(&format!("Product {}", i), (i as i64 + 1) * 10);
            repo.create(&mut p).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = MemoryProductRepository::new();
        let mut first = product("a", 1);
        let mut second = product("b", 2);
        repo.create(&mut first).await.unwrap();
        repo.create(&mut second).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        // 删除后 id 不复用
        repo.delete(2).await.unwrap();
        let mut third = product("c", 3);
        repo.create(&mut third).await.unwrap();
        assert_eq!(third.id, 3);

        assert_eq!(repo.fetch(1).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let repo = MemoryProductRepository::new();
        assert_eq!(repo.fetch(11).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_list_window() {
        let repo = MemoryProductRepository::new();
        seed(&repo, 7).await;

        for (start, count) in [(0, 10), (0, 3), (5, 10), (7, 1), (20, 5), (2, 4)] {
            let rows = repo.list(start, count).await.unwrap();
            let expected = (count as usize).min(7usize.saturating_sub(start as usize));
            assert_eq!(rows.len(), expected, "start={} count={}", start, count);

            let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
            let want: Vec<i32> = (0..expected as i32).map(|i| start as i32 + 1 + i).collect();
            assert_eq!(ids, want);
        }
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_noops() {
        let repo = MemoryProductRepository::new();
        let mut ghost = product("ghost", 1);
        ghost.id = 99;

        assert!(repo.update(&ghost).await.is_ok());
        assert!(repo.delete(99).await.is_ok());
        assert!(repo.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_clear_restarts_sequence() {
        let repo = MemoryProductRepository::new();
        seed(&repo, 3).await;
        assert_eq!(repo.len().unwrap(), 3);

        repo.clear().unwrap();
        let mut p = product("fresh", 5);
        repo.create(&mut p).await.unwrap();
        assert_eq!(p.id, 1);
    }
}
