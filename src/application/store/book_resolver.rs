//! Book Resolver - 图书元数据解析缓存
//!
//! 给出展览内容块引用的图书 id 集合，按需拉取并缓存展示元数据。
//!
//! 约定:
//! - 缓存按 id 去重，每个 id 至多一条记录，生命周期 = 容器生命周期，不失效不淘汰
//! - 只对缓存缺失的 id 发请求；并发 sync 可能对同一 id 重复拉取
//!   （GET 幂等，写入以最后完成者为准）
//! - 单本拉取失败只记日志并跳过，对应块降级展示

use dashmap::DashMap;
use futures_util::future::join_all;
use std::sync::Arc;

use crate::application::ports::LibraryGatewayPort;
use crate::domain::exhibition::Exhibition;
use crate::domain::library::BookInfo;

/// 图书元数据解析器
pub struct BookResolver {
    gateway: Arc<dyn LibraryGatewayPort>,
    cache: DashMap<i64, BookInfo>,
}

impl BookResolver {
    pub fn new(gateway: Arc<dyn LibraryGatewayPort>) -> Self {
        Self {
            gateway,
            cache: DashMap::new(),
        }
    }

    /// 解析展览引用的全部图书
    pub async fn sync(&self, exhibition: &Exhibition) {
        self.resolve(&exhibition.distinct_book_ids()).await;
    }

    /// 解析给定 id 集合中缓存缺失的部分（并发拉取）
    pub async fn resolve(&self, ids: &[i64]) {
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !self.cache.contains_key(id))
            .collect();
        if missing.is_empty() {
            return;
        }

        tracing::debug!(count = missing.len(), "Resolving book metadata");

        let fetches = missing
            .into_iter()
            .map(|id| async move { (id, self.gateway.fetch_book(id).await) });

        for (id, result) in join_all(fetches).await {
            match result {
                Ok(info) => {
                    self.cache.insert(id, info.with_https_cover());
                }
                Err(err) => {
                    tracing::warn!(book_id = id, error = %err, "Book metadata fetch failed, skipped");
                }
            }
        }
    }

    /// 读取缓存的元数据
    pub fn get(&self, id: i64) -> Option<BookInfo> {
        self.cache.get(&id).map(|entry| entry.clone())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.cache.contains_key(&id)
    }

    /// 缓存条目数
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
