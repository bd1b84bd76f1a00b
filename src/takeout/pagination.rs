//! 追加式分页列表
//!
//! 第 1 页替换列表，之后的页追加；返回条数不足一页即认为没有更多数据。

use tracing::debug;

/// 分页状态
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    page: u32,
    page_size: u32,
    has_more: bool,
    loading: bool,
}

impl<T> Paginator<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            has_more: true,
            loading: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 已加载的最后一页页码，0 表示尚未加载
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// 下一页页码
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// 是否可以继续加载（有更多数据且没有在加载中）
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }

    /// 标记开始加载
    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    /// 加载失败，保留已有数据
    pub fn fail(&mut self) {
        self.loading = false;
    }

    /// 应用某一页的结果
    pub fn apply(&mut self, page: u32, records: Vec<T>) {
        let count = records.len();
        if page <= 1 {
            self.items = records;
        } else {
            self.items.extend(records);
        }
        self.page = page.max(1);
        self.has_more = count >= self.page_size as usize;
        self.loading = false;
        debug!(
            "[Pagination] 第 {} 页 {} 条，累计 {} 条，has_more={}",
            self.page,
            count,
            self.items.len(),
            self.has_more
        );
    }

    /// 清空，回到初始状态
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.has_more = true;
        self.loading = false;
    }
}
