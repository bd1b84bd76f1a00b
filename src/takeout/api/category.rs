use crate::takeout::error::ClientResult;
use crate::takeout::http::HttpClient;
use crate::takeout::models::{Category, CategoryKind};
use serde::Serialize;
use tracing::debug;

#[derive(Clone)]
pub struct CategoryApi {
    http: HttpClient,
}

#[derive(Serialize)]
struct CategoryQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    category_type: Option<i32>,
}

impl CategoryApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 菜品和套餐的分类，`kind` 为空时返回全部
    pub async fn list(&self, kind: Option<CategoryKind>) -> ClientResult<Vec<Category>> {
        let query = CategoryQuery {
            category_type: kind.map(CategoryKind::code),
        };
        let categories: Vec<Category> = self
            .http
            .get_query("/category/list", &query)
            .await?
            .unwrap_or_default();
        debug!("[CategoryAPI] 分类数: {}", categories.len());
        Ok(categories)
    }
}
