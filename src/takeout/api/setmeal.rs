use crate::takeout::error::ClientResult;
use crate::takeout::http::HttpClient;
use crate::takeout::models::{Setmeal, SetmealDishItem};

#[derive(Clone)]
pub struct SetmealApi {
    http: HttpClient,
}

impl SetmealApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 按分类查询套餐
    pub async fn list_by_category(&self, category_id: &str) -> ClientResult<Vec<Setmeal>> {
        Ok(self
            .http
            .get_query("/setmeal/list", &[("categoryId", category_id)])
            .await?
            .unwrap_or_default())
    }

    /// 套餐包含的菜品
    pub async fn dishes(&self, setmeal_id: &str) -> ClientResult<Vec<SetmealDishItem>> {
        Ok(self
            .http
            .get(&format!("/setmeal/dish/{}", setmeal_id))
            .await?
            .unwrap_or_default())
    }
}
