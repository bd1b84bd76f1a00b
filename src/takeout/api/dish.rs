use crate::takeout::error::ClientResult;
use crate::takeout::http::HttpClient;
use crate::takeout::models::Dish;

#[derive(Clone)]
pub struct DishApi {
    http: HttpClient,
}

impl DishApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 按分类查询菜品
    pub async fn list_by_category(&self, category_id: &str) -> ClientResult<Vec<Dish>> {
        Ok(self
            .http
            .get_query("/dish/list", &[("categoryId", category_id)])
            .await?
            .unwrap_or_default())
    }
}
