//! 首页：分类、菜品 / 套餐列表、购物车
//!
//! 菜品和套餐请求按槽位登记在 `InflightRegistry` 中，快速切换分类时只有最后一次
//! 请求的结果会被应用。购物车变化只把数量合并进当前列表，不会重新拉取菜单。

use crate::takeout::error::{ClientError, ClientResult};
use crate::takeout::inflight::{InflightRegistry, Ticket};
use crate::takeout::menu::{self, CartSummary, FlavorSelection};
use crate::takeout::models::{
    CartItem, CartParams, Category, CategoryKind, Dish, Setmeal, SetmealDishItem, ShopStatus,
};
use crate::takeout::views::ViewContext;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// 首页在途请求槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuSlot {
    Dishes,
    Setmeals,
}

/// 首页状态快照
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub categories: Vec<Category>,
    pub active_category: usize,
    pub dishes: Vec<Dish>,
    pub setmeals: Vec<Setmeal>,
    pub cart: Vec<CartItem>,
    pub shop_status: ShopStatus,
    pub loading_categories: bool,
    pub loading_dishes: bool,
    pub loading_setmeals: bool,
    /// 未登录操作购物车时弹出的登录引导
    pub login_prompt_visible: bool,
    pub cart_visible: bool,
}

/// 首页视图模型，克隆后共享同一份状态
#[derive(Clone)]
pub struct HomeView {
    ctx: ViewContext,
    state: Arc<Mutex<HomeState>>,
    inflight: Arc<InflightRegistry<MenuSlot>>,
}

impl HomeView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: Arc::new(Mutex::new(HomeState::default())),
            inflight: Arc::new(InflightRegistry::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HomeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 当前状态快照
    pub fn state(&self) -> HomeState {
        self.lock().clone()
    }

    pub fn summary(&self) -> CartSummary {
        menu::cart_summary(&self.lock().cart)
    }

    /// 挂载：并发加载分类、店铺状态和购物车，然后加载第一个分类
    pub async fn mount(&self) -> ClientResult<()> {
        info!("[HomeView] 🏠 挂载首页");
        let (categories, _, _) = tokio::join!(
            self.load_categories(),
            self.load_shop_status(),
            self.load_cart()
        );
        categories?;
        let active = self.lock().active_category;
        if !self.lock().categories.is_empty() {
            self.select_category(active).await?;
        }
        Ok(())
    }

    /// 同时加载菜品分类和套餐分类，按 sort 排序
    pub async fn load_categories(&self) -> ClientResult<()> {
        self.lock().loading_categories = true;
        let result = tokio::try_join!(
            self.ctx.api.category.list(Some(CategoryKind::Dish)),
            self.ctx.api.category.list(Some(CategoryKind::Setmeal))
        );
        self.lock().loading_categories = false;

        match result {
            Ok((dish_categories, setmeal_categories)) => {
                let mut categories: Vec<Category> = dish_categories
                    .into_iter()
                    .chain(setmeal_categories)
                    .collect();
                categories.sort_by_key(|c| c.sort);
                debug!("[HomeView] 分类 {} 个", categories.len());
                self.lock().categories = categories;
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "加载分类失败").await,
        }
    }

    /// 切换分类并加载对应的菜品或套餐
    pub async fn select_category(&self, index: usize) -> ClientResult<()> {
        let category = {
            let mut state = self.lock();
            let Some(category) = state.categories.get(index).cloned() else {
                debug!("[HomeView] 分类下标越界: {}", index);
                return Ok(());
            };
            state.active_category = index;
            category
        };

        match category.kind() {
            Some(CategoryKind::Dish) => {
                let ticket = self.inflight.begin(MenuSlot::Dishes, category.id.clone());
                self.inflight.invalidate(MenuSlot::Setmeals);
                {
                    let mut state = self.lock();
                    state.setmeals.clear();
                    state.loading_setmeals = false;
                    state.loading_dishes = true;
                }
                self.load_dishes(ticket).await
            }
            Some(CategoryKind::Setmeal) => {
                let ticket = self
                    .inflight
                    .begin(MenuSlot::Setmeals, category.id.clone());
                self.inflight.invalidate(MenuSlot::Dishes);
                {
                    let mut state = self.lock();
                    state.dishes.clear();
                    state.loading_dishes = false;
                    state.loading_setmeals = true;
                }
                self.load_setmeals(ticket).await
            }
            None => {
                self.inflight.invalidate(MenuSlot::Dishes);
                self.inflight.invalidate(MenuSlot::Setmeals);
                let mut state = self.lock();
                state.dishes.clear();
                state.setmeals.clear();
                state.loading_dishes = false;
                state.loading_setmeals = false;
                Ok(())
            }
        }
    }

    async fn load_dishes(&self, ticket: Ticket<MenuSlot>) -> ClientResult<()> {
        let result = self.ctx.api.dish.list_by_category(ticket.key()).await;
        if !self.inflight.is_current(&ticket) {
            debug!(
                "[HomeView] 丢弃过期的菜品响应，分类: {}，请求#{}",
                ticket.key(),
                ticket.generation()
            );
            return Ok(());
        }

        match result {
            Ok(dishes) => {
                let mut state = self.lock();
                let quantities = menu::quantity_map(&state.cart);
                state.dishes = menu::merge_with_cart(&dishes, &quantities);
                state.loading_dishes = false;
                Ok(())
            }
            Err(e) => {
                self.lock().loading_dishes = false;
                self.ctx.fail(e, "加载菜品失败").await
            }
        }
    }

    async fn load_setmeals(&self, ticket: Ticket<MenuSlot>) -> ClientResult<()> {
        let result = self.ctx.api.setmeal.list_by_category(ticket.key()).await;
        if !self.inflight.is_current(&ticket) {
            debug!(
                "[HomeView] 丢弃过期的套餐响应，分类: {}，请求#{}",
                ticket.key(),
                ticket.generation()
            );
            return Ok(());
        }

        match result {
            Ok(setmeals) => {
                let mut state = self.lock();
                let quantities = menu::quantity_map(&state.cart);
                state.setmeals = menu::merge_with_cart(&setmeals, &quantities);
                state.loading_setmeals = false;
                Ok(())
            }
            Err(e) => {
                self.lock().loading_setmeals = false;
                self.ctx.fail(e, "加载套餐失败").await
            }
        }
    }

    /// 套餐包含的菜品
    pub async fn setmeal_dishes(&self, setmeal_id: &str) -> ClientResult<Vec<SetmealDishItem>> {
        match self.ctx.api.setmeal.dishes(setmeal_id).await {
            Ok(items) => Ok(items),
            Err(e) => self.ctx.fail(e, "加载套餐详情失败").await,
        }
    }

    /// 店铺状态，失败时保持原状态
    pub async fn load_shop_status(&self) {
        match self.ctx.api.shop.status().await {
            Ok(status) => self.lock().shop_status = status,
            Err(e) => debug!("[HomeView] 获取店铺状态失败，忽略: {}", e),
        }
    }

    /// 刷新购物车。失败时不提示（购物车可能为空），保留原有数据
    pub async fn load_cart(&self) {
        if !self.ctx.has_token() {
            self.apply_cart(Vec::new());
            return;
        }
        match self.ctx.api.cart.list().await {
            Ok(items) => self.apply_cart(menu::visible_cart(items)),
            Err(e) => debug!("[HomeView] 获取购物车失败，忽略: {}", e),
        }
    }

    /// 更新购物车并把数量合并进当前展示的菜品和套餐
    fn apply_cart(&self, cart: Vec<CartItem>) {
        let mut state = self.lock();
        let quantities = menu::quantity_map(&cart);
        state.dishes = menu::merge_with_cart(&state.dishes, &quantities);
        state.setmeals = menu::merge_with_cart(&state.setmeals, &quantities);
        state.cart = cart;
    }

    fn prompt_login(&self) -> ClientError {
        debug!("[HomeView] 未登录，弹出登录引导");
        self.lock().login_prompt_visible = true;
        self.ctx.login_required()
    }

    /// 加入购物车
    pub async fn add_to_cart(&self, params: CartParams) -> ClientResult<()> {
        if !self.lock().shop_status.is_open() {
            return self.ctx.reject("店铺已打烊，暂不支持加购").await;
        }
        if !self.ctx.has_token() {
            return Err(self.prompt_login());
        }
        match self.ctx.api.cart.add(&params).await {
            Ok(()) => {
                self.ctx.notices.success("已加入购物车").await;
                self.load_cart().await;
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "添加失败").await,
        }
    }

    /// 按选中的口味加购菜品
    pub async fn add_dish(&self, dish: &Dish, flavors: Option<&FlavorSelection>) -> ClientResult<()> {
        let flavor_text = flavors.map(|selection| selection.text(&dish.flavors));
        self.add_to_cart(CartParams::dish(dish.id.clone(), flavor_text.as_deref()))
            .await
    }

    pub async fn add_setmeal(&self, setmeal: &Setmeal) -> ClientResult<()> {
        self.add_to_cart(CartParams::setmeal(setmeal.id.clone(), None))
            .await
    }

    /// 减少购物车数量
    pub async fn sub_from_cart(&self, params: CartParams) -> ClientResult<()> {
        if !self.ctx.has_token() {
            return Err(self.prompt_login());
        }
        match self.ctx.api.cart.sub(&params).await {
            Ok(()) => {
                self.ctx.notices.success("已减少").await;
                self.load_cart().await;
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "操作失败").await,
        }
    }

    /// 清空购物车
    pub async fn clear_cart(&self) -> ClientResult<()> {
        if !self.ctx.has_token() {
            return Err(self.prompt_login());
        }
        match self.ctx.api.cart.clean().await {
            Ok(()) => {
                self.ctx.notices.success("已清空购物车").await;
                self.apply_cart(Vec::new());
                self.lock().cart_visible = false;
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "清空失败").await,
        }
    }

    pub fn toggle_cart(&self) {
        let mut state = self.lock();
        state.cart_visible = !state.cart_visible;
    }

    /// 去结算
    pub async fn go_order(&self) -> ClientResult<()> {
        if !self.ctx.has_token() {
            return Err(self.prompt_login());
        }
        let (open, empty) = {
            let state = self.lock();
            (state.shop_status.is_open(), state.cart.is_empty())
        };
        if !open {
            return self.ctx.reject("店铺已打烊，暂不支持下单").await;
        }
        if empty {
            return self.ctx.reject("购物车为空").await;
        }
        self.ctx.navigator.navigate("/order", false);
        Ok(())
    }

    /// 登录引导：去登录
    pub fn confirm_login_prompt(&self) {
        self.lock().login_prompt_visible = false;
        self.ctx.navigator.navigate("/login", false);
    }

    pub fn dismiss_login_prompt(&self) {
        self.lock().login_prompt_visible = false;
    }
}
