//! 结算页（/order）

use crate::takeout::error::ClientResult;
use crate::takeout::menu::{self, CartSummary};
use crate::takeout::models::{
    Address, CartItem, CartParams, PayMethod, ShopStatus, SubmitOrderParams, SubmitOrderResult,
};
use crate::takeout::router::Route;
use crate::takeout::views::ViewContext;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    pub cart: Vec<CartItem>,
    pub selected_address: Option<Address>,
    pub address_list: Vec<Address>,
    pub shop_status: ShopStatus,
    pub submitting: bool,
}

#[derive(Clone)]
pub struct CheckoutView {
    ctx: ViewContext,
    state: Arc<Mutex<CheckoutState>>,
}

impl CheckoutView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: Arc::new(Mutex::new(CheckoutState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> CheckoutState {
        self.lock().clone()
    }

    pub fn summary(&self) -> CartSummary {
        menu::cart_summary(&self.lock().cart)
    }

    pub async fn mount(&self) -> ClientResult<()> {
        info!("[CheckoutView] 🧾 挂载结算页");
        let (cart, _, shop) = tokio::join!(
            self.load_cart(),
            self.load_default_address(),
            self.load_shop_status()
        );
        cart.and(shop)
    }

    pub async fn load_cart(&self) -> ClientResult<()> {
        match self.ctx.api.cart.list().await {
            Ok(items) => {
                self.lock().cart = menu::visible_cart(items);
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "加载购物车失败").await,
        }
    }

    /// 默认地址，没有时静默
    pub async fn load_default_address(&self) {
        match self.ctx.api.address.default_address().await {
            Ok(Some(address)) => self.lock().selected_address = Some(address),
            Ok(None) => debug!("[CheckoutView] 没有默认地址"),
            Err(e) => debug!("[CheckoutView] 获取默认地址失败，忽略: {}", e),
        }
    }

    pub async fn load_shop_status(&self) -> ClientResult<()> {
        match self.ctx.api.shop.status().await {
            Ok(status) => {
                self.lock().shop_status = status;
                Ok(())
            }
            Err(e) => self.ctx.fail(e, "获取店铺状态失败").await,
        }
    }

    /// 打开地址选择列表
    pub async fn load_addresses(&self) -> ClientResult<Vec<Address>> {
        match self.ctx.api.address.list().await {
            Ok(list) => {
                self.lock().address_list = list.clone();
                Ok(list)
            }
            Err(e) => self.ctx.fail(e, "加载地址失败").await,
        }
    }

    /// 从地址列表中选择收货地址
    pub fn select_address(&self, id: &str) -> bool {
        let mut state = self.lock();
        match state.address_list.iter().find(|a| a.id == id).cloned() {
            Some(address) => {
                state.selected_address = Some(address);
                true
            }
            None => false,
        }
    }

    /// 去新增地址
    pub fn add_address(&self) {
        self.ctx.navigator.navigate_to(Route::AddressAdd, false);
    }

    pub async fn increase(&self, item: &CartItem) -> ClientResult<()> {
        if !self.lock().shop_status.is_open() {
            return self.ctx.reject("店铺已打烊，暂不支持加购").await;
        }
        match self.ctx.api.cart.add(&CartParams::for_item(item)).await {
            Ok(()) => {
                self.ctx.notices.success("已添加").await;
                self.load_cart().await
            }
            Err(e) => self.ctx.fail(e, "操作失败").await,
        }
    }

    pub async fn decrease(&self, item: &CartItem) -> ClientResult<()> {
        match self.ctx.api.cart.sub(&CartParams::for_item(item)).await {
            Ok(()) => {
                self.ctx.notices.success("已减少").await;
                self.load_cart().await
            }
            Err(e) => self.ctx.fail(e, "操作失败").await,
        }
    }

    /// 提交订单。依次检查：店铺营业、购物车非空、已选地址，全部通过才发请求
    pub async fn submit(&self) -> ClientResult<SubmitOrderResult> {
        let (open, address_id, summary) = {
            let state = self.lock();
            (
                state.shop_status.is_open(),
                state.selected_address.as_ref().map(|a| a.id.clone()),
                (!state.cart.is_empty()).then(|| menu::cart_summary(&state.cart)),
            )
        };
        if !open {
            return self.ctx.reject("店铺已打烊，暂不支持下单").await;
        }
        let Some(summary) = summary else {
            return self.ctx.reject("购物车为空").await;
        };
        let Some(address_book_id) = address_id else {
            return self.ctx.reject("请选择收货地址").await;
        };

        let params = SubmitOrderParams {
            address_book_id,
            pay_method: PayMethod::WeChat.code(),
            estimated_delivery_time: None,
            delivery_status: 1,
            tableware_number: 0,
            tableware_status: 1,
            pack_amount: 0,
            amount: summary.total_amount,
        };

        self.lock().submitting = true;
        let result = self.ctx.api.order.submit(&params).await;
        self.lock().submitting = false;

        match result {
            Ok(order) => {
                info!("[CheckoutView] ✅ 订单已创建: {}", order.order_number);
                self.ctx.notices.success("订单创建成功").await;
                self.ctx.navigator.navigate_to(
                    Route::Pay {
                        order_number: Some(order.order_number.clone()),
                    },
                    false,
                );
                Ok(order)
            }
            Err(e) => self.ctx.fail(e, "订单创建失败").await,
        }
    }
}
