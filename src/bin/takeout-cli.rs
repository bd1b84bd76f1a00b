//! 苍穹外卖 CLI 客户端
//!
//! 非交互式 CLI，用于联调后端接口和演示点餐流程。
//! 会话保存在本地 SQLite 中，`login` 之后的命令自动携带 token。

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use sky_takeout_client::takeout::format::{format_amount, full_address, mask_phone};
use sky_takeout_client::takeout::menu::{cart_summary, FlavorSelection};
use sky_takeout_client::takeout::models::{CartParams, PayMethod};
use sky_takeout_client::takeout::validation::{AddressForm, LoginForm};
use sky_takeout_client::{ClientConfig, NoticeListener, Page, TakeoutClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 苍穹外卖 CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "takeout-cli")]
#[command(about = "苍穹外卖 CLI 客户端 - 用于联调接口和演示点餐流程", long_about = None)]
struct Args {
    /// 后端 API 地址
    #[arg(long, env = "TAKEOUT_API", default_value = "http://localhost:8080/user")]
    api: String,

    /// 本地会话存储
    #[arg(long, default_value = "sqlite://takeout.db?mode=rwc")]
    storage: String,

    /// 请求超时（秒）
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// 日志级别（默认: info,sky_takeout_client=debug）
    #[arg(long, default_value = "info,sky_takeout_client=debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 手机号密码登录
    Login {
        #[arg(short, long)]
        phone: String,
        #[arg(short = 'w', long)]
        password: String,
    },
    /// 退出登录
    Logout,
    /// 查看当前用户
    Whoami,
    /// 查看店铺营业状态
    Shop,
    /// 查看菜单（默认第一个分类）
    Menu {
        /// 分类序号，从 0 开始
        #[arg(short, long, default_value = "0")]
        category: usize,
    },
    /// 购物车
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// 收货地址
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// 订单
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand, Debug)]
enum CartAction {
    List,
    /// 加入菜品（默认选择每种口味的第一项）或套餐
    Add {
        #[arg(long, conflicts_with = "setmeal")]
        dish: Option<String>,
        #[arg(long)]
        setmeal: Option<String>,
    },
    /// 按购物车条目 ID 减少一份
    Sub { id: String },
    Clear,
}

#[derive(Subcommand, Debug)]
enum AddressAction {
    List,
    Add {
        #[arg(long)]
        consignee: String,
        #[arg(long)]
        phone: String,
        /// 1 先生，0 女士
        #[arg(long, default_value = "1")]
        sex: String,
        #[arg(long)]
        detail: String,
        #[arg(long, default_value = "")]
        label: String,
    },
    Delete { id: String },
    Default { id: String },
}

#[derive(Subcommand, Debug)]
enum OrderAction {
    /// 使用默认地址提交当前购物车
    Submit {
        /// 指定地址 ID
        #[arg(long)]
        address: Option<String>,
    },
    /// 支付订单
    Pay {
        number: String,
        /// 使用支付宝（默认微信）
        #[arg(long)]
        alipay: bool,
    },
    /// 历史订单
    History {
        /// 加载的页数
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    Detail { number: String },
    Remind { number: String },
    Cancel { number: String },
    /// 再来一单
    Repeat { number: String },
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .context("无法创建日志文件 debug.log")?;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
    Ok(())
}

/// 把提示输出到日志
struct CliNoticeListener;

#[async_trait]
impl NoticeListener for CliNoticeListener {
    async fn on_success(&self, message: String) {
        info!("[CLI/Notice] ✅ {}", message);
    }

    async fn on_error(&self, message: String) {
        error!("[CLI/Notice] ❌ {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level)?;

    let config = ClientConfig::new(&args.api)
        .with_storage_url(&args.storage)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_redirect_delay(Duration::ZERO);
    let mut client = TakeoutClient::connect(config)
        .await
        .context("初始化客户端失败")?;
    client.set_notice_listener(Arc::new(CliNoticeListener));

    info!("[CLI] 🚀 {:?}", client);

    match args.command {
        Command::Login { phone, password } => login(&client, phone, password).await,
        Command::Logout => {
            client.logout().await?;
            info!("[CLI] 👋 已退出登录");
            Ok(())
        }
        Command::Whoami => whoami(&client).await,
        Command::Shop => {
            let status = client.api().shop.status().await?;
            info!("[CLI] 🏪 店铺状态: {:?}（营业中: {}）", status, status.is_open());
            Ok(())
        }
        Command::Menu { category } => menu(&client, category).await,
        Command::Cart { action } => cart(&client, action).await,
        Command::Address { action } => address(&client, action).await,
        Command::Order { action } => order(&client, action).await,
    }
}

async fn login(client: &TakeoutClient, phone: String, password: String) -> Result<()> {
    let Page::Login(view) = client.open("/login").await else {
        info!("[CLI] 已登录，用户ID: {:?}", client.session().user_id());
        return Ok(());
    };
    let result = view
        .login(&LoginForm::new(phone, password))
        .await
        .context("登录失败")?;
    info!("[CLI] ✅ 登录成功，用户ID: {}", result.id);
    Ok(())
}

async fn whoami(client: &TakeoutClient) -> Result<()> {
    let Page::My(view) = client.open("/my").await else {
        bail!("请先登录");
    };
    match view.user() {
        Some(user) => info!(
            "[CLI] 👤 用户ID: {}, 手机号: {}, 姓名: {}",
            user.id,
            mask_phone(&user.phone),
            user.name.as_deref().unwrap_or("-")
        ),
        None => warn!("[CLI] 未获取到用户信息"),
    }
    for order in view.orders().orders() {
        info!(
            "[CLI]   📦 {} {} {}",
            order.number,
            order.status().label(),
            format_amount(order.amount)
        );
    }
    Ok(())
}

async fn menu(client: &TakeoutClient, category: usize) -> Result<()> {
    let Page::Home(view) = client.open("/home").await else {
        bail!("打开首页失败");
    };
    if category != 0 {
        view.select_category(category).await?;
    }

    let state = view.state();
    info!("[CLI] 🏪 营业中: {}", state.shop_status.is_open());
    for (index, c) in state.categories.iter().enumerate() {
        let marker = if index == state.active_category { "👉" } else { "  " };
        info!("[CLI] {} [{}] {} (ID: {})", marker, index, c.name, c.id);
    }
    for dish in &state.dishes {
        info!(
            "[CLI]   🍜 {} {} (ID: {}, 已选: {})",
            dish.name,
            format_amount(dish.price),
            dish.id,
            dish.dish_number.unwrap_or(0)
        );
    }
    for setmeal in &state.setmeals {
        info!(
            "[CLI]   🍱 {} {} (ID: {}, 已选: {})",
            setmeal.name,
            format_amount(setmeal.price),
            setmeal.id,
            setmeal.setmeal_number.unwrap_or(0)
        );
    }
    Ok(())
}

async fn cart(client: &TakeoutClient, action: CartAction) -> Result<()> {
    let Page::Home(view) = client.open("/home").await else {
        bail!("打开首页失败");
    };
    match action {
        CartAction::List => {}
        CartAction::Add {
            dish: Some(dish_id),
            ..
        } => {
            let state = view.state();
            let dish = state.dishes.iter().find(|d| d.id == dish_id).cloned();
            match dish {
                Some(dish) => {
                    let flavors = FlavorSelection::with_defaults(&dish.flavors);
                    view.add_dish(&dish, Some(&flavors)).await?;
                }
                // 不在当前分类中，按无口味菜品加购
                None => view.add_to_cart(CartParams::dish(dish_id, None)).await?,
            }
        }
        CartAction::Add {
            setmeal: Some(setmeal_id),
            ..
        } => view.add_to_cart(CartParams::setmeal(setmeal_id, None)).await?,
        CartAction::Add { .. } => bail!("请指定 --dish 或 --setmeal"),
        CartAction::Sub { id } => {
            let item = view
                .state()
                .cart
                .into_iter()
                .find(|item| item.id == id)
                .with_context(|| format!("购物车中没有条目 {}", id))?;
            view.sub_from_cart(CartParams::for_item(&item)).await?;
        }
        CartAction::Clear => view.clear_cart().await?,
    }

    let cart = view.state().cart;
    for item in &cart {
        info!(
            "[CLI] 🛒 [{}] {} {} x{}",
            item.id,
            item.name,
            item.dish_flavor.as_deref().unwrap_or(""),
            item.number
        );
    }
    let summary = cart_summary(&cart);
    info!(
        "[CLI] 合计 {} 件，{}",
        summary.total_count,
        format_amount(summary.total_amount)
    );
    Ok(())
}

async fn address(client: &TakeoutClient, action: AddressAction) -> Result<()> {
    match action {
        AddressAction::List => {}
        AddressAction::Add {
            consignee,
            phone,
            sex,
            detail,
            label,
        } => {
            let Page::AddressForm(view) = client.open("/address/add").await else {
                bail!("请先登录");
            };
            let form = AddressForm {
                consignee,
                phone,
                sex,
                detail,
                label,
            };
            view.save(&form).await?;
        }
        AddressAction::Delete { id } => {
            let Page::AddressList(view) = client.open("/address").await else {
                bail!("请先登录");
            };
            view.delete(&id).await?;
        }
        AddressAction::Default { id } => {
            let Page::AddressList(view) = client.open("/address").await else {
                bail!("请先登录");
            };
            view.set_default(&id).await?;
        }
    }

    let Page::AddressList(view) = client.open("/address").await else {
        bail!("请先登录");
    };
    for address in view.addresses() {
        let marker = if address.is_default() { "⭐" } else { "  " };
        info!(
            "[CLI] {} [{}] {} {} {}",
            marker,
            address.id,
            address.consignee,
            mask_phone(&address.phone),
            full_address(&address)
        );
    }
    Ok(())
}

async fn order(client: &TakeoutClient, action: OrderAction) -> Result<()> {
    match action {
        OrderAction::Submit { address } => {
            let Page::Order(view) = client.open("/order").await else {
                bail!("请先登录");
            };
            if let Some(id) = address {
                view.load_addresses().await?;
                if !view.select_address(&id) {
                    bail!("地址 {} 不存在", id);
                }
            }
            let result = view.submit().await?;
            info!(
                "[CLI] ✅ 订单已创建: {}，金额 {}",
                result.order_number,
                format_amount(result.order_amount)
            );
        }
        OrderAction::Pay { number, alipay } => {
            let path = format!("/pay?orderNumber={}", number);
            let Page::Pay(view) = client.open(&path).await else {
                bail!("请先登录");
            };
            if alipay {
                view.set_pay_method(PayMethod::Alipay);
            }
            view.pay().await?;
        }
        OrderAction::History { pages } => {
            let Page::HistoryOrder(view) = client.open("/history-order").await else {
                bail!("请先登录");
            };
            for _ in 1..pages {
                if !view.has_more() {
                    break;
                }
                view.load_more().await?;
            }
            for order in view.orders() {
                info!(
                    "[CLI] 📦 {} {} {} {}",
                    order.number,
                    order.status().label(),
                    format_amount(order.amount),
                    order.order_time.as_deref().unwrap_or("")
                );
            }
            info!("[CLI] 还有更多: {}", view.has_more());
        }
        OrderAction::Detail { number } => {
            let view = open_detail(client, &number).await?;
            if let Some(order) = view.order() {
                info!(
                    "[CLI] 📦 {} {} {} 收货人: {} {}",
                    order.number,
                    order.status().label(),
                    format_amount(order.amount),
                    order.consignee,
                    order.address
                );
                for detail in &order.order_detail_list {
                    info!(
                        "[CLI]   {} {} x{}",
                        detail.name,
                        detail.dish_flavor.as_deref().unwrap_or(""),
                        detail.number
                    );
                }
            }
        }
        OrderAction::Remind { number } => open_detail(client, &number).await?.remind().await?,
        OrderAction::Cancel { number } => open_detail(client, &number).await?.cancel().await?,
        OrderAction::Repeat { number } => open_detail(client, &number).await?.repeat().await?,
    }
    Ok(())
}

async fn open_detail(
    client: &TakeoutClient,
    number: &str,
) -> Result<sky_takeout_client::takeout::views::OrderDetailView> {
    let path = format!("/order/detail/{}", number);
    match client.open(&path).await {
        Page::OrderDetail(view) => Ok(view),
        _ => bail!("请先登录"),
    }
}
