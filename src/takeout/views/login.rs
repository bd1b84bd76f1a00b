//! 登录页

use crate::takeout::error::ClientResult;
use crate::takeout::models::LoginResult;
use crate::takeout::router::Route;
use crate::takeout::validation::LoginForm;
use crate::takeout::views::ViewContext;
use tracing::info;

#[derive(Clone)]
pub struct LoginView {
    ctx: ViewContext,
}

impl LoginView {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    /// 已登录时直接回首页
    pub async fn mount(&self) -> ClientResult<()> {
        if self.ctx.has_token() {
            self.ctx.navigator.navigate_to(Route::Home, true);
        }
        Ok(())
    }

    /// 登录。表单校验失败时只返回错误（表单内联提示），不发请求
    pub async fn login(&self, form: &LoginForm) -> ClientResult<LoginResult> {
        form.validate()?;

        match self
            .ctx
            .api
            .auth
            .login(form.phone.trim(), &form.password)
            .await
        {
            Ok(result) => {
                self.ctx
                    .session
                    .establish(result.token.clone(), result.id.clone())
                    .await?;
                info!("[LoginView] ✅ 登录成功，用户ID: {}", result.id);
                self.ctx.notices.success("登录成功").await;
                self.ctx.navigator.navigate_to(Route::Home, true);
                Ok(result)
            }
            Err(e) => self.ctx.fail(e, "登录失败").await,
        }
    }

    /// 暂不登录，先逛逛
    pub fn browse(&self) {
        self.ctx.navigator.navigate_to(Route::Home, false);
    }
}
