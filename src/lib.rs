pub mod takeout;

// 重新导出常用类型，方便外部使用
pub use takeout::{
    client::{Page, TakeoutClient},
    config::ClientConfig,
    error::{ClientError, ClientResult},
    listener::{EmptyNoticeListener, NoticeListener},
    router::Route,
    session::{SessionContext, SessionEvent},
};
