use chrono::{DateTime, Utc};

/// 跟踪像素：嵌入外发邮件的不可见标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixel {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// 归属于某个像素的被跟踪重定向链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLink {
    pub id: String,
    pub pixel_id: String,
    pub destination_url: String,
    pub created_at: DateTime<Utc>,
}

/// 一次信标拉取的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEvent {
    pub id: i64,
    pub pixel_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub opened_at: DateTime<Utc>,
}

/// 单层 join 的结果行：事件连同其所属像素的创建时间。
/// 宽限窗口必须相对每个事件自己的像素求值，所以这一行携带两侧的时间戳。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPixelRow {
    pub pixel_id: String,
    pub opened_at: DateTime<Utc>,
    pub pixel_created_at: DateTime<Utc>,
}
