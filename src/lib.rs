/// 对接DSBmobile服务器的协议部分
pub mod api;

/// 配置文件
pub mod config;

/// 按后缀把文档交给对应的解析器
pub mod dispatch;

pub mod error;

/// 日志格式
pub mod log_format;

/// 图片文字识别的接口
pub mod ocr;

/// 获取全部文档的入口
pub mod pipeline;

/// 解析Untis生成的HTML代课表
pub mod timetable;

pub use dispatch::Document;
pub use error::DsbError;
pub use pipeline::{DsbClient, Entries};
pub use timetable::{ColumnMapping, LessonRecord};
