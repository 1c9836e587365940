/* 课表相关数据结构
 * 列名映射，每行的记录
 * 以及从HTML解析
 */
pub mod columns;

pub mod parser;

pub mod record;

pub use columns::ColumnMapping;
pub use parser::parse_timetable;
pub use record::LessonRecord;
