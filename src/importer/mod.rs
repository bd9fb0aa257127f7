// ==========================================
// 电池循环测试报告生成系统 - 导入层
// ==========================================
// 阶段 0: 文件读取与解析（原始字符串记录）
// 阶段 1: 字段映射与数值强制转换（宽松策略）
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
