// ==========================================
// 电池循环测试报告生成系统 - 报告层
// ==========================================

pub mod pdf;

pub use pdf::{ReportAssembler, REPORT_FILENAME};
