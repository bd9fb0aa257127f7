// ==========================================
// 电池循环测试报告生成系统 - API 层
// ==========================================

pub mod report_api;

pub use report_api::{ReportArtifacts, ReportPipeline};
