// ==========================================
// 电池循环测试报告生成系统 - 核心库
// ==========================================
// 流水线: 数据加载 → 指标计算 → 图表渲染 → PDF 报告
// 技术栈: calamine + plotters + printpdf
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 循环记录与数据集
pub mod domain;

// 导入层 - 表格文件解析与字段映射
pub mod importer;

// 引擎层 - KPI 计算与图表生成
pub mod engine;

// 报告层 - PDF 报告装配
pub mod report;

// 配置层 - 报告配置
pub mod config;

// API 层 - 报告流水线编排
pub mod api;

// 日志系统
pub mod logging;

// 错误类型
pub mod error;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CycleDataset, CycleRecord};

// 配置
pub use config::{ConfigError, KpiPreset, ReportConfig};

// 引擎
pub use engine::{
    ChartBuilder, ChartSet, IndicatorEngine, KpiEntry, KpiKind, KpiReport, KpiStatus, KpiValue,
};

// 报告
pub use report::{ReportAssembler, REPORT_FILENAME};

// 流水线
pub use api::{ReportArtifacts, ReportPipeline};

// 错误
pub use error::{ReportError, ReportResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电池循环测试报告生成系统";
