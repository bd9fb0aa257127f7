// ==========================================
// 电池循环测试报告生成系统 - 引擎层
// ==========================================

pub mod chart;
pub mod indicator;

pub use chart::{ChartBuilder, ChartSet};
pub use indicator::{IndicatorEngine, KpiEntry, KpiKind, KpiReport, KpiStatus, KpiValue};
