// ==========================================
// 电池循环测试报告生成系统 - 领域层
// ==========================================

pub mod cycle;

pub use cycle::{CycleDataset, CycleRecord};
