// ==========================================
// 电池循环测试报告生成系统 - 字段映射器实现
// ==========================================
// 职责: 原始字符串记录 → CycleRecord（数值强制转换）
// 宽松策略: 单元格无法解析为数值时记为缺失（None），
//           绝不因单个坏单元格中止整份报告
// ==========================================

use crate::domain::{CycleDataset, CycleRecord};
use std::collections::HashMap;

// ===== 源列名（与测试台导出文件一致）=====
pub const COL_CYCLE_COUNT: &str = "Cycle Count";
pub const COL_AH_DISCHARGED: &str = "Ah Discharged";
pub const COL_AH_CHARGED: &str = "Ah Charged In Charge Phase";
pub const COL_SOC_END_CHARGE: &str = "SoC at End of Charge [%]";
pub const COL_SOC_END_DISCHARGE: &str =
    "SoC at End of Discharge [%] (Ah discharged - Ah charged in Discharge phase) / Cnom";
pub const COL_TMAX: &str = "Max. Temperature At Cycle (℃)";
pub const COL_TMIN: &str = "Min. Temperature At Cycle (℃)";

pub struct FieldMapper;

impl FieldMapper {
    /// 映射单行记录（row_ordinal 从 0 起，用于循环序号回退）
    pub fn map_to_cycle_record(
        &self,
        row: &HashMap<String, String>,
        row_ordinal: usize,
    ) -> CycleRecord {
        CycleRecord {
            // 循环序号缺失时回退为 1 起始的行号，保证图表横轴可用
            cycle_index: self
                .parse_f64(row, COL_CYCLE_COUNT)
                .unwrap_or((row_ordinal + 1) as f64),

            ah_discharged: self.parse_f64(row, COL_AH_DISCHARGED),
            ah_charged: self.parse_f64(row, COL_AH_CHARGED),
            soc_end_charge: self.parse_f64(row, COL_SOC_END_CHARGE),
            soc_end_discharge: self.parse_f64(row, COL_SOC_END_DISCHARGE),
            tmax: self.parse_f64(row, COL_TMAX),
            tmin: self.parse_f64(row, COL_TMIN),
        }
    }

    /// 映射整批记录为数据集（保持插入顺序）
    pub fn build_dataset(&self, rows: &[HashMap<String, String>]) -> CycleDataset {
        let records = rows
            .iter()
            .enumerate()
            .map(|(ordinal, row)| self.map_to_cycle_record(row, ordinal))
            .collect();
        CycleDataset::new(records)
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        // 定义列名别名映射
        let aliases: Vec<&str> = match key {
            // 放电结束 SoC 列的表头携带完整计算公式，同时兼容短表头
            COL_SOC_END_DISCHARGE => vec![COL_SOC_END_DISCHARGE, "SoC at End of Discharge [%]"],
            // 温度列兼容全角 ℃ 与 (°C) 两种写法
            COL_TMAX => vec![COL_TMAX, "Max. Temperature At Cycle (°C)"],
            COL_TMIN => vec![COL_TMIN, "Min. Temperature At Cycle (°C)"],
            _ => vec![key],
        };

        // 尝试所有可能的列名
        for alias in aliases {
            if let Some(v) = row.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 宽松解析浮点数: 缺失或无法解析 → None
    fn parse_f64(&self, row: &HashMap<String, String>, key: &str) -> Option<f64> {
        self.get_string(row, key)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}
