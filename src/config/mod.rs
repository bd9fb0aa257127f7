// ==========================================
// 电池循环测试报告生成系统 - 报告配置
// ==========================================
// 职责: 单次报告生成请求的全部可配置输入
// 交互状态（上传控件/输入框）由外层展示壳持有，
// 核心流水线只接收本对象
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 额定容量默认值 (Ah)
pub const DEFAULT_NOMINAL_CAPACITY_AH: f64 = 930.0;

/// 额定容量允许范围 (Ah)
pub const NOMINAL_CAPACITY_RANGE_AH: (f64, f64) = (10.0, 2000.0);

/// 放电深度阈值默认值（占额定容量的比例）
pub const DEFAULT_DOD_THRESHOLD: f64 = 0.8;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("额定容量 {0} Ah 超出范围 [10, 2000]")]
    CapacityOutOfRange(f64),

    #[error("放电深度阈值 {0} 超出范围 (0, 1]")]
    DodThresholdOutOfRange(f64),
}

/// KPI 预设（同一引擎的两套指标口径）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiPreset {
    /// 基础口径: 深放电 / 满充 / 部分充电 / 效率 / 高温循环 / Tmax 均值
    Basic,

    /// 扩展口径: 过放 / 过充 / 满充 / 部分充电 / 高温 / 低温 / 效率，
    /// 报告表格附带目标阈值与状态列
    #[default]
    Extended,
}

/// 报告配置（单次流水线运行的请求对象）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 客户名称（自由文本，可选）
    #[serde(default)]
    pub customer: Option<String>,

    /// 电池/单元编号（自由文本，可选）
    #[serde(default)]
    pub battery_id: Option<String>,

    /// 额定容量 (Ah)
    #[serde(default = "default_nominal_capacity")]
    pub nominal_capacity_ah: f64,

    /// 放电深度阈值（比例，固定默认 0.8，不暴露为用户输入）
    #[serde(default = "default_dod_threshold")]
    pub dod_threshold: f64,

    /// KPI 预设选择
    #[serde(default)]
    pub preset: KpiPreset,
}

fn default_nominal_capacity() -> f64 {
    DEFAULT_NOMINAL_CAPACITY_AH
}

fn default_dod_threshold() -> f64 {
    DEFAULT_DOD_THRESHOLD
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            customer: None,
            battery_id: None,
            nominal_capacity_ah: DEFAULT_NOMINAL_CAPACITY_AH,
            dod_threshold: DEFAULT_DOD_THRESHOLD,
            preset: KpiPreset::default(),
        }
    }
}

impl ReportConfig {
    /// 校验配置取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = NOMINAL_CAPACITY_RANGE_AH;
        if !self.nominal_capacity_ah.is_finite()
            || self.nominal_capacity_ah < min
            || self.nominal_capacity_ah > max
        {
            return Err(ConfigError::CapacityOutOfRange(self.nominal_capacity_ah));
        }
        if !self.dod_threshold.is_finite() || self.dod_threshold <= 0.0 || self.dod_threshold > 1.0
        {
            return Err(ConfigError::DodThresholdOutOfRange(self.dod_threshold));
        }
        Ok(())
    }

    /// 深放电判定阈值 (Ah) = 额定容量 × 放电深度阈值
    pub fn deep_discharge_threshold_ah(&self) -> f64 {
        self.nominal_capacity_ah * self.dod_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.nominal_capacity_ah, 930.0);
        assert_eq!(config.dod_threshold, 0.8);
        assert_eq!(config.preset, KpiPreset::Extended);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deep_discharge_threshold() {
        let config = ReportConfig::default();
        assert_eq!(config.deep_discharge_threshold_ah(), 744.0);
    }

    #[test]
    fn test_validate_capacity_out_of_range() {
        let config = ReportConfig {
            nominal_capacity_ah: 5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ReportConfig {
            nominal_capacity_ah: 2500.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_dod_threshold() {
        let config = ReportConfig {
            dod_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ReportConfig {
            dod_threshold: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // 边界: 1.0 合法
        let config = ReportConfig {
            dod_threshold: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_serde_roundtrip() {
        let json = serde_json::to_string(&KpiPreset::Basic).unwrap();
        assert_eq!(json, "\"basic\"");
        let preset: KpiPreset = serde_json::from_str("\"extended\"").unwrap();
        assert_eq!(preset, KpiPreset::Extended);
    }
}
