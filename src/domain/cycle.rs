// ==========================================
// 电池循环测试报告生成系统 - 循环记录与数据集
// ==========================================
// 职责: 一行 = 一个充放电循环
// 缺失策略: 无法转换为数值的单元格记为 None（显式缺失标记），
//           聚合函数天然跳过缺失值，不抛错
// ==========================================

use serde::{Deserialize, Serialize};

/// 单个充放电循环记录（列已强制为数值或缺失）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// 循环序号（图表横轴；源单元格缺失时回退为行号）
    pub cycle_index: f64,

    /// 放电 Ah
    pub ah_discharged: Option<f64>,

    /// 充电阶段充入 Ah
    pub ah_charged: Option<f64>,

    /// 充电结束 SoC [%]
    pub soc_end_charge: Option<f64>,

    /// 放电结束 SoC [%]
    pub soc_end_discharge: Option<f64>,

    /// 循环最高温度 (°C)
    pub tmax: Option<f64>,

    /// 循环最低温度 (°C)
    pub tmin: Option<f64>,
}

/// 循环数据集（插入顺序 = 循环顺序，不做重排）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleDataset {
    records: Vec<CycleRecord>,
}

impl CycleDataset {
    pub fn new(records: Vec<CycleRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 某列非缺失值的个数
    pub fn present_count<F>(&self, column: F) -> usize
    where
        F: Fn(&CycleRecord) -> Option<f64>,
    {
        self.records.iter().filter_map(|r| column(r)).count()
    }

    /// 某列求和（跳过缺失值；全缺失时为 0.0）
    pub fn sum<F>(&self, column: F) -> f64
    where
        F: Fn(&CycleRecord) -> Option<f64>,
    {
        self.records.iter().filter_map(|r| column(r)).sum()
    }

    /// 某列均值（无任何非缺失值时为 None）
    pub fn mean<F>(&self, column: F) -> Option<f64>
    where
        F: Fn(&CycleRecord) -> Option<f64>,
    {
        let mut sum = 0.0;
        let mut n = 0usize;
        for record in &self.records {
            if let Some(v) = column(record) {
                sum += v;
                n += 1;
            }
        }
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    }

    /// 某列最大值（跳过缺失值）
    pub fn max<F>(&self, column: F) -> Option<f64>
    where
        F: Fn(&CycleRecord) -> Option<f64>,
    {
        self.records
            .iter()
            .filter_map(|r| column(r))
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    /// 满足谓词的非缺失值个数
    ///
    /// 数据集非空但该列全缺失时返回 None（源列缺失，
    /// 对应 KPI 报告为未定义而不是误报 0）
    pub fn count_where<F, P>(&self, column: F, predicate: P) -> Option<u64>
    where
        F: Fn(&CycleRecord) -> Option<f64>,
        P: Fn(f64) -> bool,
    {
        if self.records.is_empty() {
            return Some(0);
        }
        let mut present = 0usize;
        let mut matched = 0u64;
        for record in &self.records {
            if let Some(v) = column(record) {
                present += 1;
                if predicate(v) {
                    matched += 1;
                }
            }
        }
        if present == 0 {
            None
        } else {
            Some(matched)
        }
    }
}
