// ==========================================
// 电池循环测试报告生成系统 - 指标引擎集成测试
// ==========================================
// 路径: CSV 解析 → 字段映射 → KPI 计算
// ==========================================

use battery_report::importer::{CsvParser, FieldMapper, FileParser};
use battery_report::{
    CycleDataset, IndicatorEngine, KpiKind, KpiPreset, KpiValue, ReportConfig,
};
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

// ==========================================
// 辅助函数: 创建测试 CSV 文件
// ==========================================
fn create_test_csv() -> Result<NamedTempFile, Box<dyn Error>> {
    let mut temp_file = NamedTempFile::new()?;

    // CSV header
    writeln!(
        temp_file,
        "Cycle Count,Ah Discharged,Ah Charged In Charge Phase,SoC at End of Charge [%],\
         SoC at End of Discharge [%],Max. Temperature At Cycle (℃),Min. Temperature At Cycle (℃)"
    )?;

    // 三个循环: 放电 [800, 750, 900], 充电 [850, 800, 950]
    writeln!(temp_file, "1,800,850,99.5,25.0,41.0,5.0")?;
    writeln!(temp_file, "2,750,800,98.0,30.0,46.0,-1.0")?;
    writeln!(temp_file, "3,900,950,100.0,15.0,44.0,2.0")?;

    Ok(temp_file)
}

fn load_dataset(file: &NamedTempFile) -> CycleDataset {
    let records = CsvParser.parse_to_raw_records(file.path()).unwrap();
    FieldMapper.build_dataset(&records)
}

#[test]
fn test_csv_scenario_basic_preset() {
    let file = create_test_csv().unwrap();
    let dataset = load_dataset(&file);

    // C=930, t=0.8 → 深放电阈值 744 Ah，三个循环全部计入
    let config = ReportConfig {
        preset: KpiPreset::Basic,
        ..Default::default()
    };
    let report = IndicatorEngine::compute(&dataset, &config);

    assert_eq!(report.value(KpiKind::TotalCycles), Some(KpiValue::Count(3)));
    assert_eq!(report.value(KpiKind::DeepDischarges), Some(KpiValue::Count(3)));

    // 效率 = (850+800+950) / (800+750+900) = 2600/2450 ≈ 1.06
    match report.value(KpiKind::AhEfficiency) {
        Some(KpiValue::Ratio(r)) => {
            assert!((r - 2600.0 / 2450.0).abs() < 1e-12);
            assert!((r - 1.06).abs() < 0.01);
        }
        other => panic!("效率值异常: {:?}", other),
    }
}

#[test]
fn test_csv_scenario_extended_preset() {
    let file = create_test_csv().unwrap();
    let dataset = load_dataset(&file);

    let config = ReportConfig::default();
    let report = IndicatorEngine::compute(&dataset, &config);

    // 放电结束 SoC [25, 30, 15] → 过放 1 次
    assert_eq!(report.value(KpiKind::OverDischarges), Some(KpiValue::Count(1)));
    // 充电结束 SoC [99.5, 98, 100] → 无过充，满充 2 次
    assert_eq!(report.value(KpiKind::OverCharges), Some(KpiValue::Count(0)));
    assert_eq!(report.value(KpiKind::FullCharges), Some(KpiValue::Count(2)));
    // 满充 + 部分充电 == 总循环数
    assert_eq!(report.value(KpiKind::PartialCharges), Some(KpiValue::Count(1)));
    // Tmin [5, -1, 2] → 低温 1 次
    assert_eq!(report.value(KpiKind::LowTempCycles), Some(KpiValue::Count(1)));
}

#[test]
fn test_missing_tmax_column_reports_undefined() {
    // 缺失 Tmax 列的文件: 相关 KPI 报告未定义，流程不中止
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        "Cycle Count,Ah Discharged,Ah Charged In Charge Phase,SoC at End of Charge [%]"
    )
    .unwrap();
    writeln!(temp_file, "1,800,850,99.5").unwrap();
    writeln!(temp_file, "2,750,800,98.0").unwrap();

    let dataset = load_dataset(&temp_file);
    let config = ReportConfig {
        preset: KpiPreset::Basic,
        ..Default::default()
    };
    let report = IndicatorEngine::compute(&dataset, &config);

    assert_eq!(report.value(KpiKind::HighTempCycles), Some(KpiValue::Undefined));
    assert_eq!(report.value(KpiKind::TmaxMean), Some(KpiValue::Undefined));
    assert_eq!(report.value(KpiKind::TotalCycles), Some(KpiValue::Count(2)));
}

#[test]
fn test_bad_cells_degrade_to_missing_not_abort() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        "Cycle Count,Ah Discharged,Ah Charged In Charge Phase,SoC at End of Charge [%]"
    )
    .unwrap();
    writeln!(temp_file, "1,800,850,99.5").unwrap();
    writeln!(temp_file, "2,sensor_fault,800,98.0").unwrap();

    let dataset = load_dataset(&temp_file);
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records()[1].ah_discharged, None);

    // 求和跳过坏单元格: 效率 = 1650 / 800
    let report = IndicatorEngine::compute(&dataset, &ReportConfig::default());
    match report.value(KpiKind::AhEfficiency) {
        Some(KpiValue::Ratio(r)) => assert!((r - 1650.0 / 800.0).abs() < 1e-12),
        other => panic!("效率值异常: {:?}", other),
    }
}

#[test]
fn test_determinism_same_input_same_report() {
    let file = create_test_csv().unwrap();
    let config = ReportConfig::default();

    let first = IndicatorEngine::compute(&load_dataset(&file), &config);
    let second = IndicatorEngine::compute(&load_dataset(&file), &config);

    assert_eq!(first, second);
}
