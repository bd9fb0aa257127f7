// ==========================================
// 电池循环测试报告生成系统 - 流水线集成测试
// ==========================================
// 覆盖: 文件加载 → KPI → 图表 → PDF 全链路与失败路径
// ==========================================

use battery_report::{ReportConfig, ReportError, ReportPipeline};
use std::error::Error;
use std::io::Write;
use std::path::Path;

// ==========================================
// 辅助函数: 在指定目录写入测试 CSV 文件
// ==========================================
fn write_test_csv(dir: &Path) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let path = dir.join("battery_log.csv");
    let mut file = std::fs::File::create(&path)?;

    writeln!(
        file,
        "Cycle Count,Ah Discharged,Ah Charged In Charge Phase,SoC at End of Charge [%],\
         SoC at End of Discharge [%],Max. Temperature At Cycle (℃),Min. Temperature At Cycle (℃)"
    )?;
    writeln!(file, "1,800,850,99.5,25.0,41.0,5.0")?;
    writeln!(file, "2,750,800,98.0,30.0,46.0,-1.0")?;
    writeln!(file, "3,900,950,100.0,15.0,44.0,2.0")?;

    Ok(path)
}

// 全链路冒烟: 图表文字渲染依赖系统字体，默认跳过
#[test]
#[ignore]
fn test_full_pipeline_generates_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_csv(dir.path()).unwrap();
    let scratch = dir.path().join("out");

    let config = ReportConfig {
        customer: Some("ACME".to_string()),
        battery_id: Some("BT-01".to_string()),
        ..Default::default()
    };
    let artifacts = ReportPipeline::run(&input, &scratch, &config).unwrap();

    // 两张图表 + 一份 PDF，固定文件名
    assert!(artifacts.charts.ah_cycle.ends_with("ah_cycle.png"));
    assert!(artifacts.charts.tmax_cycle.ends_with("tmax_cycle.png"));
    assert!(artifacts.charts.ah_cycle.exists());
    assert!(artifacts.charts.tmax_cycle.exists());
    assert!(artifacts.pdf_path.ends_with("relazione_batteria.pdf"));

    let bytes = std::fs::read(&artifacts.pdf_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_pipeline_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReportPipeline::run(
        Path::new("does_not_exist.xlsx"),
        dir.path(),
        &ReportConfig::default(),
    );
    assert!(matches!(result, Err(ReportError::Format(_))));
}

#[test]
fn test_pipeline_rejects_unsupported_container() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("battery_log.txt");
    std::fs::write(&input, "not a spreadsheet").unwrap();

    let result = ReportPipeline::run(&input, dir.path(), &ReportConfig::default());
    assert!(matches!(result, Err(ReportError::Format(_))));
}

#[test]
fn test_pipeline_rejects_invalid_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_csv(dir.path()).unwrap();

    let config = ReportConfig {
        nominal_capacity_ah: 0.0,
        ..Default::default()
    };
    let result = ReportPipeline::run(&input, dir.path(), &config);
    assert!(matches!(result, Err(ReportError::Config(_))));
}
