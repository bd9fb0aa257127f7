// ==========================================
// 电池循环测试报告生成系统 - 命令行入口
// ==========================================
// 薄展示壳: 接收输入文件与报告元信息，调用流水线，
// 将 KPI 摘要以 JSON 打印到标准输出，并给出产物路径。
// 交互式界面可替换本壳，核心流水线不感知展示层。
// ==========================================

use battery_report::{KpiPreset, ReportConfig, ReportPipeline};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
用法: battery-report <循环日志文件.xlsx|.xls|.csv> [输出目录] [key=value ...]

可选参数 (key=value):
  customer=<客户名称>
  battery=<电池编号>
  capacity=<额定容量 Ah，默认 930>
  preset=basic|extended（默认 extended）";

fn main() -> ExitCode {
    battery_report::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", battery_report::APP_NAME);
    tracing::info!("系统版本: {}", battery_report::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, scratch_dir, config) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!();
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match ReportPipeline::run(&input, &scratch_dir, &config) {
        Ok(artifacts) => {
            // KPI 摘要（机器可读，供外层界面展示）
            match serde_json::to_string_pretty(&artifacts.kpi_report) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::warn!("KPI 摘要序列化失败: {}", e),
            }
            tracing::info!(chart = %artifacts.charts.ah_cycle.display(), "图表产物");
            tracing::info!(chart = %artifacts.charts.tmax_cycle.display(), "图表产物");
            tracing::info!(pdf = %artifacts.pdf_path.display(), "报告产物");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // 单条终端错误信息，用户修正后重新提交
            tracing::error!("报告生成失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 解析命令行参数: <输入文件> [输出目录] [key=value ...]
fn parse_args(args: &[String]) -> Result<(PathBuf, PathBuf, ReportConfig), String> {
    let mut positional: Vec<&String> = Vec::new();
    let mut config = ReportConfig::default();

    for arg in args {
        match arg.split_once('=') {
            Some(("customer", value)) => config.customer = Some(value.to_string()),
            Some(("battery", value)) => config.battery_id = Some(value.to_string()),
            Some(("capacity", value)) => {
                config.nominal_capacity_ah = value
                    .parse::<f64>()
                    .map_err(|_| format!("额定容量无法解析: {}", value))?;
            }
            Some(("preset", value)) => {
                config.preset = match value {
                    "basic" => KpiPreset::Basic,
                    "extended" => KpiPreset::Extended,
                    other => return Err(format!("未知预设: {}", other)),
                };
            }
            Some((key, _)) => return Err(format!("未知参数: {}", key)),
            None => positional.push(arg),
        }
    }

    let input = positional
        .first()
        .map(|s| PathBuf::from(s.as_str()))
        .ok_or_else(|| "缺少输入文件参数".to_string())?;
    let scratch_dir = positional
        .get(1)
        .map(|s| PathBuf::from(s.as_str()))
        .unwrap_or_else(|| PathBuf::from("tmp"));

    Ok((input, scratch_dir, config))
}
