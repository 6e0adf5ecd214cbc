// 该文件是 Shitu （识图） 项目的一部分。
// src/bin/simple_classify.rs - 分类测试代码
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use anyhow::Result;
use clap::Parser;
use url::Url;

use shitu::{
  FromUrl,
  classify::Classifier,
  input::InputWrapper,
  label::load_labels,
  model::TractModelBuilder,
  output::OutputWrapper,
  task::{OneShotTask, Task},
};
use tracing::info;

/// Shitu 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型文件路径
  #[arg(long, value_name = "MODEL")]
  pub model: Url,
  /// 标签文件路径，每行一个标签
  #[arg(long, value_name = "LABELS")]
  pub labels: String,
  /// 输入来源
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出路径
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,
  /// 返回的分类数量
  #[arg(long, default_value = "10", value_name = "K")]
  pub top_k: usize,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("模型文件路径: {}", args.model);
  info!("标签文件路径: {}", args.labels);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let model = TractModelBuilder::from_url(&args.model)?.build()?;
  let labels = load_labels(&args.labels)?;
  let classifier = Classifier::new(model, labels);
  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;

  OneShotTask::default()
    .with_top_k(args.top_k)
    .run_task(input, classifier, output)?;

  Ok(())
}
