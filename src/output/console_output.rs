// 该文件是 Shitu （识图） 项目的一部分。
// src/output/console_output.rs - 控制台输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::ClassifyResult,
  output::Render,
};

#[derive(Error, Debug)]
pub enum ConsoleOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

/// 把分类结果逐行打印到标准输出，得分以百分比展示
pub struct ConsoleOutput;

impl FromUrlWithScheme for ConsoleOutput {
  const SCHEME: &'static str = "console";
}

impl FromUrl for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ConsoleOutputError::SchemeMismatch);
    }

    Ok(ConsoleOutput)
  }
}

impl Render<RgbImage, ClassifyResult> for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn render_result(&self, _frame: &RgbImage, result: &ClassifyResult) -> Result<(), Self::Error> {
    for item in &result.items {
      println!("{}: {:.2}%", item.label, item.score * 100.0);
    }
    info!("识别完成");

    Ok(())
  }
}
