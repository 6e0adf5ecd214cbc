// 该文件是 Shitu （识图） 项目的一部分。
// src/output/save_json_file.rs - JSON 文件输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use image::RgbImage;
use serde_json::json;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::ClassifyResult,
  output::Render,
};

#[derive(Error, Debug)]
pub enum SaveJsonFileError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 把分类结果写入 JSON 文件，得分保留为 [0, 1] 原始浮点值
pub struct SaveJsonFileOutput {
  path: PathBuf,
}

impl FromUrlWithScheme for SaveJsonFileOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for SaveJsonFileOutput {
  type Error = SaveJsonFileError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(SaveJsonFileError::SchemeMismatch);
    }

    Ok(SaveJsonFileOutput {
      path: PathBuf::from(url.path()),
    })
  }
}

impl Render<RgbImage, ClassifyResult> for SaveJsonFileOutput {
  type Error = SaveJsonFileError;

  fn render_result(&self, _frame: &RgbImage, result: &ClassifyResult) -> Result<(), Self::Error> {
    let items: Vec<serde_json::Value> = result
      .items
      .iter()
      .map(|item| {
        json!({
          "label": item.label,
          "score": item.score,
        })
      })
      .collect();

    let document = json!({ "results": items });

    let file = std::fs::File::create(&self.path)?;
    serde_json::to_writer_pretty(file, &document)?;

    info!("分类结果已写入: {}", self.path.display());

    Ok(())
  }
}
