// 该文件是 Shitu （识图） 项目的一部分。
// src/output.rs - 输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use url::Url;

use crate::FromUrl;
#[cfg(any(feature = "console_output", feature = "save_json_file"))]
use crate::FromUrlWithScheme;
use crate::model::ClassifyResult;

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

#[cfg(feature = "console_output")]
mod console_output;
#[cfg(feature = "console_output")]
pub use self::console_output::{ConsoleOutput, ConsoleOutputError};

#[cfg(feature = "save_json_file")]
mod save_json_file;
#[cfg(feature = "save_json_file")]
pub use self::save_json_file::{SaveJsonFileError, SaveJsonFileOutput};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "console_output")]
  #[error("控制台输出错误: {0}")]
  ConsoleOutputError(#[from] ConsoleOutputError),
  #[cfg(feature = "save_json_file")]
  #[error("JSON 文件输出错误: {0}")]
  SaveJsonFileError(#[from] SaveJsonFileError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  #[cfg(feature = "console_output")]
  ConsoleOutput(ConsoleOutput),
  #[cfg(feature = "save_json_file")]
  SaveJsonFileOutput(SaveJsonFileOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      #[cfg(feature = "console_output")]
      ConsoleOutput::SCHEME => {
        let output = ConsoleOutput::from_url(url)?;
        Ok(OutputWrapper::ConsoleOutput(output))
      }
      #[cfg(feature = "save_json_file")]
      SaveJsonFileOutput::SCHEME => {
        let output = SaveJsonFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveJsonFileOutput(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<RgbImage, ClassifyResult> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &RgbImage, result: &ClassifyResult) -> Result<(), Self::Error> {
    match self {
      #[cfg(feature = "console_output")]
      OutputWrapper::ConsoleOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "save_json_file")]
      OutputWrapper::SaveJsonFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}
