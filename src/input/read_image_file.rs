// 该文件是 Shitu （识图） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 单张图像文件输入，解码发生在构造时，
/// 迭代器只产出一帧已解码图像。
#[derive(Debug)]
pub struct ImageFileInput {
  image: Option<RgbImage>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let path = url.path();
    let image = ImageReader::open(path)?.decode()?.to_rgb8();
    debug!("解码图像: {} ({}x{})", path, image.width(), image.height());

    Ok(ImageFileInput { image: Some(image) })
  }
}

impl Iterator for ImageFileInput {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  #[test]
  fn test_decode_image_file() {
    let path = std::env::temp_dir().join("shitu_input_test.png");
    let image = RgbImage::from_pixel(20, 10, Rgb([0, 255, 0]));
    image.save(&path).unwrap();

    let url = Url::parse(&format!("image:{}", path.display())).unwrap();
    let mut input = ImageFileInput::from_url(&url).unwrap();

    let frame = input.next().unwrap();
    assert_eq!((frame.width(), frame.height()), (20, 10));
    assert!(input.next().is_none());
  }

  #[test]
  fn test_scheme_mismatch() {
    let url = Url::parse("video:/tmp/a.mp4").unwrap();
    let err = ImageFileInput::from_url(&url).unwrap_err();
    assert!(matches!(err, ImageFileInputError::SchemaMismatch));
  }

  #[test]
  fn test_missing_file() {
    let url = Url::parse("image:/nonexistent/picture.png").unwrap();
    assert!(ImageFileInput::from_url(&url).is_err());
  }
}
