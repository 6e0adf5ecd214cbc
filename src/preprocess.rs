// 该文件是 Shitu （识图） 项目的一部分。
// src/preprocess.rs - 图像预处理
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use tracing::debug;

use crate::tensor::{InputTensor, TensorData, TensorShape, TensorType};

const RGB_CHANNELS: usize = 3;

#[derive(Error, Debug)]
pub enum PreprocessError {
  #[error("目标尺寸无效: {0}x{1}")]
  InvalidTargetSize(usize, usize),
  #[error("模型输入形状不支持: {0}")]
  UnsupportedInputShape(TensorShape),
}

/// 将图像拉伸缩放到模型输入尺寸并展开为 NHWC 张量。
///
/// 双线性重采样，不保持宽高比。u8 模型直接使用 [0, 255] 原始像素，
/// f32 模型按 [0, 1] 归一化。
pub fn preprocess(
  image: &RgbImage,
  height: usize,
  width: usize,
  tensor_type: TensorType,
) -> Result<InputTensor, PreprocessError> {
  if height == 0 || width == 0 {
    return Err(PreprocessError::InvalidTargetSize(height, width));
  }

  debug!(
    "预处理图像: {}x{} -> {}x{}",
    image.width(),
    image.height(),
    width,
    height
  );

  // 调整图像大小到模型输入尺寸
  let resized = image::imageops::resize(
    image,
    width as u32,
    height as u32,
    image::imageops::FilterType::Triangle,
  );

  // 原始像素数据已经是 NHWC 格式的 RGB
  let raw = resized.into_raw();

  let shape = TensorShape::new(vec![1, height, width, RGB_CHANNELS]);
  let data = match tensor_type {
    TensorType::Uint8 => TensorData::Uint8(raw.into_boxed_slice()),
    TensorType::Float32 => {
      TensorData::Float32(raw.iter().map(|&v| v as f32 / 255.0).collect())
    }
  };

  Ok(InputTensor::new(shape, data))
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  #[test]
  fn test_resize_to_model_shape() {
    let image = RgbImage::new(100, 200);

    let tensor = preprocess(&image, 224, 224, TensorType::Uint8).unwrap();

    assert_eq!(tensor.shape().dims(), &[1, 224, 224, 3]);
    assert_eq!(tensor.data().len(), 224 * 224 * 3);
  }

  #[test]
  fn test_uint8_passthrough() {
    let image = RgbImage::from_pixel(64, 64, Rgb([255, 0, 0]));

    let tensor = preprocess(&image, 32, 32, TensorType::Uint8).unwrap();

    match tensor.data() {
      TensorData::Uint8(data) => {
        // NHWC: 第一个像素按 R, G, B 排列
        assert_eq!(data[0], 255);
        assert_eq!(data[1], 0);
        assert_eq!(data[2], 0);
      }
      _ => panic!("期望 u8 张量"),
    }
  }

  #[test]
  fn test_float32_normalization() {
    let image = RgbImage::from_pixel(64, 64, Rgb([128, 128, 128]));

    let tensor = preprocess(&image, 16, 16, TensorType::Float32).unwrap();

    match tensor.data() {
      TensorData::Float32(data) => {
        let expected = 128.0 / 255.0;
        assert!((data[0] - expected).abs() < 1e-4);
        assert!((data[1] - expected).abs() < 1e-4);
        assert!((data[2] - expected).abs() < 1e-4);
        assert!(data.iter().all(|&v| (0.0..=1.0).contains(&v)));
      }
      _ => panic!("期望 f32 张量"),
    }
  }

  #[test]
  fn test_invalid_target_size() {
    let image = RgbImage::new(10, 10);

    assert!(preprocess(&image, 0, 224, TensorType::Uint8).is_err());
    assert!(preprocess(&image, 224, 0, TensorType::Uint8).is_err());
  }
}
