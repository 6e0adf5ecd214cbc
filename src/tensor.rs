// 该文件是 Shitu （识图） 项目的一部分。
// src/tensor.rs - 张量定义
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

/// 张量形状，NHWC 布局下为 [batch, height, width, channels]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorShape(Box<[usize]>);

impl TensorShape {
  pub fn new(dims: Vec<usize>) -> Self {
    Self(dims.into_boxed_slice())
  }

  pub fn dims(&self) -> &[usize] {
    &self.0
  }

  /// 张量元素总数
  pub fn num_elements(&self) -> usize {
    self.0.iter().product()
  }
}

impl std::fmt::Display for TensorShape {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let dims: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
    write!(f, "{}", dims.join("x"))
  }
}

/// 张量元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorType {
  /// 无符号 8 位整数，取值范围 [0, 255]
  Uint8,
  /// 32 位浮点数，取值范围 [0, 1]
  Float32,
}

#[derive(Debug, Clone)]
pub enum TensorData {
  Uint8(Box<[u8]>),
  Float32(Box<[f32]>),
}

impl TensorData {
  pub fn len(&self) -> usize {
    match self {
      TensorData::Uint8(data) => data.len(),
      TensorData::Float32(data) => data.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn tensor_type(&self) -> TensorType {
    match self {
      TensorData::Uint8(_) => TensorType::Uint8,
      TensorData::Float32(_) => TensorType::Float32,
    }
  }
}

/// 模型输入张量，每次推理调用新建，调用结束后丢弃
#[derive(Debug, Clone)]
pub struct InputTensor {
  shape: TensorShape,
  data: TensorData,
}

impl InputTensor {
  pub fn new(shape: TensorShape, data: TensorData) -> Self {
    if shape.num_elements() != data.len() {
      panic!(
        "数据长度不匹配: 期望长度 {}, 实际长度 {}",
        shape.num_elements(),
        data.len()
      );
    }

    Self { shape, data }
  }

  pub fn shape(&self) -> &TensorShape {
    &self.shape
  }

  pub fn data(&self) -> &TensorData {
    &self.data
  }

  pub fn tensor_type(&self) -> TensorType {
    self.data.tensor_type()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shape_display() {
    let shape = TensorShape::new(vec![1, 224, 224, 3]);
    assert_eq!(format!("{}", shape), "1x224x224x3");
  }

  #[test]
  fn test_shape_num_elements() {
    let shape = TensorShape::new(vec![1, 224, 224, 3]);
    assert_eq!(shape.num_elements(), 224 * 224 * 3);
  }

  #[test]
  fn test_input_tensor_type() {
    let shape = TensorShape::new(vec![1, 2, 2, 3]);
    let tensor = InputTensor::new(shape, TensorData::Uint8(vec![0u8; 12].into_boxed_slice()));
    assert_eq!(tensor.tensor_type(), TensorType::Uint8);
    assert_eq!(tensor.data().len(), 12);
  }

  #[test]
  #[should_panic]
  fn test_input_tensor_length_mismatch() {
    let shape = TensorShape::new(vec![1, 2, 2, 3]);
    InputTensor::new(shape, TensorData::Uint8(vec![0u8; 5].into_boxed_slice()));
  }
}
