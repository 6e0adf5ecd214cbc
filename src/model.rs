// 该文件是 Shitu （识图） 项目的一部分。
// src/model.rs - 模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::tensor::{InputTensor, TensorShape, TensorType};

/// 已加载的分类模型。
///
/// 实现者在加载后不可变，可在多次推理调用间以只读方式共享。
/// `run` 接收 `&self`，要求实现者支持在共享句柄上并发调用；
/// 不满足该要求的后端必须在内部自行串行化。
pub trait Model {
  type Error;

  /// 模型声明的输入形状，NHWC 布局 [batch, height, width, channels]
  fn input_shape(&self) -> &TensorShape;

  /// 模型声明的输出形状，[batch, num_classes] 或 [num_classes]
  fn output_shape(&self) -> &TensorShape;

  /// 模型期望的输入元素类型
  fn input_type(&self) -> TensorType;

  /// 同步执行一次推理，返回各类别的原始得分（logits）
  fn run(&self, input: &InputTensor) -> Result<Box<[f32]>, Self::Error>;

  /// 输出类别数量，即输出形状的最后一维
  fn num_classes(&self) -> usize {
    self.output_shape().dims().last().copied().unwrap_or(0)
  }
}

/// 单个分类结果
#[derive(Debug, Clone)]
pub struct ClassItem {
  pub label: String,
  pub score: f32,
}

/// 按得分降序排列的分类结果
#[derive(Debug, Clone)]
pub struct ClassifyResult {
  pub items: Box<[ClassItem]>,
}

#[cfg(feature = "model_tract_onnx")]
mod tract_onnx;
#[cfg(feature = "model_tract_onnx")]
pub use self::tract_onnx::{TractModel, TractModelBuilder, TractModelError};
