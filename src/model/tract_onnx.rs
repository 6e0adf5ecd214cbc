// 该文件是 Shitu （识图） 项目的一部分。
// src/model/tract_onnx.rs - tract ONNX 推理后端
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;
use tracing::{debug, error, info};
use tract_onnx::prelude::*;
use url::Url;

use crate::{
  FromUrl,
  model::Model,
  tensor::{InputTensor, TensorData, TensorShape, TensorType},
};

const TRACT_NUM_INPUTS: usize = 1;
const TRACT_NUM_OUTPUTS: usize = 1;
const TRACT_INPUT_CHANNELS: usize = 3;

pub struct TractModel {
  plan: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
  input_shape: TensorShape,
  output_shape: TensorShape,
  input_type: TensorType,
}

#[derive(Error, Debug)]
pub enum TractModelError {
  #[error("模型加载错误: {0}")]
  ModelLoadError(TractError),
  #[error("模型无效: {0}")]
  ModelInvalid(String),
  #[error("输入张量不匹配: 期望 {expected}, 实际 {actual}")]
  InputMismatch { expected: String, actual: String },
  #[error("推理执行失败: {0}")]
  InferenceError(TractError),
  #[error("模型路径错误: {0}")]
  ModelPathError(String),
}

impl TractModelError {
  pub fn invalid(msg: impl Into<String>) -> Self {
    TractModelError::ModelInvalid(msg.into())
  }
}

pub struct TractModelBuilder {
  model_path: String,
}

const TRACT_ONNX_SCHEME: &str = "onnx";

impl FromUrl for TractModelBuilder {
  type Error = TractModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != TRACT_ONNX_SCHEME {
      return Err(TractModelError::ModelPathError(format!(
        "模型路径必须使用 {} 方案",
        TRACT_ONNX_SCHEME
      )));
    }

    Ok(TractModelBuilder {
      model_path: url.path().to_string(),
    })
  }
}

impl TractModelBuilder {
  pub fn build(self) -> Result<TractModel, TractModelError> {
    info!("加载模型文件: {}", self.model_path);
    let model = tract_onnx::onnx()
      .model_for_path(&self.model_path)
      .map_err(TractModelError::ModelLoadError)?
      .into_optimized()
      .map_err(TractModelError::ModelLoadError)?;
    info!("模型加载完成");

    let num_inputs = model.inputs.len();
    let num_outputs = model.outputs.len();

    if num_inputs != TRACT_NUM_INPUTS {
      error!(
        "预期模型输入数量为 {}, 实际为 {}",
        TRACT_NUM_INPUTS, num_inputs
      );
      return Err(TractModelError::invalid(format!(
        "预期模型输入数量为 {}, 实际为 {}",
        TRACT_NUM_INPUTS, num_inputs
      )));
    }

    if num_outputs != TRACT_NUM_OUTPUTS {
      error!(
        "预期模型输出数量为 {}, 实际为 {}",
        TRACT_NUM_OUTPUTS, num_outputs
      );
      return Err(TractModelError::invalid(format!(
        "预期模型输出数量为 {}, 实际为 {}",
        TRACT_NUM_OUTPUTS, num_outputs
      )));
    }

    debug!("模型输入数量: {}", num_inputs);
    debug!("模型输出数量: {}", num_outputs);

    let (input_shape, input_type) = {
      let fact = model
        .input_fact(0)
        .map_err(TractModelError::ModelLoadError)?;

      let input_type = match fact.datum_type {
        DatumType::U8 => TensorType::Uint8,
        DatumType::F32 => TensorType::Float32,
        other => {
          error!("不支持的输入数据类型: {:?}", other);
          return Err(TractModelError::invalid(format!(
            "不支持的输入数据类型: {:?}",
            other
          )));
        }
      };

      let dims = fact
        .shape
        .as_concrete()
        .ok_or_else(|| TractModelError::invalid("模型输入形状不是常量"))?;

      match dims {
        [1, h, w, TRACT_INPUT_CHANNELS] if *h > 0 && *w > 0 => {}
        _ => {
          error!("模型输入形状必须为 [1, H, W, 3], 实际为 {:?}", dims);
          return Err(TractModelError::invalid(format!(
            "模型输入形状必须为 [1, H, W, 3], 实际为 {:?}",
            dims
          )));
        }
      }

      (TensorShape::new(dims.to_vec()), input_type)
    };

    let output_shape = {
      let fact = model
        .output_fact(0)
        .map_err(TractModelError::ModelLoadError)?;

      if fact.datum_type != DatumType::F32 {
        error!("模型输出数据类型必须为 f32, 实际为 {:?}", fact.datum_type);
        return Err(TractModelError::invalid(format!(
          "模型输出数据类型必须为 f32, 实际为 {:?}",
          fact.datum_type
        )));
      }

      let dims = fact
        .shape
        .as_concrete()
        .ok_or_else(|| TractModelError::invalid("模型输出形状不是常量"))?;

      match dims {
        [n] | [1, n] if *n > 0 => {}
        _ => {
          error!("模型输出形状必须为 [N] 或 [1, N], 实际为 {:?}", dims);
          return Err(TractModelError::invalid(format!(
            "模型输出形状必须为 [N] 或 [1, N], 实际为 {:?}",
            dims
          )));
        }
      }

      TensorShape::new(dims.to_vec())
    };

    debug!("模型输入形状: {} ({:?})", input_shape, input_type);
    debug!("模型输出形状: {}", output_shape);

    let plan = model
      .into_runnable()
      .map_err(TractModelError::ModelLoadError)?;

    Ok(TractModel {
      plan,
      input_shape,
      output_shape,
      input_type,
    })
  }
}

impl Model for TractModel {
  type Error = TractModelError;

  fn input_shape(&self) -> &TensorShape {
    &self.input_shape
  }

  fn output_shape(&self) -> &TensorShape {
    &self.output_shape
  }

  fn input_type(&self) -> TensorType {
    self.input_type
  }

  fn run(&self, input: &InputTensor) -> Result<Box<[f32]>, Self::Error> {
    if input.shape() != &self.input_shape || input.tensor_type() != self.input_type {
      error!(
        "输入张量不匹配: 期望 {} ({:?}), 实际 {} ({:?})",
        self.input_shape,
        self.input_type,
        input.shape(),
        input.tensor_type()
      );
      return Err(TractModelError::InputMismatch {
        expected: format!("{} ({:?})", self.input_shape, self.input_type),
        actual: format!("{} ({:?})", input.shape(), input.tensor_type()),
      });
    }

    debug!("设置模型输入");
    let tensor = match input.data() {
      TensorData::Uint8(data) => Tensor::from_shape(input.shape().dims(), data),
      TensorData::Float32(data) => Tensor::from_shape(input.shape().dims(), data),
    }
    .map_err(TractModelError::InferenceError)?;

    debug!("执行模型推理");
    let outputs = self
      .plan
      .run(tvec!(tensor.into_tvalue()))
      .map_err(TractModelError::InferenceError)?;

    debug!("获取模型输出");
    let logits: Box<[f32]> = outputs[0]
      .to_array_view::<f32>()
      .map_err(TractModelError::InferenceError)?
      .iter()
      .copied()
      .collect();

    debug!("模型输出 {} 个类别得分", logits.len());

    Ok(logits)
  }
}
