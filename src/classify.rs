// 该文件是 Shitu （识图） 项目的一部分。
// src/classify.rs - 分类流水线
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use image::RgbImage;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
  model::{ClassifyResult, Model},
  preprocess::{PreprocessError, preprocess},
  rank::{softmax, top_k},
};

/// 默认返回的分类数量
pub const DEFAULT_TOP_K: usize = 10;

#[derive(Error, Debug)]
pub enum PipelineError<ME>
where
  ME: std::error::Error,
{
  #[error("预处理阶段失败: {0}")]
  Preprocess(#[from] PreprocessError),
  #[error("推理阶段失败: {0}")]
  Inference(#[source] ME),
}

/// 分类流水线。
///
/// 持有加载后的模型与标签表，二者加载后不可变，可在多次
/// 分类调用间以只读方式共享。流水线自身无内部状态。
pub struct Classifier<M> {
  model: M,
  labels: Box<[String]>,
}

impl<M: Model> Classifier<M> {
  pub fn new(model: M, labels: Vec<String>) -> Self {
    let num_classes = model.num_classes();
    if labels.len() != num_classes {
      warn!(
        "标签数量 ({}) 与模型类别数量 ({}) 不一致，多出部分将被忽略",
        labels.len(),
        num_classes
      );
    }

    Self {
      model,
      labels: labels.into_boxed_slice(),
    }
  }

  pub fn labels(&self) -> &[String] {
    &self.labels
  }

  pub fn model(&self) -> &M {
    &self.model
  }

  /// 对单张图像执行完整分类：预处理、推理、归一化、排序。
  ///
  /// 任一阶段失败立即中止本次调用并返回阶段错误，不产生部分结果。
  pub fn classify(
    &self,
    image: &RgbImage,
    top: usize,
  ) -> Result<ClassifyResult, PipelineError<M::Error>>
  where
    M::Error: std::error::Error,
  {
    let shape = self.model.input_shape();
    let (height, width) = match shape.dims() {
      [_, h, w, 3] => (*h, *w),
      _ => {
        return Err(PipelineError::Preprocess(
          PreprocessError::UnsupportedInputShape(shape.clone()),
        ));
      }
    };

    let input = preprocess(image, height, width, self.model.input_type())?;

    debug!("执行模型推理");
    let logits = self.model.run(&input).map_err(PipelineError::Inference)?;

    debug!("归一化概率分布");
    let probabilities = softmax(&logits);

    let items = top_k(&self.labels, &probabilities, top);
    debug!("分类完成，返回 {} 个结果", items.len());

    Ok(ClassifyResult {
      items: items.into_boxed_slice(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tensor::{InputTensor, TensorShape, TensorType};
  use thiserror::Error;

  #[derive(Error, Debug)]
  #[error("推理失败")]
  struct FakeModelError;

  struct FakeModel {
    input_shape: TensorShape,
    output_shape: TensorShape,
    logits: Vec<f32>,
    fail: bool,
  }

  impl FakeModel {
    fn new(logits: Vec<f32>) -> Self {
      let num_classes = logits.len();
      Self {
        input_shape: TensorShape::new(vec![1, 8, 8, 3]),
        output_shape: TensorShape::new(vec![1, num_classes]),
        logits,
        fail: false,
      }
    }
  }

  impl Model for FakeModel {
    type Error = FakeModelError;

    fn input_shape(&self) -> &TensorShape {
      &self.input_shape
    }

    fn output_shape(&self) -> &TensorShape {
      &self.output_shape
    }

    fn input_type(&self) -> TensorType {
      TensorType::Float32
    }

    fn run(&self, input: &InputTensor) -> Result<Box<[f32]>, Self::Error> {
      if self.fail || input.shape() != &self.input_shape {
        return Err(FakeModelError);
      }
      Ok(self.logits.clone().into_boxed_slice())
    }
  }

  fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_classify_top_two() {
    let model = FakeModel::new(vec![2.0, 1.0, 0.1]);
    let classifier = Classifier::new(model, labels(&["cat", "dog", "bird"]));

    let image = RgbImage::new(100, 200);
    let result = classifier.classify(&image, 2).unwrap();

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].label, "cat");
    assert!((result.items[0].score - 0.659).abs() < 0.01);
    assert_eq!(result.items[1].label, "dog");
    assert!((result.items[1].score - 0.242).abs() < 0.01);
  }

  #[test]
  fn test_classify_k_exceeds_classes() {
    let model = FakeModel::new(vec![2.0, 1.0, 0.1]);
    let classifier = Classifier::new(model, labels(&["cat", "dog", "bird"]));

    let image = RgbImage::new(32, 32);
    let result = classifier.classify(&image, DEFAULT_TOP_K).unwrap();

    assert_eq!(result.items.len(), 3);
    let sum: f32 = result.items.iter().map(|i| i.score).sum();
    assert!((sum - 1.0).abs() < 1e-5);
  }

  #[test]
  fn test_classify_labels_shorter_than_classes() {
    let model = FakeModel::new(vec![0.1, 2.0, 1.0]);
    let classifier = Classifier::new(model, labels(&["cat", "dog"]));

    let image = RgbImage::new(32, 32);
    let result = classifier.classify(&image, 10).unwrap();

    // 第三个类别没有标签，静默丢弃
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].label, "dog");
  }

  #[test]
  fn test_classify_inference_failure() {
    let mut model = FakeModel::new(vec![1.0, 2.0]);
    model.fail = true;
    let classifier = Classifier::new(model, labels(&["cat", "dog"]));

    let image = RgbImage::new(32, 32);
    let err = classifier.classify(&image, 2).unwrap_err();

    assert!(matches!(err, PipelineError::Inference(_)));
  }

  #[test]
  fn test_classify_unsupported_input_shape() {
    let mut model = FakeModel::new(vec![1.0, 2.0]);
    model.input_shape = TensorShape::new(vec![1, 3, 8, 8]);
    let classifier = Classifier::new(model, labels(&["cat", "dog"]));

    let image = RgbImage::new(32, 32);
    let err = classifier.classify(&image, 2).unwrap_err();

    assert!(matches!(err, PipelineError::Preprocess(_)));
  }
}
