// 该文件是 Shitu （识图） 项目的一部分。
// src/task.rs - 任务定义
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

use std::time::Duration;

use image::RgbImage;
use tracing::{info, warn};

use crate::{
  classify::{Classifier, DEFAULT_TOP_K},
  model::{ClassifyResult, Model},
  output::Render,
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, classifier: Classifier<M>, output: O) -> Result<(), Self::Error>;
}

/// 取第一帧图像分类一次后结束
pub struct OneShotTask {
  top_k: usize,
}

impl Default for OneShotTask {
  fn default() -> Self {
    Self {
      top_k: DEFAULT_TOP_K,
    }
  }
}

impl OneShotTask {
  pub fn with_top_k(mut self, top_k: usize) -> Self {
    self.top_k = top_k;
    self
  }
}

impl<
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = RgbImage>,
  M: Model<Error = ME>,
  O: Render<RgbImage, ClassifyResult, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, classifier: Classifier<M>, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let image = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    info!("输入图像获取成功，开始分类...");
    let now = std::time::Instant::now();
    let result = classifier.classify(&image, self.top_k)?;
    let elapsed = now.elapsed();
    info!("分类完成，耗时: {:.2?}", elapsed);
    output.render_result(&image, &result)?;
    info!("渲染完成，耗时: {:.2?}", elapsed);

    Ok(())
  }
}

/// 对同一帧图像重复分类，统计平均耗时
pub struct RepeatShotTask {
  top_k: usize,
}

impl Default for RepeatShotTask {
  fn default() -> Self {
    Self {
      top_k: DEFAULT_TOP_K,
    }
  }
}

impl RepeatShotTask {
  pub fn with_top_k(mut self, top_k: usize) -> Self {
    self.top_k = top_k;
    self
  }
}

impl<
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = RgbImage>,
  M: Model<Error = ME>,
  O: Render<RgbImage, ClassifyResult, Error = RE>,
> Task<I, M, O> for RepeatShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, classifier: Classifier<M>, output: O) -> Result<(), Self::Error> {
    const REPEAT_TIMES: usize = 1000;

    info!("开始任务...");
    let image = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    info!("输入图像获取成功，开始分类...");
    let mut times = Vec::with_capacity(REPEAT_TIMES);
    for i in 0..REPEAT_TIMES {
      let now = std::time::Instant::now();
      let result = classifier.classify(&image, self.top_k)?;
      let elapsed = now.elapsed();
      info!("({})分类完成，耗时: {:.2?}", i, elapsed);
      output.render_result(&image, &result)?;
      info!("({})渲染完成，耗时: {:.2?}", i, elapsed);
      times.push(elapsed);
    }

    warn!(
      "平均分类时间: {:.2?}",
      times.iter().skip(2).sum::<Duration>() / (times.len() - 2) as u32
    );

    Ok(())
  }
}
