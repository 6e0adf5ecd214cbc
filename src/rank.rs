// 该文件是 Shitu （识图） 项目的一部分。
// src/rank.rs - 概率归一化与排序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::model::ClassItem;

/// 数值稳定的 softmax 归一化。
///
/// 先减去最大值再做指数运算，避免大 logit 溢出、负 logit 下溢为零。
/// 空输入返回空序列。
pub fn softmax(logits: &[f32]) -> Vec<f32> {
  if logits.is_empty() {
    return Vec::new();
  }

  let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);

  let mut exps = Vec::with_capacity(logits.len());
  let mut sum = 0.0f32;
  for &x in logits {
    let e = (x - max).exp();
    exps.push(e);
    sum += e;
  }

  for e in exps.iter_mut() {
    *e /= sum;
  }

  exps
}

/// 按索引配对标签与得分，按得分降序取前 k 项。
///
/// 标签与得分长度不一致时只配对公共前缀；得分相同时保持原始索引顺序。
pub fn top_k(labels: &[String], scores: &[f32], k: usize) -> Vec<ClassItem> {
  let mut items: Vec<ClassItem> = labels
    .iter()
    .zip(scores.iter())
    .map(|(label, &score)| ClassItem {
      label: label.clone(),
      score,
    })
    .collect();

  // Vec::sort_by 为稳定排序
  items.sort_by(|a, b| b.score.total_cmp(&a.score));
  items.truncate(k);

  items
}
