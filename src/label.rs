// 该文件是 Shitu （识图） 项目的一部分。
// src/label.rs - 标签加载
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LabelError {
  #[error("标签文件读取错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 从文本文件加载标签表，每行一个标签，行号即模型输出类别索引。
///
/// 行尾空白被去除；中间的空行保留为空标签，以保持索引对齐。
pub fn load_labels(path: &str) -> Result<Vec<String>, LabelError> {
  let content = std::fs::read_to_string(path)?;

  let labels: Vec<String> = content
    .lines()
    .map(|line| line.trim_end().to_string())
    .collect();

  info!("加载 {} 个标签: {}", labels.len(), path);

  Ok(labels)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_temp(name: &str, content: &str) -> String {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
  }

  #[test]
  fn test_load_labels() {
    let path = write_temp("shitu_labels_basic.txt", "cat\ndog\nbird\n");

    let labels = load_labels(&path).unwrap();

    assert_eq!(labels, ["cat", "dog", "bird"]);
  }

  #[test]
  fn test_load_labels_crlf() {
    let path = write_temp("shitu_labels_crlf.txt", "cat\r\ndog\r\n");

    let labels = load_labels(&path).unwrap();

    assert_eq!(labels, ["cat", "dog"]);
  }

  #[test]
  fn test_load_labels_keeps_index_alignment() {
    // 中间空行保留，索引不得移位
    let path = write_temp("shitu_labels_gap.txt", "cat\n\nbird\n");

    let labels = load_labels(&path).unwrap();

    assert_eq!(labels.len(), 3);
    assert_eq!(labels[2], "bird");
  }

  #[test]
  fn test_load_labels_missing_file() {
    assert!(load_labels("/nonexistent/labels.txt").is_err());
  }
}
