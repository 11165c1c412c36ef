// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cleaners::{
    build_registry, default_profiles, eastern_arabic_numerals, egyptian_abbreviations,
    AbbreviationDictionary, NumeralTable, Profile, Registry,
};
use crate::dictionary_utils;

// ============================================================================
// Cleaner 配置
// ============================================================================

/// Cleaner 配置
///
/// 所有字段都有默认值，缺省即内置的埃及阿拉伯语配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// 未指定 profile 时使用的 profile（可为逗号分隔的链）
    #[serde(default = "default_profile_name")]
    pub default_profile: String,

    /// 内联缩写规则（按顺序）
    #[serde(default = "egyptian_abbreviations")]
    pub abbreviations: AbbreviationDictionary,

    /// 额外的平面词典文件，规则追加在内联规则之后
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,

    /// 数字字形映射
    #[serde(default = "eastern_arabic_numerals")]
    pub numerals: NumeralTable,

    /// profile 列表
    #[serde(default = "default_profiles")]
    pub profiles: Vec<Profile>,
}

fn default_profile_name() -> String {
    "full".to_string()
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            abbreviations: egyptian_abbreviations(),
            dictionary_path: None,
            numerals: eastern_arabic_numerals(),
            profiles: default_profiles(),
        }
    }
}

impl CleanerConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        Ok(config_dir.join("TtsCleaners").join("config.json"))
    }

    /// 从默认路径加载，文件不存在时使用内置配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::warn!("配置文件 {:?} 不存在，使用内置配置", path);
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置失败: {:?}", path))?;
        let config: CleanerConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置失败: {:?}", path))?;
        Ok(config)
    }

    /// 原子写入：先写临时文件，再重命名
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");

        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("写入临时文件失败: {}", e);
            e
        })?;
        std::fs::rename(&temp_path, path)?;

        tracing::info!("配置已保存到: {:?}", path);
        Ok(())
    }

    /// 合并内联规则和词典文件
    pub fn dictionary(&self) -> Result<AbbreviationDictionary> {
        let mut dictionary = self.abbreviations.clone();
        if let Some(path) = &self.dictionary_path {
            dictionary.extend(dictionary_utils::load_dictionary_from_path(path)?);
        }
        Ok(dictionary)
    }

    /// 按配置构建 registry
    pub fn build_registry(&self) -> Result<Registry> {
        let dictionary = self.dictionary()?;
        let registry = build_registry(&dictionary, &self.numerals, &self.profiles)?;
        Ok(registry)
    }
}
