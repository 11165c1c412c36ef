// 缩写词典文件工具
//
// 平面文本格式，每行一条：
//   pattern|replacement
//   pattern|replacement|cs     （区分大小写）
// 空行和 # 开头的注释行忽略

use std::path::Path;

use anyhow::{Context, Result};

use crate::cleaners::{AbbreviationDictionary, AbbreviationRule};

const CASE_SENSITIVE_FLAG: &str = "cs";

/// 标准化词汇（去除首尾空格）
pub fn normalize_word(word: &str) -> String {
    word.trim().to_string()
}

/// 格式化词条
///
/// - 不区分大小写 -> "pattern|replacement"
/// - 区分大小写 -> "pattern|replacement|cs"
pub fn format_entry(rule: &AbbreviationRule) -> String {
    if rule.case_sensitive {
        format!(
            "{}|{}|{}",
            rule.pattern, rule.replacement, CASE_SENSITIVE_FLAG
        )
    } else {
        format!("{}|{}", rule.pattern, rule.replacement)
    }
}

/// 解析单行词条
///
/// 空行/注释返回 Ok(None)
pub fn parse_entry(line: &str) -> Result<Option<AbbreviationRule>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split('|');
    let pattern = fields.next().map(normalize_word).unwrap_or_default();
    let Some(replacement) = fields.next().map(normalize_word) else {
        anyhow::bail!("缺少展开文本: {}", line);
    };
    if pattern.is_empty() {
        anyhow::bail!("缩写为空: {}", line);
    }

    let case_sensitive = match fields.next().map(str::trim) {
        None | Some("") => false,
        Some(CASE_SENSITIVE_FLAG) => true,
        Some(flag) => anyhow::bail!("未知标记 `{}`: {}", flag, line),
    };
    if fields.next().is_some() {
        anyhow::bail!("字段过多: {}", line);
    }

    Ok(Some(AbbreviationRule {
        pattern,
        replacement,
        case_sensitive,
    }))
}

/// 解析整个词典文本（保持行顺序）
///
/// 重复缩写不在此处检查，交给 registry 构建时统一报错
pub fn parse_dictionary(content: &str) -> Result<AbbreviationDictionary> {
    let mut dictionary = AbbreviationDictionary::default();
    for (idx, line) in content.lines().enumerate() {
        let entry =
            parse_entry(line).with_context(|| format!("第 {} 行格式不合法", idx + 1))?;
        if let Some(rule) = entry {
            dictionary.push(rule);
        }
    }
    Ok(dictionary)
}

/// 从文件加载词典
pub fn load_dictionary_from_path(path: &Path) -> Result<AbbreviationDictionary> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取词典失败: {:?}", path))?;
    let dictionary = parse_dictionary(&content)
        .with_context(|| format!("解析词典失败: {:?}", path))?;
    tracing::info!("从 {:?} 加载了 {} 条缩写规则", path, dictionary.len());
    Ok(dictionary)
}

/// 将词典渲染为文件内容
pub fn render_dictionary(dictionary: &AbbreviationDictionary) -> String {
    let mut content = String::new();
    for rule in dictionary.rules() {
        content.push_str(&format_entry(rule));
        content.push('\n');
    }
    content
}
