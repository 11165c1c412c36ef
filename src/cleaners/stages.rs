//! 文本处理阶段
//!
//! 每个阶段都是纯函数，对任意 Unicode 输入都有定义，不会失败

use std::ops::RangeInclusive;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::cleaners::rules::{CompiledAbbreviations, NumeralMap};

lazy_static::lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("whitespace regex");
}

/// 阿拉伯文变音符号（tanwin .. sukun）
const ARABIC_DIACRITICS: RangeInclusive<char> = '\u{064B}'..='\u{0652}';

/// 去除阿拉伯文变音符号并统一字形变体
///
/// - `إ أ آ ا` -> `ا`
/// - `ى` -> `ي`
/// - `ؤ` -> `و`
/// - `ئ` -> `ي`
///
/// 仅按码位区间判断，不看相邻字符；其他文字不受影响。幂等。
pub fn normalize_script(text: &str) -> String {
    text.chars()
        .filter(|ch| !ARABIC_DIACRITICS.contains(ch))
        .map(unify_arabic_letter)
        .collect()
}

fn unify_arabic_letter(ch: char) -> char {
    match ch {
        'إ' | 'أ' | 'آ' => 'ا',
        'ى' | 'ئ' => 'ي',
        'ؤ' => 'و',
        _ => ch,
    }
}

/// 缩写展开（链式，按词典顺序）
pub fn expand_abbreviations(text: &str, dictionary: &CompiledAbbreviations) -> String {
    dictionary.expand(text)
}

/// 数字字形逐位转换，非源字形原样保留
pub fn convert_numerals(text: &str, table: &NumeralMap) -> String {
    text.chars().map(|ch| table.get(ch).unwrap_or(ch)).collect()
}

/// 连续空白折叠为单个空格（不去首尾）。幂等。
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// ASCII 音译
///
/// 有损：变音符号丢失，非拉丁字母按读音近似或丢弃。结果确定。
pub fn convert_to_ascii(text: &str) -> String {
    deunicode::deunicode(text)
}

/// 小写化。幂等。
pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// NFKC 兼容归一化
///
/// 阿拉伯文表现形式（U+FB50..U+FEFF）折叠为基本字母。幂等。
pub fn compat_normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// 去除首尾空白。幂等。
pub fn trim(text: &str) -> String {
    text.trim().to_string()
}
