/// 模式容器模块
///
/// 解析模式描述文件（glob + 两个正则 + 语言表）并编译为匹配规则。
/// 正则编译失败视为致命的加载错误，不做恢复。
use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

use crate::utils::WeaveError;

/// 模式描述文件中的单条规则（原始字符串形式）
#[derive(Debug, Clone, Deserialize)]
pub struct RawPattern {
    /// glob 字面量，用于枚举候选文件
    pub glob: String,
    /// 正则字面量，第一个捕获组提取逻辑资源路径
    pub path: String,
    /// 正则字面量，第一个捕获组提取语言代码
    pub lang: String,
}

/// 语言表的原始形式：代码列表或代码到显示名的映射
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLanguages {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

/// 模式描述文件
#[derive(Debug, Clone, Deserialize)]
pub struct PatternFile {
    pub patterns: Vec<RawPattern>,
    pub languages: RawLanguages,
}

/// 编译后的匹配规则
#[derive(Debug, Clone)]
pub struct Pattern {
    pub glob: String,
    pub path: Regex,
    pub lang: Regex,
}

/// 模式容器：编译后的规则列表 + 语言表
///
/// 没有捕获组或捕获不到内容的规则只会让文件落选，不会报错。
#[derive(Debug, Clone)]
pub struct PatternContainer {
    pub patterns: Vec<Pattern>,
    pub languages: BTreeMap<String, String>,
}

impl PatternContainer {
    /// 从已解析的模式描述构建容器
    ///
    /// # 错误
    /// 任何一条规则的正则编译失败都会使整个构建失败
    pub fn from_pattern_file(file: PatternFile) -> Result<Self, WeaveError> {
        let mut patterns = Vec::with_capacity(file.patterns.len());
        for raw in file.patterns {
            patterns.push(Pattern {
                glob: raw.glob,
                path: Regex::new(&raw.path)?,
                lang: Regex::new(&raw.lang)?,
            });
        }

        Ok(Self {
            patterns,
            languages: expand_languages(file.languages),
        })
    }

    /// 解析模式描述文本并构建容器
    pub fn parse(text: &str) -> Result<Self, WeaveError> {
        let file: PatternFile = serde_json::from_str(text)
            .map_err(|e| WeaveError::InvalidPattern(e.to_string()))?;
        Self::from_pattern_file(file)
    }

    /// 从文件加载模式描述
    pub fn load(path: &str) -> Result<Self, WeaveError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| match e {
            WeaveError::InvalidPattern(msg) => WeaveError::ParseError {
                path: path.to_string(),
                message: msg,
            },
            other => other,
        })
    }

    /// 查询语言的显示名
    pub fn language_label(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(String::as_str)
    }

    /// 检查语言代码是否登记在语言表中
    pub fn has_language(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }
}

/// 列表形式的语言表展开为自身映射（代码即显示名）
fn expand_languages(raw: RawLanguages) -> BTreeMap<String, String> {
    match raw {
        RawLanguages::Map(map) => map,
        RawLanguages::List(list) => list.into_iter().map(|code| (code.clone(), code)).collect(),
    }
}
