/// 资源树模块
///
/// 原始的、按语言分文件的翻译资源模型：递归的键值内容树、
/// 单语言翻译文件、以及按逻辑路径分组的资源节点。
mod builder;


pub use builder::ResourceTreeBuilder;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 翻译内容值：叶子字符串或嵌套子树
///
/// 资源文件中出现字符串以外的叶子（数字、布尔等）会导致解析失败，
/// 整个加载随之中止。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    Tree(TranslationFileContent),
}

/// 一个翻译文件的完整内容树
pub type TranslationFileContent = BTreeMap<String, ContentValue>;

impl ContentValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(text) => Some(text),
            ContentValue::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TranslationFileContent> {
        match self {
            ContentValue::Text(_) => None,
            ContentValue::Tree(tree) => Some(tree),
        }
    }
}

/// 单个语言的翻译文件
///
/// 由所属的资源节点独占持有；编辑时就地修改内容树，加载后不会整体替换。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationFile {
    /// 语言代码
    pub lang: String,
    /// 归一化后的文件路径（'/' 分隔）
    pub filepath: String,
    /// 内容树
    pub content: TranslationFileContent,
}

/// 在翻译文件内容树中按键路径写入新值
///
/// 缺失的中间层级会按需创建；中间层级若已是字符串叶子则被替换为子树。
pub fn edit_translation_file(file: &mut TranslationFile, key_path: &[String], new_value: &str) {
    let Some((last, init)) = key_path.split_last() else {
        return;
    };

    let mut layer = &mut file.content;
    for seg in init {
        let entry = layer
            .entry(seg.clone())
            .or_insert_with(|| ContentValue::Tree(BTreeMap::new()));
        if matches!(entry, ContentValue::Text(_)) {
            *entry = ContentValue::Tree(BTreeMap::new());
        }
        layer = match entry {
            ContentValue::Tree(tree) => tree,
            ContentValue::Text(_) => unreachable!(),
        };
    }
    layer.insert(last.clone(), ContentValue::Text(new_value.to_string()));
}

/// 按键路径读取内容树中的叶子值
pub fn value_at<'a>(content: &'a TranslationFileContent, key_path: &[String]) -> Option<&'a str> {
    let (last, init) = key_path.split_last()?;
    let mut layer = content;
    for seg in init {
        layer = layer.get(seg)?.as_tree()?;
    }
    layer.get(last)?.as_text()
}

/// 资源节点：按 '/' 逻辑路径分组的一个资源目录
///
/// `translations` 非空当且仅当该目录确实有语言文件匹配（叶子资源）。
/// 子节点由父节点独占持有，整棵树每次加载时重建。
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    /// '/' 连接的逻辑路径，根节点为 ""
    pub id: String,
    /// 路径片段
    pub path: Vec<String>,
    /// 各语言的翻译文件
    pub translations: Vec<TranslationFile>,
    /// 子资源节点
    pub children: Vec<ResourceNode>,
}

impl ResourceNode {
    pub fn new(id: &str) -> Self {
        let path = if id.is_empty() {
            Vec::new()
        } else {
            id.split('/').map(str::to_string).collect()
        };
        Self {
            id: id.to_string(),
            path,
            translations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 是否为叶子资源（至少有一个语言文件）
    pub fn is_leaf_resource(&self) -> bool {
        !self.translations.is_empty()
    }

    pub fn find_translation(&self, lang: &str) -> Option<&TranslationFile> {
        self.translations.iter().find(|t| t.lang == lang)
    }

    pub fn find_translation_mut(&mut self, lang: &str) -> Option<&mut TranslationFile> {
        self.translations.iter_mut().find(|t| t.lang == lang)
    }
}
