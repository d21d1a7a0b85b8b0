/// 资源树构建器
///
/// 按模式枚举候选文件，并行完成匹配与内容解析，
/// 再以单线程组装节点，保证路径创建的幂等性。
use rayon::prelude::*;
use tracing::debug;

use crate::io::{FileEnumerator, ResourceReader};
use crate::pattern::{Pattern, PatternContainer};
use crate::utils::{join_path, remove_trailing_slash, unix_path, WeaveError};

use super::{ResourceNode, TranslationFile};

/// 一个通过 path 规则匹配的候选文件
///
/// lang 规则未命中（或语言不在语言表中）时 translation 为 None，
/// 此时目录节点仍会被创建，但不挂翻译。
struct MatchedFile {
    resource_id: String,
    translation: Option<TranslationFile>,
}

/// 资源树构建器
///
/// 文件枚举与内容读取通过 trait 注入，便于测试和扩展。
pub struct ResourceTreeBuilder<'a> {
    container: &'a PatternContainer,
    base_dir: String,
    enumerator: &'a dyn FileEnumerator,
    reader: &'a dyn ResourceReader,
}

impl<'a> ResourceTreeBuilder<'a> {
    pub fn new(
        container: &'a PatternContainer,
        base_dir: &str,
        enumerator: &'a dyn FileEnumerator,
        reader: &'a dyn ResourceReader,
    ) -> Self {
        Self {
            container,
            base_dir: base_dir.to_string(),
            enumerator,
            reader,
        }
    }

    /// 构建以 "" 为根的资源树
    ///
    /// # 错误
    /// 任何一条 glob 枚举失败或任何一个已匹配文件解析失败，
    /// 整个构建都会失败（不暴露半成品树）。
    pub fn build(&self) -> Result<ResourceNode, WeaveError> {
        let mut candidates: Vec<(&Pattern, String)> = Vec::new();
        for pattern in &self.container.patterns {
            let glob = join_path(&[&self.base_dir, &pattern.glob]);
            for filepath in self.enumerator.enumerate(&glob)? {
                candidates.push((pattern, filepath));
            }
        }
        debug!(candidates = candidates.len(), "enumerated candidate files");

        // 匹配与内容解析并行进行
        let matched: Vec<Option<MatchedFile>> = candidates
            .par_iter()
            .map(|(pattern, filepath)| self.process_file(pattern, filepath))
            .collect::<Result<_, _>>()?;

        // 节点创建串行执行，重复访问同一路径片段时复用已有节点
        let mut root = ResourceNode::new("");
        let mut attached = 0usize;
        for m in matched.into_iter().flatten() {
            attached += usize::from(m.translation.is_some());
            attach(&mut root, m);
        }
        debug!(translations = attached, "resource tree assembled");

        Ok(root)
    }

    /// 处理单个候选文件：path 匹配、lang 匹配、内容解析
    fn process_file(
        &self,
        pattern: &Pattern,
        raw_path: &str,
    ) -> Result<Option<MatchedFile>, WeaveError> {
        let filepath = remove_trailing_slash(&unix_path(raw_path)).to_string();

        let Some(resource_id) = first_capture(&pattern.path, &filepath) else {
            return Ok(None);
        };

        let translation = match first_capture(&pattern.lang, &filepath) {
            Some(lang) if self.container.has_language(&lang) => Some(TranslationFile {
                content: self.reader.read(&filepath)?,
                lang,
                filepath: filepath.clone(),
            }),
            _ => None,
        };

        Ok(Some(MatchedFile {
            resource_id,
            translation,
        }))
    }
}

/// 取第一个捕获组的内容；无匹配或无捕获时为 None
fn first_capture(regex: &regex::Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// 沿逻辑路径走到目标节点，缺失的中间节点按需创建（幂等）
fn attach(root: &mut ResourceNode, matched: MatchedFile) {
    let mut node = root;
    let mut id = String::new();
    for segment in matched.resource_id.split('/') {
        if id.is_empty() {
            id.push_str(segment);
        } else {
            id.push('/');
            id.push_str(segment);
        }

        let pos = match node.children.iter().position(|c| c.id == id) {
            Some(pos) => pos,
            None => {
                node.children.push(ResourceNode::new(&id));
                node.children.len() - 1
            }
        };
        node = &mut node.children[pos];
    }

    if let Some(translation) = matched.translation {
        node.translations.push(translation);
    }
}
