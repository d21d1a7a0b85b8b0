/// 编辑历史管理模块
///
/// 该模块实现编辑追踪系统，支持撤销/重做与脏文件批量保存。
/// 记录所有对条目值的修改操作，便于回滚和按需落盘。
use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::debug;

use crate::io::ResourceWriter;
use crate::resource::edit_translation_file;
use crate::tree::{NodeId, Tree};
use crate::utils::WeaveError;

/// 撤销栈的默认容量上限
pub const MAX_HISTORY: usize = 30;

/// 一次编辑请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAction {
    /// 目标条目的归一化键
    pub key: String,
    /// 目标语言代码
    pub lang: String,
    /// 新值
    pub new_value: String,
}

/// 历史栈中的一条记录：编辑请求 + 修改前的旧值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistory {
    pub key: String,
    pub lang: String,
    pub new_value: String,
    /// 修改前的值；该语言原本无值时为 ""
    pub old_value: String,
}

/// 编辑目标解析结果，提交前先整体确认可达
struct EditTarget {
    node: NodeId,
    key_path: Vec<String>,
    resource_id: String,
}

/// 编辑历史管理器
///
/// # 功能
/// - 记录所有条目值的修改操作
/// - 支持撤销/重做（有界双栈，最旧的记录先被淘汰）
/// - 追踪脏文件并批量保存
///
/// # 写穿透约定
/// 三个编辑操作（push_edit/undo/redo）每次都同时写入归一化条目的
/// `values[lang]` 和背后翻译文件内容树中对应键路径的值，两者是同一
/// 逻辑事实的两份物理表示，任何时刻不允许分叉。
#[derive(Debug)]
pub struct EditHistoryManager {
    /// 撤销栈（最近的记录在末尾）
    history_stack: Vec<EditHistory>,
    /// 重做栈
    redo_stack: Vec<EditHistory>,
    /// 栈容量上限，超出时从最旧端淘汰
    max_stack_size: usize,
    /// 脏文件集合，元素为 (资源 id, 语言)
    edited_files: BTreeSet<(String, String)>,
}

impl EditHistoryManager {
    /// 创建新的历史管理器（容量上限 30）
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// 创建指定栈容量的历史管理器
    pub fn with_capacity(max_stack_size: usize) -> Self {
        Self {
            history_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_stack_size,
            edited_files: BTreeSet::new(),
        }
    }

    /// 可撤销的操作数
    pub fn undo_count(&self) -> usize {
        self.history_stack.len()
    }

    /// 可重做的操作数
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// 待保存的脏文件数
    pub fn dirty_count(&self) -> usize {
        self.edited_files.len()
    }

    /// 当前脏文件的路径列表
    pub fn dirty_files(&self, tree: &Tree) -> Vec<String> {
        self.edited_files
            .iter()
            .filter_map(|(resource_id, lang)| {
                let file = tree.get_resource_node(resource_id)?.find_translation(lang)?;
                Some(file.filepath.clone())
            })
            .collect()
    }

    /// 记录并应用一次编辑
    ///
    /// # 行为
    /// - 以条目当前值为旧值（无值记 ""）压入撤销栈
    /// - 超出容量时淘汰最旧的记录
    /// - 清空重做栈（新编辑使重做失效）
    /// - 写穿透：同时更新归一化条目和背后翻译文件的内容树，并标脏
    ///
    /// # 错误
    /// 目标不是携带值的叶子条目、或背后文件无法解析时返回
    /// `InvalidEditTarget`，此时不产生任何修改（契约违例，而非运行时状态）
    pub fn push_edit(&mut self, tree: &mut Tree, action: EditAction) -> Result<(), WeaveError> {
        let target = resolve_target(tree, &action.key, &action.lang)?;

        let old_value = tree
            .node(target.node)
            .entry()
            .and_then(|entry| entry.values.as_ref())
            .and_then(|values| values.get(&action.lang))
            .cloned()
            .unwrap_or_default();

        self.history_stack.push(EditHistory {
            key: action.key.clone(),
            lang: action.lang.clone(),
            new_value: action.new_value.clone(),
            old_value,
        });
        if self.history_stack.len() > self.max_stack_size {
            let excess = self.history_stack.len() - self.max_stack_size;
            self.history_stack.drain(..excess);
        }
        self.redo_stack.clear();

        self.commit(tree, &target, &action.lang, &action.new_value);
        Ok(())
    }

    /// 撤销最后一次操作
    ///
    /// # 返回
    /// 返回被撤销的记录；撤销栈为空时为 None（不视为错误）
    pub fn undo(&mut self, tree: &mut Tree) -> Result<Option<EditHistory>, WeaveError> {
        let Some(op) = self.history_stack.last().cloned() else {
            return Ok(None);
        };
        // 先整体解析目标，解析失败时栈保持原样
        let target = resolve_target(tree, &op.key, &op.lang)?;
        self.history_stack.pop();
        self.commit(tree, &target, &op.lang, &op.old_value);
        self.redo_stack.push(op.clone());
        Ok(Some(op))
    }

    /// 重做最后一次撤销的操作
    ///
    /// # 返回
    /// 返回被重做的记录；重做栈为空时为 None（不视为错误）
    pub fn redo(&mut self, tree: &mut Tree) -> Result<Option<EditHistory>, WeaveError> {
        let Some(op) = self.redo_stack.last().cloned() else {
            return Ok(None);
        };
        let target = resolve_target(tree, &op.key, &op.lang)?;
        self.redo_stack.pop();
        self.commit(tree, &target, &op.lang, &op.new_value);
        self.history_stack.push(op.clone());
        Ok(Some(op))
    }

    /// 应用编辑：写归一化条目、写原始内容树、标脏
    ///
    /// 目标已在 resolve_target 中整体确认，此处不再失败。
    fn commit(&mut self, tree: &mut Tree, target: &EditTarget, lang: &str, value: &str) {
        if let Some(values) = tree
            .node_mut(target.node)
            .entry_mut()
            .and_then(|entry| entry.values.as_mut())
        {
            values.insert(lang.to_string(), value.to_string());
        }

        if let Some(file) = tree
            .get_resource_node_mut(&target.resource_id)
            .and_then(|resource| resource.find_translation_mut(lang))
        {
            edit_translation_file(file, &target.key_path, value);
        }

        self.edited_files
            .insert((target.resource_id.clone(), lang.to_string()));
    }

    /// 批量保存所有脏文件
    ///
    /// 每个脏文件的序列化并行执行，全部完成后才清空脏集合。
    /// 任何一个文件写入失败都会使整批报告失败，脏集合原样保留以便重试；
    /// 已经写出的文件物理上保持写出状态，但仍然标脏。
    ///
    /// # 返回
    /// 成功时返回写出的文件数；没有脏文件时返回 0（不视为错误）
    pub fn save_changes(
        &mut self,
        tree: &Tree,
        writer: &dyn ResourceWriter,
    ) -> Result<usize, WeaveError> {
        if self.edited_files.is_empty() {
            return Ok(0);
        }

        let mut jobs = Vec::with_capacity(self.edited_files.len());
        for (resource_id, lang) in &self.edited_files {
            let file = tree
                .get_resource_node(resource_id)
                .and_then(|resource| resource.find_translation(lang))
                .ok_or_else(|| {
                    WeaveError::InvalidEditTarget(format!(
                        "dirty file {}:{} has no backing translation",
                        resource_id, lang
                    ))
                })?;
            jobs.push(file);
        }

        let failures: Vec<WeaveError> = jobs
            .par_iter()
            .filter_map(|file| writer.write(&file.filepath, &file.content).err())
            .collect();

        if let Some(first) = failures.first() {
            return Err(WeaveError::SaveError {
                failed: failures.len(),
                total: jobs.len(),
                first: first.to_string(),
            });
        }

        let total = jobs.len();
        self.edited_files.clear();
        debug!(files = total, "dirty files flushed");
        Ok(total)
    }
}

impl Default for EditHistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析编辑目标；提交前整体确认，保证编辑不会只落到一侧
fn resolve_target(tree: &Tree, key: &str, lang: &str) -> Result<EditTarget, WeaveError> {
    let node = tree
        .node_id_by_key(key)
        .ok_or_else(|| WeaveError::InvalidEditTarget(format!("unknown node key: {}", key)))?;

    let entry = tree.node(node).entry().ok_or_else(|| {
        WeaveError::InvalidEditTarget(format!("node is not an entry: {}", key))
    })?;
    if entry.values.is_none() {
        return Err(WeaveError::InvalidEditTarget(format!(
            "entry has no values (container entry): {}",
            key
        )));
    }
    let key_path = entry.key_path.clone();

    let resource_id = tree
        .resource_id_of_node(node)
        .ok_or_else(|| {
            WeaveError::InvalidEditTarget(format!("no owning resource for node: {}", key))
        })?
        .to_string();

    tree.get_resource_node(&resource_id)
        .and_then(|resource| resource.find_translation(lang))
        .ok_or_else(|| {
            WeaveError::InvalidEditTarget(format!(
                "resource {} has no file for language {}",
                resource_id, lang
            ))
        })?;

    Ok(EditTarget {
        node,
        key_path,
        resource_id,
    })
}
