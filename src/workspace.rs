/// 工作区会话模块
///
/// 将模式容器、资源树、归一化索引和编辑历史组合为一个会话对象，
/// 提供统一的加载/重载/编辑/保存入口。
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::editor::{EditAction, EditHistory, EditHistoryManager};
use crate::io::{
    DefaultFileEnumerator, DefaultResourceReader, DefaultResourceWriter, FileEnumerator,
    ResourceReader, ResourceWriter,
};
use crate::pattern::PatternContainer;
use crate::resource::ResourceTreeBuilder;
use crate::tree::Tree;
use crate::utils::{dir_of, unix_path, WeaveError};

/// 工作区会话
///
/// 一个会话对应一个已加载的模式文件；重载会整体替换树和历史，
/// 旧树上的未完成编辑在重载前必须完成或放弃。
///
/// # 使用示例
///
/// ```rust,ignore
/// use locale_weaver::{EditAction, Workspace};
///
/// let mut workspace = Workspace::new();
/// workspace.load("project/weaver.json")?;
///
/// workspace.push_edit(EditAction {
///     key: "common.greeting".into(),
///     lang: "fr".into(),
///     new_value: "salut".into(),
/// })?;
///
/// let written = workspace.save_changes()?;
/// println!("已保存 {} 个文件", written);
/// ```
pub struct Workspace {
    enumerator: Box<dyn FileEnumerator>,
    reader: Box<dyn ResourceReader>,
    writer: Box<dyn ResourceWriter>,
    /// 最近一次成功加载的模式文件路径（用于重载）
    last_loaded: Option<String>,
    languages: BTreeMap<String, String>,
    tree: Option<Tree>,
    history: Option<EditHistoryManager>,
}

impl Workspace {
    /// 使用默认 IO 实现创建会话
    pub fn new() -> Self {
        Self::with_io(
            Box::new(DefaultFileEnumerator),
            Box::new(DefaultResourceReader),
            Box::new(DefaultResourceWriter),
        )
    }

    /// 使用自定义 IO 实现创建会话
    ///
    /// 通过依赖注入支持自定义 IO，便于测试和扩展。
    pub fn with_io(
        enumerator: Box<dyn FileEnumerator>,
        reader: Box<dyn ResourceReader>,
        writer: Box<dyn ResourceWriter>,
    ) -> Self {
        Self {
            enumerator,
            reader,
            writer,
            last_loaded: None,
            languages: BTreeMap::new(),
            tree: None,
            history: None,
        }
    }

    /// 加载模式文件并构建整棵资源树
    ///
    /// 加载完全成功之前不替换当前树；任何失败都保持旧状态不变。
    pub fn load(&mut self, path: &str) -> Result<(), WeaveError> {
        let normalized = unix_path(path);
        self.load_file(&normalized)?;
        self.last_loaded = Some(normalized);
        Ok(())
    }

    /// 按最近一次加载的路径重新加载
    ///
    /// # 返回
    /// 尚未加载过任何文件时返回 false
    pub fn reload(&mut self) -> Result<bool, WeaveError> {
        let Some(path) = self.last_loaded.clone() else {
            return Ok(false);
        };
        self.load_file(&path)?;
        Ok(true)
    }

    fn load_file(&mut self, filepath: &str) -> Result<(), WeaveError> {
        let container = PatternContainer::load(filepath)?;
        let base_dir = dir_of(filepath);
        debug!(patterns = container.patterns.len(), %base_dir, "pattern container compiled");

        let root = ResourceTreeBuilder::new(
            &container,
            &base_dir,
            self.enumerator.as_ref(),
            self.reader.as_ref(),
        )
        .build()?;

        // 根的子节点即为资源森林
        let tree = Tree::new(root.children);
        info!(nodes = tree.len(), "resource tree loaded");

        self.languages = container.languages;
        self.tree = Some(tree);
        self.history = Some(EditHistoryManager::new());
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.tree.is_some()
    }

    /// 当前归一化树
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// 语言代码列表（排序后）
    pub fn languages(&self) -> Vec<String> {
        self.languages.keys().cloned().collect()
    }

    /// 语言代码到显示名的映射
    pub fn languages_map(&self) -> &BTreeMap<String, String> {
        &self.languages
    }

    /// 查询语言的显示名
    pub fn language_label(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(String::as_str)
    }

    /// 记录并应用一次编辑
    pub fn push_edit(&mut self, action: EditAction) -> Result<(), WeaveError> {
        let tree = self.tree.as_mut().ok_or(WeaveError::NotLoaded)?;
        let history = self.history.as_mut().ok_or(WeaveError::NotLoaded)?;
        history.push_edit(tree, action)
    }

    /// 撤销最后一次编辑；无可撤销时返回 None
    pub fn undo(&mut self) -> Result<Option<EditHistory>, WeaveError> {
        let tree = self.tree.as_mut().ok_or(WeaveError::NotLoaded)?;
        let history = self.history.as_mut().ok_or(WeaveError::NotLoaded)?;
        history.undo(tree)
    }

    /// 重做最后一次撤销；无可重做时返回 None
    pub fn redo(&mut self) -> Result<Option<EditHistory>, WeaveError> {
        let tree = self.tree.as_mut().ok_or(WeaveError::NotLoaded)?;
        let history = self.history.as_mut().ok_or(WeaveError::NotLoaded)?;
        history.redo(tree)
    }

    /// 批量保存所有脏文件，返回写出的文件数
    pub fn save_changes(&mut self) -> Result<usize, WeaveError> {
        let tree = self.tree.as_ref().ok_or(WeaveError::NotLoaded)?;
        let history = self.history.as_mut().ok_or(WeaveError::NotLoaded)?;
        history.save_changes(tree, self.writer.as_ref())
    }

    /// 可撤销的操作数（未加载时为 0）
    pub fn undo_count(&self) -> usize {
        self.history.as_ref().map_or(0, EditHistoryManager::undo_count)
    }

    /// 可重做的操作数（未加载时为 0）
    pub fn redo_count(&self) -> usize {
        self.history.as_ref().map_or(0, EditHistoryManager::redo_count)
    }

    /// 待保存的脏文件数（未加载时为 0）
    pub fn dirty_count(&self) -> usize {
        self.history.as_ref().map_or(0, EditHistoryManager::dirty_count)
    }

    /// 当前脏文件的路径列表
    pub fn dirty_files(&self) -> Vec<String> {
        match (&self.tree, &self.history) {
            (Some(tree), Some(history)) => history.dirty_files(tree),
            _ => Vec::new(),
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
