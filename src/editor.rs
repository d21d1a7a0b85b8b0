/// 编辑器层模块
///
/// 该模块提供有状态的编辑接口，支持变更追踪、撤销/重做与批量保存。
/// 遵循"修改-保存分离"原则，所有修改操作仅在内存中进行，需要显式调用保存。
///
/// # 架构设计
///
/// - **history**: 编辑历史管理器，双栈撤销/重做 + 脏文件追踪
///
/// # 使用示例
///
/// ```rust,ignore
/// use locale_weaver::{EditAction, EditHistoryManager, Tree};
/// use locale_weaver::io::DefaultResourceWriter;
///
/// let mut history = EditHistoryManager::new();
/// history.push_edit(&mut tree, EditAction {
///     key: "common.greeting".into(),
///     lang: "fr".into(),
///     new_value: "salut".into(),
/// })?;
///
/// history.undo(&mut tree)?;
/// history.redo(&mut tree)?;
///
/// let writer = DefaultResourceWriter;
/// let written = history.save_changes(&tree, &writer)?;
/// ```
pub mod history;

// === 导出公共接口 ===
pub use history::{EditAction, EditHistory, EditHistoryManager, MAX_HISTORY};
