use std::collections::BTreeMap;

/// 归一化树中节点的句柄（arena 下标）
///
/// 父引用只保存句柄，不持有所有权，避免父子互指成环。
pub type NodeId = usize;

/// 节点类别标签（用于按类型查找祖先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Directory,
    DirectoryWithTranslations,
    Entry,
}

impl NodeType {
    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::Directory => "directory",
            NodeType::DirectoryWithTranslations => "directory-with-translations",
            NodeType::Entry => "entry",
        }
    }
}

/// 条目数据：叶子资源内一条逻辑键路径
#[derive(Debug, Clone, PartialEq)]
pub struct EntryData {
    /// 在父节点下的局部键名
    pub key: String,
    /// 相对所属叶子资源的键路径
    pub key_path: Vec<String>,
    /// 各语言的值；仅真正的叶子条目存在，容器条目为 None
    pub values: Option<BTreeMap<String, String>>,
}

/// 节点的三种互斥形态
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// 纯分组目录
    Directory { name: String },
    /// 叶子资源目录，携带各语言的文件路径
    DirectoryWithTranslations {
        name: String,
        files: BTreeMap<String, String>,
    },
    /// 逻辑键条目
    Entry(EntryData),
}

/// 归一化节点
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedNode {
    /// 全树唯一键：资源目录用 '/' 路径，条目在其下用 '.' 继续连接
    pub key: String,
    /// 路径片段序列
    pub path: Vec<String>,
    /// 父节点句柄（仅用于向上查找）
    pub parent: Option<NodeId>,
    /// 子节点句柄，顺序即遍历顺序
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl NormalizedNode {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Directory { .. } => NodeType::Directory,
            NodeKind::DirectoryWithTranslations { .. } => NodeType::DirectoryWithTranslations,
            NodeKind::Entry(_) => NodeType::Entry,
        }
    }

    /// 目录节点的显示名；条目节点为 None
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Directory { name } => Some(name),
            NodeKind::DirectoryWithTranslations { name, .. } => Some(name),
            NodeKind::Entry(_) => None,
        }
    }

    pub fn entry(&self) -> Option<&EntryData> {
        match &self.kind {
            NodeKind::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn entry_mut(&mut self) -> Option<&mut EntryData> {
        match &mut self.kind {
            NodeKind::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// 叶子资源目录的语言到文件路径映射
    pub fn files(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            NodeKind::DirectoryWithTranslations { files, .. } => Some(files),
            _ => None,
        }
    }
}
