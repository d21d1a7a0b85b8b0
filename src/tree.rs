/// 归一化树索引模块
///
/// `Tree` 持有原始资源森林与归一化后的节点 arena，
/// 提供按键/按资源 id 的 O(1) 查找、按类型的祖先查找、
/// 多字段正则过滤与祖先闭包计算。
mod node;
mod normalize;
mod stats;

#[cfg(test)]
mod tests;

pub use node::{EntryData, NodeId, NodeKind, NodeType, NormalizedNode};
pub use stats::TreeStats;

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::{Regex, RegexBuilder};
use serde_json::json;

use crate::resource::ResourceNode;
use crate::utils::WeaveError;

use normalize::{normalize_forest, NormalizeOutput};

/// 归一化树 + 双向索引
///
/// 每次加载整体重建；除条目值的就地修改外不做增量更新。
pub struct Tree {
    /// 原始资源森林（所有权在此）
    resources: Vec<ResourceNode>,
    /// 归一化节点 arena
    nodes: Vec<NormalizedNode>,
    /// 森林根句柄
    roots: Vec<NodeId>,
    /// 归一化键 -> 节点句柄
    node_map: HashMap<String, NodeId>,
    /// 资源 id -> 从森林根到该节点的子下标序列
    resource_map: HashMap<String, Vec<usize>>,
}

impl Tree {
    /// 由资源森林构建归一化树及全部索引
    pub fn new(resources: Vec<ResourceNode>) -> Self {
        let NormalizeOutput { nodes, roots } = normalize_forest(&resources);

        let mut node_map = HashMap::with_capacity(nodes.len());
        let mut stack: Vec<NodeId> = roots.clone();
        while let Some(id) = stack.pop() {
            node_map.insert(nodes[id].key.clone(), id);
            stack.extend(nodes[id].children.iter().copied());
        }

        let mut resource_map = HashMap::new();
        index_resources(&resources, &mut Vec::new(), &mut resource_map);

        Self {
            resources,
            nodes,
            roots,
            node_map,
            resource_map,
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn resources(&self) -> &[ResourceNode] {
        &self.resources
    }

    pub fn node(&self, id: NodeId) -> &NormalizedNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NormalizedNode {
        &mut self.nodes[id]
    }

    /// 归一化节点总数
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_id_by_key(&self, key: &str) -> Option<NodeId> {
        self.node_map.get(key).copied()
    }

    pub fn get_node_by_key(&self, key: &str) -> Option<&NormalizedNode> {
        self.node_id_by_key(key).map(|id| &self.nodes[id])
    }

    pub fn get_resource_node(&self, id: &str) -> Option<&ResourceNode> {
        let indices = self.resource_map.get(id)?;
        resolve_resource(&self.resources, indices)
    }

    pub(crate) fn get_resource_node_mut(&mut self, id: &str) -> Option<&mut ResourceNode> {
        let indices = self.resource_map.get(id)?.clone();
        let (first, rest) = indices.split_first()?;
        let mut node = self.resources.get_mut(*first)?;
        for i in rest {
            node = node.children.get_mut(*i)?;
        }
        Some(node)
    }

    /// 沿父链向上找最近的指定类型祖先
    pub fn find_parent_of_type(&self, id: NodeId, node_type: NodeType) -> Option<NodeId> {
        let mut current = self.nodes[id].parent;
        while let Some(parent_id) = current {
            if self.nodes[parent_id].node_type() == node_type {
                return Some(parent_id);
            }
            current = self.nodes[parent_id].parent;
        }
        None
    }

    /// 节点所属叶子资源的 id（节点自身是叶子资源目录时即其本身）
    pub fn resource_id_of_node(&self, id: NodeId) -> Option<&str> {
        let target = match self.nodes[id].node_type() {
            NodeType::DirectoryWithTranslations => id,
            _ => self.find_parent_of_type(id, NodeType::DirectoryWithTranslations)?,
        };
        Some(self.nodes[target].key.as_str())
    }

    /// 解析节点背后的资源节点，用于定位待编辑/标脏的文件
    pub fn get_resource_node_of_node(&self, id: NodeId) -> Option<&ResourceNode> {
        let resource_id = self.resource_id_of_node(id)?;
        self.get_resource_node(resource_id)
    }

    /// 多字段正则过滤
    ///
    /// `filter` 把字段名（"name" 或语言代码）映射到原始模式串，空串忽略。
    /// 所有模式按不区分大小写编译。目录节点命中要求给出 name 模式且匹配
    /// 显示名；条目节点要求 name 模式（若有）匹配局部键名，且每个语言
    /// 字段的值都存在并匹配。全部字段为空时返回空结果而不是全树。
    pub fn find_by_filter(
        &self,
        filter: &BTreeMap<String, String>,
    ) -> Result<Vec<NodeId>, WeaveError> {
        let mut name_filter: Option<Regex> = None;
        let mut lang_filters: Vec<(&str, Regex)> = Vec::new();
        for (field, raw) in filter {
            if raw.is_empty() {
                continue;
            }
            let regex = RegexBuilder::new(raw).case_insensitive(true).build()?;
            if field == "name" {
                name_filter = Some(regex);
            } else {
                lang_filters.push((field.as_str(), regex));
            }
        }
        if name_filter.is_none() && lang_filters.is_empty() {
            return Ok(Vec::new());
        }

        let mut result = Vec::new();
        for id in self.iter_depth_first() {
            let node = &self.nodes[id];
            let matched = match &node.kind {
                NodeKind::Entry(entry) => {
                    let name_ok = name_filter
                        .as_ref()
                        .map(|re| re.is_match(&entry.key))
                        .unwrap_or(true);
                    let langs_ok = lang_filters.iter().all(|(lang, re)| {
                        entry
                            .values
                            .as_ref()
                            .and_then(|values| values.get(*lang))
                            .map(|value| re.is_match(value))
                            .unwrap_or(false)
                    });
                    name_ok && langs_ok
                }
                _ => name_filter
                    .as_ref()
                    .zip(node.name())
                    .map(|(re, name)| re.is_match(name))
                    .unwrap_or(false),
            };
            if matched {
                result.push(id);
            }
        }
        Ok(result)
    }

    /// 一组节点的全部互异祖先（不含节点自身），宽度优先去重
    ///
    /// 用于决定展开哪些目录以使过滤结果可见。
    pub fn find_ancestor_closure(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut current: Vec<NodeId> = ids
            .iter()
            .filter_map(|id| self.nodes[*id].parent)
            .collect();

        while !current.is_empty() {
            let mut next = Vec::new();
            for id in current {
                if seen.insert(id) {
                    result.push(id);
                    if let Some(parent) = self.nodes[id].parent {
                        next.push(parent);
                    }
                }
            }
            current = next;
        }
        result
    }

    /// 先序深度优先遍历整个森林
    pub fn iter_depth_first(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id].children.iter().rev().copied());
            Some(id)
        })
    }

    /// 导出归一化森林为 JSON（含嵌套 children）
    pub fn export_json(&self) -> serde_json::Value {
        let roots: Vec<serde_json::Value> =
            self.roots.iter().map(|id| self.node_to_json(*id)).collect();
        json!(roots)
    }

    fn node_to_json(&self, id: NodeId) -> serde_json::Value {
        let node = &self.nodes[id];
        let mut obj = json!({
            "key": node.key,
            "path": node.path,
            "type": node.node_type().tag(),
        });
        match &node.kind {
            NodeKind::Directory { name } => {
                obj["name"] = json!(name);
            }
            NodeKind::DirectoryWithTranslations { name, files } => {
                obj["name"] = json!(name);
                obj["files"] = json!(files);
            }
            NodeKind::Entry(entry) => {
                let mut data = json!({
                    "key": entry.key,
                    "keyPath": entry.key_path,
                });
                if let Some(values) = &entry.values {
                    data["values"] = json!(values);
                }
                obj["entry"] = data;
            }
        }
        let children: Vec<serde_json::Value> = node
            .children
            .iter()
            .map(|child| self.node_to_json(*child))
            .collect();
        obj["children"] = json!(children);
        obj
    }
}

fn resolve_resource<'a>(
    resources: &'a [ResourceNode],
    indices: &[usize],
) -> Option<&'a ResourceNode> {
    let (first, rest) = indices.split_first()?;
    let mut node = resources.get(*first)?;
    for i in rest {
        node = node.children.get(*i)?;
    }
    Some(node)
}

fn index_resources(
    resources: &[ResourceNode],
    prefix: &mut Vec<usize>,
    map: &mut HashMap<String, Vec<usize>>,
) {
    for (i, resource) in resources.iter().enumerate() {
        prefix.push(i);
        map.insert(resource.id.clone(), prefix.clone());
        index_resources(&resource.children, prefix, map);
        prefix.pop();
    }
}
