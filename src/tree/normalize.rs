/// 归一化器
///
/// 把资源树合并为归一化树的纯转换，无任何 IO。
///
/// # 合并规则
/// - 无翻译的资源节点映射为 directory 节点
/// - 有翻译的资源节点映射为 directory-with-translations 节点，
///   随后对其所有语言的内容树做键合并，再追加子资源
/// - 键合并取各语言直接子键的并集；只要任一语言在该键上是字符串，
///   该键即按叶子处理（"任一字符串即叶子"），缺失或非字符串的语言记为 ""；
///   否则生成容器条目并对各语言的子树继续递归
use std::collections::{BTreeMap, HashSet};

use crate::resource::{ContentValue, ResourceNode, TranslationFileContent};

use super::node::{EntryData, NodeId, NodeKind, NormalizedNode};

/// 归一化结果：arena 节点存储 + 森林根句柄
pub(crate) struct NormalizeOutput {
    pub nodes: Vec<NormalizedNode>,
    pub roots: Vec<NodeId>,
}

pub(crate) fn normalize_forest(resources: &[ResourceNode]) -> NormalizeOutput {
    let mut arena = Arena::default();
    let roots = resources
        .iter()
        .map(|resource| normalize_resource_node(&mut arena, resource))
        .collect();
    NormalizeOutput {
        nodes: arena.nodes,
        roots,
    }
}

#[derive(Default)]
struct Arena {
    nodes: Vec<NormalizedNode>,
}

impl Arena {
    fn alloc(&mut self, node: NormalizedNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// 挂接父子：父持有子句柄，子记录父句柄
    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }
}

/// 某个语言在当前合并层的子树；语言在该层缺席时为 None
struct LangSubtree<'a> {
    lang: &'a str,
    subtree: Option<&'a TranslationFileContent>,
}

fn normalize_resource_node(arena: &mut Arena, node: &ResourceNode) -> NodeId {
    if node.translations.is_empty() {
        normalize_dir_node(arena, node)
    } else {
        normalize_dir_with_translations_node(arena, node)
    }
}

fn normalize_dir_node(arena: &mut Arena, node: &ResourceNode) -> NodeId {
    let id = arena.alloc(NormalizedNode {
        key: node.id.clone(),
        path: node.path.clone(),
        parent: None,
        children: Vec::new(),
        kind: NodeKind::Directory {
            name: node.path.last().cloned().unwrap_or_default(),
        },
    });
    for child in &node.children {
        let child_id = normalize_resource_node(arena, child);
        arena.link(id, child_id);
    }
    id
}

fn normalize_dir_with_translations_node(arena: &mut Arena, node: &ResourceNode) -> NodeId {
    let files = node
        .translations
        .iter()
        .map(|t| (t.lang.clone(), t.filepath.clone()))
        .collect();

    let id = arena.alloc(NormalizedNode {
        key: node.id.clone(),
        path: node.path.clone(),
        parent: None,
        children: Vec::new(),
        kind: NodeKind::DirectoryWithTranslations {
            name: node.path.last().cloned().unwrap_or_default(),
            files,
        },
    });

    let values: Vec<LangSubtree> = node
        .translations
        .iter()
        .map(|t| LangSubtree {
            lang: &t.lang,
            subtree: Some(&t.content),
        })
        .collect();
    create_entry_nodes(arena, id, &values);

    // 合并出的条目在前，子资源追加在后
    for child in &node.children {
        let child_id = normalize_resource_node(arena, child);
        arena.link(id, child_id);
    }

    id
}

/// 对同一逻辑键路径下的各语言子树做一层键合并
fn create_entry_nodes(arena: &mut Arena, parent: NodeId, values: &[LangSubtree]) {
    // 直接子键的并集，保持首次出现顺序
    let mut keys: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for value in values {
        if let Some(subtree) = value.subtree {
            for key in subtree.keys() {
                if seen.insert(key.as_str()) {
                    keys.push(key);
                }
            }
        }
    }

    for key in keys {
        let is_leaf = values
            .iter()
            .any(|v| text_at(v.subtree, key).is_some());

        if is_leaf {
            let leaf_values: BTreeMap<String, String> = values
                .iter()
                .map(|v| {
                    let text = text_at(v.subtree, key).unwrap_or_default();
                    (v.lang.to_string(), text.to_string())
                })
                .collect();
            create_entry_node(arena, parent, key, Some(leaf_values), &[]);
        } else {
            let child_values: Vec<LangSubtree> = values
                .iter()
                .map(|v| LangSubtree {
                    lang: v.lang,
                    subtree: tree_at(v.subtree, key),
                })
                .collect();
            create_entry_node(arena, parent, key, None, &child_values);
        }
    }
}

fn create_entry_node(
    arena: &mut Arena,
    parent: NodeId,
    key: &str,
    values: Option<BTreeMap<String, String>>,
    child_values: &[LangSubtree],
) {
    let (node_key, path, key_path) = {
        let parent_node = &arena.nodes[parent];
        let mut path = parent_node.path.clone();
        path.push(key.to_string());
        let key_path = match parent_node.entry() {
            Some(entry) => {
                let mut key_path = entry.key_path.clone();
                key_path.push(key.to_string());
                key_path
            }
            None => vec![key.to_string()],
        };
        (format!("{}.{}", parent_node.key, key), path, key_path)
    };

    let is_container = values.is_none();
    let id = arena.alloc(NormalizedNode {
        key: node_key,
        path,
        parent: None,
        children: Vec::new(),
        kind: NodeKind::Entry(EntryData {
            key: key.to_string(),
            key_path,
            values,
        }),
    });
    arena.link(parent, id);

    if is_container {
        create_entry_nodes(arena, id, child_values);
    }
}

fn text_at<'a>(subtree: Option<&'a TranslationFileContent>, key: &str) -> Option<&'a str> {
    subtree?.get(key).and_then(ContentValue::as_text)
}

fn tree_at<'a>(
    subtree: Option<&'a TranslationFileContent>,
    key: &str,
) -> Option<&'a TranslationFileContent> {
    subtree?.get(key).and_then(ContentValue::as_tree)
}
