use crate::tree::{NodeId, NodeKind, Tree};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// 归一化树结构调试器
pub struct TreeDebugger;

impl TreeDebugger {
    /// 生成树结构大纲并写入文件
    pub fn dump_structure(tree: &Tree, output_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let mut output = File::create(output_path)?;
        write!(output, "{}", Self::render(tree))?;
        Ok(())
    }

    /// 渲染整个森林为缩进大纲
    pub fn render(tree: &Tree) -> String {
        let mut out = String::new();
        out.push_str("=== 归一化树结构 ===\n");
        for root in tree.roots() {
            Self::render_node(tree, *root, 0, &mut out);
        }
        out
    }

    fn render_node(tree: &Tree, id: NodeId, indent: usize, out: &mut String) {
        let prefix = "  ".repeat(indent);
        let node = tree.node(id);
        match &node.kind {
            NodeKind::Directory { name } => {
                out.push_str(&format!("{}[目录] {} ({})\n", prefix, name, node.key));
            }
            NodeKind::DirectoryWithTranslations { name, files } => {
                out.push_str(&format!(
                    "{}[资源] {} ({}) - {} 个语言文件\n",
                    prefix,
                    name,
                    node.key,
                    files.len()
                ));
            }
            NodeKind::Entry(entry) => match &entry.values {
                Some(values) => {
                    out.push_str(&format!(
                        "{}[叶子] {} - {} 个值\n",
                        prefix,
                        entry.key,
                        values.len()
                    ));
                }
                None => {
                    out.push_str(&format!("{}[条目] {}\n", prefix, entry.key));
                }
            },
        }
        for child in &node.children {
            Self::render_node(tree, *child, indent + 1, out);
        }
    }
}
