use std::collections::BTreeMap;

use super::{NodeKind, Tree};

/// 归一化树统计信息
#[derive(Debug, Clone)]
pub struct TreeStats {
    /// 叶子资源目录数
    pub resource_count: usize,
    /// 纯分组目录数
    pub directory_count: usize,
    /// 条目节点总数
    pub entry_count: usize,
    /// 携带值的叶子条目数
    pub leaf_count: usize,
    /// 各语言的非空值数量
    pub language_counts: BTreeMap<String, usize>,
    /// 叶子条目中为空的值数量
    pub missing_count: usize,
}

impl std::fmt::Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 资源树统计 ===")?;
        writeln!(f, "叶子资源数: {}", self.resource_count)?;
        writeln!(f, "分组目录数: {}", self.directory_count)?;
        writeln!(f, "条目总数: {}", self.entry_count)?;
        writeln!(f, "叶子条目数: {}", self.leaf_count)?;
        writeln!(f, "缺失值数量: {}", self.missing_count)?;
        for (lang, count) in &self.language_counts {
            writeln!(f, "语言 {}: {} 个非空值", lang, count)?;
        }
        Ok(())
    }
}

impl Tree {
    /// 获取统计信息
    pub fn get_stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            resource_count: 0,
            directory_count: 0,
            entry_count: 0,
            leaf_count: 0,
            language_counts: BTreeMap::new(),
            missing_count: 0,
        };

        for id in self.iter_depth_first() {
            match &self.node(id).kind {
                NodeKind::Directory { .. } => stats.directory_count += 1,
                NodeKind::DirectoryWithTranslations { .. } => stats.resource_count += 1,
                NodeKind::Entry(entry) => {
                    stats.entry_count += 1;
                    if let Some(values) = &entry.values {
                        stats.leaf_count += 1;
                        for (lang, value) in values {
                            if value.is_empty() {
                                stats.missing_count += 1;
                            } else {
                                *stats.language_counts.entry(lang.clone()).or_insert(0) += 1;
                            }
                        }
                    }
                }
            }
        }

        stats
    }
}
