use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use locale_weaver::debug::TreeDebugger;
use locale_weaver::utils::create_backup;
use locale_weaver::{EditAction, Workspace};

#[derive(Parser)]
#[command(name = "locale_weaver")]
#[command(about = "发现并合并多语言资源文件，支持编辑与批量保存")]
#[command(version = "0.4.0")]
struct Cli {
    /// 模式描述文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 显示资源树统计信息
    #[arg(long)]
    stats: bool,

    /// 输出树结构大纲（调试用）
    #[arg(long)]
    dump_tree: bool,

    /// 导出归一化树到JSON文件
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// 按字段过滤条目，格式 field=regex（可重复，field 为 name 或语言代码）
    #[arg(long)]
    filter: Vec<String>,

    /// 应用编辑模式：从JSON文件应用一批编辑（{key, lang, value} 数组）
    #[arg(long)]
    apply: Option<PathBuf>,

    /// 应用编辑后保存所有脏文件
    #[arg(long)]
    save: bool,

    /// 保存前为已存在的文件创建备份
    #[arg(long)]
    backup: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

/// 编辑文件中的单条记录
#[derive(serde::Deserialize)]
struct EditRecord {
    key: String,
    lang: String,
    value: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    validate_input(&cli.input)?;

    let input = cli.input.display().to_string();
    let mut workspace = Workspace::new();
    workspace
        .load(&input)
        .with_context(|| format!("加载模式文件失败: {}", input))?;

    if !cli.quiet {
        let languages = workspace.languages();
        println!("已加载: {} (语言: {})", input, languages.join(", "));
    }

    if cli.stats {
        return handle_stats(&workspace);
    }

    if cli.dump_tree {
        return handle_dump_tree(&workspace);
    }

    if !cli.filter.is_empty() {
        return handle_filter(&workspace, &cli.filter);
    }

    if let Some(edits_file) = &cli.apply {
        return handle_apply(&cli, &mut workspace, edits_file);
    }

    if let Some(export_path) = &cli.export {
        return handle_export(&cli, &workspace, export_path);
    }

    // 默认模式：输出统计摘要
    handle_stats(&workspace)
}

/// 验证输入文件
fn validate_input(input: &Path) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("输入文件不存在: {:?}", input);
    }
    Ok(())
}

/// 显示统计信息
fn handle_stats(workspace: &Workspace) -> anyhow::Result<()> {
    let tree = workspace.tree().context("资源树为空")?;
    println!("{}", tree.get_stats());
    Ok(())
}

/// 输出树结构大纲
fn handle_dump_tree(workspace: &Workspace) -> anyhow::Result<()> {
    let tree = workspace.tree().context("资源树为空")?;
    print!("{}", TreeDebugger::render(tree));
    Ok(())
}

/// 按字段过滤并列出命中的节点
fn handle_filter(workspace: &Workspace, raw_filters: &[String]) -> anyhow::Result<()> {
    let mut filter = std::collections::BTreeMap::new();
    for raw in raw_filters {
        let (field, pattern) = raw
            .split_once('=')
            .with_context(|| format!("过滤条件格式应为 field=regex: {}", raw))?;
        filter.insert(field.to_string(), pattern.to_string());
    }

    let tree = workspace.tree().context("资源树为空")?;
    let hits = tree.find_by_filter(&filter).context("编译过滤正则失败")?;

    println!("命中 {} 个节点:", hits.len());
    for id in &hits {
        let node = tree.node(*id);
        match node.entry().and_then(|e| e.values.as_ref()) {
            Some(values) => {
                let pairs: Vec<String> = values
                    .iter()
                    .map(|(lang, value)| format!("{}=\"{}\"", lang, value))
                    .collect();
                println!("  {} [{}]", node.key, pairs.join(", "));
            }
            None => println!("  {}", node.key),
        }
    }
    Ok(())
}

/// 从JSON文件应用一批编辑，按需保存
fn handle_apply(cli: &Cli, workspace: &mut Workspace, edits_file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(edits_file)
        .with_context(|| format!("读取编辑文件失败: {:?}", edits_file))?;
    let edits: Vec<EditRecord> =
        serde_json::from_str(&text).with_context(|| format!("解析编辑文件失败: {:?}", edits_file))?;

    if edits.is_empty() {
        anyhow::bail!("编辑数据为空");
    }

    for edit in &edits {
        workspace
            .push_edit(EditAction {
                key: edit.key.clone(),
                lang: edit.lang.clone(),
                new_value: edit.value.clone(),
            })
            .with_context(|| format!("应用编辑失败: {} [{}]", edit.key, edit.lang))?;
    }

    if !cli.quiet {
        println!("已应用 {} 条编辑，涉及 {} 个文件", edits.len(), workspace.dirty_count());
    }

    if cli.save {
        if cli.backup {
            for filepath in workspace.dirty_files() {
                let path = Path::new(&filepath);
                if path.exists() {
                    let backup_path = create_backup(path)
                        .with_context(|| format!("创建备份失败: {}", filepath))?;
                    if !cli.quiet {
                        println!("已创建备份: {:?}", backup_path);
                    }
                }
            }
        }

        let written = workspace.save_changes().context("保存失败")?;
        if !cli.quiet {
            println!("保存完成，写出 {} 个文件", written);
        }
    } else if !cli.quiet {
        println!("未指定 --save，修改仅保留在内存中");
    }

    Ok(())
}

/// 导出归一化树为JSON
fn handle_export(cli: &Cli, workspace: &Workspace, export_path: &Path) -> anyhow::Result<()> {
    let tree = workspace.tree().context("资源树为空")?;
    let json = serde_json::to_string_pretty(&tree.export_json())?;
    std::fs::write(export_path, json)
        .with_context(|| format!("写入导出文件失败: {:?}", export_path))?;

    if !cli.quiet {
        println!("归一化树已导出: {:?}", export_path);
    }
    Ok(())
}
