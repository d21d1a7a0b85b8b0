use std::fs;
use std::path::Path;

use tempfile::TempDir;

use locale_weaver::{EditAction, NodeType, Workspace};

/// 搭建一个最小的多语言资源项目
///
/// 布局:
///   weaver.json               模式描述文件
///   locales/common/en.json    {"greeting":"hello","menu":{"open":"Open"}}
///   locales/common/fr.json    {"greeting":"bonjour"}
///   locales/app/home/en.json  {"title":"Home"}
fn create_fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path();

    let pattern_file = r#"{
  "patterns": [
    {
      "glob": "locales/**/*.json",
      "path": "locales/(.+)/[^/]+\\.json$",
      "lang": "/(en|fr)\\.json$"
    }
  ],
  "languages": {"en": "English", "fr": "Français"}
}"#;
    fs::write(base.join("weaver.json"), pattern_file).unwrap();

    write_file(
        base,
        "locales/common/en.json",
        r#"{"greeting":"hello","menu":{"open":"Open"}}"#,
    );
    write_file(base, "locales/common/fr.json", r#"{"greeting":"bonjour"}"#);
    write_file(base, "locales/app/home/en.json", r#"{"title":"Home"}"#);

    temp_dir
}

fn write_file(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn load_workspace(temp_dir: &TempDir) -> Workspace {
    let mut workspace = Workspace::new();
    let pattern_path = temp_dir.path().join("weaver.json").display().to_string();
    workspace.load(&pattern_path).unwrap();
    workspace
}

#[test]
fn test_load_builds_normalized_tree() {
    let temp_dir = create_fixture();
    let workspace = load_workspace(&temp_dir);

    assert_eq!(workspace.languages(), vec!["en".to_string(), "fr".to_string()]);
    assert_eq!(workspace.language_label("fr"), Some("Français"));

    let tree = workspace.tree().unwrap();

    let common = tree.get_node_by_key("common").unwrap();
    assert_eq!(common.node_type(), NodeType::DirectoryWithTranslations);
    assert_eq!(common.files().unwrap().len(), 2);

    // 两个语言的值并排出现在同一条目上
    let greeting = tree.get_node_by_key("common.greeting").unwrap();
    let values = greeting.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("en").map(String::as_str), Some("hello"));
    assert_eq!(values.get("fr").map(String::as_str), Some("bonjour"));

    // fr 没有 menu 子树：并集合并后 open 的 fr 值为空串
    let open = tree.get_node_by_key("common.menu.open").unwrap();
    let values = open.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("en").map(String::as_str), Some("Open"));
    assert_eq!(values.get("fr").map(String::as_str), Some(""));

    // 中间目录 app 没有翻译，子资源 app/home 有
    let app = tree.get_node_by_key("app").unwrap();
    assert_eq!(app.node_type(), NodeType::Directory);
    let home = tree.get_node_by_key("app/home").unwrap();
    assert_eq!(home.node_type(), NodeType::DirectoryWithTranslations);

    println!("归一化树节点数: {}", tree.len());
}

#[test]
fn test_edit_save_rewrites_only_dirty_files() {
    let temp_dir = create_fixture();
    let mut workspace = load_workspace(&temp_dir);

    workspace
        .push_edit(EditAction {
            key: "common.greeting".to_string(),
            lang: "fr".to_string(),
            new_value: "salut".to_string(),
        })
        .unwrap();
    assert_eq!(workspace.undo_count(), 1);
    assert_eq!(workspace.dirty_count(), 1);

    let written = workspace.save_changes().unwrap();
    assert_eq!(written, 1);
    assert_eq!(workspace.dirty_count(), 0);

    // 脏文件整体重写为 2 空格缩进
    let fr_path = temp_dir.path().join("locales/common/fr.json");
    let fr_text = fs::read_to_string(fr_path).unwrap();
    assert_eq!(fr_text, "{\n  \"greeting\": \"salut\"\n}\n");

    // 未动过的文件保持原样（未被重写）
    let en_path = temp_dir.path().join("locales/common/en.json");
    let en_text = fs::read_to_string(en_path).unwrap();
    assert_eq!(en_text, r#"{"greeting":"hello","menu":{"open":"Open"}}"#);

    // 重新加载后新值仍然在
    workspace.reload().unwrap();
    let tree = workspace.tree().unwrap();
    let greeting = tree.get_node_by_key("common.greeting").unwrap();
    let values = greeting.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("fr").map(String::as_str), Some("salut"));
}

#[test]
fn test_undo_redo_round_trip_against_disk() {
    let temp_dir = create_fixture();
    let mut workspace = load_workspace(&temp_dir);

    workspace
        .push_edit(EditAction {
            key: "common.menu.open".to_string(),
            lang: "fr".to_string(),
            new_value: "Ouvrir".to_string(),
        })
        .unwrap();

    let undone = workspace.undo().unwrap().unwrap();
    assert_eq!(undone.old_value, "");
    assert_eq!(workspace.undo_count(), 0);
    assert_eq!(workspace.redo_count(), 1);

    let redone = workspace.redo().unwrap().unwrap();
    assert_eq!(redone.new_value, "Ouvrir");

    let written = workspace.save_changes().unwrap();
    assert_eq!(written, 1);

    // fr 文件按键路径补出了 menu 子树
    let fr_text = fs::read_to_string(temp_dir.path().join("locales/common/fr.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&fr_text).unwrap();
    assert_eq!(parsed["menu"]["open"], "Ouvrir");
    assert_eq!(parsed["greeting"], "bonjour");
}

#[test]
fn test_reload_discards_unsaved_edits_and_history() {
    let temp_dir = create_fixture();
    let mut workspace = load_workspace(&temp_dir);

    workspace
        .push_edit(EditAction {
            key: "common.greeting".to_string(),
            lang: "en".to_string(),
            new_value: "hi".to_string(),
        })
        .unwrap();
    assert_eq!(workspace.undo_count(), 1);

    // 不保存直接重载：历史与脏集合整体丢弃，值回到磁盘状态
    assert!(workspace.reload().unwrap());
    assert_eq!(workspace.undo_count(), 0);
    assert_eq!(workspace.dirty_count(), 0);

    let tree = workspace.tree().unwrap();
    let greeting = tree.get_node_by_key("common.greeting").unwrap();
    let values = greeting.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("en").map(String::as_str), Some("hello"));
}

#[test]
fn test_reload_without_load_is_noop() {
    let mut workspace = Workspace::new();
    assert!(!workspace.reload().unwrap());
    assert!(!workspace.is_loaded());
}

#[test]
fn test_filter_and_ancestor_closure() {
    let temp_dir = create_fixture();
    let workspace = load_workspace(&temp_dir);
    let tree = workspace.tree().unwrap();

    let filter = [("en".to_string(), "^open$".to_string())]
        .into_iter()
        .collect();
    let hits = tree.find_by_filter(&filter).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(tree.node(hits[0]).key, "common.menu.open");

    // 展开命中节点需要的全部祖先目录
    let ancestors = tree.find_ancestor_closure(&hits);
    let mut keys: Vec<&str> = ancestors
        .iter()
        .map(|id| tree.node(*id).key.as_str())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["common", "common.menu"]);
}

#[test]
fn test_broken_resource_file_fails_whole_load() {
    let temp_dir = create_fixture();
    write_file(temp_dir.path(), "locales/common/fr.json", "{broken");

    let mut workspace = Workspace::new();
    let pattern_path = temp_dir.path().join("weaver.json").display().to_string();
    let result = workspace.load(&pattern_path);

    assert!(result.is_err());
    // 加载失败不暴露半成品树
    assert!(!workspace.is_loaded());
}

#[test]
fn test_bad_pattern_file_fails_load() {
    let temp_dir = TempDir::new().unwrap();
    let pattern_path = temp_dir.path().join("weaver.json");
    fs::write(&pattern_path, r#"{"patterns": [{"glob": "*", "path": "([bad", "lang": "(en)"}], "languages": ["en"]}"#).unwrap();

    let mut workspace = Workspace::new();
    assert!(workspace.load(&pattern_path.display().to_string()).is_err());
}
