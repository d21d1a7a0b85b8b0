use super::*;
use crate::resource::{ContentValue, ResourceNode, TranslationFile};

fn text(s: &str) -> ContentValue {
    ContentValue::Text(s.to_string())
}

fn tree_value(entries: Vec<(&str, ContentValue)>) -> ContentValue {
    ContentValue::Tree(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

fn translation(lang: &str, filepath: &str, entries: Vec<(&str, ContentValue)>) -> TranslationFile {
    TranslationFile {
        lang: lang.to_string(),
        filepath: filepath.to_string(),
        content: entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

/// common 资源：en/fr 两个文件，含嵌套的 menu 子树
fn sample_forest() -> Vec<ResourceNode> {
    let mut common = ResourceNode::new("common");
    common.translations.push(translation(
        "en",
        "locales/common/en.json",
        vec![
            ("greeting", text("hello")),
            ("menu", tree_value(vec![("open", text("Open")), ("close", text("Close"))])),
        ],
    ));
    common.translations.push(translation(
        "fr",
        "locales/common/fr.json",
        vec![
            ("greeting", text("bonjour")),
            ("menu", tree_value(vec![("open", text("Ouvrir"))])),
        ],
    ));

    let mut app = ResourceNode::new("app");
    let mut home = ResourceNode::new("app/home");
    home.translations.push(translation(
        "en",
        "locales/app/home/en.json",
        vec![("title", text("Home"))],
    ));
    app.children.push(home);

    vec![common, app]
}

#[test]
fn test_normalized_structure_and_keys() {
    let tree = Tree::new(sample_forest());

    let common = tree.get_node_by_key("common").unwrap();
    assert_eq!(common.node_type(), NodeType::DirectoryWithTranslations);
    assert_eq!(common.name(), Some("common"));
    assert_eq!(
        common.files().unwrap().get("fr").map(String::as_str),
        Some("locales/common/fr.json")
    );

    // 条目键在资源键下用 '.' 连接
    let greeting = tree.get_node_by_key("common.greeting").unwrap();
    let entry = greeting.entry().unwrap();
    assert_eq!(entry.key, "greeting");
    assert_eq!(entry.key_path, vec!["greeting".to_string()]);

    let open = tree.get_node_by_key("common.menu.open").unwrap();
    let entry = open.entry().unwrap();
    assert_eq!(entry.key_path, vec!["menu".to_string(), "open".to_string()]);

    // 纯目录节点与子资源
    let app = tree.get_node_by_key("app").unwrap();
    assert_eq!(app.node_type(), NodeType::Directory);
    let home = tree.get_node_by_key("app/home").unwrap();
    assert_eq!(home.node_type(), NodeType::DirectoryWithTranslations);
}

#[test]
fn test_merge_builds_value_union() {
    let tree = Tree::new(sample_forest());

    let greeting = tree.get_node_by_key("common.greeting").unwrap();
    let values = greeting.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("en").map(String::as_str), Some("hello"));
    assert_eq!(values.get("fr").map(String::as_str), Some("bonjour"));

    // fr 没有 close，键并集合并后记空串
    let close = tree.get_node_by_key("common.menu.close").unwrap();
    let values = close.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("en").map(String::as_str), Some("Close"));
    assert_eq!(values.get("fr").map(String::as_str), Some(""));

    // 容器条目没有 values
    let menu = tree.get_node_by_key("common.menu").unwrap();
    assert!(menu.entry().unwrap().values.is_none());
}

#[test]
fn test_merge_leaf_wins_over_subtree() {
    // en 在 x 上是字符串，fr 在 x 上是子树："任一字符串即叶子"
    let mut pack = ResourceNode::new("pack");
    pack.translations.push(translation(
        "en",
        "pack/en.json",
        vec![("x", text("1"))],
    ));
    pack.translations.push(translation(
        "fr",
        "pack/fr.json",
        vec![("x", tree_value(vec![("y", text("2"))]))],
    ));
    let tree = Tree::new(vec![pack]);

    let x = tree.get_node_by_key("pack.x").unwrap();
    let values = x.entry().unwrap().values.as_ref().unwrap();
    assert_eq!(values.get("en").map(String::as_str), Some("1"));
    assert_eq!(values.get("fr").map(String::as_str), Some(""));
    // 叶子不再向下展开，fr 的嵌套结构被静默丢弃
    assert!(x.children.is_empty());
    assert!(tree.get_node_by_key("pack.x.y").is_none());
}

#[test]
fn test_entries_precede_child_resources() {
    let mut parent = ResourceNode::new("parent");
    parent
        .translations
        .push(translation("en", "parent/en.json", vec![("label", text("Label"))]));
    let mut nested = ResourceNode::new("parent/nested");
    nested
        .translations
        .push(translation("en", "parent/nested/en.json", vec![("a", text("A"))]));
    parent.children.push(nested);

    let tree = Tree::new(vec![parent]);
    let parent_node = tree.get_node_by_key("parent").unwrap();
    let kinds: Vec<NodeType> = parent_node
        .children
        .iter()
        .map(|id| tree.node(*id).node_type())
        .collect();
    assert_eq!(
        kinds,
        vec![NodeType::Entry, NodeType::DirectoryWithTranslations]
    );
}

#[test]
fn test_find_parent_of_type() {
    let tree = Tree::new(sample_forest());

    let open = tree.node_id_by_key("common.menu.open").unwrap();
    let resource = tree
        .find_parent_of_type(open, NodeType::DirectoryWithTranslations)
        .unwrap();
    assert_eq!(tree.node(resource).key, "common");

    // 根向上没有匹配
    let common = tree.node_id_by_key("common").unwrap();
    assert!(tree.find_parent_of_type(common, NodeType::Directory).is_none());
}

#[test]
fn test_get_resource_node_of_node() {
    let tree = Tree::new(sample_forest());

    let open = tree.node_id_by_key("common.menu.open").unwrap();
    let resource = tree.get_resource_node_of_node(open).unwrap();
    assert_eq!(resource.id, "common");
    assert_eq!(resource.translations.len(), 2);

    // 节点自身就是叶子资源目录时返回它自己的资源
    let home = tree.node_id_by_key("app/home").unwrap();
    let resource = tree.get_resource_node_of_node(home).unwrap();
    assert_eq!(resource.id, "app/home");

    // 纯目录没有所属资源
    let app = tree.node_id_by_key("app").unwrap();
    assert!(tree.get_resource_node_of_node(app).is_none());
}

#[test]
fn test_filter_by_name_matches_entries_and_directories() {
    let tree = Tree::new(sample_forest());

    let filter = [("name".to_string(), "open".to_string())].into_iter().collect();
    let hits = tree.find_by_filter(&filter).unwrap();
    let keys: Vec<&str> = hits.iter().map(|id| tree.node(*id).key.as_str()).collect();
    assert_eq!(keys, vec!["common.menu.open"]);

    // 目录按显示名匹配，大小写不敏感
    let filter = [("name".to_string(), "^COMMON$".to_string())]
        .into_iter()
        .collect();
    let hits = tree.find_by_filter(&filter).unwrap();
    let keys: Vec<&str> = hits.iter().map(|id| tree.node(*id).key.as_str()).collect();
    assert_eq!(keys, vec!["common"]);
}

#[test]
fn test_filter_by_language_requires_present_and_matching() {
    let tree = Tree::new(sample_forest());

    let filter = [("fr".to_string(), "ouvrir".to_string())].into_iter().collect();
    let hits = tree.find_by_filter(&filter).unwrap();
    let keys: Vec<&str> = hits.iter().map(|id| tree.node(*id).key.as_str()).collect();
    assert_eq!(keys, vec!["common.menu.open"]);

    // 所有给定语言字段都必须命中：open 的 fr 值非空，整体落选
    let filter = [
        ("en".to_string(), "open".to_string()),
        ("fr".to_string(), "^$".to_string()),
    ]
    .into_iter()
    .collect();
    let hits = tree.find_by_filter(&filter).unwrap();
    let keys: Vec<&str> = hits.iter().map(|id| tree.node(*id).key.as_str()).collect();
    assert_eq!(keys, Vec::<&str>::new());

    let filter = [
        ("en".to_string(), "close".to_string()),
        ("fr".to_string(), "^$".to_string()),
    ]
    .into_iter()
    .collect();
    let hits = tree.find_by_filter(&filter).unwrap();
    let keys: Vec<&str> = hits.iter().map(|id| tree.node(*id).key.as_str()).collect();
    assert_eq!(keys, vec!["common.menu.close"]);
}

#[test]
fn test_empty_filter_matches_nothing() {
    let tree = Tree::new(sample_forest());

    assert!(tree.find_by_filter(&Default::default()).unwrap().is_empty());

    // 全空串字段同样视为无过滤条件
    let filter = [
        ("name".to_string(), String::new()),
        ("en".to_string(), String::new()),
    ]
    .into_iter()
    .collect();
    assert!(tree.find_by_filter(&filter).unwrap().is_empty());
}

#[test]
fn test_invalid_filter_regex_is_error() {
    let tree = Tree::new(sample_forest());
    let filter = [("name".to_string(), "([unclosed".to_string())]
        .into_iter()
        .collect();
    assert!(matches!(
        tree.find_by_filter(&filter),
        Err(crate::utils::WeaveError::RegexError(_))
    ));
}

#[test]
fn test_ancestor_closure_dedups_shared_parents() {
    let tree = Tree::new(sample_forest());

    let open = tree.node_id_by_key("common.menu.open").unwrap();
    let close = tree.node_id_by_key("common.menu.close").unwrap();

    let ancestors = tree.find_ancestor_closure(&[open, close]);
    let mut keys: Vec<&str> = ancestors
        .iter()
        .map(|id| tree.node(*id).key.as_str())
        .collect();
    keys.sort();
    // menu 与 common 各出现一次，不包含节点自身
    assert_eq!(keys, vec!["common", "common.menu"]);
}

#[test]
fn test_stats() {
    let tree = Tree::new(sample_forest());
    let stats = tree.get_stats();

    assert_eq!(stats.resource_count, 2);
    assert_eq!(stats.directory_count, 1);
    assert_eq!(stats.entry_count, 5); // greeting, menu, menu.open, menu.close, title
    assert_eq!(stats.leaf_count, 4); // menu 是容器条目

    assert_eq!(stats.language_counts.get("en"), Some(&4));
    assert_eq!(stats.language_counts.get("fr"), Some(&2));
    // fr 的 close 为空串
    assert_eq!(stats.missing_count, 1);
}

#[test]
fn test_export_json_shape() {
    let tree = Tree::new(sample_forest());
    let json = tree.export_json();

    let roots = json.as_array().unwrap();
    assert_eq!(roots.len(), 2);

    let common = &roots[0];
    assert_eq!(common["type"], "directory-with-translations");
    assert_eq!(common["key"], "common");
    let children = common["children"].as_array().unwrap();
    let greeting = children
        .iter()
        .find(|c| c["key"] == "common.greeting")
        .unwrap();
    assert_eq!(greeting["entry"]["values"]["fr"], "bonjour");
    assert_eq!(greeting["entry"]["keyPath"][0], "greeting");
}
