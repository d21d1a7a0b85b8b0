use thiserror::Error;
use std::path::Path;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum WeaveError {
    #[error("Invalid pattern file: {0}")]
    InvalidPattern(String),

    #[error("Regex compile error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Glob error: {0}")]
    GlobError(String),

    #[error("Parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Save failed for {failed} of {total} files, first error: {first}")]
    SaveError {
        failed: usize,
        total: usize,
        first: String,
    },

    #[error("Invalid edit target: {0}")]
    InvalidEditTarget(String),

    #[error("No pattern file loaded")]
    NotLoaded,
}

/// 将路径分隔符统一为 '/'
pub fn unix_path(raw: &str) -> String {
    raw.replace('\\', "/")
}

/// 去掉末尾的 '/'
pub fn remove_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// 获取路径所在目录（按 '/' 切分，不访问文件系统）
pub fn dir_of(path: &str) -> String {
    let trimmed = remove_trailing_slash(path);
    match trimmed.rfind('/') {
        Some(pos) => trimmed[..pos].to_string(),
        None => String::new(),
    }
}

/// 用 '/' 拼接路径片段，跳过空片段并压缩重复分隔符
pub fn join_path(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
        .replace("//", "/");
    remove_trailing_slash(&joined).to_string()
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<std::path::PathBuf, WeaveError> {
    if !file_path.exists() {
        return Err(WeaveError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在",
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path).map_err(WeaveError::IoError)?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_path() {
        assert_eq!(unix_path("a\\b\\c.json"), "a/b/c.json");
        assert_eq!(unix_path("a/b/c.json"), "a/b/c.json");
    }

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(remove_trailing_slash("a/b/"), "a/b");
        assert_eq!(remove_trailing_slash("a/b"), "a/b");
    }

    #[test]
    fn test_dir_of() {
        assert_eq!(dir_of("a/b/c.json"), "a/b");
        assert_eq!(dir_of("c.json"), "");
        assert_eq!(dir_of("a/b/"), "a");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&["a", "b/c"]), "a/b/c");
        assert_eq!(join_path(&["a/", "b"]), "a/b");
        assert_eq!(join_path(&["a", "*.json"]), "a/*.json");
        assert_eq!(join_path(&["", "b"]), "b");
        assert_eq!(join_path(&["/tmp/x", "locales/**/*.json"]), "/tmp/x/locales/**/*.json");
    }

    #[test]
    fn test_create_backup() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let file = temp_dir.path().join("res.json");
        std::fs::write(&file, "{}").unwrap();

        let backup = create_backup(&file).unwrap();
        assert!(backup.exists());
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{}");

        // 不存在的文件应报错
        assert!(create_backup(&temp_dir.path().join("missing.json")).is_err());
    }
}
