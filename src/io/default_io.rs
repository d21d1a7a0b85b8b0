/// 默认 IO 实现
///
/// 文件枚举基于 glob（大小写不敏感），资源读写基于 std::fs + serde_json。
use glob::{glob_with, MatchOptions};

use crate::resource::TranslationFileContent;
use crate::utils::{unix_path, WeaveError};

use super::traits::{FileEnumerator, ResourceReader, ResourceWriter};

/// 默认的文件枚举器（基于 glob crate）
#[derive(Debug, Clone, Default)]
pub struct DefaultFileEnumerator;

impl FileEnumerator for DefaultFileEnumerator {
    fn enumerate(&self, pattern: &str) -> Result<Vec<String>, WeaveError> {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };

        let entries =
            glob_with(pattern, options).map_err(|e| WeaveError::GlobError(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| WeaveError::GlobError(e.to_string()))?;
            if path.is_file() {
                files.push(unix_path(&path.display().to_string()));
            }
        }
        Ok(files)
    }
}

/// 默认的资源文件读取器（基于 std::fs + serde_json）
#[derive(Debug, Clone, Default)]
pub struct DefaultResourceReader;

impl ResourceReader for DefaultResourceReader {
    fn read(&self, path: &str) -> Result<TranslationFileContent, WeaveError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| WeaveError::ParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// 默认的资源文件写入器（基于 std::fs + serde_json）
///
/// 整体重写文件，2 空格缩进，结尾补换行。
#[derive(Debug, Clone, Default)]
pub struct DefaultResourceWriter;

impl ResourceWriter for DefaultResourceWriter {
    fn write(&self, path: &str, content: &TranslationFileContent) -> Result<(), WeaveError> {
        // 确保父目录存在
        let target = std::path::Path::new(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut text = serde_json::to_string_pretty(content)?;
        text.push('\n');
        std::fs::write(target, text)?;
        Ok(())
    }
}
