/// IO 抽象层 - trait 定义
///
/// 该模块定义了文件枚举与资源读写的抽象接口，支持依赖注入和测试 mock。
/// 加载与保存都可能在 rayon 线程池中并行执行，因此实现必须是 Send + Sync。
use crate::resource::TranslationFileContent;
use crate::utils::WeaveError;

/// 文件枚举 trait
///
/// # 职责
/// - 展开一个 glob 模式，返回命中的文件路径列表
/// - 返回的路径必须已归一化为 '/' 分隔
pub trait FileEnumerator: Send + Sync {
    /// 枚举匹配 glob 模式的文件
    ///
    /// # 参数
    /// * `pattern` - 已拼接好基准目录的 glob 模式
    fn enumerate(&self, pattern: &str) -> Result<Vec<String>, WeaveError>;
}

/// 资源文件读取 trait
///
/// # 职责
/// - 读取并解析一个资源文件为内容树
/// - 解析失败是整个加载的致命错误，不做部分恢复
pub trait ResourceReader: Send + Sync {
    /// 读取资源文件
    ///
    /// # 参数
    /// * `path` - 资源文件路径
    fn read(&self, path: &str) -> Result<TranslationFileContent, WeaveError>;
}

/// 资源文件写入 trait
///
/// # 职责
/// - 将内容树序列化并整体重写目标文件
pub trait ResourceWriter: Send + Sync {
    /// 写入资源文件
    ///
    /// # 参数
    /// * `path` - 目标文件路径
    /// * `content` - 要写入的内容树
    fn write(&self, path: &str, content: &TranslationFileContent) -> Result<(), WeaveError>;
}
