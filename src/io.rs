/// IO 抽象层模块
///
/// 该模块提供了文件枚举与资源文件读写的抽象接口，遵循依赖倒置原则。
/// 支持依赖注入、测试 mock 和替换 IO 实现（如内存 IO）。
///
/// # 架构设计
///
/// - **traits**: 定义 Enumerator/Reader/Writer trait 接口
/// - **default_io**: 基于 glob/std::fs/serde_json 的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use locale_weaver::io::{DefaultResourceReader, ResourceReader};
///
/// let reader = DefaultResourceReader;
/// let content = reader.read("locales/common/en.json")?;
/// ```
pub mod traits;
pub mod default_io;

// === 导出 trait 定义 ===
pub use traits::{FileEnumerator, ResourceReader, ResourceWriter};

// === 导出默认实现 ===
pub use default_io::{DefaultFileEnumerator, DefaultResourceReader, DefaultResourceWriter};
