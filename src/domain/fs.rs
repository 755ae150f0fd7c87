use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};

/// 单个条目的元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub is_dir: bool,
    /// 元数据变更时间 (ctime)
    pub changed: DateTime<Local>,
    /// 内容修改时间 (mtime)
    pub modified: DateTime<Local>,
}

impl EntryMetadata {
    /// ctime 与 mtime 中较晚者，用于比较"最新"
    pub fn effective_time(&self) -> DateTime<Local> {
        self.changed.max(self.modified)
    }
}

/// 文件系统访问接口
pub trait FileSystem {
    /// 按文件系统的枚举顺序列出目录中的条目名
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// 获取路径的元数据（跟随符号链接）
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata>;
}

/// 基于 std::fs 的本地文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        let metadata = fs::metadata(path)?;
        let modified = DateTime::<Local>::from(metadata.modified()?);

        Ok(EntryMetadata {
            is_dir: metadata.is_dir(),
            changed: change_time(&metadata).unwrap_or(modified),
            modified,
        })
    }
}

#[cfg(unix)]
fn change_time(metadata: &fs::Metadata) -> Option<DateTime<Local>> {
    use chrono::Utc;
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    DateTime::<Utc>::from_timestamp(metadata.ctime(), nanos).map(|utc| utc.with_timezone(&Local))
}

#[cfg(not(unix))]
fn change_time(metadata: &fs::Metadata) -> Option<DateTime<Local>> {
    metadata.created().ok().map(DateTime::<Local>::from)
}

#[cfg(test)]
pub(crate) mod memory {
    //! 测试用的内存文件系统，可控制时间戳、枚举顺序和注入错误

    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::io;
    use std::path::{Path, PathBuf};

    use chrono::{DateTime, Local, TimeZone};

    use super::{EntryMetadata, FileSystem};

    #[derive(Debug, Clone)]
    enum Node {
        File(EntryMetadata),
        Dir(EntryMetadata, Vec<OsString>),
        Unreadable(EntryMetadata),
        Broken,
    }

    #[derive(Debug, Default)]
    pub struct MemoryFs {
        nodes: HashMap<PathBuf, Node>,
    }

    /// 本地时区某日正午
    pub fn day(year: i32, month: u32, day: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .earliest()
            .unwrap()
    }

    fn meta(is_dir: bool, time: DateTime<Local>) -> EntryMetadata {
        EntryMetadata {
            is_dir,
            changed: time,
            modified: time,
        }
    }

    impl MemoryFs {
        pub fn new(root: &str) -> Self {
            let mut fs = Self::default();
            fs.nodes
                .insert(PathBuf::from(root), Node::Dir(meta(true, day(2000, 1, 1)), Vec::new()));
            fs
        }

        fn attach(&mut self, path: &Path, node: Node) {
            let parent = path.parent().unwrap().to_path_buf();
            let name = path.file_name().unwrap().to_os_string();
            match self.nodes.get_mut(&parent) {
                Some(Node::Dir(_, children)) => children.push(name),
                _ => panic!("parent {} is not a directory", parent.display()),
            }
            self.nodes.insert(path.to_path_buf(), node);
        }

        pub fn file(&mut self, path: &str, time: DateTime<Local>) -> &mut Self {
            self.file_with(path, time, time)
        }

        pub fn file_with(
            &mut self,
            path: &str,
            changed: DateTime<Local>,
            modified: DateTime<Local>,
        ) -> &mut Self {
            let metadata = EntryMetadata {
                is_dir: false,
                changed,
                modified,
            };
            self.attach(Path::new(path), Node::File(metadata));
            self
        }

        pub fn dir(&mut self, path: &str, time: DateTime<Local>) -> &mut Self {
            self.attach(Path::new(path), Node::Dir(meta(true, time), Vec::new()));
            self
        }

        /// 可以获取元数据但无法打开的目录
        pub fn unreadable_dir(&mut self, path: &str, time: DateTime<Local>) -> &mut Self {
            self.attach(Path::new(path), Node::Unreadable(meta(true, time)));
            self
        }

        /// 出现在父目录中但无法获取元数据的条目
        pub fn broken(&mut self, path: &str) -> &mut Self {
            self.attach(Path::new(path), Node::Broken);
            self
        }

        /// 在目录的枚举结果中追加一个伪条目（如 "." 或 ".."）
        pub fn raw_name(&mut self, dir: &str, name: &str) -> &mut Self {
            if let Some(Node::Dir(_, children)) = self.nodes.get_mut(Path::new(dir)) {
                children.push(OsString::from(name));
            }
            self
        }
    }

    impl FileSystem for MemoryFs {
        fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
            match self.nodes.get(path) {
                Some(Node::Dir(_, children)) => Ok(children.clone()),
                Some(Node::Unreadable(_)) => Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                )),
                Some(_) => Err(io::Error::new(io::ErrorKind::Other, "not a directory")),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
            }
        }

        fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
            match self.nodes.get(path) {
                Some(Node::File(m)) | Some(Node::Dir(m, _)) | Some(Node::Unreadable(m)) => Ok(*m),
                Some(Node::Broken) | None => {
                    Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
                }
            }
        }
    }
}
