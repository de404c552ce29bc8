use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Minimal, read-only, async filesystem abstraction used by the walker.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Check whether a path exists.
    async fn path_exists(&self, path: &Path) -> bool;

    /// Open a directory for iteration.
    async fn read_dir(
        &self,
        path: &Path,
    ) -> io::Result<Box<dyn ReadDirStream + Send>>;

    /// Fetch the entry kind.
    async fn metadata(&self, path: &Path) -> io::Result<FsMetadata>;

    /// Absolute form of `path` with `.` and `..` resolved.
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Lightweight metadata needed by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsMetadata {
    pub is_dir: bool,
    pub is_file: bool,
}

/// Async directory iterator (similar to tokio::fs::ReadDir).
#[async_trait]
pub trait ReadDirStream {
    /// Return next entry's path, or None when exhausted.
    async fn next_entry(&mut self) -> io::Result<Option<PathBuf>>;
}

/// Real filesystem implementation backed by tokio::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for RealFs {
    async fn path_exists(&self, path: &Path) -> bool {
        // try_exists avoids errors for permission issues by returning false
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_dir(
        &self,
        path: &Path,
    ) -> io::Result<Box<dyn ReadDirStream + Send>> {
        let rd = tokio::fs::read_dir(path).await?;
        Ok(Box::new(RealReadDir { inner: rd }))
    }

    async fn metadata(&self, path: &Path) -> io::Result<FsMetadata> {
        // Follows symlinks, so a link to a directory is walked like one.
        let md = tokio::fs::metadata(path).await?;
        Ok(FsMetadata {
            is_dir: md.is_dir(),
            is_file: md.is_file(),
        })
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }
}

struct RealReadDir {
    inner: tokio::fs::ReadDir,
}

#[async_trait]
impl ReadDirStream for RealReadDir {
    async fn next_entry(&mut self) -> io::Result<Option<PathBuf>> {
        Ok(self.inner.next_entry().await?.map(|entry| entry.path()))
    }
}

/// In-memory filesystem for tests.
/// Note: Paths are treated literally; callers should use consistent absolute
/// or relative paths. Directory listings preserve insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFs {
    nodes: HashMap<PathBuf, Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Dir { children: Vec<PathBuf> },
    Unreadable,
    Broken,
    File,
}

impl InMemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        if self.nodes.contains_key(&path) {
            return;
        }
        self.ensure_parent_link(&path);
        self.nodes.insert(
            path,
            Node::Dir {
                children: Vec::new(),
            },
        );
    }

    /// A directory that shows up in its parent's listing but refuses to be
    /// opened, like one without read permission.
    pub fn add_unreadable_dir<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        self.ensure_parent_link(&path);
        self.nodes.insert(path, Node::Unreadable);
    }

    pub fn add_file<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        self.ensure_parent_link(&path);
        self.nodes.insert(path, Node::File);
    }

    /// An entry that is listed by its parent but whose metadata cannot be
    /// read, like a dangling symlink.
    pub fn add_broken_entry<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        self.ensure_parent_link(&path);
        self.nodes.insert(path, Node::Broken);
    }

    fn ensure_parent_link(&mut self, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        if parent.as_os_str().is_empty() {
            return;
        }
        // Ensure parent directory exists
        if !self.nodes.contains_key(parent) {
            self.nodes.insert(
                parent.to_path_buf(),
                Node::Dir {
                    children: Vec::new(),
                },
            );
            // Recurse to ensure its parent exists
            self.ensure_parent_link(parent);
        }
        // Link child into parent
        if let Some(Node::Dir { children }) = self.nodes.get_mut(parent)
            && !children.iter().any(|p| p.as_path() == path)
        {
            children.push(path.to_path_buf());
        }
    }
}

#[async_trait]
impl FileSystem for InMemoryFs {
    async fn path_exists(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    async fn read_dir(
        &self,
        path: &Path,
    ) -> io::Result<Box<dyn ReadDirStream + Send>> {
        match self.nodes.get(path) {
            Some(Node::Dir { children }) => Ok(Box::new(InMemReadDir {
                queue: children.clone().into(),
            })),
            Some(Node::Unreadable) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            )),
            Some(Node::Broken) => Err(broken_entry(path)),
            Some(Node::File) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("read_dir on file: {}", path.display()),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("read_dir on missing path: {}", path.display()),
            )),
        }
    }

    async fn metadata(&self, path: &Path) -> io::Result<FsMetadata> {
        match self.nodes.get(path) {
            Some(Node::Dir { .. }) | Some(Node::Unreadable) => Ok(FsMetadata {
                is_dir: true,
                is_file: false,
            }),
            Some(Node::File) => Ok(FsMetadata {
                is_dir: false,
                is_file: true,
            }),
            Some(Node::Broken) => Err(broken_entry(path)),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("metadata on missing path: {}", path.display()),
            )),
        }
    }

    /// Lexical only: there is no working directory and no symlinks.
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let mut resolved = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        if self.nodes.contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("canonicalize on missing path: {}", path.display()),
            ))
        }
    }
}

fn broken_entry(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("broken entry: {}", path.display()),
    )
}

struct InMemReadDir {
    queue: VecDeque<PathBuf>,
}

#[async_trait]
impl ReadDirStream for InMemReadDir {
    async fn next_entry(&mut self) -> io::Result<Option<PathBuf>> {
        Ok(self.queue.pop_front())
    }
}
