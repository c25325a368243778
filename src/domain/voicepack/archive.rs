//! Voice Pack Context - Archive Reader
//!
//! 将上传的 zip 压缩包完整读入内存，建立 path → bytes 索引，
//! 并按约定定位 manifest（根目录优先，其次恰好一层子目录）。

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use zip::ZipArchive;

use super::errors::ImportError;

/// manifest 文件的约定名称
pub const MANIFEST_FILE_NAME: &str = "voices.json";

/// manifest 在压缩包中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    /// manifest 的完整条目路径
    pub path: String,
    /// manifest 所在目录前缀（根目录为空串，否则以 `/` 结尾）
    pub dir: String,
}

/// 内存中的 voice pack 压缩包
///
/// 不变量: 打开后条目集合不可变；所有后续解析与路径解析只读该索引
pub struct PackArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl std::fmt::Debug for PackArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackArchive")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl PackArchive {
    /// 解压整个压缩包到内存索引
    pub fn open(bytes: &[u8]) -> Result<Self, ImportError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ImportError::ArchiveError(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for i in 0..zip.len() {
            let mut file = zip
                .by_index(i)
                .map_err(|e| ImportError::ArchiveError(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)
                .map_err(|e| ImportError::ArchiveError(e.to_string()))?;
            entries.insert(file.name().to_string(), buf);
        }

        Ok(Self { entries })
    }

    /// 按完整路径取条目内容
    pub fn entry(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// 条目是否存在
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// 条目总数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 定位 manifest
    ///
    /// 查找顺序:
    /// 1. 根目录下的 `voices.json`
    /// 2. 恰好一层子目录下的 `voices.json`（多于一个候选则视为歧义）
    pub fn locate_manifest(&self) -> Result<ManifestLocation, ImportError> {
        if self.entries.contains_key(MANIFEST_FILE_NAME) {
            return Ok(ManifestLocation {
                path: MANIFEST_FILE_NAME.to_string(),
                dir: String::new(),
            });
        }

        let candidates: Vec<&String> = self
            .entries
            .keys()
            .filter(|path| {
                let parts: Vec<&str> = path.split('/').collect();
                parts.len() == 2 && parts[1] == MANIFEST_FILE_NAME
            })
            .collect();

        if candidates.is_empty() {
            return Err(ImportError::ManifestNotFound);
        }
        if candidates.len() > 1 {
            return Err(ImportError::AmbiguousManifest);
        }

        let path = candidates[0].clone();
        let dir = match path.rfind('/') {
            Some(idx) => path[..=idx].to_string(),
            None => String::new(),
        };

        Ok(ManifestLocation { path, dir })
    }

    /// 读取 manifest 文本
    ///
    /// 字节内容按 UTF-8 宽松解码；非法 JSON 在解析阶段报错
    pub fn manifest_text(&self) -> Result<(String, ManifestLocation), ImportError> {
        let location = self.locate_manifest()?;
        let bytes = self
            .entry(&location.path)
            .ok_or(ImportError::ManifestNotFound)?;
        let text = String::from_utf8_lossy(bytes).into_owned();
        Ok((text, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, data) in files {
            writer
                .start_file(*path, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_indexes_all_files() {
        let bytes = build_zip(&[("a.txt", b"a"), ("dir/b.txt", b"b")]);
        let archive = PackArchive::open(&bytes).unwrap();

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.entry("a.txt"), Some(b"a".as_slice()));
        assert!(archive.contains("dir/b.txt"));
    }

    #[test]
    fn test_open_rejects_garbage() {
        let err = PackArchive::open(b"not a zip").unwrap_err();
        assert!(matches!(err, ImportError::ArchiveError(_)));
    }

    #[test]
    fn test_manifest_at_root() {
        let bytes = build_zip(&[("voices.json", b"{}"), ("v1.wav", b"x")]);
        let archive = PackArchive::open(&bytes).unwrap();

        let location = archive.locate_manifest().unwrap();
        assert_eq!(location.path, "voices.json");
        assert_eq!(location.dir, "");
    }

    #[test]
    fn test_manifest_one_level_deep() {
        let bytes = build_zip(&[("pack/voices.json", b"{}"), ("pack/v1.wav", b"x")]);
        let archive = PackArchive::open(&bytes).unwrap();

        let location = archive.locate_manifest().unwrap();
        assert_eq!(location.path, "pack/voices.json");
        assert_eq!(location.dir, "pack/");
    }

    #[test]
    fn test_root_manifest_wins_over_nested() {
        let bytes = build_zip(&[("voices.json", b"{}"), ("pack/voices.json", b"{}")]);
        let archive = PackArchive::open(&bytes).unwrap();

        let location = archive.locate_manifest().unwrap();
        assert_eq!(location.dir, "");
    }

    #[test]
    fn test_missing_manifest() {
        let bytes = build_zip(&[("readme.txt", b"hi")]);
        let archive = PackArchive::open(&bytes).unwrap();

        assert!(matches!(
            archive.locate_manifest(),
            Err(ImportError::ManifestNotFound)
        ));
    }

    #[test]
    fn test_ambiguous_manifest() {
        let bytes = build_zip(&[("a/voices.json", b"{}"), ("b/voices.json", b"{}")]);
        let archive = PackArchive::open(&bytes).unwrap();

        assert!(matches!(
            archive.locate_manifest(),
            Err(ImportError::AmbiguousManifest)
        ));
    }

    #[test]
    fn test_two_levels_deep_not_considered() {
        let bytes = build_zip(&[("a/b/voices.json", b"{}")]);
        let archive = PackArchive::open(&bytes).unwrap();

        assert!(matches!(
            archive.locate_manifest(),
            Err(ImportError::ManifestNotFound)
        ));
    }
}
