//! # Lista de Directorios Permitidos
//! src/files/allowlist.rs
//!
//! Expande recursivamente los directorios permitidos al arrancar. El conjunto
//! resultante es la única frontera de seguridad del servidor: solo se sirven
//! archivos cuyo directorio contenedor pertenece al conjunto.
//!
//! Las rutas se guardan canonicalizadas, así que duplicados y enlaces
//! simbólicos colapsan a una sola entrada. Un directorio ya visitado no se
//! vuelve a recorrer, por lo que los ciclos de symlinks terminan.

use crate::error::{Result, ServerError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conjunto de directorios desde los que se pueden servir archivos
#[derive(Debug, Clone, Default)]
pub struct AllowedDirs {
    dirs: HashSet<PathBuf>,
}

impl AllowedDirs {
    /// Recorre cada raíz y agrega la raíz y todos sus subdirectorios
    ///
    /// Cualquier directorio inaccesible hace fallar el escaneo completo.
    pub fn scan<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        let mut allowed = Self::default();
        for root in roots {
            allowed.add_tree(root.as_ref())?;
        }
        debug!(count = allowed.len(), "conjunto de directorios permitidos construido");
        Ok(allowed)
    }

    fn add_tree(&mut self, root: &Path) -> Result<()> {
        let mut pending = vec![canonical(root)?];

        while let Some(dir) = pending.pop() {
            if !self.dirs.insert(dir.clone()) {
                continue;
            }

            let entries = fs::read_dir(&dir).map_err(|source| ServerError::Scan {
                path: dir.clone(),
                source,
            })?;

            for entry in entries {
                let entry = entry.map_err(|source| ServerError::Scan {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                let file_type = entry.file_type().map_err(|source| ServerError::Scan {
                    path: path.clone(),
                    source,
                })?;
                // Un enlace a directorio también se recorre; uno roto se ignora
                let is_dir = if file_type.is_symlink() {
                    fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
                } else {
                    file_type.is_dir()
                };
                if is_dir {
                    let child = canonical(&path)?;
                    if !self.dirs.contains(&child) {
                        pending.push(child);
                    }
                }
            }
        }

        Ok(())
    }

    /// Verifica si un directorio pertenece al conjunto (comparación exacta)
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    /// Número de directorios en el conjunto
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Itera los directorios (sin orden definido)
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|source| ServerError::Scan {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
        fs::create_dir_all(tmp.path().join("d")).unwrap();
        fs::write(tmp.path().join("a/file.txt"), "x").unwrap();
        tmp
    }

    fn set_of(allowed: &AllowedDirs) -> HashSet<PathBuf> {
        allowed.iter().map(Path::to_path_buf).collect()
    }

    #[test]
    fn test_scan_includes_root_and_every_nested_dir() {
        let tmp = tree();
        let root = fs::canonicalize(tmp.path()).unwrap();

        let allowed = AllowedDirs::scan(&[tmp.path()]).unwrap();

        let expected: HashSet<PathBuf> = [
            root.clone(),
            root.join("a"),
            root.join("a/b"),
            root.join("a/b/c"),
            root.join("d"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set_of(&allowed), expected);
    }

    #[test]
    fn test_scan_excludes_files() {
        let tmp = tree();
        let root = fs::canonicalize(tmp.path()).unwrap();
        let allowed = AllowedDirs::scan(&[tmp.path()]).unwrap();
        assert!(!allowed.contains(&root.join("a/file.txt")));
    }

    #[test]
    fn test_scan_subtree_only() {
        let tmp = tree();
        let root = fs::canonicalize(tmp.path()).unwrap();

        let allowed = AllowedDirs::scan(&[tmp.path().join("a/b")]).unwrap();

        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains(&root.join("a/b")));
        assert!(allowed.contains(&root.join("a/b/c")));
        assert!(!allowed.contains(&root));
        assert!(!allowed.contains(&root.join("a")));
    }

    #[test]
    fn test_scan_overlapping_roots_collapse() {
        let tmp = tree();
        let allowed =
            AllowedDirs::scan(&[tmp.path().to_path_buf(), tmp.path().join("a"), tmp.path().join("a/../a")])
                .unwrap();
        assert_eq!(allowed.len(), 5);
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let tmp = tree();
        let result = AllowedDirs::scan(&[tmp.path().join("nope")]);
        assert!(matches!(result, Err(ServerError::Scan { .. })));
    }

    #[test]
    fn test_scan_unreadable_root_is_fatal() {
        // Un archivo existe y canonicaliza, pero read_dir falla con ENOTDIR
        let tmp = tree();
        let file = tmp.path().join("a/file.txt");

        let result = AllowedDirs::scan(&[&file]);

        match result {
            Err(ServerError::Scan { path, .. }) => assert_eq!(path, fs::canonicalize(&file).unwrap()),
            other => panic!("se esperaba ServerError::Scan, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_scan_empty_roots() {
        let roots: [PathBuf; 0] = [];
        let allowed = AllowedDirs::scan(&roots).unwrap();
        assert!(allowed.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_symlink_cycle_terminates() {
        let tmp = tree();
        let root = fs::canonicalize(tmp.path()).unwrap();
        std::os::unix::fs::symlink(&root, root.join("a/b/loop")).unwrap();

        let allowed = AllowedDirs::scan(&[tmp.path()]).unwrap();

        assert_eq!(allowed.len(), 5);
        assert!(!allowed.contains(&root.join("a/b/loop")));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_ignores_dangling_symlink() {
        let tmp = tree();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("d/broken")).unwrap();

        let allowed = AllowedDirs::scan(&[tmp.path()]).unwrap();
        assert_eq!(allowed.len(), 5);
    }
}
