use crate::course::*;
use crate::error::CatalogError;
use log::{info, warn};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::SystemTime;

/// The read-only course list the engine is fed from, indexed by code.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    code_index: HashMap<String, usize>,
}

impl Catalog {
    /// Course codes are assumed unique; on a duplicate the first course
    /// wins.
    pub fn new(courses: Vec<Course>) -> Self {
        let mut unique: Vec<Course> = Vec::with_capacity(courses.len());
        let mut code_index = HashMap::new();

        for course in courses {
            if code_index.contains_key(course.get_code()) {
                warn!("Duplicate course found: {}", course.get_code());
                continue;
            }

            code_index.insert(course.get_code().clone(), unique.len());
            unique.push(course);
        }

        Catalog {
            courses: unique,
            code_index,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Course> {
        self.code_index.get(code).map(|&index| &self.courses[index])
    }

    /// Looks up every requested code, keeping the request order.
    pub fn select(&self, codes: &[String]) -> Result<Vec<Course>, CatalogError> {
        codes
            .iter()
            .map(|code| {
                self.get(code)
                    .cloned()
                    .ok_or_else(|| CatalogError::UnknownCourse { code: code.clone() })
            })
            .collect()
    }
}

/// Loads the catalog JSON written by the ingestion pipeline. A missing file
/// is an empty catalog; any other I/O failure is an error.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let file = OpenOptions::new().read(true).open(path);

    let mut file = match file {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("No catalog at {}, starting empty", path.display());
            return Ok(Catalog::default());
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut data = String::new();
    file.read_to_string(&mut data)
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let courses: Vec<Course> =
        from_slice_lenient(data.as_bytes()).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {} course(s) from {}", courses.len(), path.display());

    Ok(Catalog::new(courses))
}

/// Last modification time of the catalog file, if it can be read.
pub fn catalog_modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}

fn from_slice_lenient<'a, T: ::serde::Deserialize<'a>>(
    v: &'a [u8],
) -> Result<T, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(v);
    ::serde::Deserialize::deserialize(&mut de)
    // trailing bytes after the first value are ignored (no de.end())
}
