#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tempfile::{TempDir, tempdir};

pub const SALES_CSV: &str = "\
month,region,units,price
2024-01,north,100,9.5
2024-02,south,120,9.0
2024-03,north,90,8.75
2024-04,east,150,10
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Builds a single-sheet workbook; `None` cells are left blank and cells
    /// that parse as numbers are written as numbers.
    pub fn write_xlsx(&self, name: &str, rows: &[&[Option<&str>]]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(text) = cell else { continue };
                match text.parse::<f64>() {
                    Ok(number) => worksheet
                        .write_number(r as u32, c as u16, number)
                        .expect("write number"),
                    Err(_) => worksheet
                        .write_string(r as u32, c as u16, *text)
                        .expect("write string"),
                };
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }
}
