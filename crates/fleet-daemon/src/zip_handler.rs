// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The zip packer/unpacker (out of scope per §1; this is a
//! minimal stand-in satisfying its contract: pack a directory into a zip,
//! unpack a zip into a directory).

use std::fs::File;
use std::io;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::Result;

pub struct ZipHandler;

impl ZipHandler {
    /// Compress `src_dir`'s contents into `zip_path`, paths relative to
    /// `src_dir`.
    pub fn compress(zip_path: &Path, src_dir: &Path) -> Result<()> {
        let file = File::create(zip_path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        add_dir_entries(&mut writer, src_dir, src_dir, options)?;
        writer.finish()?;
        Ok(())
    }

    /// Extract `zip_path` into `dest_dir`, creating it if needed.
    pub fn uncompress(zip_path: &Path, dest_dir: &Path) -> Result<()> {
        let file = File::open(zip_path)?;
        let mut archive = ZipArchive::new(file)?;
        std::fs::create_dir_all(dest_dir)?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let Some(relative) = entry.enclosed_name() else { continue };
            let out_path = dest_dir.join(relative);
            if entry.is_dir() {
                std::fs::create_dir_all(&out_path)?;
            } else {
                if let Some(parent) = out_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut out_file = File::create(&out_path)?;
                io::copy(&mut entry, &mut out_file)?;
            }
        }
        Ok(())
    }
}

fn add_dir_entries<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    base: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let relative = path.strip_prefix(base).unwrap_or(&path).to_string_lossy().replace('\\', "/");
        if path.is_dir() {
            writer.add_directory(format!("{relative}/"), options)?;
            add_dir_entries(writer, base, &path, options)?;
        } else {
            writer.start_file(relative, options)?;
            let mut f = File::open(&path)?;
            io::copy(&mut f, writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "zip_handler_tests.rs"]
mod tests;
