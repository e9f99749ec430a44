//! # Transcript Module / 调用记录模块
//!
//! Writes the plain-text transcript of a run: for every executed command, the
//! literal command line followed by each line the tool printed. Blocks are
//! separated by a blank line.
//!
//! 写入一次运行的纯文本调用记录：对于每条已执行的命令，先写字面命令行，
//! 再写工具打印的每一行。记录块之间以空行分隔。

use anyhow::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::infra::fs::create_file;

pub struct Transcript<W: Write> {
    writer: W,
    blocks: usize,
}

impl Transcript<BufWriter<File>> {
    /// Creates the transcript file, truncating any previous content.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(create_file(path)?)))
    }
}

impl<W: Write> Transcript<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, blocks: 0 }
    }

    /// Appends one block and flushes it, so a failing sink is noticed on the
    /// row that hit it.
    pub fn record(&mut self, invocation: &str, output: &str) -> io::Result<()> {
        if self.blocks > 0 {
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "{invocation}")?;
        for line in output.lines() {
            writeln!(self.writer, "{line}")?;
        }
        self.writer.flush()?;
        self.blocks += 1;
        Ok(())
    }

    /// Number of blocks written so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
