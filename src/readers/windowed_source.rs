use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MIN_WINDOW_PAGES, PAGE_SIZE};
use memmap2::{Mmap, MmapOptions};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Read-only input file exposed as a sequence of bounded memory-mapped windows.
///
/// Nothing is mapped up front; every call to [`WindowedFile::window_at`]
/// creates a fresh mapping which is released when the returned [`Window`]
/// is dropped. Workers share one `WindowedFile` and map their windows
/// independently.
#[derive(Debug)]
pub struct WindowedFile {
    file: File,
    path: PathBuf,
    size: u64,
    window_size: u64,
}

impl WindowedFile {
    /// Open `path` with windows of roughly `window_size` bytes.
    ///
    /// The window length is rounded up to whole pages and never drops below
    /// two pages, so a window always extends past the page of its offset.
    pub fn open(path: &Path, window_size: usize) -> Result<Self> {
        let open_error = |source| ProcessingError::FileOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_error)?;
        let size = file.metadata().map_err(open_error)?.len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
            window_size: Self::round_window_size(window_size as u64),
        })
    }

    fn round_window_size(requested: u64) -> u64 {
        let pages = requested.div_ceil(PAGE_SIZE).max(MIN_WINDOW_PAGES);
        pages * PAGE_SIZE
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Number of windows needed to cover the whole file.
    pub fn window_count(&self) -> u64 {
        self.size.div_ceil(self.window_size)
    }

    /// Map the window whose first page contains `offset`.
    pub fn window_at(&self, offset: u64) -> Result<Window> {
        if offset >= self.size {
            return Err(ProcessingError::Mapping {
                offset,
                source: std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("offset is beyond end of file ({} bytes)", self.size),
                ),
            });
        }

        let chunk_start = offset / PAGE_SIZE * PAGE_SIZE;
        let len = self.window_size.min(self.size - chunk_start);

        // SAFETY: the mapping is read-only and the input file is not modified
        // while it is being processed.
        let mmap = unsafe {
            MmapOptions::new()
                .offset(chunk_start)
                .len(len as usize)
                .map(&self.file)
        }
        .map_err(|source| ProcessingError::Mapping { offset, source })?;

        Ok(Window {
            mmap,
            chunk_start,
            initial_offset: (offset - chunk_start) as usize,
        })
    }
}

/// One mapped view `[chunk_start, chunk_start + len)` of the input file.
///
/// Unmapped on drop.
#[derive(Debug)]
pub struct Window {
    mmap: Mmap,
    chunk_start: u64,
    initial_offset: usize,
}

impl Window {
    pub fn chunk_start(&self) -> u64 {
        self.chunk_start
    }

    /// Position of the originally requested byte inside this window.
    pub fn initial_offset(&self) -> usize {
        self.initial_offset
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Absolute offset one past the last mapped byte.
    pub fn end(&self) -> u64 {
        self.chunk_start + self.mmap.len() as u64
    }

    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.chunk_start && offset < self.end()
    }

    /// Bytes from absolute `offset` to the end of the window.
    pub fn bytes_from(&self, offset: u64) -> &[u8] {
        debug_assert!(self.contains(offset) || offset == self.end());
        &self.mmap[(offset - self.chunk_start) as usize..]
    }
}
