//
// Copyright (C) 2025 The Android Open-Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use log::{debug, info};
use std::{
    ffi::{c_void, CString},
    path::PathBuf,
};

use crate::library::LibraryId;

macro_rules! bail_with_dlerror {
    ($fmt:literal $(, $($arg:tt)+)?) => {
        {
            // SAFETY: trivially safe.
            let error = unsafe { libc::dlerror() };
            if !error.is_null() {
                // SAFETY: `error` is a pointer to a valid C string returned by `dlerror()`.
                let error_cstr = unsafe { std::ffi::CStr::from_ptr(error) };
                let dl_error_msg = error_cstr.to_string_lossy();

                anyhow::bail!(
                    concat!($fmt, ": {}"),
                    $($($arg)+,)?
                    dl_error_msg
                );
            } else {
                anyhow::bail!($fmt $(, $($arg)+)?);
            }
        }
    };
}

/// The host-shell mechanism that maps one library into the process.
pub trait LibraryLoader {
    /// Handle keeping a loaded library resident.
    type Library;

    /// Load `library` into the process. Called once per manifest entry, in manifest order.
    fn load(&mut self, library: LibraryId) -> Result<Self::Library>;
}

/// LoadedLibrary represents a library loaded to the memory space of the process.
pub struct LoadedLibrary {
    library: LibraryId,
    library_handle: *mut c_void,
}

impl LoadedLibrary {
    /// Load a library to the process memory space. Its symbols are made available to
    /// libraries loaded afterwards.
    ///
    /// # Safety
    ///
    /// Users must ensure that the initialization and termination routines of the library are safe.
    pub unsafe fn open(library: LibraryId, path: &str) -> Result<Self> {
        let path_cstr = CString::new(path).context("Invalid library path")?;
        // SAFETY: `path_cstr` is a valid C string. The caller ensured that the library is safe
        // to be loaded.
        let library_handle =
            unsafe { libc::dlopen(path_cstr.as_ptr(), libc::RTLD_NOW | libc::RTLD_GLOBAL) };
        if library_handle.is_null() {
            bail_with_dlerror!("Failed to open the library {}", path);
        }
        Ok(Self { library, library_handle })
    }

    pub fn library(&self) -> LibraryId {
        self.library
    }

    pub fn find_symbol(&self, symbol_name: &str) -> Result<*mut c_void> {
        let symbol = CString::new(symbol_name).context("Invalid symbol name")?;
        // SAFETY: `self.library_handle` is a valid library handle and `symbol` is a valid C
        // string.
        let symbol_handle = unsafe { libc::dlsym(self.library_handle, symbol.as_ptr()) };
        if symbol_handle.is_null() {
            bail_with_dlerror!("Failed to find the symbol {} in {}", symbol_name, self.library);
        }
        Ok(symbol_handle)
    }
}

impl Drop for LoadedLibrary {
    fn drop(&mut self) {
        // SAFETY: the instance owns a valid handle to the opened library. The termination routine
        // is ensured to be safe.
        unsafe { libc::dlclose(self.library_handle) };
    }
}

/// Loads libraries through the dynamic linker, looking them up in the configured directories
/// first.
pub struct DynamicLinkerLoader {
    library_paths: Vec<PathBuf>,
}

impl DynamicLinkerLoader {
    pub fn new(library_paths: Vec<PathBuf>) -> Self {
        Self { library_paths }
    }

    /// The path handed to `dlopen` for `library`: the first existing file among the library
    /// paths, or the bare file name so the linker's default search applies.
    pub fn resolve(&self, library: LibraryId) -> String {
        let file_name = library.file_name();
        for dir in &self.library_paths {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                debug!("Resolved {} to {}", library, candidate.display());
                return candidate.to_string_lossy().into_owned();
            }
        }
        debug!("{} not found in the library paths, deferring to the linker search", library);
        file_name
    }
}

impl LibraryLoader for DynamicLinkerLoader {
    type Library = LoadedLibrary;

    fn load(&mut self, library: LibraryId) -> Result<LoadedLibrary> {
        let path = self.resolve(library);
        // SAFETY: The libraries in a manifest are shipped with the application, which is
        // responsible for implementing their initialization and termination routines safely.
        let loaded = unsafe { LoadedLibrary::open(library, &path)? };
        info!("Loaded {} from {}", library, path);
        Ok(loaded)
    }
}
