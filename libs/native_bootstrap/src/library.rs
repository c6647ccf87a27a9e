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

//! Identifiers of the native shared libraries the bootstrap knows about.

use std::{
    env::consts::{DLL_PREFIX, DLL_SUFFIX},
    fmt,
};

/// An opaque name referring to one loadable native shared library.
///
/// The name is the one the host shell's loader expects, without the platform prefix and
/// suffix: `SDL2` names `libSDL2.so` on Android.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryId(&'static str);

impl LibraryId {
    /// Low-level USB/Bluetooth HID device access used by SDL's input subsystem.
    pub const HIDAPI: LibraryId = LibraryId("hidapi");
    /// The SDL multimedia runtime.
    pub const SDL2: LibraryId = LibraryId("SDL2");
    /// The SDL image decoding extension. Depends on `SDL2`.
    pub const SDL2_IMAGE: LibraryId = LibraryId("SDL2_image");
    /// The application's own native module, hosting the entry point.
    pub const APPLICATION: LibraryId = LibraryId("a-simple-triangle");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }

    /// The file name the dynamic linker is asked for, e.g. `libSDL2.so`.
    pub fn file_name(&self) -> String {
        format!("{}{}{}", DLL_PREFIX, self.0, DLL_SUFFIX)
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
