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

use thiserror::Error;

use crate::library::LibraryId;

/// Errors surfaced by the bootstrap. Every variant is fatal to the current process launch.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The variant name does not select any manifest.
    #[error("unknown application variant: {0:?}")]
    UnknownVariant(String),

    /// A manifest declaration is malformed.
    #[error("invalid library manifest: {0}")]
    InvalidManifest(String),

    /// The host platform could not locate or map a declared library.
    #[error("failed to load library {library} (manifest entry {index})")]
    Load {
        library: LibraryId,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The bootstrap sequence was already started once in this process.
    #[error("the bootstrap sequence has already run")]
    AlreadyRun,

    /// Every library loaded but control could not be handed to the application module.
    #[error("failed to hand off to the entry point of {library}")]
    HandOff {
        library: LibraryId,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
